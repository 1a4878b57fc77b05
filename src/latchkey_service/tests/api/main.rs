mod helpers;
mod magic_link;
mod users;
mod verify;
