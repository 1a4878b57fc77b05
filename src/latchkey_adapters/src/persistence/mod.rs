pub mod hashmap_subject_store;
pub mod hashmap_verification_store;
pub mod postgres_subject_store;
pub mod postgres_verification_store;
mod sqlx_error;
