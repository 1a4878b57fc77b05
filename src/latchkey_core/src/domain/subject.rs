use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{email::Email, person_name::PersonName};

/// Stable identifier of an authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(Uuid);

impl SubjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw).map(Self)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SubjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SubjectId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the system, created on their first magic-link request.
#[derive(Debug, Clone, PartialEq)]
pub struct Subject {
    pub id: SubjectId,
    pub email: Email,
    pub first_name: Option<PersonName>,
    pub last_name: Option<PersonName>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl Subject {
    /// A subject without a first name has not finished onboarding.
    pub fn requires_onboarding(&self) -> bool {
        self.first_name.is_none()
    }
}

/// New profile names. Both fields are written; `None` clears a name.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub first_name: Option<PersonName>,
    pub last_name: Option<PersonName>,
}
