use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use latchkey_core::{Email, ProfileUpdate, Subject, SubjectId, SubjectStore, SubjectStoreError};

#[derive(Default)]
struct Subjects {
    by_id: HashMap<SubjectId, Subject>,
    ids_by_email: HashMap<Email, SubjectId>,
}

/// In-process subject store for tests and single-node demos.
#[derive(Default, Clone)]
pub struct HashMapSubjectStore {
    subjects: Arc<RwLock<Subjects>>,
}

impl HashMapSubjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.subjects.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn find_by_email(&self, email: &Email) -> Option<Subject> {
        let subjects = self.subjects.read().await;
        let id = subjects.ids_by_email.get(email)?;
        subjects.by_id.get(id).cloned()
    }
}

#[async_trait::async_trait]
impl SubjectStore for HashMapSubjectStore {
    async fn upsert_by_email(&self, email: &Email) -> Result<SubjectId, SubjectStoreError> {
        // Single write guard, so concurrent first-time signups cannot both insert.
        let mut subjects = self.subjects.write().await;
        let now = Utc::now();

        if let Some(id) = subjects.ids_by_email.get(email).copied() {
            let subject = subjects
                .by_id
                .get_mut(&id)
                .ok_or_else(|| SubjectStoreError::UnexpectedError("dangling email index".into()))?;
            subject.last_login_at = Some(now);
            subject.updated_at = now;
            return Ok(id);
        }

        let id = SubjectId::new();
        subjects.ids_by_email.insert(email.clone(), id);
        subjects.by_id.insert(
            id,
            Subject {
                id,
                email: email.clone(),
                first_name: None,
                last_name: None,
                created_at: now,
                updated_at: now,
                last_login_at: None,
            },
        );
        Ok(id)
    }

    async fn get_subject(&self, id: &SubjectId) -> Result<Subject, SubjectStoreError> {
        let subjects = self.subjects.read().await;
        subjects
            .by_id
            .get(id)
            .cloned()
            .ok_or(SubjectStoreError::SubjectNotFound)
    }

    async fn update_profile(
        &self,
        id: &SubjectId,
        profile: ProfileUpdate,
    ) -> Result<Subject, SubjectStoreError> {
        let mut subjects = self.subjects.write().await;
        let subject = subjects
            .by_id
            .get_mut(id)
            .ok_or(SubjectStoreError::SubjectNotFound)?;

        subject.first_name = profile.first_name;
        subject.last_name = profile.last_name;
        subject.updated_at = Utc::now();

        Ok(subject.clone())
    }
}
