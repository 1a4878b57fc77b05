use latchkey_core::{Subject, SubjectId, SubjectStore, SubjectStoreError};

/// Get current subject use case - loads the profile behind a session
pub struct GetCurrentSubjectUseCase<'a, S>
where
    S: SubjectStore,
{
    subject_store: &'a S,
}

impl<'a, S> GetCurrentSubjectUseCase<'a, S>
where
    S: SubjectStore,
{
    pub fn new(subject_store: &'a S) -> Self {
        Self { subject_store }
    }

    /// Execute the get current subject use case
    ///
    /// # Arguments
    /// * `subject_id` - Identity resolved by the session authenticator
    #[tracing::instrument(name = "GetCurrentSubjectUseCase::execute", skip(self))]
    pub async fn execute(&self, subject_id: SubjectId) -> Result<Subject, SubjectStoreError> {
        self.subject_store.get_subject(&subject_id).await
    }
}
