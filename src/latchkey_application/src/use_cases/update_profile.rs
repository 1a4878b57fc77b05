use latchkey_core::{ProfileUpdate, Subject, SubjectId, SubjectStore, SubjectStoreError};

/// Update profile use case - sets the subject's display names
pub struct UpdateProfileUseCase<'a, S>
where
    S: SubjectStore,
{
    subject_store: &'a S,
}

impl<'a, S> UpdateProfileUseCase<'a, S>
where
    S: SubjectStore,
{
    pub fn new(subject_store: &'a S) -> Self {
        Self { subject_store }
    }

    /// Execute the update profile use case
    ///
    /// # Arguments
    /// * `subject_id` - Identity resolved by the session authenticator
    /// * `profile` - Validated names; `None` clears a name
    ///
    /// # Returns
    /// The updated subject
    #[tracing::instrument(name = "UpdateProfileUseCase::execute", skip(self, profile))]
    pub async fn execute(
        &self,
        subject_id: SubjectId,
        profile: ProfileUpdate,
    ) -> Result<Subject, SubjectStoreError> {
        let subject = self
            .subject_store
            .update_profile(&subject_id, profile)
            .await?;

        tracing::info!(%subject_id, "Profile updated");

        Ok(subject)
    }
}
