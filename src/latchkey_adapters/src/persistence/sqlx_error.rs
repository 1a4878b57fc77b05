use latchkey_core::{SubjectStoreError, VerificationStoreError};

/// Pool exhaustion, a closed pool, or a dropped connection.
fn is_transient(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed
    )
}

pub(crate) fn subject_store_error(e: sqlx::Error) -> SubjectStoreError {
    if is_transient(&e) {
        tracing::error!(error = %e, "Subject store unavailable");
        SubjectStoreError::StoreUnavailable(e.to_string())
    } else {
        SubjectStoreError::UnexpectedError(e.to_string())
    }
}

pub(crate) fn verification_store_error(e: sqlx::Error) -> VerificationStoreError {
    if is_transient(&e) {
        tracing::error!(error = %e, "Verification store unavailable");
        VerificationStoreError::StoreUnavailable(e.to_string())
    } else {
        VerificationStoreError::UnexpectedError(e.to_string())
    }
}
