use async_trait::async_trait;

/// Trait for validating session credentials in middleware.
///
/// Validators extract the credential from an incoming request, verify it,
/// and produce the typed identity handed to protected routes.
///
/// # Implementation Note
///
/// The validator receives `RequestParts` (headers, method, URI, extensions) rather
/// than the full `Request` to avoid issues with non-`Sync` request bodies.
/// Validators only need headers to extract credentials.
#[async_trait]
pub trait AuthValidator: Clone + Send + Sync + 'static {
    /// The identity extracted from a valid credential.
    ///
    /// Made available to protected route handlers via request extensions.
    type Claims: Clone + Send + Sync + 'static;

    /// The request parts type this validator operates on.
    ///
    /// Typically `http::request::Parts`.
    type RequestParts: Sync;

    /// Errors that can occur during validation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Validate authentication from the request parts.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No credential is present
    /// - The credential is malformed, forged, or expired
    async fn validate(&self, parts: &Self::RequestParts) -> Result<Self::Claims, Self::Error>;
}
