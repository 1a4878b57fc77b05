//! # Latchkey - Passwordless Magic-Link Authentication
//!
//! This is a facade crate that re-exports all public APIs from the latchkey components.
//! Use this crate to get access to the whole flow in one place.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! latchkey = { path = "../latchkey" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `SubjectId`, `PlaintextToken`, `TokenDigest`, etc.
//! - **Ports**: `SubjectStore`, `VerificationStore`, `SessionIssuer`, `SessionAuthenticator`
//! - **Use cases**: `RequestLinkUseCase`, `RedeemTokenUseCase`, etc.
//! - **Adapters**: `PostgresSubjectStore`, `JwtSessionIssuer`, `PostmarkEmailClient`, etc.
//! - **Service**: `LatchkeyService` - The axum router and standalone server

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use latchkey_core::*;
}

// Re-export most commonly used core types at the root level
pub use latchkey_core::{
    Email, PersonName, PlaintextToken, ProfileUpdate, SessionToken, Subject, SubjectId,
    TokenCodec, TokenCodecError, TokenDigest, ValidationError,
};

// ============================================================================
// Ports
// ============================================================================

/// Store and service trait definitions
pub mod ports {
    pub use latchkey_core::{
        AuthValidator, EmailClient, SessionAuthenticator, SessionError, SessionIssuer,
        SubjectStore, SubjectStoreError, VerificationStore, VerificationStoreError,
    };
}

pub use ports::*;

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use latchkey_application::*;
}

pub use latchkey_application::{
    GetCurrentSubjectUseCase, IssuedLink, RedeemTokenError, RedeemTokenUseCase,
    RedeemedSession, RequestLinkError, RequestLinkUseCase, UpdateProfileUseCase,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// HTTP route handlers, state and middleware
    pub mod http {
        pub use latchkey_adapters::http::*;
    }

    /// Persistence implementations
    pub mod persistence {
        pub use latchkey_adapters::persistence::*;
    }

    /// Email client implementations
    pub mod email {
        pub use latchkey_adapters::email::*;
    }

    /// Session credential issuing and validation
    pub mod session {
        pub use latchkey_adapters::session::*;
    }

    /// Configuration
    pub mod config {
        pub use latchkey_adapters::config::*;
    }
}

pub use latchkey_adapters::{
    AuthenticatedSubject, DisabledEmailClient, HashMapSubjectStore, HashMapVerificationStore,
    JwtSessionConfig, JwtSessionIssuer, JwtSessionValidator, MockEmailClient,
    PostgresSubjectStore, PostgresVerificationStore, PostmarkEmailClient,
};

// ============================================================================
// Service (Main Entry Point)
// ============================================================================

pub use latchkey_service::{
    LatchkeyService, ServiceConfig, StartupError, get_postgres_pool, init_tracing,
    run_migrations, spawn_token_purge,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing the store traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

pub use http;
