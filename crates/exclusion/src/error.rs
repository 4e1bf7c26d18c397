//! Error types for accessibility-backed exclusion tracking.

use thiserror::Error;

/// A single accessible-object access failed.
///
/// Walkers treat this as "nothing further in that direction"; it never
/// escapes a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    /// The object went away (window closed, widget destroyed).
    #[error("accessible object is defunct")]
    Defunct,

    /// The accessibility service returned an error for this call.
    #[error("accessibility call failed: {0}")]
    Call(String),
}

/// Errors that can occur while activating focus tracking.
#[derive(Debug, Error)]
pub enum ExclusionError {
    /// No accessibility service on this system.
    #[error("accessibility service unavailable: {0}")]
    Unavailable(String),

    /// The service exists but could not be switched on.
    #[error("failed to enable accessibility service: {0}")]
    EnableFailed(String),

    /// Registering the focus listener failed.
    #[error("failed to subscribe to focus events: {0}")]
    Subscribe(String),
}

pub type Result<T> = std::result::Result<T, ExclusionError>;
