//! Shared event contracts for exclusion state reporting.
//!
//! This crate defines the DTOs the exclusion engine publishes when its
//! sticky flag flips or its lifecycle changes. Using shared types prevents
//! runtime deserialization errors from mismatched field names between the
//! engine and whatever UI listens to it.
//!
//! Also provides the `EventBus` trait for decoupled event emission.

mod bus;

pub use bus::{publish, EmittedEvent, EventBus, EventBusRef, InMemoryEventBus, NullEventBus};

use serde::{Deserialize, Serialize};

/// What caused the sticky exclusion flag to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeCause {
    /// A live focus event landed inside an excluded context.
    Focus,
    /// The activation scan found focus inside an excluded context.
    Seed,
    /// The debounce elapsed after focus left the excluded context.
    Cleared,
    /// The engine was torn down.
    Shutdown,
}

/// Event emitted when the sticky exclusion flag flips.
///
/// Producers: exclusion engine
/// Consumers: clipboard UI (status indicator)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionChangedEvent {
    /// New value of the sticky flag.
    pub excluded: bool,
    pub cause: ChangeCause,
    /// Timestamp in milliseconds since epoch.
    #[serde(default)]
    pub timestamp_ms: i64,
}

impl ExclusionChangedEvent {
    pub fn now(excluded: bool, cause: ChangeCause) -> Self {
        Self {
            excluded,
            cause,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Event emitted when focus tracking starts or stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineLifecycleEvent {
    /// Whether a focus subscription is live after this event.
    pub active: bool,
    #[serde(default)]
    pub timestamp_ms: i64,
}

impl EngineLifecycleEvent {
    pub fn now(active: bool) -> Self {
        Self {
            active,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Event names as constants to prevent typos.
pub mod event_names {
    /// Sticky flag changed.
    pub const EXCLUSION_CHANGED: &str = "exclusion:changed";
    /// Focus tracking activated.
    pub const ENGINE_ACTIVATED: &str = "exclusion:activated";
    /// Focus tracking torn down.
    pub const ENGINE_STOPPED: &str = "exclusion:stopped";
}
