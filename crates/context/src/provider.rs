//! Provider trait for window metadata lookup.
//!
//! Abstracts the windowing system so the matching logic stays pure and
//! testable.

use crate::window::WindowDescriptor;

/// Provider for reading the currently focused window.
pub trait WindowProvider: Send + Sync {
    /// Get the currently focused window, if any.
    fn focused_window(&self) -> Option<WindowDescriptor>;
}

/// Null implementation for testing or unsupported platforms.
pub struct NullProvider;

impl WindowProvider for NullProvider {
    fn focused_window(&self) -> Option<WindowDescriptor> {
        None
    }
}

/// Provider that always reports the same window.
///
/// Useful for replaying a captured session or for hosts that already know the
/// focused window.
#[derive(Debug, Clone, Default)]
pub struct FixedProvider {
    window: Option<WindowDescriptor>,
}

impl FixedProvider {
    pub fn new(window: Option<WindowDescriptor>) -> Self {
        Self { window }
    }
}

impl WindowProvider for FixedProvider {
    fn focused_window(&self) -> Option<WindowDescriptor> {
        self.window.clone()
    }
}
