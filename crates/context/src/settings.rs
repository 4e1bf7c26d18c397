//! Capture settings and context-tracking limits.
//!
//! Centralizes the tunables for the exclusion engine. `CaptureSettings` is
//! what the settings store hands over on every query; `ContextTimings` is fixed
//! when the engine is built.

use crate::matcher::ExclusionList;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of parent hops inspected for each focus event.
pub const ANCESTOR_DEPTH: usize = 5;

/// Maximum depth of the one-time focused-descendant scan on activation.
pub const SEED_DEPTH: usize = 20;

/// Quiet period before a sticky exclusion clears.
pub const CLEAR_DELAY: Duration = Duration::from_millis(500);

/// User-facing capture settings, supplied fresh on every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Track accessibility focus to catch sensitive sub-contexts
    /// (e.g. a password field inside a browser window).
    pub enhanced_detection: bool,

    /// Raw exclusion entries as typed by the user.
    pub exclusions: Vec<String>,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            enhanced_detection: true,
            exclusions: Vec::new(),
        }
    }
}

impl CaptureSettings {
    pub fn new<I, S>(exclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclusions: exclusions.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_enhanced_detection(mut self, enabled: bool) -> Self {
        self.enhanced_detection = enabled;
        self
    }

    /// Normalized exclusion list.
    pub fn exclusion_list(&self) -> ExclusionList {
        ExclusionList::new(&self.exclusions)
    }
}

/// Depth bounds and debounce delay for the context state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextTimings {
    /// Parent hops walked per focus event.
    pub ancestor_depth: usize,

    /// Depth bound of the activation seed scan.
    pub seed_depth: usize,

    /// Debounce before clearing the sticky flag, in milliseconds.
    pub clear_delay_ms: u64,
}

impl Default for ContextTimings {
    fn default() -> Self {
        Self {
            ancestor_depth: ANCESTOR_DEPTH,
            seed_depth: SEED_DEPTH,
            clear_delay_ms: CLEAR_DELAY.as_millis() as u64,
        }
    }
}

impl ContextTimings {
    pub fn clear_delay(&self) -> Duration {
        Duration::from_millis(self.clear_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let timings = ContextTimings::default();
        assert_eq!(timings.ancestor_depth, 5);
        assert_eq!(timings.seed_depth, 20);
        assert_eq!(timings.clear_delay(), Duration::from_millis(500));

        let settings = CaptureSettings::default();
        assert!(settings.enhanced_detection);
        assert!(settings.exclusion_list().is_empty());
    }

    #[test]
    fn test_settings_deserialize_minimal() {
        let json = r#"{"exclusions": ["Bank", " "]}"#;
        let settings: CaptureSettings = serde_json::from_str(json).unwrap();
        assert!(settings.enhanced_detection);
        assert_eq!(settings.exclusion_list().len(), 1);
    }

    #[test]
    fn test_timings_deserialize_partial() {
        let json = r#"{"clear_delay_ms": 250}"#;
        let timings: ContextTimings = serde_json::from_str(json).unwrap();
        assert_eq!(timings.clear_delay(), Duration::from_millis(250));
        assert_eq!(timings.ancestor_depth, ANCESTOR_DEPTH);
    }

    #[test]
    fn test_constants_are_reasonable() {
        assert!(SEED_DEPTH > ANCESTOR_DEPTH);
        assert!(CLEAR_DELAY.as_millis() > 0);
        assert!(CLEAR_DELAY.as_secs() < 5);
    }
}
