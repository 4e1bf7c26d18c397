//! Exclusion list and window identifier matching.
//!
//! Pure domain logic - no I/O, no platform dependencies.

use crate::window::WindowDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of lowercase, trimmed substrings that mark a context as sensitive.
///
/// An empty list never excludes anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ExclusionList {
    entries: BTreeSet<String>,
}

impl ExclusionList {
    /// Build a list from raw user input.
    ///
    /// Entries are trimmed and lowercased; blanks and duplicates are dropped.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|e| e.as_ref().trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// First entry contained in `candidate` (compared lowercase).
    pub fn find_in(&self, candidate: &str) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let candidate = candidate.to_lowercase();
        self.iter().find(|entry| candidate.contains(entry))
    }

    /// Check whether any entry is a substring of `candidate`.
    pub fn contained_in(&self, candidate: &str) -> bool {
        self.find_in(candidate).is_some()
    }
}

impl From<Vec<String>> for ExclusionList {
    fn from(entries: Vec<String>) -> Self {
        Self::new(entries)
    }
}

impl From<ExclusionList> for Vec<String> {
    fn from(list: ExclusionList) -> Self {
        list.entries.into_iter().collect()
    }
}

/// Check a window's identifiers against the exclusion list.
///
/// Candidates are the title, window class, application name, application id
/// and the application id with its `.desktop` suffix removed. Returns `true`
/// on the first candidate containing any entry.
pub fn matches(window: &WindowDescriptor, list: &ExclusionList) -> bool {
    if list.is_empty() {
        return false;
    }

    let hit = window.identifiers().find_map(|id| list.find_in(id));
    if let Some(entry) = hit {
        tracing::trace!(entry, "window identifier matched exclusion entry");
    }
    hit.is_some()
}
