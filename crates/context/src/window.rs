//! Window metadata as reported by the windowing system.

use serde::{Deserialize, Serialize};

/// Conventional suffix carried by desktop-entry application ids.
pub const DESKTOP_SUFFIX: &str = ".desktop";

/// Metadata about a window and the application that owns it.
///
/// Every field is optional: the windowing system may not know some of them
/// (e.g. an X11 window without a WM_CLASS). Descriptors are read fresh for
/// each query and never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowDescriptor {
    /// Window title (e.g. "Sign in - Firefox")
    #[serde(default)]
    pub title: Option<String>,

    /// Window class (e.g. "firefox")
    #[serde(default)]
    pub window_class: Option<String>,

    /// Application display name (e.g. "KeePassXC")
    #[serde(default)]
    pub app_name: Option<String>,

    /// Application id (e.g. "org.keepassxc.KeePassXC.desktop")
    #[serde(default)]
    pub app_id: Option<String>,
}

impl WindowDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.window_class = Some(class.into());
        self
    }

    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    pub fn with_app_id(mut self, id: impl Into<String>) -> Self {
        self.app_id = Some(id.into());
        self
    }

    /// Application id without the `.desktop` suffix, if it had one.
    pub fn app_id_stem(&self) -> Option<&str> {
        self.app_id
            .as_deref()
            .and_then(|id| id.strip_suffix(DESKTOP_SUFFIX))
    }

    /// All identifiers the matcher compares against, in no particular order.
    ///
    /// Absent fields are skipped.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        [
            self.title.as_deref(),
            self.window_class.as_deref(),
            self.app_name.as_deref(),
            self.app_id.as_deref(),
            self.app_id_stem(),
        ]
        .into_iter()
        .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_id_stem_strips_desktop_suffix() {
        let window = WindowDescriptor::new().with_app_id("org.keepassxc.KeePassXC.desktop");
        assert_eq!(window.app_id_stem(), Some("org.keepassxc.KeePassXC"));
    }

    #[test]
    fn test_app_id_stem_without_suffix() {
        let window = WindowDescriptor::new().with_app_id("firefox");
        assert_eq!(window.app_id_stem(), None);
    }

    #[test]
    fn test_identifiers_skip_absent_fields() {
        let window = WindowDescriptor::new()
            .with_title("Notes")
            .with_app_id("org.gnome.Notes.desktop");

        let ids: Vec<&str> = window.identifiers().collect();
        assert_eq!(
            ids,
            vec!["Notes", "org.gnome.Notes.desktop", "org.gnome.Notes"]
        );
    }

    #[test]
    fn test_deserialize_partial() {
        let json = r#"{"title": "Login"}"#;
        let window: WindowDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(window.title.as_deref(), Some("Login"));
        assert!(window.app_id.is_none());
    }
}
