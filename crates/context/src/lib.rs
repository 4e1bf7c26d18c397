//! Window context for clipkeep capture exclusion.
//!
//! This crate holds the pure domain layer of exclusion: what a window looks
//! like, how the user's exclusion list is normalized, and how the two are
//! matched. It tracks nothing and performs no I/O.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                             │
//! │  window.rs   - WindowDescriptor (title/class/app metadata)  │
//! │  matcher.rs  - ExclusionList and identifier matching (pure) │
//! │  settings.rs - CaptureSettings, ContextTimings, constants   │
//! │  provider.rs - Trait for focused-window lookup              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stateful accessibility tracking lives in `clipkeep-exclusion`.
//!
//! # Example
//!
//! ```
//! use clipkeep_context::{matches, ExclusionList, WindowDescriptor};
//!
//! let list = ExclusionList::new(["bank"]);
//! let window = WindowDescriptor::new().with_title("MyBank - Login");
//! assert!(matches(&window, &list));
//! ```

mod matcher;
mod provider;
mod settings;
mod window;

pub use matcher::{matches, ExclusionList};
pub use provider::{FixedProvider, NullProvider, WindowProvider};
pub use settings::{CaptureSettings, ContextTimings, ANCESTOR_DEPTH, CLEAR_DELAY, SEED_DEPTH};
pub use window::{WindowDescriptor, DESKTOP_SUFFIX};
