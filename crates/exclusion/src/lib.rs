//! Capture exclusion for clipkeep.
//!
//! Decides, at the moment clipboard content would be captured, whether the
//! user is inside a sensitive application or a sensitive embedded context,
//! e.g. a password field rendered inside an ordinary browser window.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  engine.rs  - ExclusionEngine facade                         │
//! │               window match first, focus tracking fallback    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  machine.rs - ContextMachine: sticky flag, debounced clear,  │
//! │               readiness, lazy activation                     │
//! │  walker.rs  - bounded ancestor / focused-descendant walks    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  bus.rs     - AccessibilityBus, FocusSink (resolves events)  │
//! │  node.rs    - AccessibilityNode, Role                        │
//! │  clock.rs   - Clock                                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use clipkeep_exclusion::{ExclusionEngine, InMemoryAccessibilityBus};
//! use clipkeep_context::{CaptureSettings, WindowDescriptor};
//! use std::sync::Arc;
//!
//! let mut engine = ExclusionEngine::new(Arc::new(InMemoryAccessibilityBus::new()));
//! let settings = CaptureSettings::new(["bank"]);
//!
//! let window = WindowDescriptor::new().with_title("MyBank - Login");
//! assert!(engine.is_excluded(Some(&window), &settings));
//!
//! engine.destroy();
//! ```

mod bus;
mod clock;
mod engine;
mod error;
mod machine;
mod node;
mod walker;

pub use bus::{
    AccessibilityBus, FocusEvent, FocusReceiver, FocusSender, FocusSink,
    InMemoryAccessibilityBus,
    ListenerId, NullAccessibilityBus,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{ExclusionEngine, ExclusionEngineBuilder};
pub use error::{ExclusionError, NodeError, Result};
pub use machine::{ContextMachine, ContextSnapshot, ContextState, EventOutcome, Phase};
pub use node::{AccessibilityNode, NodeRef, Role, StaticNode};
pub use walker::{ancestor_names, deepest_focused};
