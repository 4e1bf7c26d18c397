//! Accessibility event bus abstraction.
//!
//! The real bus (AT-SPI on Linux desktops) pushes focus notifications from its
//! own dispatch context. Each notification is resolved right there, while the
//! source node is still alive, into a plain [`FocusEvent`] and forwarded into a
//! channel. The state machine drains that channel as the single owner of its
//! state, one event at a time and to completion. Queued events hold no nodes.

use crate::error::{ExclusionError, NodeError, Result};
use crate::node::{AccessibilityNode, NodeRef, Role};
use crate::walker::ancestor_names;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;
use tokio::sync::mpsc;

/// Focus moved at instant `at`, as observed when the notification arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusEvent {
    /// Role of the focused node; `None` if it could not be read.
    pub role: Option<Role>,
    /// Lowercased names of the focused node and its ancestors.
    pub names: Vec<String>,
    pub at: Instant,
}

impl FocusEvent {
    /// Read role and ancestor names from `source` now.
    ///
    /// An unreadable role yields an event with `role: None` and no names,
    /// which the state machine discards.
    pub fn resolve(source: &dyn AccessibilityNode, ancestor_depth: usize, at: Instant) -> Self {
        match source.role() {
            Ok(role) => Self {
                role: Some(role),
                names: ancestor_names(source, ancestor_depth),
                at,
            },
            Err(e) => {
                tracing::debug!(error = %e, "focus source unreadable");
                Self {
                    role: None,
                    names: Vec::new(),
                    at,
                }
            }
        }
    }
}

/// Sending half of the focus channel.
pub type FocusSender = mpsc::UnboundedSender<FocusEvent>;

/// Receiving half owned by the state machine.
pub type FocusReceiver = mpsc::UnboundedReceiver<FocusEvent>;

/// Listener handed to the bus on registration.
///
/// Resolves each notification against the live tree before queueing it.
#[derive(Debug, Clone)]
pub struct FocusSink {
    tx: FocusSender,
    ancestor_depth: usize,
}

impl FocusSink {
    pub fn new(tx: FocusSender, ancestor_depth: usize) -> Self {
        Self { tx, ancestor_depth }
    }

    /// Resolve `source` and queue the result. `false` once the receiver is
    /// gone.
    pub fn deliver(&self, source: &dyn AccessibilityNode, at: Instant) -> bool {
        if self.tx.is_closed() {
            return false;
        }
        self.tx
            .send(FocusEvent::resolve(source, self.ancestor_depth, at))
            .is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Handle identifying a registered focus listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// System accessibility service.
pub trait AccessibilityBus: Send + Sync {
    /// Whether the global accessibility service switch is on.
    fn is_enabled(&self) -> bool;

    /// Flip the global accessibility service switch. Idempotent.
    fn set_enabled(&self, enabled: bool) -> Result<()>;

    /// Desktop root of the accessibility tree.
    fn root(&self) -> std::result::Result<Option<NodeRef>, NodeError>;

    /// Start delivering focus-change notifications to `sink`.
    ///
    /// The bus calls [`FocusSink::deliver`] from its dispatch context for every
    /// notification, before the source node can go away.
    fn register(&self, sink: FocusSink) -> Result<ListenerId>;

    /// Stop forwarding for `id`. Unknown ids are ignored.
    fn deregister(&self, id: ListenerId);
}

/// Bus for systems without an accessibility service.
///
/// Activation always fails, so exclusion falls back to window matching.
pub struct NullAccessibilityBus;

impl AccessibilityBus for NullAccessibilityBus {
    fn is_enabled(&self) -> bool {
        false
    }

    fn set_enabled(&self, _enabled: bool) -> Result<()> {
        Err(ExclusionError::EnableFailed(
            "no accessibility service on this platform".to_string(),
        ))
    }

    fn root(&self) -> std::result::Result<Option<NodeRef>, NodeError> {
        Ok(None)
    }

    fn register(&self, _sink: FocusSink) -> Result<ListenerId> {
        Err(ExclusionError::Unavailable(
            "no accessibility service on this platform".to_string(),
        ))
    }

    fn deregister(&self, _id: ListenerId) {}
}

/// Scriptable in-memory bus.
///
/// Drives the engine from recorded sessions and tests: set a root, push focus
/// events, make registration fail.
#[derive(Default)]
pub struct InMemoryAccessibilityBus {
    enabled: AtomicBool,
    enable_calls: AtomicUsize,
    fail_register: AtomicBool,
    next_id: AtomicU64,
    root: Mutex<Option<NodeRef>>,
    listeners: Mutex<HashMap<ListenerId, FocusSink>>,
}

impl InMemoryAccessibilityBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_root(&self, root: Option<NodeRef>) {
        *lock(&self.root) = root;
    }

    /// Make subsequent `register` calls fail (or succeed again).
    pub fn set_fail_register(&self, fail: bool) {
        self.fail_register.store(fail, Ordering::SeqCst);
    }

    /// Number of times the service switch was actually flipped.
    pub fn enable_calls(&self) -> usize {
        self.enable_calls.load(Ordering::SeqCst)
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }

    /// Deliver a focus notification to every listener.
    ///
    /// Returns how many listeners received it.
    pub fn emit_focus(&self, source: &dyn AccessibilityNode, at: Instant) -> usize {
        let mut listeners = lock(&self.listeners);
        listeners.retain(|_, sink| !sink.is_closed());
        listeners
            .values()
            .filter(|sink| sink.deliver(source, at))
            .count()
    }
}

impl AccessibilityBus for InMemoryAccessibilityBus {
    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn set_enabled(&self, enabled: bool) -> Result<()> {
        if self.enabled.swap(enabled, Ordering::SeqCst) != enabled {
            self.enable_calls.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn root(&self) -> std::result::Result<Option<NodeRef>, NodeError> {
        Ok(lock(&self.root).clone())
    }

    fn register(&self, sink: FocusSink) -> Result<ListenerId> {
        if self.fail_register.load(Ordering::SeqCst) {
            return Err(ExclusionError::Subscribe("registry not reachable".to_string()));
        }
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        lock(&self.listeners).insert(id, sink);
        Ok(id)
    }

    fn deregister(&self, id: ListenerId) {
        lock(&self.listeners).remove(&id);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
