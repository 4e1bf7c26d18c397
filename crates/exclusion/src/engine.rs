//! Exclusion engine facade.
//!
//! Window matching first (cheap, deterministic), then accessibility focus
//! tracking for sensitive contexts a window title cannot reveal.

use crate::bus::AccessibilityBus;
use crate::clock::{Clock, SystemClock};
use crate::machine::{ContextMachine, ContextSnapshot};
use clipkeep_context::{matches, CaptureSettings, ContextTimings, WindowDescriptor, WindowProvider};
use clipkeep_events::{EventBusRef, NullEventBus};
use std::sync::Arc;
use std::time::Instant;

/// Decides whether clipboard capture must be suppressed.
///
/// Create one per process and hand it to whatever persists clipboard
/// entries.
pub struct ExclusionEngine {
    machine: ContextMachine,
}

/// Builder for [`ExclusionEngine`].
pub struct ExclusionEngineBuilder {
    bus: Arc<dyn AccessibilityBus>,
    events: EventBusRef,
    clock: Arc<dyn Clock>,
    timings: ContextTimings,
}

impl ExclusionEngineBuilder {
    /// Publish flag and lifecycle changes on `events`.
    pub fn events(mut self, events: EventBusRef) -> Self {
        self.events = events;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn timings(mut self, timings: ContextTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn build(self) -> ExclusionEngine {
        ExclusionEngine {
            machine: ContextMachine::new(self.bus, self.events, self.clock, self.timings),
        }
    }
}

impl ExclusionEngine {
    /// Engine with default timings, the system clock and no event output.
    pub fn new(bus: Arc<dyn AccessibilityBus>) -> Self {
        Self::builder(bus).build()
    }

    pub fn builder(bus: Arc<dyn AccessibilityBus>) -> ExclusionEngineBuilder {
        ExclusionEngineBuilder {
            bus,
            events: Arc::new(NullEventBus),
            clock: Arc::new(SystemClock),
            timings: ContextTimings::default(),
        }
    }

    /// Whether capture must be suppressed for `window`.
    ///
    /// An empty exclusion list short-circuits to `false` without activating
    /// anything. A window match returns `true` without consulting focus
    /// tracking; otherwise focus tracking decides.
    pub fn is_excluded(
        &mut self,
        window: Option<&WindowDescriptor>,
        settings: &CaptureSettings,
    ) -> bool {
        let list = settings.exclusion_list();
        if list.is_empty() {
            return false;
        }

        if let Some(window) = window {
            if matches(window, &list) {
                tracing::debug!("focused window is excluded");
                return true;
            }
        }

        self.machine.query(&list, settings.enhanced_detection)
    }

    /// Focus-tracking check with no window in focus.
    ///
    /// Used to keep suppressing content copied from an excluded context after
    /// its window lost focus.
    pub fn is_context_excluded(&mut self, settings: &CaptureSettings) -> bool {
        self.is_excluded(None, settings)
    }

    /// Read the focused window from `provider`, then check it.
    pub fn check_focused(
        &mut self,
        provider: &dyn WindowProvider,
        settings: &CaptureSettings,
    ) -> bool {
        let window = provider.focused_window();
        self.is_excluded(window.as_ref(), settings)
    }

    /// Process queued focus events and a due clear without querying.
    pub fn pump(&mut self) -> usize {
        self.machine.pump()
    }

    /// When the armed clear fires, if one is armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.machine.next_deadline()
    }

    pub fn snapshot(&self) -> ContextSnapshot {
        self.machine.snapshot()
    }

    /// Stop focus tracking and reset. Idempotent.
    pub fn destroy(&mut self) {
        self.machine.shutdown();
    }
}
