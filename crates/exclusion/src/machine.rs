//! Context state machine - tracks whether focus sits inside an excluded
//! accessibility context.
//!
//! Focus notifications are resolved by the accessibility bus when they arrive
//! and queued as plain data. They are drained here by the single owner of the
//! state, one at a time and to completion. The
//! sticky flag is set immediately on a match and only cleared after focus has
//! rested on a top-level document or frame for the debounce period.

use crate::bus::{AccessibilityBus, FocusEvent, FocusReceiver, FocusSink, ListenerId};
use crate::clock::Clock;
use crate::error::Result;
use crate::walker::{ancestor_names, deepest_focused};
use clipkeep_context::{ContextTimings, ExclusionList};
use clipkeep_events::{
    event_names, publish, ChangeCause, EngineLifecycleEvent, EventBusRef, ExclusionChangedEvent,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Activation phase of focus tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No subscription. Initial state, and the state after shutdown or a
    /// failed activation.
    Inactive,
    /// Subscribing and running the seed scan.
    Activating,
    /// Subscribed and processing focus events.
    Active,
}

/// Mutable tracking state.
///
/// `pending_clear` is only ever `Some` while `excluded` is true.
#[derive(Debug, Clone, Default)]
pub struct ContextState {
    /// Sticky flag.
    pub excluded: bool,
    /// Set once the first live focus event has been processed.
    pub ready: bool,
    /// Deadline of the armed clear, if any.
    pub pending_clear: Option<Instant>,
    /// Exclusion list from the latest query; focus events are matched
    /// against this.
    pub cached_list: ExclusionList,
}

impl ContextState {
    /// Arm the clear unless one is already pending. Returns whether it armed.
    fn arm_clear(&mut self, deadline: Instant) -> bool {
        let armed = self.pending_clear.is_none();
        self.pending_clear.get_or_insert(deadline);
        armed
    }

    /// Disarm the clear if its deadline is at or before `at`.
    fn take_due_clear(&mut self, at: Instant) -> bool {
        match self.pending_clear {
            Some(deadline) if deadline <= at => {
                self.pending_clear = None;
                true
            }
            _ => false,
        }
    }
}

/// What a single focus event did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Ancestors matched; the flag is set.
    Excluded,
    /// A clear was armed.
    ClearArmed,
    /// A clear was already pending and keeps its deadline.
    ClearPending,
    /// Nothing to do.
    Unchanged,
    /// The source could not be read; the event was discarded.
    Dropped,
}

/// Serializable view of the machine for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContextSnapshot {
    pub phase: Phase,
    pub excluded: bool,
    pub ready: bool,
    pub clear_pending: bool,
}

struct Subscription {
    id: ListenerId,
    rx: FocusReceiver,
}

/// Owner of the sticky exclusion flag and its debounce.
pub struct ContextMachine {
    bus: Arc<dyn AccessibilityBus>,
    events: EventBusRef,
    clock: Arc<dyn Clock>,
    timings: ContextTimings,
    phase: Phase,
    state: ContextState,
    subscription: Option<Subscription>,
}

impl ContextMachine {
    pub fn new(
        bus: Arc<dyn AccessibilityBus>,
        events: EventBusRef,
        clock: Arc<dyn Clock>,
        timings: ContextTimings,
    ) -> Self {
        Self {
            bus,
            events,
            clock,
            timings,
            phase: Phase::Inactive,
            state: ContextState::default(),
            subscription: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &ContextState {
        &self.state
    }

    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            phase: self.phase,
            excluded: self.state.excluded,
            ready: self.state.ready,
            clear_pending: self.state.pending_clear.is_some(),
        }
    }

    /// Whether focus is currently inside an excluded context.
    ///
    /// Activates tracking on first use. Fails open: returns `false` when
    /// detection is disabled, when activation fails, and until the first live
    /// focus event has been seen, even if the activation scan already set the
    /// flag.
    pub fn query(&mut self, list: &ExclusionList, enhanced_detection: bool) -> bool {
        // Queued events were raised before this query; match them against the
        // list that was current at the time. Drained even when detection is
        // off so an active subscription cannot pile up events.
        self.pump();

        if !enhanced_detection {
            return false;
        }

        self.state.cached_list = list.clone();

        if let Err(e) = self.ensure_active() {
            tracing::warn!(error = %e, "focus tracking unavailable, exclusion not enforced");
            return false;
        }

        if !self.state.ready {
            return false;
        }

        self.state.excluded
    }

    /// Drain queued focus events and fire a due clear.
    ///
    /// A pending clear is checked against each event's timestamp before that
    /// event is handled, so the timer and the queue keep their real order.
    /// Returns the number of events handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;

        while let Some(event) = self.next_event() {
            self.fire_due_clear(event.at);
            self.handle_focus(&event);
            handled += 1;
        }

        let now = self.clock.now();
        self.fire_due_clear(now);
        handled
    }

    /// Deadline of the armed clear, for hosts that want to wake up and pump.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.state.pending_clear
    }

    /// Apply one focus event.
    pub fn handle_focus(&mut self, event: &FocusEvent) -> EventOutcome {
        // An unreadable source leaves no trace.
        let Some(role) = event.role else {
            tracing::debug!("dropping focus event");
            return EventOutcome::Dropped;
        };

        self.state.ready = true;

        if let Some(entry) = self.first_match(&event.names) {
            tracing::trace!(entry, ?role, "focus inside excluded context");
            self.set_excluded(true, ChangeCause::Focus);
            return EventOutcome::Excluded;
        }

        if role.is_top_level_content() && self.state.excluded {
            let deadline = event.at + self.timings.clear_delay();
            return if self.state.arm_clear(deadline) {
                tracing::trace!(?role, "clear armed");
                EventOutcome::ClearArmed
            } else {
                EventOutcome::ClearPending
            };
        }

        EventOutcome::Unchanged
    }

    /// Tear down tracking and reset to the initial state.
    ///
    /// Safe to call repeatedly and before any activation.
    pub fn shutdown(&mut self) {
        let subscription = self.subscription.take();
        if let Some(sub) = &subscription {
            self.bus.deregister(sub.id);
        }

        if self.state.excluded {
            publish(
                self.events.as_ref(),
                event_names::EXCLUSION_CHANGED,
                &ExclusionChangedEvent::now(false, ChangeCause::Shutdown),
            );
        }
        self.state = ContextState::default();
        self.phase = Phase::Inactive;

        if subscription.is_some() {
            tracing::info!("focus tracking stopped");
            publish(
                self.events.as_ref(),
                event_names::ENGINE_STOPPED,
                &EngineLifecycleEvent::now(false),
            );
        }
    }

    fn ensure_active(&mut self) -> Result<()> {
        if !self.bus.is_enabled() {
            tracing::debug!("enabling accessibility service");
            self.bus.set_enabled(true)?;
        }

        if self.phase == Phase::Active {
            return Ok(());
        }

        self.phase = Phase::Activating;
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = FocusSink::new(tx, self.timings.ancestor_depth);
        let id = match self.bus.register(sink) {
            Ok(id) => id,
            Err(e) => {
                self.phase = Phase::Inactive;
                return Err(e);
            }
        };
        self.subscription = Some(Subscription { id, rx });

        self.seed();

        self.phase = Phase::Active;
        tracing::info!(
            ancestor_depth = self.timings.ancestor_depth,
            clear_delay_ms = self.timings.clear_delay_ms,
            "focus tracking active"
        );
        publish(
            self.events.as_ref(),
            event_names::ENGINE_ACTIVATED,
            &EngineLifecycleEvent::now(true),
        );
        Ok(())
    }

    /// Look at whatever already has focus. Can only set the flag.
    fn seed(&mut self) {
        let root = match self.bus.root() {
            Ok(Some(root)) => root,
            Ok(None) => return,
            Err(e) => {
                tracing::debug!(error = %e, "seed scan skipped");
                return;
            }
        };

        let Some(focused) = deepest_focused(&root, self.timings.seed_depth) else {
            return;
        };
        let names = ancestor_names(focused.as_ref(), self.timings.ancestor_depth);

        if self.first_match(&names).is_some() {
            tracing::debug!("seed scan found focus inside excluded context");
            self.set_excluded(true, ChangeCause::Seed);
        }
    }

    fn next_event(&mut self) -> Option<FocusEvent> {
        self.subscription.as_mut()?.rx.try_recv().ok()
    }

    fn fire_due_clear(&mut self, at: Instant) {
        if self.state.take_due_clear(at) {
            self.set_excluded(false, ChangeCause::Cleared);
        }
    }

    fn first_match<'a>(&'a self, names: &[String]) -> Option<&'a str> {
        names
            .iter()
            .find_map(|name| self.state.cached_list.iter().find(|e| name.contains(e)))
    }

    /// Setting the flag always cancels a pending clear.
    fn set_excluded(&mut self, excluded: bool, cause: ChangeCause) {
        if excluded {
            self.state.pending_clear = None;
        }
        if self.state.excluded == excluded {
            return;
        }

        self.state.excluded = excluded;
        tracing::debug!(excluded, ?cause, "exclusion flag changed");
        publish(
            self.events.as_ref(),
            event_names::EXCLUSION_CHANGED,
            &ExclusionChangedEvent::now(excluded, cause),
        );
    }
}

impl Drop for ContextMachine {
    fn drop(&mut self) {
        if let Some(sub) = self.subscription.take() {
            self.bus.deregister(sub.id);
        }
    }
}
