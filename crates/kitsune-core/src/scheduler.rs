//! Cycle scheduler: periodic callbacks driven by logical ticks.
//!
//! The scheduler owns a list of [`ScheduledEvent`]s, each with a callback
//! and an interval in cycles. Every [`CycleScheduler::tick`]:
//!
//! 1. increments the cycle counter;
//! 2. drops events that are no longer running;
//! 3. for each remaining event, in registration order, increments its
//!    elapsed counter and, once `elapsed >= required`, invokes the callback.
//!
//! A callback that returns `Ok` has its elapsed counter reset to zero. A
//! callback that returns `Err` is logged and marked not-running; it is never
//! invoked again and is removed at the start of the next tick.
//!
//! Callbacks receive only the caller-supplied context, never the scheduler
//! itself, so they cannot register or remove events mid-pass.

use core::fmt;

use kitsune_types::ScheduledEventId;
use tracing::{debug, warn};

/// Boxed periodic callback over a context `C`.
pub type Callback<C, E> = Box<dyn FnMut(&mut C) -> Result<(), E> + Send>;

// ---------------------------------------------------------------------------
// ScheduledEvent
// ---------------------------------------------------------------------------

/// One registered periodic callback.
pub struct ScheduledEvent<C, E> {
    id: ScheduledEventId,
    owner: String,
    callback: Callback<C, E>,
    required_cycles: u64,
    elapsed_cycles: u64,
    running: bool,
}

impl<C, E> ScheduledEvent<C, E> {
    /// Handle returned at registration.
    pub const fn id(&self) -> ScheduledEventId {
        self.id
    }

    /// Name of the component that registered the event.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Interval in cycles.
    pub const fn required_cycles(&self) -> u64 {
        self.required_cycles
    }

    /// Cycles since the last invocation.
    pub const fn elapsed_cycles(&self) -> u64 {
        self.elapsed_cycles
    }

    /// Whether the event will still be invoked.
    pub const fn is_running(&self) -> bool {
        self.running
    }
}

impl<C, E> fmt::Debug for ScheduledEvent<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledEvent")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("required_cycles", &self.required_cycles)
            .field("elapsed_cycles", &self.elapsed_cycles)
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// TickReport
// ---------------------------------------------------------------------------

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Cycle counter after the tick.
    pub cycle: u64,
    /// Events removed at the start of the tick.
    pub removed: Vec<ScheduledEventId>,
    /// Events whose callback succeeded.
    pub fired: Vec<ScheduledEventId>,
    /// Events whose callback failed and were disabled.
    pub failed: Vec<ScheduledEventId>,
}

// ---------------------------------------------------------------------------
// CycleScheduler
// ---------------------------------------------------------------------------

/// Single-threaded periodic scheduler over a context `C`.
pub struct CycleScheduler<C, E> {
    events: Vec<ScheduledEvent<C, E>>,
    cycle: u64,
}

impl<C, E: fmt::Display> CycleScheduler<C, E> {
    /// An empty scheduler at cycle 0.
    pub const fn new() -> Self {
        Self {
            events: Vec::new(),
            cycle: 0,
        }
    }

    /// Register `callback` to run every `required_cycles` ticks.
    ///
    /// An interval of 0 behaves like 1, since elapsed is incremented before
    /// the comparison.
    pub fn add_event<F>(
        &mut self,
        owner: impl Into<String>,
        required_cycles: u64,
        callback: F,
    ) -> ScheduledEventId
    where
        F: FnMut(&mut C) -> Result<(), E> + Send + 'static,
    {
        let id = ScheduledEventId::new();
        let owner = owner.into();
        debug!(event_id = %id, owner = %owner, required_cycles, "scheduled event registered");
        self.events.push(ScheduledEvent {
            id,
            owner,
            callback: Box::new(callback),
            required_cycles,
            elapsed_cycles: 0,
            running: true,
        });
        id
    }

    /// Mark an event not-running. It is removed on the next tick.
    ///
    /// Returns `false` if no event has this id.
    pub fn stop(&mut self, id: ScheduledEventId) -> bool {
        let Some(event) = self.events.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        event.running = false;
        true
    }

    /// Advance one cycle, invoking due callbacks with `ctx`.
    pub fn tick(&mut self, ctx: &mut C) -> TickReport {
        self.cycle = self.cycle.saturating_add(1);
        let mut report = TickReport {
            cycle: self.cycle,
            ..TickReport::default()
        };

        self.events.retain(|e| {
            if !e.running {
                debug!(event_id = %e.id, owner = %e.owner, "removing stopped event");
                report.removed.push(e.id);
            }
            e.running
        });

        for event in &mut self.events {
            event.elapsed_cycles = event.elapsed_cycles.saturating_add(1);
            if event.elapsed_cycles < event.required_cycles {
                continue;
            }
            match (event.callback)(ctx) {
                Ok(()) => {
                    event.elapsed_cycles = 0;
                    report.fired.push(event.id);
                }
                Err(e) => {
                    warn!(
                        event_id = %event.id,
                        owner = %event.owner,
                        cycle = self.cycle,
                        error = %e,
                        "scheduled event failed, disabling"
                    );
                    event.running = false;
                    report.failed.push(event.id);
                }
            }
        }
        report
    }

    /// Cycle counter.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Look up a registered event.
    pub fn event(&self, id: ScheduledEventId) -> Option<&ScheduledEvent<C, E>> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Registered events in registration order.
    pub fn events(&self) -> impl Iterator<Item = &ScheduledEvent<C, E>> {
        self.events.iter()
    }

    /// Number of registered events, running or not.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are registered.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<C, E: fmt::Display> Default for CycleScheduler<C, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, E> fmt::Debug for CycleScheduler<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CycleScheduler")
            .field("cycle", &self.cycle)
            .field("events", &self.events)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
