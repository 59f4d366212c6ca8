use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Outcome of asking the gate for a new cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Cycle may start; the gate is now in flight
    Accepted,
    /// A cycle is running; the trigger is dropped, not queued
    InFlight,
    /// Within the quiet period of the last accepted trigger
    TooSoon,
}

/// Mutable debounce state. Only touched under the gate's lock.
#[derive(Debug, Default)]
struct DebounceWindow {
    last_trigger: Option<Instant>,
    build_in_flight: bool,
}

/// Throttle and single-flight guard for build cycles.
///
/// The quiet period is measured from the last *accepted* trigger, so a steady
/// stream of edits yields one cycle per window instead of postponing forever.
/// The in-flight check and the timestamp update happen under one lock.
#[derive(Debug)]
pub struct TriggerGate {
    window: Mutex<DebounceWindow>,
    quiet_period: Duration,
}

impl TriggerGate {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            window: Mutex::new(DebounceWindow::default()),
            quiet_period,
        }
    }

    pub fn try_acquire(&self, now: Instant) -> GateDecision {
        let mut window = self.window.lock();

        if window.build_in_flight {
            return GateDecision::InFlight;
        }
        if let Some(last) = window.last_trigger
            && now.saturating_duration_since(last) < self.quiet_period
        {
            return GateDecision::TooSoon;
        }

        window.last_trigger = Some(now);
        window.build_in_flight = true;
        GateDecision::Accepted
    }

    /// Claim the gate for the startup cycle, ignoring the quiet period.
    ///
    /// Returns `false` if a cycle is already in flight.
    pub fn force_acquire(&self, now: Instant) -> bool {
        let mut window = self.window.lock();
        if window.build_in_flight {
            return false;
        }
        window.last_trigger = Some(now);
        window.build_in_flight = true;
        true
    }

    /// Mark the running cycle as finished (or never started).
    pub fn release(&self) {
        self.window.lock().build_in_flight = false;
    }

    #[cfg(test)]
    pub fn is_in_flight(&self) -> bool {
        self.window.lock().build_in_flight
    }
}
