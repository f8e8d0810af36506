//! Frame scheduling of layout passes.
//!
//! Invalidations do not lay out immediately: they mark one pass as pending,
//! and the host runs it on its next frame through
//! [`LayoutEngine::tick`](crate::LayoutEngine::tick). Any number of
//! invalidations between two frames coalesce into a single pass.

use strum_macros::{AsRefStr, Display};

/// Lifecycle of the pending pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum SchedulerState {
    /// Nothing to do.
    #[default]
    Idle,
    /// One pass is pending for the next frame.
    Scheduled,
    /// A pass is running.
    Computing,
}

/// Explicit idle / scheduled / computing state machine.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    state: SchedulerState,
    /// A schedule request that arrived while computing.
    rescheduled: bool,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> SchedulerState {
        self.state
    }

    /// Request a pass on the next frame. Idempotent.
    pub fn schedule(&mut self) {
        match self.state {
            SchedulerState::Idle => self.state = SchedulerState::Scheduled,
            SchedulerState::Scheduled => {}
            SchedulerState::Computing => self.rescheduled = true,
        }
    }

    /// Drop a pending pass. A running pass is not affected.
    pub fn cancel(&mut self) {
        if self.state == SchedulerState::Scheduled {
            self.state = SchedulerState::Idle;
        }
        self.rescheduled = false;
    }

    /// Whether a pass is pending.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.state == SchedulerState::Scheduled
    }

    /// Enter `Computing`. Returns `false` (and changes nothing) if a pass is
    /// already running.
    pub fn begin(&mut self) -> bool {
        if self.state == SchedulerState::Computing {
            return false;
        }
        self.state = SchedulerState::Computing;
        self.rescheduled = false;
        true
    }

    /// Leave `Computing`; a request that arrived meanwhile stays pending.
    pub fn finish(&mut self) {
        if self.state == SchedulerState::Computing {
            self.state = if self.rescheduled {
                SchedulerState::Scheduled
            } else {
                SchedulerState::Idle
            };
        }
        self.rescheduled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_is_idempotent() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule();
        scheduler.schedule();
        assert_eq!(scheduler.state(), SchedulerState::Scheduled);
        scheduler.cancel();
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn test_begin_refuses_reentry() {
        let mut scheduler = Scheduler::new();
        assert!(scheduler.begin());
        assert!(!scheduler.begin());
        scheduler.finish();
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn test_schedule_during_pass_survives_finish() {
        let mut scheduler = Scheduler::new();
        assert!(scheduler.begin());
        scheduler.schedule();
        scheduler.finish();
        assert!(scheduler.is_scheduled());
    }
}
