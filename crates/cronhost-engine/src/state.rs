//! Scheduler lifecycle state.

/// Lifecycle state of a [`LocalScheduler`](crate::LocalScheduler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SchedulerState {
    /// Created, accepting jobs, not firing yet.
    Created = 0,
    /// Firing triggers.
    Running = 1,
    /// Draining in-flight executions.
    ShuttingDown = 2,
    /// Stopped for good.
    Stopped = 3,
}

impl From<u8> for SchedulerState {
    fn from(v: u8) -> Self {
        match v {
            1 => SchedulerState::Running,
            2 => SchedulerState::ShuttingDown,
            3 => SchedulerState::Stopped,
            _ => SchedulerState::Created,
        }
    }
}

impl SchedulerState {
    pub fn is_shutdown(self) -> bool {
        matches!(self, SchedulerState::ShuttingDown | SchedulerState::Stopped)
    }
}
