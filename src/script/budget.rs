//! Per-execution limits: command count and wall-clock deadline.

use std::time::{Duration, Instant};

use crate::result::ScriptError;

/// Tracks how much of its budget an execution has used.
#[derive(Debug, Clone)]
pub struct Budget {
    command_count: u32,
    command_limit: u32,
    started: Instant,
    timeout: Option<Duration>,
}

impl Budget {
    /// Start a budget now. A `command_limit` of 0 disables the count check.
    pub fn new(command_limit: u32, timeout: Option<Duration>) -> Self {
        Self {
            command_count: 0,
            command_limit,
            started: Instant::now(),
            timeout,
        }
    }

    /// Count one command-like action.
    ///
    /// Fails once the count goes past a positive limit; the action that
    /// tripped the limit must not run.
    pub fn charge_command(&mut self) -> Result<(), ScriptError> {
        self.command_count = self.command_count.saturating_add(1);
        if self.command_limit > 0 && self.command_count > self.command_limit {
            return Err(ScriptError::BudgetExceeded {
                limit: self.command_limit,
            });
        }
        Ok(())
    }

    /// Fail if the deadline has passed.
    pub fn check_deadline(&self) -> Result<(), ScriptError> {
        if self.is_timed_out() {
            let limit_ms = self
                .timeout
                .map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX))
                .unwrap_or_default();
            return Err(ScriptError::Timeout { limit_ms });
        }
        Ok(())
    }

    /// Whether more time than allowed has elapsed.
    pub fn is_timed_out(&self) -> bool {
        match self.timeout {
            Some(timeout) => self.started.elapsed() > timeout,
            None => false,
        }
    }

    /// Restart the deadline clock from now.
    pub fn reset_clock(&mut self) {
        self.started = Instant::now();
    }

    /// Commands charged so far.
    pub fn command_count(&self) -> u32 {
        self.command_count
    }

    /// Configured command ceiling (0 = unlimited).
    pub fn command_limit(&self) -> u32 {
        self.command_limit
    }

    /// Time since the budget started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
