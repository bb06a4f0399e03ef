//! Exercise countdown, driven by cooperative ticks from the front-end loop.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    Idle,
    Running,
    Finished,
}

/// A countdown that only advances when [`tick`](Countdown::tick) is called.
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    total: Duration,
    elapsed: Duration,
    state: TimerState,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) a countdown of `minutes`.
    pub fn start(&mut self, minutes: u32) {
        self.total = Duration::from_secs(u64::from(minutes) * 60);
        self.elapsed = Duration::ZERO;
        self.state = if self.total.is_zero() {
            TimerState::Finished
        } else {
            TimerState::Running
        };
    }

    /// Advance by `dt`. Returns `true` on the tick that finishes the countdown.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.elapsed = (self.elapsed + dt).min(self.total);
        if self.elapsed >= self.total {
            self.state = TimerState::Finished;
            return true;
        }
        false
    }

    /// Cancel the countdown. Stopping an idle timer does nothing.
    /// Returns whether a countdown was actually running.
    pub fn stop(&mut self) -> bool {
        let was_running = self.state == TimerState::Running;
        *self = Self::default();
        was_running
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn remaining(&self) -> Duration {
        self.total.saturating_sub(self.elapsed)
    }

    /// Fraction elapsed, from 0.0 to 1.0.
    pub fn progress(&self) -> f64 {
        match self.state {
            TimerState::Idle => 0.0,
            TimerState::Finished => 1.0,
            TimerState::Running => self.elapsed.as_secs_f64() / self.total.as_secs_f64(),
        }
    }

    /// Status line for display.
    pub fn label(&self) -> String {
        match self.state {
            TimerState::Idle => "Timer: off".to_string(),
            TimerState::Finished => "Time's up".to_string(),
            TimerState::Running => {
                let secs = self.remaining().as_secs();
                format!("{:02}:{:02} left", secs / 60, secs % 60)
            }
        }
    }
}
