//! One-second tick source for card timers.
//!
//! The ticker is the sole time-keeping primitive: while armed it yields one
//! tick per wall-clock second and advances an accumulated counter; while
//! disarmed it holds the last value. Disarming drops the underlying interval,
//! so no pending tick can fire afterwards, and re-arming resumes counting
//! from the frozen value rather than zero.

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Arm/disarm tick source with an accumulated seconds counter
#[derive(Debug)]
pub struct Ticker {
    accumulated: u64,
    interval: Option<Interval>,
}

impl Ticker {
    /// Create a disarmed ticker starting from `accumulated` seconds
    pub fn new(accumulated: u64) -> Self {
        Self {
            accumulated,
            interval: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Accumulated seconds, live while armed, frozen while disarmed
    pub fn elapsed(&self) -> u64 {
        self.accumulated
    }

    /// Arm the ticker, resuming from `accumulated`. The first tick fires one
    /// full period after arming. Arming an armed ticker does not reset the
    /// period or the counter.
    pub fn arm(&mut self, accumulated: u64) {
        if self.interval.is_some() {
            return;
        }
        self.accumulated = accumulated;
        let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    /// Disarm and return the frozen accumulated value. Any pending tick is
    /// discarded with the interval.
    pub fn disarm(&mut self) -> u64 {
        self.interval = None;
        self.accumulated
    }

    /// Wait for the next tick and return the new accumulated value.
    ///
    /// Pends forever while disarmed, so it can sit in a `select!` arm
    /// alongside input handling.
    pub async fn tick(&mut self) -> u64 {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
                self.accumulated += 1;
                self.accumulated
            }
            None => std::future::pending().await,
        }
    }
}
