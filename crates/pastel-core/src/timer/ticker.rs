//! Periodic tick source for a running [`super::SessionTimer`].
//!
//! Ticks are sent over a channel to the single loop that owns the app state,
//! so a tick never overlaps another mutation. Each run of the ticker carries
//! a generation number; after `stop()` the generation moves on and any tick
//! still sitting in the channel is rejected by [`Ticker::accepts`].

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

const ONE_SECOND: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    generation: u64,
}

#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(ONE_SECOND)
    }
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            generation: 0,
            task: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }

    /// Spawn the tick task on the current tokio runtime. Returns `false`
    /// without spawning anything when a task is already active.
    pub fn start(&mut self, tx: UnboundedSender<Tick>) -> bool {
        if self.task.is_some() {
            return false;
        }
        self.generation += 1;
        let tick = Tick {
            generation: self.generation,
        };
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            // First tick lands one full period after start.
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(tick).is_err() {
                    break;
                }
            }
        }));
        tracing::debug!(generation = self.generation, "ticker started");
        true
    }

    /// Abort the tick task. Ticks already queued become stale.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            self.generation += 1;
            tracing::debug!(generation = self.generation, "ticker stopped");
        }
    }

    /// Whether a received tick belongs to the live run.
    pub fn accepts(&self, tick: &Tick) -> bool {
        self.task.is_some() && tick.generation == self.generation
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
