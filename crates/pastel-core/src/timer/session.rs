//! Two-phase focus/break countdown.
//!
//! The session timer owns no clock. The caller delivers one `tick()` per
//! elapsed second while the timer runs (see [`super::Ticker`]).
//!
//! ## State Transitions
//!
//! ```text
//! Focus(idle) -start-> Focus(running) -0s-> Break(idle) -start-> Break(running) -0s-> Focus(idle)
//!                ^-pause-/                        ^-pause-/
//! ```
//!
//! Reaching zero always stops the timer; the next phase waits for `start()`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Focus => "Focus",
            Phase::Break => "Break",
        }
    }
}

/// Phase lengths in whole minutes, each at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durations {
    focus_minutes: u32,
    break_minutes: u32,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            break_minutes: 5,
        }
    }
}

impl Durations {
    /// Build from raw input, clamping anything below one minute up to one.
    pub fn clamped(focus_minutes: i64, break_minutes: i64) -> Self {
        Self {
            focus_minutes: clamp_minutes(focus_minutes),
            break_minutes: clamp_minutes(break_minutes),
        }
    }

    pub fn focus_minutes(&self) -> u32 {
        self.focus_minutes
    }

    pub fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    pub fn secs(&self, phase: Phase) -> u64 {
        let minutes = match phase {
            Phase::Focus => self.focus_minutes,
            Phase::Break => self.break_minutes,
        };
        u64::from(minutes) * 60
    }
}

fn clamp_minutes(raw: i64) -> u32 {
    raw.clamp(1, i64::from(u32::MAX)) as u32
}

/// The in-flight part of the timer, persisted so a later process can pick up
/// where the last one left off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub remaining_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionTimer {
    durations: Durations,
    phase: Phase,
    remaining_secs: u64,
    running: bool,
    sessions_completed: u64,
}

impl SessionTimer {
    /// Idle at the start of a focus phase.
    pub fn new(durations: Durations, sessions_completed: u64) -> Self {
        Self {
            durations,
            phase: Phase::Focus,
            remaining_secs: durations.secs(Phase::Focus),
            running: false,
            sessions_completed,
        }
    }

    /// Resume from a snapshot. Always idle; a remaining time that no longer
    /// fits the configured phase length is cut back to it.
    pub fn restore(durations: Durations, sessions_completed: u64, snapshot: TimerSnapshot) -> Self {
        let full = durations.secs(snapshot.phase);
        let remaining_secs = if snapshot.remaining_secs == 0 || snapshot.remaining_secs > full {
            full
        } else {
            snapshot.remaining_secs
        };
        Self {
            durations,
            phase: snapshot.phase,
            remaining_secs,
            running: false,
            sessions_completed,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn sessions_completed(&self) -> u64 {
        self.sessions_completed
    }

    pub fn durations(&self) -> Durations {
        self.durations
    }

    pub fn phase_secs(&self) -> u64 {
        self.durations.secs(self.phase)
    }

    /// 0.0 .. 100.0 through the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.phase_secs();
        if total == 0 {
            return 0.0;
        }
        total.saturating_sub(self.remaining_secs) as f64 / total as f64 * 100.0
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format_clock(self.remaining_secs)
    }

    pub fn runtime(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
        }
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            total_secs: self.phase_secs(),
            running: self.running,
            progress_pct: self.progress(),
            sessions_completed: self.sessions_completed,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        tracing::debug!(phase = ?self.phase, remaining = self.remaining_secs, "timer started");
        Some(Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        // Durations may have shrunk mid-run; idle time never exceeds the phase.
        self.remaining_secs = self.remaining_secs.min(self.phase_secs());
        tracing::debug!(phase = ?self.phase, remaining = self.remaining_secs, "timer paused");
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Start when idle, pause when running.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// One elapsed second. Returns `Some(Event::PhaseCompleted)` at a phase
    /// boundary. Ignored while idle.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }

        let finished = self.phase;
        self.phase = match finished {
            Phase::Focus => {
                self.sessions_completed += 1;
                Phase::Break
            }
            Phase::Break => Phase::Focus,
        };
        self.remaining_secs = self.phase_secs();
        self.running = false;
        tracing::info!(
            finished = ?finished,
            sessions = self.sessions_completed,
            "phase completed"
        );
        Some(Event::PhaseCompleted {
            phase: finished,
            next_phase: self.phase,
            sessions_completed: self.sessions_completed,
            at: Utc::now(),
        })
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.phase = Phase::Focus;
        self.remaining_secs = self.durations.secs(Phase::Focus);
        self.running = false;
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Replace phase lengths. Values below one minute become one. An idle
    /// timer jumps to the new length of its current phase; a running one
    /// keeps counting down until the next boundary or reset.
    pub fn set_durations(&mut self, focus_minutes: i64, break_minutes: i64) -> Option<Event> {
        self.durations = Durations::clamped(focus_minutes, break_minutes);
        if !self.running {
            self.remaining_secs = self.phase_secs();
        }
        Some(Event::DurationsChanged {
            focus_minutes: self.durations.focus_minutes,
            break_minutes: self.durations.break_minutes,
            at: Utc::now(),
        })
    }
}

/// `MM:SS`, with minutes growing past two digits when needed.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
