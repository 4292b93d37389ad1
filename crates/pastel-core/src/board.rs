//! Day planner: date → time slot → task.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// First and last hour shown on the day grid.
const FIRST_SLOT_HOUR: u32 = 6;
const LAST_SLOT_HOUR: u32 = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    pub notes: String,
    pub completed: bool,
}

impl Task {
    pub fn new(title: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            notes: notes.into(),
            completed: false,
        }
    }

    /// A task with neither title nor notes is the same as no task.
    pub fn is_blank(&self) -> bool {
        self.title.is_empty() && self.notes.is_empty()
    }
}

/// Hourly slots from 06:00 to 20:00.
pub fn hourly_slots() -> Vec<String> {
    (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR)
        .map(|hour| format!("{hour:02}:00"))
        .collect()
}

/// Check a slot label is `HH:MM` on a 24-hour clock.
pub fn parse_slot(raw: &str) -> Result<String, ValidationError> {
    let invalid = || ValidationError::InvalidValue {
        field: "time".into(),
        message: format!("expected HH:MM, got '{raw}'"),
    };
    let (h, m) = raw.trim().split_once(':').ok_or_else(invalid)?;
    if h.len() != 2 || m.len() != 2 {
        return Err(invalid());
    }
    let hour: u32 = h.parse().map_err(|_| invalid())?;
    let minute: u32 = m.parse().map_err(|_| invalid())?;
    if hour > 23 || minute > 59 {
        return Err(invalid());
    }
    Ok(format!("{hour:02}:{minute:02}"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskBoard {
    days: BTreeMap<NaiveDate, BTreeMap<String, Task>>,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sample day shown on first launch.
    pub fn seeded(today: NaiveDate) -> Self {
        let mut board = Self::new();
        board.upsert(today, "09:00", Task::new("Team Standup", "Daily sync meeting"));
        board.upsert(
            today,
            "14:00",
            Task {
                title: "Focus Work".into(),
                notes: "Work on feature X".into(),
                completed: true,
            },
        );
        board
    }

    pub fn tasks_on(&self, date: NaiveDate) -> Option<&BTreeMap<String, Task>> {
        self.days.get(&date)
    }

    pub fn get(&self, date: NaiveDate, time: &str) -> Option<&Task> {
        self.days.get(&date)?.get(time)
    }

    /// `(completed, total)` for one day.
    pub fn day_progress(&self, date: NaiveDate) -> (usize, usize) {
        self.days
            .get(&date)
            .map(|slots| {
                let done = slots.values().filter(|t| t.completed).count();
                (done, slots.len())
            })
            .unwrap_or((0, 0))
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Put `task` in the slot. A blank task clears the slot, and a day left
    /// with no slots is dropped.
    pub fn upsert(&mut self, date: NaiveDate, time: &str, task: Task) {
        if task.is_blank() {
            self.delete(date, time);
            return;
        }
        self.days
            .entry(date)
            .or_default()
            .insert(time.to_string(), task);
    }

    /// Flip completion. Returns the new state, or `None` when the slot is
    /// empty.
    pub fn toggle(&mut self, date: NaiveDate, time: &str) -> Option<bool> {
        let task = self.days.get_mut(&date)?.get_mut(time)?;
        task.completed = !task.completed;
        Some(task.completed)
    }

    pub fn delete(&mut self, date: NaiveDate, time: &str) -> Option<Task> {
        let slots = self.days.get_mut(&date)?;
        let removed = slots.remove(time);
        if slots.is_empty() {
            self.days.remove(&date);
        }
        removed
    }
}
