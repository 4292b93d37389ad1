//! Storage keys, one JSON document each.

pub const POMODORO_SESSIONS: &str = "pastel-pomodoro-sessions";
pub const POMODORO_GOAL: &str = "pastel-pomodoro-goal";
pub const FOCUS_DURATION: &str = "pastel-focus-duration";
pub const BREAK_DURATION: &str = "pastel-break-duration";
pub const TIMER_STATE: &str = "pastel-timer-state";
pub const TASKS: &str = "pastel-tasks";
pub const TRANSACTIONS: &str = "pastel-transactions";
pub const MONTHLY_BUDGET: &str = "pastel-monthly-budget";
pub const NOTES: &str = "pastel-notes";
