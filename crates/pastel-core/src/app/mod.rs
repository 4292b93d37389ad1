//! Application state.
//!
//! [`AppState`] owns every tracker together with the store and the
//! notification surface. Its methods are the only write path: each one
//! mutates memory first, then persists the touched keys and forwards any
//! user-facing message to the notifier.

mod countdown;

pub use countdown::{run_countdown, CountdownOutcome};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::board::{Task, TaskBoard};
use crate::error::Result;
use crate::events::Event;
use crate::ledger::{format_amount, BudgetAlert, Ledger, Transaction};
use crate::notes::{Note, NoteDraft, NotesCollection};
use crate::notify::{Notification, Notifier, Severity};
use crate::storage::{keys, Config, PersistentStore};
use crate::timer::{Durations, SessionTimer, TimerSnapshot};

#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct BudgetDoc(#[serde(with = "rust_decimal::serde::float")] Decimal);

/// Today at a glance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub sessions_completed: u64,
    pub pomodoro_goal: u32,
    pub tasks_completed: usize,
    pub tasks_total: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub expenses_today: Decimal,
}

pub struct AppState {
    store: PersistentStore,
    notifier: Box<dyn Notifier>,
    currency_symbol: String,
    ledger: Ledger,
    timer: SessionTimer,
    pomodoro_goal: u32,
    board: TaskBoard,
    notes: NotesCollection,
}

impl AppState {
    /// Hydrate every tracker from the store, falling back to the configured
    /// defaults (and sample data, if enabled) for keys that hold nothing.
    pub fn load(
        store: PersistentStore,
        notifier: Box<dyn Notifier>,
        config: &Config,
        today: NaiveDate,
    ) -> Self {
        let defaults = &config.defaults;
        let seed = config.display.seed_examples;

        let focus: i64 = store
            .load(keys::FOCUS_DURATION)
            .unwrap_or_else(|| i64::from(defaults.focus_minutes));
        let brk: i64 = store
            .load(keys::BREAK_DURATION)
            .unwrap_or_else(|| i64::from(defaults.break_minutes));
        let durations = Durations::clamped(focus, brk);
        let sessions: u64 = store.load(keys::POMODORO_SESSIONS).unwrap_or(0);
        let timer = match store.load::<TimerSnapshot>(keys::TIMER_STATE) {
            Some(snapshot) => SessionTimer::restore(durations, sessions, snapshot),
            None => SessionTimer::new(durations, sessions),
        };

        let pomodoro_goal = store
            .load::<u32>(keys::POMODORO_GOAL)
            .unwrap_or(defaults.pomodoro_goal)
            .max(1);

        let budget = store
            .load::<BudgetDoc>(keys::MONTHLY_BUDGET)
            .map(|b| b.0)
            .unwrap_or(defaults.monthly_budget);
        let transactions: Vec<Transaction> = store.load(keys::TRANSACTIONS).unwrap_or_default();
        let ledger = Ledger::from_parts(transactions, budget);

        let board = store
            .load(keys::TASKS)
            .unwrap_or_else(|| if seed { TaskBoard::seeded(today) } else { TaskBoard::new() });
        let notes = store
            .load(keys::NOTES)
            .unwrap_or_else(|| if seed { NotesCollection::seeded() } else { NotesCollection::default() });

        tracing::debug!(
            transactions = ledger.len(),
            notes = notes.len(),
            sessions,
            "application state loaded"
        );

        Self {
            store,
            notifier,
            currency_symbol: config.display.currency_symbol.clone(),
            ledger,
            timer,
            pomodoro_goal,
            board,
            notes,
        }
    }

    /// Read `config.toml` and open the on-disk store in the data directory.
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be read or the database
    /// cannot be opened.
    pub fn open(notifier: Box<dyn Notifier>, today: NaiveDate) -> Result<Self> {
        let config = Config::load()?;
        let store = PersistentStore::open_default()?;
        Ok(Self::load(store, notifier, &config, today))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn pomodoro_goal(&self) -> u32 {
        self.pomodoro_goal
    }

    pub fn board(&self) -> &TaskBoard {
        &self.board
    }

    pub fn notes(&self) -> &NotesCollection {
        &self.notes
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    pub fn overview<Tz: TimeZone>(&self, today: NaiveDate, tz: &Tz) -> Overview {
        let (tasks_completed, tasks_total) = self.board.day_progress(today);
        Overview {
            sessions_completed: self.timer.sessions_completed(),
            pomodoro_goal: self.pomodoro_goal,
            tasks_completed,
            tasks_total,
            expenses_today: self.ledger.expenses_on(today, tz),
        }
    }

    /// Block until queued writes are on disk.
    pub fn flush(&self) {
        self.store.flush();
    }

    // ── Ledger ───────────────────────────────────────────────────────

    /// Insert a validated transaction. Emits the budget alert (if any)
    /// followed by a confirmation.
    pub fn add_transaction(&mut self, tx: Transaction) -> Option<BudgetAlert> {
        let confirmation = Notification::new(
            format!("{} Added", tx.kind.label()),
            format!("{}: {}", tx.item, format_amount(&self.currency_symbol, tx.amount)),
            Severity::Info,
        );
        let alert = self.ledger.add_transaction(tx);
        self.store.save(keys::TRANSACTIONS, self.ledger.transactions());

        if let Some(alert) = &alert {
            self.notifier.notify(alert.notification());
        }
        self.notifier.notify(confirmation);
        alert
    }

    pub fn set_budget(&mut self, budget: Decimal) {
        self.ledger.set_budget(budget);
        self.store
            .save(keys::MONTHLY_BUDGET, &BudgetDoc(self.ledger.budget()));
    }

    /// Id for a transaction created at `now`.
    pub fn next_transaction_id(&self, now: DateTime<Utc>) -> i64 {
        self.ledger.next_id(now.timestamp_millis())
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub fn timer_start(&mut self) -> Option<Event> {
        self.timer.start()
    }

    pub fn timer_pause(&mut self) -> Option<Event> {
        let event = self.timer.pause();
        if event.is_some() {
            self.save_timer_state();
        }
        event
    }

    pub fn timer_toggle(&mut self) -> Option<Event> {
        if self.timer.is_running() {
            self.timer_pause()
        } else {
            self.timer_start()
        }
    }

    pub fn timer_tick(&mut self) -> Option<Event> {
        let event = self.timer.tick();
        if let Some(Event::PhaseCompleted { phase, next_phase, .. }) = &event {
            self.store
                .save(keys::POMODORO_SESSIONS, &self.timer.sessions_completed());
            self.save_timer_state();
            self.notifier.notify(Notification::new(
                format!("{} complete", phase.label()),
                format!("Start your {} when ready.", next_phase.label().to_lowercase()),
                Severity::Info,
            ));
        }
        event
    }

    pub fn timer_reset(&mut self) -> Option<Event> {
        let event = self.timer.reset();
        self.save_timer_state();
        event
    }

    pub fn set_durations(&mut self, focus_minutes: i64, break_minutes: i64) -> Option<Event> {
        let event = self.timer.set_durations(focus_minutes, break_minutes);
        let durations = self.timer.durations();
        self.store
            .save(keys::FOCUS_DURATION, &durations.focus_minutes());
        self.store
            .save(keys::BREAK_DURATION, &durations.break_minutes());
        if !self.timer.is_running() {
            self.save_timer_state();
        }
        event
    }

    /// Daily pomodoro target, at least one.
    pub fn set_goal(&mut self, goal: i64) {
        self.pomodoro_goal = goal.clamp(1, i64::from(u32::MAX)) as u32;
        self.store.save(keys::POMODORO_GOAL, &self.pomodoro_goal);
    }

    fn save_timer_state(&self) {
        self.store.save(keys::TIMER_STATE, &self.timer.runtime());
    }

    // ── Task board ───────────────────────────────────────────────────

    pub fn upsert_task(&mut self, date: NaiveDate, time: &str, task: Task) {
        self.board.upsert(date, time, task);
        self.store.save(keys::TASKS, &self.board);
    }

    pub fn toggle_task(&mut self, date: NaiveDate, time: &str) -> Option<bool> {
        let done = self.board.toggle(date, time)?;
        self.store.save(keys::TASKS, &self.board);
        Some(done)
    }

    pub fn delete_task(&mut self, date: NaiveDate, time: &str) -> Option<Task> {
        let removed = self.board.delete(date, time)?;
        self.store.save(keys::TASKS, &self.board);
        Some(removed)
    }

    // ── Notes ────────────────────────────────────────────────────────

    pub fn add_note(&mut self, draft: NoteDraft, now: DateTime<Utc>) -> i64 {
        let id = self.notes.add(draft, now.timestamp_millis()).id;
        self.store.save(keys::NOTES, &self.notes);
        self.notifier
            .notify(Notification::info("Note added successfully!"));
        id
    }

    pub fn update_note(&mut self, note: Note) -> bool {
        if !self.notes.update(note) {
            return false;
        }
        self.store.save(keys::NOTES, &self.notes);
        self.notifier
            .notify(Notification::info("Note updated successfully!"));
        true
    }

    pub fn delete_note(&mut self, id: i64) -> Option<Note> {
        let removed = self.notes.delete(id)?;
        self.store.save(keys::NOTES, &self.notes);
        self.notifier
            .notify(Notification::new("Note deleted.", "", Severity::Warning));
        Some(removed)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("ledger", &self.ledger)
            .field("timer", &self.timer)
            .field("pomodoro_goal", &self.pomodoro_goal)
            .field("board", &self.board)
            .field("notes", &self.notes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{AlertLevel, TransactionKind};
    use crate::notify::RecordingNotifier;
    use crate::error::StorageError;
    use crate::storage::{KvBackend, MemoryBackend};
    use crate::timer::Phase;
    use std::str::FromStr;
    use std::sync::Arc;

    /// Lets a test reload state from the same map the app wrote to.
    #[derive(Clone, Default)]
    struct SharedBackend(Arc<MemoryBackend>);

    impl KvBackend for SharedBackend {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.read(key)
        }
        fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.write(key, value)
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap()
    }

    fn app_with(backend: SharedBackend, config: &Config) -> (AppState, RecordingNotifier) {
        let sink = RecordingNotifier::new();
        let app = AppState::load(
            PersistentStore::new(backend),
            Box::new(sink.clone()),
            config,
            today(),
        );
        (app, sink)
    }

    fn expense(app: &AppState, amount: &str) -> Transaction {
        Transaction {
            id: app.next_transaction_id(noon()),
            item: "Groceries".into(),
            category: "Food".into(),
            amount: Decimal::from_str(amount).unwrap(),
            date: noon(),
            kind: TransactionKind::Expense,
        }
    }

    #[test]
    fn first_load_uses_config_defaults_and_seeds() {
        let (app, _) = app_with(SharedBackend::default(), &Config::default());
        assert_eq!(app.timer().durations().focus_minutes(), 25);
        assert_eq!(app.timer().remaining_secs(), 25 * 60);
        assert_eq!(app.pomodoro_goal(), 8);
        assert_eq!(app.ledger().budget(), Decimal::ONE_THOUSAND);
        assert_eq!(app.notes().len(), 4);
        assert_eq!(app.board().day_progress(today()), (1, 2));
    }

    #[test]
    fn seeding_can_be_disabled() {
        let mut config = Config::default();
        config.display.seed_examples = false;
        let (app, _) = app_with(SharedBackend::default(), &config);
        assert!(app.notes().is_empty());
        assert!(app.board().is_empty());
    }

    #[test]
    fn budget_alert_reaches_notifier_before_confirmation() {
        let (mut app, sink) = app_with(SharedBackend::default(), &Config::default());
        app.set_budget(Decimal::ONE_HUNDRED);
        let tx = expense(&app, "95");
        let alert = app.add_transaction(tx).unwrap();
        assert_eq!(alert.level, AlertLevel::Warning);

        let seen = sink.drain();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].title, "Budget Alert");
        assert_eq!(seen[0].severity, Severity::Warning);
        assert_eq!(seen[1].title, "Expense Added");
        assert_eq!(seen[1].description, "Groceries: ₹95.00");

        let tx = expense(&app, "10");
        assert_eq!(app.add_transaction(tx).unwrap().level, AlertLevel::Exceeded);
        assert_eq!(sink.drain()[0].severity, Severity::Critical);
    }

    #[test]
    fn state_survives_reload() {
        let backend = SharedBackend::default();
        let config = Config::default();
        {
            let (mut app, _) = app_with(backend.clone(), &config);
            app.set_budget(Decimal::new(2505, 1));
            let tx = expense(&app, "12.25");
            app.add_transaction(tx);
            app.set_durations(1, 2);
            app.set_goal(3);
            app.timer_start();
            for _ in 0..60 {
                app.timer_tick();
            }
            app.toggle_task(today(), "09:00");
            app.delete_note(1);
        }

        let (app, _) = app_with(backend, &config);
        assert_eq!(app.ledger().budget(), Decimal::new(2505, 1));
        assert_eq!(app.ledger().len(), 1);
        assert_eq!(app.ledger().total_expenses(), Decimal::new(1225, 2));
        assert_eq!(app.timer().durations(), Durations::clamped(1, 2));
        assert_eq!(app.timer().sessions_completed(), 1);
        assert_eq!(app.timer().phase(), Phase::Break);
        assert_eq!(app.timer().remaining_secs(), 120);
        assert!(!app.timer().is_running());
        assert_eq!(app.pomodoro_goal(), 3);
        assert_eq!(app.board().day_progress(today()), (2, 2));
        assert!(app.notes().get(1).is_none());
    }

    #[test]
    fn phase_completion_notifies() {
        let (mut app, sink) = app_with(SharedBackend::default(), &Config::default());
        app.set_durations(1, 1);
        app.timer_toggle();
        for _ in 0..60 {
            app.timer_tick();
        }
        let seen = sink.drain();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].title, "Focus complete");
    }

    #[test]
    fn goal_is_at_least_one() {
        let (mut app, _) = app_with(SharedBackend::default(), &Config::default());
        app.set_goal(0);
        assert_eq!(app.pomodoro_goal(), 1);
    }

    #[test]
    fn note_lifecycle_notifies() {
        let (mut app, sink) = app_with(SharedBackend::default(), &Config::default());
        let id = app.add_note(
            NoteDraft {
                title: "Reading".into(),
                content: "Chapter 4".into(),
                tag: "#books".into(),
            },
            noon(),
        );
        let mut note = app.notes().get(id).cloned().unwrap();
        note.content = "Chapter 5".into();
        assert!(app.update_note(note));
        assert!(app.delete_note(id).is_some());
        assert!(app.delete_note(id).is_none());

        let titles: Vec<String> = sink.drain().into_iter().map(|n| n.title).collect();
        assert_eq!(
            titles,
            vec![
                "Note added successfully!",
                "Note updated successfully!",
                "Note deleted."
            ]
        );
    }

    #[test]
    fn overview_counts_today() {
        let (mut app, _) = app_with(SharedBackend::default(), &Config::default());
        let tx = expense(&app, "7.5");
        app.add_transaction(tx);
        let overview = app.overview(today(), &Utc);
        assert_eq!(overview.sessions_completed, 0);
        assert_eq!(overview.pomodoro_goal, 8);
        assert_eq!((overview.tasks_completed, overview.tasks_total), (1, 2));
        assert_eq!(overview.expenses_today, Decimal::new(75, 1));
    }

    #[test]
    fn unreadable_keys_fall_back_to_defaults() {
        let backend = SharedBackend::default();
        backend.write(keys::TRANSACTIONS, "{oops").unwrap();
        backend.write(keys::FOCUS_DURATION, "-4").unwrap();
        let (app, _) = app_with(backend, &Config::default());
        assert!(app.ledger().is_empty());
        assert_eq!(app.timer().durations().focus_minutes(), 1);
    }
}
