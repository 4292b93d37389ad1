use std::future::Future;

use tokio::sync::mpsc::unbounded_channel;

use super::AppState;
use crate::events::Event;
use crate::timer::{SessionTimer, Ticker};

#[derive(Debug, Clone, PartialEq)]
pub enum CountdownOutcome {
    /// The phase ran out; carries the `PhaseCompleted` event.
    Completed(Event),
    /// `cancel` resolved first; the timer is paused where it stood.
    Paused,
}

/// Drive the timer once per second until the current phase ends or `cancel`
/// resolves.
///
/// Ticks and cancellation are handled on this one task, so they never
/// interleave with each other or with other mutations of `app`.
pub async fn run_countdown<C, F>(app: &mut AppState, cancel: C, mut on_tick: F) -> CountdownOutcome
where
    C: Future<Output = ()>,
    F: FnMut(&SessionTimer),
{
    let (tx, mut rx) = unbounded_channel();
    let mut ticker = Ticker::default();
    app.timer_start();
    ticker.start(tx);
    tokio::pin!(cancel);

    loop {
        tokio::select! {
            _ = &mut cancel => {
                ticker.stop();
                app.timer_pause();
                return CountdownOutcome::Paused;
            }
            Some(tick) = rx.recv() => {
                if !ticker.accepts(&tick) {
                    continue;
                }
                let completed = app.timer_tick();
                on_tick(app.timer());
                if let Some(event) = completed {
                    ticker.stop();
                    return CountdownOutcome::Completed(event);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::storage::{Config, PersistentStore};
    use crate::timer::Phase;
    use chrono::NaiveDate;
    use std::time::Duration;

    fn app() -> AppState {
        let mut app = AppState::load(
            PersistentStore::in_memory(),
            Box::new(RecordingNotifier::new()),
            &Config::default(),
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        );
        app.set_durations(1, 1);
        app
    }

    #[tokio::test(start_paused = true)]
    async fn runs_focus_to_break() {
        let mut app = app();
        let mut ticks = 0;
        let outcome = run_countdown(&mut app, std::future::pending(), |_| ticks += 1).await;

        assert!(matches!(
            outcome,
            CountdownOutcome::Completed(Event::PhaseCompleted { phase: Phase::Focus, .. })
        ));
        assert_eq!(ticks, 60);
        assert_eq!(app.timer().phase(), Phase::Break);
        assert_eq!(app.timer().remaining_secs(), 60);
        assert!(!app.timer().is_running());
        assert_eq!(app.timer().sessions_completed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_pauses_mid_phase() {
        let mut app = app();
        let cancel = tokio::time::sleep(Duration::from_millis(10_500));
        let outcome = run_countdown(&mut app, cancel, |_| {}).await;

        assert_eq!(outcome, CountdownOutcome::Paused);
        assert_eq!(app.timer().remaining_secs(), 50);
        assert!(!app.timer().is_running());
        assert_eq!(app.timer().sessions_completed(), 0);
    }
}
