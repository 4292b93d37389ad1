use std::io::Write;

use clap::Subcommand;
use pastel_core::{run_countdown, CountdownOutcome, Event};

use super::{print_json, CliResult, Session};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON
    Status,
    /// Count the current phase down live until it ends (Ctrl-C pauses)
    #[command(alias = "start")]
    Run,
    /// Pause the timer, keeping the remaining time
    Pause,
    /// Back to a full focus phase
    Reset,
    /// Change focus and break lengths in minutes (values below 1 become 1)
    #[command(allow_negative_numbers = true)]
    Durations {
        /// Focus minutes
        focus: i64,
        /// Break minutes
        #[arg(value_name = "BREAK")]
        brk: i64,
    },
    /// Set the daily pomodoro goal (at least 1)
    #[command(allow_negative_numbers = true)]
    Goal { n: i64 },
}

pub async fn run(action: TimerAction) -> CliResult {
    let mut session = Session::open()?;

    match action {
        TimerAction::Status => {
            print_json(&session.app.timer().snapshot())?;
        }
        TimerAction::Run => {
            let outcome = countdown(&mut session).await;
            println!();
            match outcome {
                CountdownOutcome::Completed(event) => print_json(&event)?,
                CountdownOutcome::Paused => print_json(&session.app.timer().snapshot())?,
            }
        }
        TimerAction::Pause => {
            // A timer only runs inside `timer run`; here this just settles the stored state.
            match session.app.timer_pause() {
                Some(event) => print_json(&event)?,
                None => print_json(&session.app.timer().snapshot())?,
            }
        }
        TimerAction::Reset => {
            if let Some(event) = session.app.timer_reset() {
                print_json(&event)?;
            }
        }
        TimerAction::Durations { focus, brk } => match session.app.set_durations(focus, brk) {
            Some(event) => print_json(&event)?,
            None => print_json(&session.app.timer().snapshot())?,
        },
        TimerAction::Goal { n } => {
            session.app.set_goal(n);
            println!("{}", session.app.pomodoro_goal());
        }
    }

    session.finish();
    Ok(())
}

async fn countdown(session: &mut Session) -> CountdownOutcome {
    let cancel = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    let timer = session.app.timer();
    print_progress(timer.phase().label(), &timer.display());

    let outcome = run_countdown(&mut session.app, cancel, |timer| {
        print_progress(timer.phase().label(), &timer.display());
    })
    .await;

    if let CountdownOutcome::Completed(Event::PhaseCompleted { sessions_completed, .. }) = &outcome {
        tracing::info!(sessions_completed, "phase finished");
    }
    outcome
}

fn print_progress(label: &str, clock: &str) {
    let mut out = std::io::stdout();
    let _ = write!(out, "\r{label:<6} {clock}");
    let _ = out.flush();
}
