use std::collections::BTreeSet;

use clap::Subcommand;
use pastel_core::board::{hourly_slots, parse_slot};
use pastel_core::Task;

use super::{parse_date, print_json, CliResult, Session};

#[derive(Subcommand)]
pub enum BoardAction {
    /// Show the day grid (YYYY-MM-DD, default today)
    Show {
        #[arg(default_value = "today")]
        date: String,
        /// Print the day's tasks as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create or edit the task in a slot; empty title and notes clear it
    Set {
        date: String,
        /// Slot as HH:MM
        time: String,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Flip a task between done and not done
    Toggle { date: String, time: String },
    /// Remove the task in a slot
    Delete { date: String, time: String },
}

pub fn run(action: BoardAction) -> CliResult {
    let mut session = Session::open()?;

    match action {
        BoardAction::Show { date, json } => {
            let date = parse_date(&date)?;
            let board = session.app.board();
            if json {
                match board.tasks_on(date) {
                    Some(tasks) => print_json(tasks)?,
                    None => println!("{{}}"),
                }
            } else {
                let (done, total) = board.day_progress(date);
                println!("{date}  {done}/{total} done");
                let mut slots: BTreeSet<String> = hourly_slots().into_iter().collect();
                if let Some(tasks) = board.tasks_on(date) {
                    slots.extend(tasks.keys().cloned());
                }
                for slot in &slots {
                    match board.get(date, slot) {
                        Some(task) => {
                            let mark = if task.completed { "x" } else { " " };
                            println!("{slot} [{mark}] {}", task.title);
                            if !task.notes.is_empty() {
                                println!("          {}", task.notes);
                            }
                        }
                        None => println!("{slot}"),
                    }
                }
            }
        }
        BoardAction::Set {
            date,
            time,
            title,
            notes,
        } => {
            let date = parse_date(&date)?;
            let time = parse_slot(&time)?;
            let completed = session
                .app
                .board()
                .get(date, &time)
                .is_some_and(|t| t.completed);
            let task = Task {
                title: title.trim().to_string(),
                notes: notes.trim().to_string(),
                completed,
            };
            let cleared = task.is_blank();
            session.app.upsert_task(date, &time, task);
            println!("{}", if cleared { "cleared" } else { "saved" });
        }
        BoardAction::Toggle { date, time } => {
            let date = parse_date(&date)?;
            let time = parse_slot(&time)?;
            match session.app.toggle_task(date, &time) {
                Some(true) => println!("done"),
                Some(false) => println!("not done"),
                None => println!("no task at {date} {time}"),
            }
        }
        BoardAction::Delete { date, time } => {
            let date = parse_date(&date)?;
            let time = parse_slot(&time)?;
            match session.app.delete_task(date, &time) {
                Some(task) => println!("deleted '{}'", task.title),
                None => println!("no task at {date} {time}"),
            }
        }
    }

    session.finish();
    Ok(())
}
