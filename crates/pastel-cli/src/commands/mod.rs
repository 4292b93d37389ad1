pub mod board;
pub mod config;
pub mod ledger;
pub mod notes;
pub mod timer;

use chrono::{Local, NaiveDate};
use pastel_core::{AppState, Notification, RecordingNotifier};
use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// An opened app state plus the notifications it produced while the
/// command ran.
pub struct Session {
    pub app: AppState,
    sink: RecordingNotifier,
}

impl Session {
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let sink = RecordingNotifier::new();
        let app = AppState::open(Box::new(sink.clone()), today())?;
        Ok(Self { app, sink })
    }

    /// Print any pending notifications to stderr.
    pub fn show_notifications(&self) {
        for n in self.sink.drain() {
            eprintln!("{}", render_notification(&n));
        }
    }

    /// Show what's left and wait for the store to catch up.
    pub fn finish(self) {
        self.show_notifications();
        self.app.flush();
    }
}

pub fn render_notification(n: &Notification) -> String {
    if n.description.is_empty() {
        format!("[{}] {}", n.severity, n.title)
    } else {
        format!("[{}] {}: {}", n.severity, n.title, n.description)
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Accepts `today` or `YYYY-MM-DD`.
pub fn parse_date(raw: &str) -> Result<NaiveDate, pastel_core::ValidationError> {
    if raw.eq_ignore_ascii_case("today") {
        return Ok(today());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
        pastel_core::ValidationError::InvalidValue {
            field: "date".into(),
            message: format!("{raw}: {e}"),
        }
    })
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn overview() -> CliResult {
    let session = Session::open()?;
    let overview = session.app.overview(today(), &Local);
    print_json(&overview)?;
    session.finish();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pastel_core::Severity;

    #[test]
    fn renders_title_only_notifications_without_colon() {
        let n = Notification::info("Note added successfully!");
        assert_eq!(render_notification(&n), "[info] Note added successfully!");
    }

    #[test]
    fn renders_description() {
        let n = Notification::new("Budget Alert", "You have exceeded your monthly budget.", Severity::Critical);
        assert_eq!(
            render_notification(&n),
            "[critical] Budget Alert: You have exceeded your monthly budget."
        );
    }

    #[test]
    fn parse_date_accepts_iso_and_today() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(parse_date("today").unwrap(), today());
        assert!(parse_date("29/02/2024").is_err());
    }
}
