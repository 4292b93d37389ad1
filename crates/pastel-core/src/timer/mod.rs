mod session;
mod ticker;

pub use session::{format_clock, Durations, Phase, SessionTimer, TimerSnapshot};
pub use ticker::{Tick, Ticker};
