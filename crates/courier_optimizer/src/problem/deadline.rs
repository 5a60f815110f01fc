use std::fmt::Display;

use jiff::civil::Time;
use serde::Serialize;
use tracing::warn;

use super::service_clock::{END_OF_DAY, Minutes, ServiceClock, parse_clock_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Deadline {
    By(Time),
    #[default]
    EndOfDay,
}

impl Deadline {
    /// Parses deadline text such as `10:30 AM` or `EOD`.
    ///
    /// Text that cannot be read as a time falls back to the end of the day
    /// instead of failing the load.
    pub fn parse(text: &str) -> Deadline {
        let trimmed = text.trim();

        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("EOD") {
            return Deadline::EndOfDay;
        }

        if let Some(time) = parse_clock_text(trimmed) {
            return Deadline::By(time);
        }

        // A bare hour, e.g. "10"
        if let Some(time) = trimmed
            .parse::<i8>()
            .ok()
            .and_then(|hour| Time::new(hour, 0, 0, 0).ok())
        {
            return Deadline::By(time);
        }

        warn!(deadline = trimmed, "Unreadable deadline, using end of day");
        Deadline::EndOfDay
    }

    pub fn time(&self) -> Time {
        match self {
            Deadline::By(time) => *time,
            Deadline::EndOfDay => END_OF_DAY,
        }
    }

    pub fn minutes_since_start(&self, clock: &ServiceClock) -> Minutes {
        clock.minutes_since_start(self.time())
    }

    pub fn is_end_of_day(&self) -> bool {
        matches!(self, Deadline::EndOfDay)
    }
}

impl Display for Deadline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Deadline::By(time) => write!(f, "{}", time.strftime("%-I:%M %p")),
            Deadline::EndOfDay => write!(f, "EOD"),
        }
    }
}
