use jiff::{
    SignedDuration,
    civil::{self, Time},
};
use serde::Serialize;

use crate::error::RoutingError;

/// Simulated minutes elapsed since the start of service.
pub type Minutes = i64;

pub const DEFAULT_SERVICE_START: Time = civil::time(8, 0, 0, 0);
pub const END_OF_DAY: Time = civil::time(17, 0, 0, 0);

/// Converts between wall-clock times of the service day and minute offsets.
///
/// Every time in a run is an offset from `start`; nothing reads the real clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceClock {
    start: Time,
}

impl Default for ServiceClock {
    fn default() -> Self {
        ServiceClock {
            start: DEFAULT_SERVICE_START,
        }
    }
}

impl ServiceClock {
    pub fn new(start: Time) -> Self {
        ServiceClock { start }
    }

    pub fn start(&self) -> Time {
        self.start
    }

    /// Offset of `time` from the start of service, clamped at zero.
    pub fn minutes_since_start(&self, time: Time) -> Minutes {
        (minute_of_day(time) - minute_of_day(self.start)).max(0)
    }

    pub fn clock_time(&self, minutes: Minutes) -> Time {
        self.start.wrapping_add(SignedDuration::from_mins(minutes))
    }

    pub fn format(&self, minutes: Minutes) -> String {
        self.clock_time(minutes).strftime("%H:%M").to_string()
    }

    /// Parses `HH:MM` (24h) or `H:MM AM/PM` into an offset from the start of service.
    pub fn parse(&self, text: &str) -> Result<Minutes, RoutingError> {
        parse_clock_text(text)
            .map(|time| self.minutes_since_start(time))
            .ok_or_else(|| RoutingError::InvalidClockTime(text.to_owned()))
    }
}

fn minute_of_day(time: Time) -> Minutes {
    Minutes::from(time.hour()) * 60 + Minutes::from(time.minute())
}

pub fn parse_clock_text(text: &str) -> Option<Time> {
    let upper = text.trim().to_uppercase();

    let (body, meridiem) = if let Some(body) = upper.strip_suffix("AM") {
        (body.trim_end(), Some(Meridiem::Am))
    } else if let Some(body) = upper.strip_suffix("PM") {
        (body.trim_end(), Some(Meridiem::Pm))
    } else {
        (upper.as_str(), None)
    };

    let (hours, minutes) = body.split_once(':')?;
    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return None;
    }

    let hours: i8 = hours.parse().ok()?;
    let minutes: i8 = minutes.parse().ok()?;

    let hours = match meridiem {
        Some(Meridiem::Pm) if hours != 12 => hours + 12,
        Some(Meridiem::Am) if hours == 12 => 0,
        _ => hours,
    };

    Time::new(hours, minutes, 0, 0).ok()
}

#[derive(Clone, Copy)]
enum Meridiem {
    Am,
    Pm,
}
