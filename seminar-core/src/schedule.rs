//! Seminar clock times and time windows.
//!
//! Seminar forms carry start/end times as free text such as `"09:30 AM"`.
//! These types parse that text, check the window, and anchor it to a date.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DeskError, DeskResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Am,
    Pm,
}

/// A 12-hour clock time as entered on the seminar form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
    pub period: Period,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32, period: Period) -> DeskResult<Self> {
        if !(1..=12).contains(&hour) || minute > 59 {
            return Err(DeskError::Validation(
                "Please select a valid time (hour 1-12, minute 0-59).".into(),
            ));
        }
        Ok(ClockTime {
            hour,
            minute,
            period,
        })
    }

    pub fn parse(s: &str) -> DeskResult<Self> {
        let invalid = || DeskError::Validation(format!("Invalid time '{s}'. Expected HH:MM AM/PM"));

        let (clock, period) = s.trim().split_once(char::is_whitespace).ok_or_else(invalid)?;
        let period = match period.trim().to_ascii_uppercase().as_str() {
            "AM" => Period::Am,
            "PM" => Period::Pm,
            _ => return Err(invalid()),
        };
        let (hour, minute) = clock.split_once(':').ok_or_else(invalid)?;
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;

        Self::new(hour, minute, period)
    }

    /// Minutes since midnight (12 AM is 0, 12 PM is noon).
    pub fn minutes(&self) -> u32 {
        let mut hour = self.hour % 12;
        if self.period == Period::Pm {
            hour += 12;
        }
        hour * 60 + self.minute
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        let minutes = self.minutes();
        // Range checked in `new`
        NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl FromStr for ClockTime {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClockTime::parse(s)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let period = match self.period {
            Period::Am => "AM",
            Period::Pm => "PM",
        };
        write!(f, "{:02}:{:02} {}", self.hour, self.minute, period)
    }
}

/// Start and end of a seminar on one day. The end is always after the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeWindow {
    pub fn new(start: ClockTime, end: ClockTime) -> DeskResult<Self> {
        if end.minutes() <= start.minutes() {
            return Err(DeskError::Validation(
                "End time must be after start time.".into(),
            ));
        }
        Ok(TimeWindow { start, end })
    }

    pub fn parse(start: &str, end: &str) -> DeskResult<Self> {
        Self::new(ClockTime::parse(start)?, ClockTime::parse(end)?)
    }

    /// Anchor the window to `date` in the local timezone.
    pub fn on(&self, date: NaiveDate) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        (to_utc(date, self.start), to_utc(date, self.end))
    }
}

fn to_utc(date: NaiveDate, time: ClockTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&date.and_time(time.to_naive_time()))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Academic half-year: January–June is the first, July–December the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Semester {
    First,
    Second,
}

impl Semester {
    pub fn of<D: Datelike>(date: &D) -> Self {
        if date.month() <= 6 {
            Semester::First
        } else {
            Semester::Second
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Semester::First => 1,
            Semester::Second => 2,
        }
    }
}

impl TryFrom<u8> for Semester {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Semester::First),
            2 => Ok(Semester::Second),
            other => Err(format!("Semester must be 1 or 2, got {other}")),
        }
    }
}

impl From<Semester> for u8 {
    fn from(s: Semester) -> u8 {
        s.number()
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}
