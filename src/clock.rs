//! Calendar clock.
//!
//! Wall-clock value advanced one second per clock tick with carry into
//! minute, hour, day, month and year. The boot value comes from outside
//! (NTP or the configured default); after that this module is the only
//! writer.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

/// Gregorian leap rule: divisible by 4 and not by 100, or divisible by 400.
pub const fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`.
///
/// An out-of-range month yields 30.
pub const fn days_in_month(month: u8, year: u16) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

/// A validated calendar date and time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CalendarFields", into = "CalendarFields")]
pub struct CalendarTime {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl CalendarTime {
    pub fn new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::MonthOutOfRange);
        }
        if day == 0 || day > days_in_month(month, year) {
            return Err(CalendarError::DayOutOfRange);
        }
        if hour >= 24 {
            return Err(CalendarError::HourOutOfRange);
        }
        if minute >= 60 {
            return Err(CalendarError::MinuteOutOfRange);
        }
        if second >= 60 {
            return Err(CalendarError::SecondOutOfRange);
        }
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Midnight on the given day.
    pub fn midnight(year: u16, month: u8, day: u8) -> Result<Self, CalendarError> {
        Self::new(year, month, day, 0, 0, 0)
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    /// Advance by one second.
    pub fn tick(&mut self) {
        self.second += 1;
        if self.second < 60 {
            return;
        }
        self.second = 0;
        self.minute += 1;
        if self.minute < 60 {
            return;
        }
        self.minute = 0;
        self.hour += 1;
        if self.hour < 24 {
            return;
        }
        self.hour = 0;
        self.advance_day();
    }

    /// Roll to the next calendar day, keeping the time of day.
    pub fn advance_day(&mut self) {
        self.day += 1;
        if self.day <= days_in_month(self.month, self.year) {
            return;
        }
        self.day = 1;
        self.month += 1;
        if self.month > 12 {
            self.month = 1;
            self.year = self.year.wrapping_add(1);
        }
    }
}

impl Default for CalendarTime {
    fn default() -> Self {
        Self {
            year: 2025,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }
}

impl fmt::Display for CalendarTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

// ── Serde shadow ──────────────────────────────────────────────

/// Unvalidated wire form; deserialisation goes through [`CalendarTime::new`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct CalendarFields {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl TryFrom<CalendarFields> for CalendarTime {
    type Error = CalendarError;

    fn try_from(v: CalendarFields) -> Result<Self, Self::Error> {
        Self::new(v.year, v.month, v.day, v.hour, v.minute, v.second)
    }
}

impl From<CalendarTime> for CalendarFields {
    fn from(t: CalendarTime) -> Self {
        Self {
            year: t.year,
            month: t.month,
            day: t.day,
            hour: t.hour,
            minute: t.minute,
            second: t.second,
        }
    }
}
