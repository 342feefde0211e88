//! Calendar month used to key historical and blended return series

use std::fmt;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// One calendar month (year + month number 1..=12).
///
/// Ordering is chronological, so a `Vec<Period>` sorted ascending is a
/// timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    year: i16,
    month: i8,
}

impl Period {
    /// Create a period, returning `None` for an out-of-range month or a year
    /// outside what `jiff` can represent.
    #[must_use]
    pub fn new(year: i16, month: i8) -> Option<Self> {
        if !(1..=12).contains(&month) || !(-9999..=9999).contains(&year) {
            return None;
        }
        Some(Self { year, month })
    }

    /// The month containing `date`.
    #[must_use]
    pub fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    #[must_use]
    pub fn year(self) -> i16 {
        self.year
    }

    #[must_use]
    pub fn month(self) -> i8 {
        self.month
    }

    #[must_use]
    pub fn first_day(self) -> Date {
        jiff::civil::date(self.year, self.month, 1)
    }

    /// The following month, or `None` past the last representable year.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        if self.month == 12 {
            Self::new(self.year.checked_add(1)?, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// Signed number of months from `self` to `other`.
    #[must_use]
    pub fn months_until(self, other: Period) -> i32 {
        (i32::from(other.year) - i32::from(self.year)) * 12
            + (i32::from(other.month) - i32::from(self.month))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl From<Date> for Period {
    fn from(date: Date) -> Self {
        Self::of(date)
    }
}
