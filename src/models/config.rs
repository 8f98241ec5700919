//! Roster configuration.
//!
//! Describes the target month, public holidays, per-date coverage
//! overrides and the monthly per-person quotas.
//!
//! # Coverage precedence
//! For a given date the required head count per shift is:
//! 1. the first matching special-date override, else
//! 2. the weekend/holiday default (P=2, S=2, M=3), else
//! 3. the weekday default (P=1, S=2, M=2).

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use super::Shift;
use crate::error::RosterError;

/// Default per-person monthly night-shift quota.
pub const DEFAULT_MAX_NIGHT_SHIFTS: u32 = 9;
/// Default per-person monthly regular-leave quota.
pub const DEFAULT_MAX_REGULAR_LEAVES: u32 = 10;

/// A calendar month (`YYYY-MM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    year: i32,
    month: u32,
}

/// Required head count per shift for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRequirement {
    /// Morning (P) head count.
    #[serde(rename = "P")]
    pub morning: u32,
    /// Afternoon (S) head count.
    #[serde(rename = "S")]
    pub afternoon: u32,
    /// Night (M) head count.
    #[serde(rename = "M")]
    pub night: u32,
}

/// A per-date coverage override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialDate {
    /// Overridden date.
    pub date: NaiveDate,
    /// Head counts applying on that date.
    #[serde(flatten)]
    pub requirement: DailyRequirement,
}

/// Configuration for one generation run.
///
/// # Example
/// ```
/// use shift_roster::models::{Month, RosterConfig};
///
/// let config = RosterConfig::new(Month::new(2025, 9).unwrap())
///     .with_public_holidays([5])
///     .with_max_night_shifts(9);
/// assert!(config.is_weekend_or_holiday(config.month.date(5).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Target month.
    pub month: Month,
    /// Public-holiday day numbers within the month.
    #[serde(default)]
    pub public_holidays: BTreeSet<u32>,
    /// Ordered coverage overrides. The first entry for a date wins.
    #[serde(default)]
    pub special_dates: Vec<SpecialDate>,
    /// Maximum night shifts per person per month.
    #[serde(default = "default_max_night_shifts")]
    pub max_night_shifts: u32,
    /// Maximum regular-leave (L) days per person per month.
    #[serde(default = "default_max_regular_leaves", alias = "max_default_leaves")]
    pub max_regular_leaves: u32,
    /// Maximum `non_shift` personnel per day, forwarded to the remote
    /// generator. `None` means no limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_non_shift: Option<u32>,
}

fn default_max_night_shifts() -> u32 {
    DEFAULT_MAX_NIGHT_SHIFTS
}

fn default_max_regular_leaves() -> u32 {
    DEFAULT_MAX_REGULAR_LEAVES
}

impl Month {
    /// Creates a month, rejecting months outside 1..=12.
    pub fn new(year: i32, month: u32) -> Result<Self, RosterError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|_| Self { year, month })
            .ok_or_else(|| RosterError::InvalidMonth(format!("{year:04}-{month:02}")))
    }

    #[inline]
    pub fn year(&self) -> i32 {
        self.year
    }

    #[inline]
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Number of days in the month (28..=31).
    pub fn days_in_month(&self) -> u32 {
        (28..=31)
            .rev()
            .find(|&day| NaiveDate::from_ymd_opt(self.year, self.month, day).is_some())
            .unwrap_or(28)
    }

    /// Day numbers of the month.
    pub fn days(&self) -> RangeInclusive<u32> {
        1..=self.days_in_month()
    }

    /// Date of a day number, or `None` if outside the month.
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    /// Whether a date falls in this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// All dates of the month in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days().filter_map(move |day| self.date(day))
    }
}

impl FromStr for Month {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RosterError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for Month {
    type Error = RosterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.to_string()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl DailyRequirement {
    /// Regular weekday coverage.
    pub const WEEKDAY: Self = Self::new(1, 2, 2);
    /// Weekend and public-holiday coverage.
    pub const WEEKEND_OR_HOLIDAY: Self = Self::new(2, 2, 3);

    pub const fn new(morning: u32, afternoon: u32, night: u32) -> Self {
        Self {
            morning,
            afternoon,
            night,
        }
    }

    /// Head count for a shift.
    pub fn get(&self, shift: Shift) -> u32 {
        match shift {
            Shift::Morning => self.morning,
            Shift::Afternoon => self.afternoon,
            Shift::Night => self.night,
        }
    }

    /// Total head count across all shifts.
    pub fn total(&self) -> u32 {
        self.morning + self.afternoon + self.night
    }
}

impl RosterConfig {
    /// Creates a configuration with default quotas and no holidays.
    pub fn new(month: Month) -> Self {
        Self {
            month,
            public_holidays: BTreeSet::new(),
            special_dates: Vec::new(),
            max_night_shifts: DEFAULT_MAX_NIGHT_SHIFTS,
            max_regular_leaves: DEFAULT_MAX_REGULAR_LEAVES,
            max_non_shift: None,
        }
    }

    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, RosterError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Adds public-holiday day numbers.
    pub fn with_public_holidays(mut self, days: impl IntoIterator<Item = u32>) -> Self {
        self.public_holidays.extend(days);
        self
    }

    /// Appends a coverage override for a date.
    pub fn with_special_date(mut self, date: NaiveDate, requirement: DailyRequirement) -> Self {
        self.special_dates.push(SpecialDate { date, requirement });
        self
    }

    /// Sets the night-shift quota.
    pub fn with_max_night_shifts(mut self, max: u32) -> Self {
        self.max_night_shifts = max;
        self
    }

    /// Sets the regular-leave quota.
    pub fn with_max_regular_leaves(mut self, max: u32) -> Self {
        self.max_regular_leaves = max;
        self
    }

    /// Caps `non_shift` personnel per day.
    pub fn with_max_non_shift(mut self, max: u32) -> Self {
        self.max_non_shift = Some(max);
        self
    }

    /// Whether a date is a public holiday of the configured month.
    pub fn is_public_holiday(&self, date: NaiveDate) -> bool {
        self.public_holidays.contains(&date.day())
    }

    /// Whether a date is Saturday, Sunday or a public holiday.
    pub fn is_weekend_or_holiday(&self, date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun) || self.is_public_holiday(date)
    }

    /// First override configured for a date, if any.
    pub fn special_requirement(&self, date: NaiveDate) -> Option<DailyRequirement> {
        self.special_dates
            .iter()
            .find(|sd| sd.date == date)
            .map(|sd| sd.requirement)
    }
}
