//! Rule violations.
//!
//! A violation is a structured report of one broken rule in a completed
//! roster. Violations are diagnostic only; they are produced by the
//! validator and compared by count when ranking generation attempts.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{PersonId, Shift};

/// Coarse violation grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCategory {
    /// A day/shift is under-staffed.
    Coverage,
    /// A person's assignments break a personal rule.
    Personnel,
}

/// Per-person monthly quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaKind {
    NightShifts,
    RegularLeave,
}

/// A broken roster rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Violation {
    /// Fewer people than required on a shift.
    Coverage {
        day: u32,
        shift: Shift,
        required: u32,
        actual: u32,
    },
    /// Forbidden transition between shifts on consecutive days.
    Sequence {
        person: PersonId,
        name: String,
        day: u32,
        from: Shift,
        to: Shift,
    },
    /// A Night run longer than two, reported up to `last_day`.
    ConsecutiveNights {
        person: PersonId,
        name: String,
        first_day: u32,
        last_day: u32,
    },
    /// A work run longer than five, reported up to `last_day`.
    ConsecutiveWork {
        person: PersonId,
        name: String,
        first_day: u32,
        last_day: u32,
    },
    /// A required rest day after a Night run is worked or empty.
    MandatoryLeaveMissing {
        person: PersonId,
        name: String,
        day: u32,
        run_end: u32,
        run_length: u32,
    },
    /// A monthly quota was overrun.
    QuotaExceeded {
        person: PersonId,
        name: String,
        kind: QuotaKind,
        used: u32,
        limit: u32,
    },
}

impl Violation {
    pub fn category(&self) -> ViolationCategory {
        match self {
            Violation::Coverage { .. } => ViolationCategory::Coverage,
            _ => ViolationCategory::Personnel,
        }
    }

    /// Person concerned, if the violation is personal.
    pub fn person(&self) -> Option<PersonId> {
        match self {
            Violation::Coverage { .. } => None,
            Violation::Sequence { person, .. }
            | Violation::ConsecutiveNights { person, .. }
            | Violation::ConsecutiveWork { person, .. }
            | Violation::MandatoryLeaveMissing { person, .. }
            | Violation::QuotaExceeded { person, .. } => Some(*person),
        }
    }

    /// Display name of the person concerned.
    pub fn person_name(&self) -> Option<&str> {
        match self {
            Violation::Coverage { .. } => None,
            Violation::Sequence { name, .. }
            | Violation::ConsecutiveNights { name, .. }
            | Violation::ConsecutiveWork { name, .. }
            | Violation::MandatoryLeaveMissing { name, .. }
            | Violation::QuotaExceeded { name, .. } => Some(name),
        }
    }

    /// Day the violation is reported on. Quota overruns are month-wide.
    pub fn day(&self) -> Option<u32> {
        match self {
            Violation::Coverage { day, .. }
            | Violation::Sequence { day, .. }
            | Violation::MandatoryLeaveMissing { day, .. } => Some(*day),
            Violation::ConsecutiveNights { last_day, .. }
            | Violation::ConsecutiveWork { last_day, .. } => Some(*last_day),
            Violation::QuotaExceeded { .. } => None,
        }
    }

    /// Human-readable description.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Coverage {
                day,
                shift,
                required,
                actual,
            } => write!(
                f,
                "Day {day}: {shift} shift shortage - need {required}, have {actual}"
            ),
            Violation::Sequence { day, from, to, .. } => {
                write!(f, "Invalid sequence on day {day}: {from} → {to}")
            }
            Violation::ConsecutiveNights {
                first_day,
                last_day,
                ..
            } => write!(
                f,
                "More than 2 consecutive nights: days {first_day}-{last_day} ({} nights)",
                last_day - first_day + 1
            ),
            Violation::ConsecutiveWork {
                first_day,
                last_day,
                ..
            } => write!(
                f,
                "More than 5 consecutive work days: days {first_day}-{last_day} ({} days)",
                last_day - first_day + 1
            ),
            Violation::MandatoryLeaveMissing {
                day,
                run_end,
                run_length,
                ..
            } => {
                let nights = if *run_length == 1 {
                    "1 night".to_string()
                } else {
                    format!("{run_length} consecutive nights")
                };
                write!(
                    f,
                    "Missing mandatory leave on day {day} after {nights} ending on day {run_end}"
                )
            }
            Violation::QuotaExceeded {
                kind, used, limit, ..
            } => match kind {
                QuotaKind::NightShifts => {
                    write!(f, "Exceeded night shift limit: {used}/{limit}")
                }
                QuotaKind::RegularLeave => {
                    write!(f, "Exceeded regular leave limit: {used}/{limit}")
                }
            },
        }
    }
}
