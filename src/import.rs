//! Import of externally produced schedules.
//!
//! A schedule from a remote generator, an assistant or a file is treated
//! as untrusted JSON. Import runs in two stages:
//!
//! 1. **Structure**: every date of the month present, each day an object
//!    with `P`/`S`/`M` arrays of known integer ids, nobody listed twice on
//!    one day. All problems are collected; any problem rejects the whole
//!    schedule with [`RosterError::MalformedSchedule`].
//! 2. **Rules**: the accepted schedule is projected onto a grid (shifts,
//!    then pre-booked leave, then mandatory rest in still-empty cells) and
//!    scored by [`validate_schedule`]. Rule violations do not reject the
//!    schedule; they travel with it.

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::RosterError;
use crate::models::{
    DayRoster, Person, PersonId, PublicSchedule, RosterConfig, RosterGrid, Shift, Slot,
    Violation,
};
use crate::roster::utils::{night_run_ending, rest_days_after};
use crate::validation::validate_schedule;

/// A structural problem in an imported schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralError {
    /// Error category.
    pub kind: StructuralErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of structural problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralErrorKind {
    /// The document is not a JSON object.
    NotAnObject,
    /// A key is not a `YYYY-MM-DD` date.
    InvalidDate,
    /// A date lies outside the target month.
    DateOutOfMonth,
    /// A date of the target month is absent.
    MissingDate,
    /// A day entry is not an object.
    InvalidDayShape,
    /// A day entry lacks one of `P`, `S`, `M`.
    MissingShiftList,
    /// A shift entry is not an array.
    NotAnArray,
    /// A list element is not a non-negative integer id.
    InvalidId,
    /// An id does not name anyone in the personnel list.
    UnknownPerson,
    /// A person appears more than once on the same day.
    DoubleAssignment,
}

impl StructuralError {
    fn new(kind: StructuralErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// An accepted schedule and its rule violations.
#[derive(Debug, Clone)]
pub struct ImportedSchedule {
    pub schedule: PublicSchedule,
    /// Re-derived grid including leave.
    pub grid: RosterGrid,
    pub violations: Vec<Violation>,
}

impl ImportedSchedule {
    pub fn is_perfect(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Parses, structurally checks and scores a schedule.
///
/// # Errors
/// [`RosterError::Json`] if `json` does not parse, and
/// [`RosterError::MalformedSchedule`] with every structural problem found.
pub fn import_schedule(
    json: &str,
    config: &RosterConfig,
    people: &[Person],
) -> Result<ImportedSchedule, RosterError> {
    let value: Value = serde_json::from_str(json)?;
    let schedule =
        check_structure(&value, config, people).map_err(RosterError::MalformedSchedule)?;
    Ok(accept_schedule(schedule, config, people))
}

/// Scores an already well-formed schedule.
pub fn accept_schedule(
    schedule: PublicSchedule,
    config: &RosterConfig,
    people: &[Person],
) -> ImportedSchedule {
    let grid = derive_grid(&schedule, config, people);
    let violations = validate_schedule(config, people, &grid);
    debug!(
        dates = schedule.len(),
        violations = violations.len(),
        "schedule imported"
    );
    ImportedSchedule {
        schedule,
        grid,
        violations,
    }
}

/// Checks the wire shape of a schedule document.
///
/// # Returns
/// The parsed schedule, or every structural problem found.
pub fn check_structure(
    value: &Value,
    config: &RosterConfig,
    people: &[Person],
) -> Result<PublicSchedule, Vec<StructuralError>> {
    let Some(days) = value.as_object() else {
        return Err(vec![StructuralError::new(
            StructuralErrorKind::NotAnObject,
            "Schedule must be a JSON object keyed by date",
        )]);
    };

    let month = config.month;
    let known: HashSet<PersonId> = people.iter().map(|p| p.id).collect();
    let mut errors = Vec::new();
    let mut parsed = BTreeMap::new();

    for (key, entry) in days {
        let canonical = NaiveDate::parse_from_str(key, "%Y-%m-%d")
            .ok()
            .filter(|date| date.format("%Y-%m-%d").to_string() == *key);
        let Some(date) = canonical else {
            errors.push(StructuralError::new(
                StructuralErrorKind::InvalidDate,
                format!("Invalid date key '{key}', expected YYYY-MM-DD"),
            ));
            continue;
        };
        if !month.contains(date) {
            errors.push(StructuralError::new(
                StructuralErrorKind::DateOutOfMonth,
                format!("Date {date} is outside {month}"),
            ));
            continue;
        }
        let Some(entry) = entry.as_object() else {
            errors.push(StructuralError::new(
                StructuralErrorKind::InvalidDayShape,
                format!("Entry for {date} must be an object with P, S and M lists"),
            ));
            continue;
        };
        if let Some(roster) = check_day(date, entry, &known, &mut errors) {
            parsed.insert(date, roster);
        }
    }

    for date in month.dates() {
        if !days.contains_key(&date.format("%Y-%m-%d").to_string()) {
            errors.push(StructuralError::new(
                StructuralErrorKind::MissingDate,
                format!("Missing date {date}"),
            ));
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    let mut schedule = PublicSchedule::new();
    for (date, roster) in parsed {
        schedule.insert(date, roster);
    }
    Ok(schedule)
}

fn check_day(
    date: NaiveDate,
    entry: &Map<String, Value>,
    known: &HashSet<PersonId>,
    errors: &mut Vec<StructuralError>,
) -> Option<DayRoster> {
    let before = errors.len();
    let mut roster = DayRoster::default();
    let mut seen = HashSet::new();

    for shift in Shift::ALL {
        let Some(list) = entry.get(shift.code()) else {
            errors.push(StructuralError::new(
                StructuralErrorKind::MissingShiftList,
                format!("Missing {shift} list on {date}"),
            ));
            continue;
        };
        let Some(list) = list.as_array() else {
            errors.push(StructuralError::new(
                StructuralErrorKind::NotAnArray,
                format!("{shift} on {date} must be an array"),
            ));
            continue;
        };
        for item in list {
            let Some(id) = item.as_u64().and_then(|id| PersonId::try_from(id).ok()) else {
                errors.push(StructuralError::new(
                    StructuralErrorKind::InvalidId,
                    format!("Invalid personnel id {item} in {shift} on {date}"),
                ));
                continue;
            };
            if !known.contains(&id) {
                errors.push(StructuralError::new(
                    StructuralErrorKind::UnknownPerson,
                    format!("Unknown personnel id {id} in {shift} on {date}"),
                ));
                continue;
            }
            if !seen.insert(id) {
                errors.push(StructuralError::new(
                    StructuralErrorKind::DoubleAssignment,
                    format!("Double shift assignment for personnel {id} on {date}"),
                ));
                continue;
            }
            roster.get_mut(shift).push(id);
        }
    }

    (errors.len() == before).then_some(roster)
}

/// Re-derives a full grid from a public schedule.
///
/// Shifts come first. Cells without a shift take the person's pre-booked
/// leave (L, LT, CT precedence). Cells still empty after a Night run get
/// mandatory rest; an assigned shift is never overridden.
pub fn derive_grid(
    schedule: &PublicSchedule,
    config: &RosterConfig,
    people: &[Person],
) -> RosterGrid {
    let mut grid = RosterGrid::new(config.month);
    for (date, roster) in schedule.iter() {
        if !config.month.contains(date) {
            continue;
        }
        let day = date.day();
        for shift in Shift::ALL {
            for &id in roster.get(shift) {
                grid.set(day, id, shift.into());
            }
        }
    }

    let days = grid.days_in_month();
    for person in people {
        for day in 1..=days {
            if grid.slot(day, person.id).is_none() {
                if let Some(leave) = person.booked_leave_on(day) {
                    grid.set(day, person.id, leave.into());
                }
            }
        }
    }

    for person in people {
        for run_end in 1..=days {
            let Some(run_length) = night_run_ending(&grid, person.id, run_end) else {
                continue;
            };
            for day in rest_days_after(run_end, run_length, days) {
                if grid.slot(day, person.id).is_none() {
                    grid.set(day, person.id, Slot::REST);
                }
            }
        }
    }
    grid
}
