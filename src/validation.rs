//! Roster validation.
//!
//! Two independent passes:
//!
//! - [`validate_input`] checks personnel and configuration for structural
//!   problems before generation (duplicate ids, day numbers outside the
//!   month, a day booked under two leave categories).
//! - [`validate_schedule`] scores a completed grid against the roster
//!   rules and returns every broken rule as a [`Violation`]. It is a pure
//!   function of its inputs and never fails.
//!
//! # Schedule checks
//!
//! | Check | Reported when |
//! |-------|---------------|
//! | Coverage | Fewer people than required on a day/shift (surplus is fine) |
//! | Sequence | M → P/S, or S → P, between consecutive shift days |
//! | Consecutive nights | Third and later night of a run |
//! | Consecutive work | Sixth and later working day of a run |
//! | Mandatory leave | Rest day after a Night run is worked or empty |
//! | Quotas | Night or regular-leave count above its limit |

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::models::{
    Leave, Person, QuotaKind, RosterConfig, RosterGrid, Shift, Slot, Violation,
    ViolationCategory,
};
use crate::roster::utils::{
    daily_requirement, night_run_ending, rest_days_after, MAX_CONSECUTIVE_NIGHTS,
    MAX_CONSECUTIVE_WORKDAYS,
};

/// Input validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// An input validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of input validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two people share an id.
    DuplicateId,
    /// A leave or holiday day number is not a day of the month.
    DayOutOfRange,
    /// A special date lies outside the month.
    DateOutOfMonth,
    /// The same day is booked under more than one leave category.
    ConflictingLeave,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates personnel and configuration.
///
/// Checks:
/// 1. No duplicate person ids
/// 2. Holiday and leave day numbers fall within the month
/// 3. Special dates fall within the month
/// 4. No day is booked under two leave categories for one person
///
/// Out-of-range leave days are skipped by the generator, and overlapping
/// bookings resolve to the later category; both are still reported here.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(config: &RosterConfig, people: &[Person]) -> ValidationResult {
    let mut errors = Vec::new();
    let month = config.month;
    let days = month.days_in_month();

    let mut ids = HashSet::new();
    for person in people {
        if !ids.insert(person.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate person ID: {}", person.id),
            ));
        }
    }

    for &day in &config.public_holidays {
        if day == 0 || day > days {
            errors.push(ValidationError::new(
                ValidationErrorKind::DayOutOfRange,
                format!("Public holiday {day} is not a day of {month}"),
            ));
        }
    }

    for special in &config.special_dates {
        if !month.contains(special.date) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DateOutOfMonth,
                format!("Special date {} is outside {month}", special.date),
            ));
        }
    }

    for person in people {
        for leave in Leave::ALL {
            for &day in person.leave_days(leave) {
                if day == 0 || day > days {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::DayOutOfRange,
                        format!(
                            "{} has {leave} leave on day {day}, outside {month}",
                            person.name
                        ),
                    ));
                }
            }
        }

        let mut booked = HashSet::new();
        let conflicts: BTreeSet<u32> = Leave::ALL
            .iter()
            .flat_map(|&leave| person.leave_days(leave).iter().copied())
            .filter(|&day| !booked.insert(day))
            .collect();
        for day in conflicts {
            errors.push(ValidationError::new(
                ValidationErrorKind::ConflictingLeave,
                format!("{} has more than one leave type on day {day}", person.name),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Scores a completed grid against the roster rules.
///
/// Coverage counts only people in `people`. Personal violations are
/// grouped by person in list order, each person's checks running in the
/// order of the table above.
pub fn validate_schedule(
    config: &RosterConfig,
    people: &[Person],
    grid: &RosterGrid,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_coverage(config, people, grid, &mut violations);

    for person in people {
        check_sequence(person, grid, &mut violations);
        check_consecutive_nights(person, grid, &mut violations);
        check_mandatory_leave(person, grid, &mut violations);
        check_consecutive_work(person, grid, &mut violations);
        check_quotas(config, person, grid, &mut violations);
    }

    let coverage = violations
        .iter()
        .filter(|v| v.category() == ViolationCategory::Coverage)
        .count();
    debug!(
        total = violations.len(),
        coverage,
        personnel = violations.len() - coverage,
        "roster validated"
    );
    violations
}

fn check_coverage(
    config: &RosterConfig,
    people: &[Person],
    grid: &RosterGrid,
    out: &mut Vec<Violation>,
) {
    for (day, date) in (1..).zip(config.month.dates()) {
        let requirement = daily_requirement(config, date);
        for shift in Shift::ALL {
            let required = requirement.get(shift);
            let actual = people
                .iter()
                .filter(|p| grid.shift(day, p.id) == Some(shift))
                .count() as u32;
            if actual < required {
                out.push(Violation::Coverage {
                    day,
                    shift,
                    required,
                    actual,
                });
            }
        }
    }
}

fn check_sequence(person: &Person, grid: &RosterGrid, out: &mut Vec<Violation>) {
    for day in 2..=grid.days_in_month() {
        let (Some(from), Some(to)) = (grid.shift(day - 1, person.id), grid.shift(day, person.id))
        else {
            continue;
        };
        if !from.allows_next(to) {
            out.push(Violation::Sequence {
                person: person.id,
                name: person.name.clone(),
                day,
                from,
                to,
            });
        }
    }
}

/// Calls `on_excess(first_day, day)` for every day of a run of `matches`
/// beyond `limit`.
fn scan_runs(
    grid: &RosterGrid,
    limit: u32,
    matches: impl Fn(u32) -> bool,
    mut on_excess: impl FnMut(u32, u32),
) {
    let mut run = 0;
    let mut first_day = 0;
    for day in 1..=grid.days_in_month() {
        if !matches(day) {
            run = 0;
            continue;
        }
        if run == 0 {
            first_day = day;
        }
        run += 1;
        if run > limit {
            on_excess(first_day, day);
        }
    }
}

fn check_consecutive_nights(person: &Person, grid: &RosterGrid, out: &mut Vec<Violation>) {
    scan_runs(
        grid,
        MAX_CONSECUTIVE_NIGHTS,
        |day| grid.is_night(day, person.id),
        |first_day, last_day| {
            out.push(Violation::ConsecutiveNights {
                person: person.id,
                name: person.name.clone(),
                first_day,
                last_day,
            })
        },
    );
}

fn check_consecutive_work(person: &Person, grid: &RosterGrid, out: &mut Vec<Violation>) {
    scan_runs(
        grid,
        MAX_CONSECUTIVE_WORKDAYS,
        |day| grid.shift(day, person.id).is_some(),
        |first_day, last_day| {
            out.push(Violation::ConsecutiveWork {
                person: person.id,
                name: person.name.clone(),
                first_day,
                last_day,
            })
        },
    );
}

fn check_mandatory_leave(person: &Person, grid: &RosterGrid, out: &mut Vec<Violation>) {
    let days = grid.days_in_month();
    for run_end in 1..=days {
        let Some(run_length) = night_run_ending(grid, person.id, run_end) else {
            continue;
        };
        for day in rest_days_after(run_end, run_length, days) {
            let rested = grid.slot(day, person.id).is_some_and(|s| !s.is_shift());
            if !rested {
                out.push(Violation::MandatoryLeaveMissing {
                    person: person.id,
                    name: person.name.clone(),
                    day,
                    run_end,
                    run_length,
                });
            }
        }
    }
}

fn check_quotas(
    config: &RosterConfig,
    person: &Person,
    grid: &RosterGrid,
    out: &mut Vec<Violation>,
) {
    let quotas = [
        (
            QuotaKind::NightShifts,
            grid.count_slot(person.id, Shift::Night.into()),
            config.max_night_shifts,
        ),
        (
            QuotaKind::RegularLeave,
            grid.count_slot(person.id, Slot::REST),
            config.max_regular_leaves,
        ),
    ];
    for (kind, used, limit) in quotas {
        if used > limit {
            out.push(Violation::QuotaExceeded {
                person: person.id,
                name: person.name.clone(),
                kind,
                used,
                limit,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyRequirement, Month};
    use chrono::NaiveDate;

    fn september() -> RosterConfig {
        RosterConfig::new(Month::new(2025, 9).unwrap())
    }

    /// Grid meeting every day's default coverage with ids 100.. so personal
    /// checks on ids 1..10 start clean.
    fn covered_grid(config: &RosterConfig) -> (RosterGrid, Vec<Person>) {
        let mut grid = RosterGrid::new(config.month);
        let mut filler = Vec::new();
        for (day, date) in (1..).zip(config.month.dates()) {
            let requirement = daily_requirement(config, date);
            let mut next_id = 100;
            for shift in Shift::ALL {
                for _ in 0..requirement.get(shift) {
                    grid.set(day, next_id, shift.into());
                    next_id += 1;
                }
            }
        }
        for id in 100..107 {
            filler.push(Person::shift(id, format!("Filler {id}")));
        }
        (grid, filler)
    }

    fn personal(violations: &[Violation]) -> Vec<&Violation> {
        violations
            .iter()
            .filter(|v| v.category() == ViolationCategory::Personnel && v.person() == Some(1))
            .collect()
    }

    #[test]
    fn test_valid_input() {
        let config = september().with_public_holidays([5]);
        let people = vec![
            Person::shift(1, "Ani").with_requested_leaves([3]),
            Person::non_shift(2, "Budi").with_annual_leaves([4, 5]),
        ];
        assert!(validate_input(&config, &people).is_ok());
    }

    #[test]
    fn test_duplicate_person_id() {
        let people = vec![Person::shift(1, "Ani"), Person::shift(1, "Budi")];
        let errors = validate_input(&september(), &people).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_out_of_month_days() {
        let date = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        let config = september()
            .with_public_holidays([31])
            .with_special_date(date, DailyRequirement::WEEKDAY);
        let people = vec![Person::shift(1, "Ani").with_extra_leaves([0, 31])];

        let errors = validate_input(&config, &people).unwrap_err();
        let out_of_range = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::DayOutOfRange)
            .count();
        assert_eq!(out_of_range, 3);
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DateOutOfMonth));
    }

    #[test]
    fn test_conflicting_leave() {
        let people = vec![Person::shift(1, "Ani")
            .with_requested_leaves([7])
            .with_extra_leaves([7])
            .with_annual_leaves([7])];
        let errors = validate_input(&september(), &people).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::ConflictingLeave);
    }

    #[test]
    fn test_empty_grid_reports_every_shortage() {
        let config = september();
        let people = vec![Person::shift(1, "Ani")];
        let grid = RosterGrid::new(config.month);
        let violations = validate_schedule(&config, &people, &grid);
        assert_eq!(violations.len(), 30 * 3);
        assert!(violations
            .iter()
            .all(|v| v.category() == ViolationCategory::Coverage));
        assert_eq!(
            violations[0].to_string(),
            "Day 1: P shift shortage - need 1, have 0"
        );
    }

    #[test]
    fn test_surplus_is_not_a_violation() {
        let config = september();
        let (mut grid, mut people) = covered_grid(&config);
        grid.set(3, 200, Shift::Morning.into());
        people.push(Person::shift(200, "Extra"));
        let violations = validate_schedule(&config, &people, &grid);
        assert!(violations
            .iter()
            .all(|v| v.category() != ViolationCategory::Coverage));
    }

    #[test]
    fn test_coverage_ignores_unknown_people() {
        let config = september();
        let (grid, people) = covered_grid(&config);
        let without_first = &people[1..];
        let violations = validate_schedule(&config, without_first, &grid);
        assert!(violations
            .iter()
            .any(|v| matches!(v, Violation::Coverage { shift: Shift::Morning, actual: 0, .. })));
    }

    #[test]
    fn test_sequence_violations() {
        let config = september();
        let people = vec![Person::shift(1, "Ani")];
        let mut grid = RosterGrid::new(config.month);
        grid.set(1, 1, Shift::Night.into());
        grid.set(2, 1, Shift::Morning.into());
        grid.set(10, 1, Shift::Afternoon.into());
        grid.set(11, 1, Shift::Morning.into());
        // Leave between shifts exempts the pair.
        grid.set(20, 1, Shift::Night.into());
        grid.set(21, 1, Leave::Regular.into());
        grid.set(22, 1, Shift::Morning.into());

        let violations = validate_schedule(&config, &people, &grid);
        let sequences: Vec<_> = violations
            .iter()
            .filter_map(|v| match v {
                Violation::Sequence { day, from, to, .. } => Some((*day, *from, *to)),
                _ => None,
            })
            .collect();
        assert_eq!(
            sequences,
            vec![
                (2, Shift::Night, Shift::Morning),
                (11, Shift::Afternoon, Shift::Morning)
            ]
        );
    }

    #[test]
    fn test_consecutive_nights_reported_per_excess_day() {
        let config = september().with_max_night_shifts(20);
        let people = vec![Person::shift(1, "Ani")];
        let mut grid = RosterGrid::new(config.month);
        for day in 3..=6 {
            grid.set(day, 1, Shift::Night.into());
        }

        let violations = validate_schedule(&config, &people, &grid);
        let runs: Vec<_> = violations
            .iter()
            .filter_map(|v| match v {
                Violation::ConsecutiveNights {
                    first_day,
                    last_day,
                    ..
                } => Some((*first_day, *last_day)),
                _ => None,
            })
            .collect();
        assert_eq!(runs, vec![(3, 5), (3, 6)]);
        let message = violations
            .iter()
            .find(|v| matches!(v, Violation::ConsecutiveNights { last_day: 6, .. }))
            .unwrap()
            .to_string();
        assert_eq!(message, "More than 2 consecutive nights: days 3-6 (4 nights)");
    }

    #[test]
    fn test_consecutive_work() {
        let config = september();
        let people = vec![Person::shift(1, "Ani")];
        let mut grid = RosterGrid::new(config.month);
        for day in 1..=6 {
            grid.set(day, 1, Shift::Morning.into());
        }
        grid.set(7, 1, Leave::Regular.into());
        for day in 8..=12 {
            grid.set(day, 1, Shift::Afternoon.into());
        }

        let violations = validate_schedule(&config, &people, &grid);
        let work: Vec<_> = violations
            .iter()
            .filter(|v| matches!(v, Violation::ConsecutiveWork { .. }))
            .collect();
        assert_eq!(work.len(), 1);
        assert_eq!(work[0].day(), Some(6));
    }

    #[test]
    fn test_mandatory_leave_after_single_and_double_nights() {
        let config = september();
        let (mut grid, mut people) = covered_grid(&config);
        people.insert(0, Person::shift(1, "Ani"));
        // Single night on 4th, rest on 5th: fine.
        grid.set(4, 1, Shift::Night.into());
        grid.set(5, 1, Leave::Regular.into());
        // Double night 10-11: rest 12 is annual leave (fine), 13 is empty.
        grid.set(10, 1, Shift::Night.into());
        grid.set(11, 1, Shift::Night.into());
        grid.set(12, 1, Leave::Annual.into());
        // Double night 20-21, worked on 22.
        grid.set(20, 1, Shift::Night.into());
        grid.set(21, 1, Shift::Night.into());
        grid.set(22, 1, Shift::Morning.into());

        let violations = validate_schedule(&config, &people, &grid);
        let missing: Vec<_> = personal(&violations)
            .into_iter()
            .filter_map(|v| match v {
                Violation::MandatoryLeaveMissing {
                    day,
                    run_end,
                    run_length,
                    ..
                } => Some((*day, *run_end, *run_length)),
                _ => None,
            })
            .collect();
        assert_eq!(missing, vec![(13, 11, 2), (22, 21, 2), (23, 21, 2)]);
    }

    #[test]
    fn test_rest_beyond_month_end_not_required() {
        let config = september();
        let people = vec![Person::shift(1, "Ani")];
        let mut grid = RosterGrid::new(config.month);
        grid.set(29, 1, Shift::Night.into());
        grid.set(30, 1, Shift::Night.into());
        let violations = validate_schedule(&config, &people, &grid);
        assert!(personal(&violations).is_empty());
    }

    #[test]
    fn test_quota_overruns() {
        let config = september()
            .with_max_night_shifts(1)
            .with_max_regular_leaves(1);
        let people = vec![Person::shift(1, "Ani")];
        let mut grid = RosterGrid::new(config.month);
        grid.set(1, 1, Shift::Night.into());
        grid.set(2, 1, Leave::Regular.into());
        grid.set(5, 1, Shift::Night.into());
        grid.set(6, 1, Leave::Regular.into());
        // Extra/annual leave do not count toward the regular quota.
        grid.set(9, 1, Leave::Extra.into());

        let violations = validate_schedule(&config, &people, &grid);
        let quotas: Vec<String> = personal(&violations)
            .into_iter()
            .filter(|v| matches!(v, Violation::QuotaExceeded { .. }))
            .map(|v| v.to_string())
            .collect();
        assert_eq!(
            quotas,
            vec![
                "Exceeded night shift limit: 2/1",
                "Exceeded regular leave limit: 2/1"
            ]
        );
    }

    #[test]
    fn test_validation_is_repeatable() {
        let config = september();
        let people = vec![Person::shift(1, "Ani")];
        let mut grid = RosterGrid::new(config.month);
        grid.set(1, 1, Shift::Night.into());
        grid.set(2, 1, Shift::Afternoon.into());
        let first = validate_schedule(&config, &people, &grid);
        let second = validate_schedule(&config, &people, &grid);
        assert_eq!(first, second);
    }
}
