//! Schedule utilities.
//!
//! Pure queries and small mutations over a [`RosterGrid`]: coverage
//! lookup, workload-biased personnel ordering, leave placement and the
//! Night-run helpers shared by the checker, generator and validator.

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{DailyRequirement, Leave, Person, PersonId, RosterConfig, RosterGrid};

/// Longest Night run a person may work.
pub const MAX_CONSECUTIVE_NIGHTS: u32 = 2;
/// Longest run of working days a person may work.
pub const MAX_CONSECUTIVE_WORKDAYS: u32 = 5;

/// Required head counts for a date.
///
/// Special-date override, else weekend/holiday default, else weekday default.
pub fn daily_requirement(config: &RosterConfig, date: NaiveDate) -> DailyRequirement {
    if let Some(requirement) = config.special_requirement(date) {
        return requirement;
    }
    if config.is_weekend_or_holiday(date) {
        DailyRequirement::WEEKEND_OR_HOLIDAY
    } else {
        DailyRequirement::WEEKDAY
    }
}

/// Orders personnel by assigned-shift count, lightest first.
///
/// The list is shuffled, then stably sorted on `workload + jitter` with
/// jitter in `[0, 2)`. Workloads two or more apart always sort ascending;
/// workloads within one of each other end up in random relative order.
pub fn workload_order<'p, R: Rng>(
    people: &'p [Person],
    grid: &RosterGrid,
    rng: &mut R,
) -> Vec<&'p Person> {
    let mut keyed: Vec<(f64, &Person)> = people
        .iter()
        .map(|p| (grid.total_shifts(p.id) as f64, p))
        .collect();
    keyed.shuffle(rng);
    for entry in &mut keyed {
        entry.0 += rng.random_range(0.0..2.0);
    }
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, p)| p).collect()
}

/// Writes a leave slot if `day` lies in the grid's month.
///
/// Returns whether the slot was written.
pub fn place_leave(grid: &mut RosterGrid, day: u32, person: PersonId, leave: Leave) -> bool {
    if !grid.contains_day(day) {
        return false;
    }
    grid.set(day, person, leave.into());
    true
}

/// Consecutive Night days immediately before `day`, counting back at most `limit`.
pub fn nights_before(grid: &RosterGrid, person: PersonId, day: u32, limit: u32) -> u32 {
    (1..=limit)
        .take_while(|&back| day > back && grid.is_night(day - back, person))
        .count() as u32
}

/// Consecutive working days immediately before `day`, counting back at most `limit`.
pub fn workdays_before(grid: &RosterGrid, person: PersonId, day: u32, limit: u32) -> u32 {
    (1..=limit)
        .take_while(|&back| day > back && grid.shift(day - back, person).is_some())
        .count() as u32
}

/// Length of the Night run ending on `day`, if one ends there.
///
/// A run ends on `day` when the person works Night that day and not the
/// next (or the month ends). The length looks back at most two days.
pub fn night_run_ending(grid: &RosterGrid, person: PersonId, day: u32) -> Option<u32> {
    if !grid.is_night(day, person) || grid.is_night(day + 1, person) {
        return None;
    }
    Some(1 + nights_before(grid, person, day, MAX_CONSECUTIVE_NIGHTS))
}

/// Rest days owed after a Night run: two after a double, one after a single.
#[inline]
pub fn required_rest_days(run_length: u32) -> u32 {
    if run_length >= 2 {
        2
    } else {
        1
    }
}

/// In-month rest days owed after a Night run ending on `run_end`.
pub fn rest_days_after(
    run_end: u32,
    run_length: u32,
    days_in_month: u32,
) -> impl Iterator<Item = u32> {
    (run_end + 1..=run_end + required_rest_days(run_length)).filter(move |&d| d <= days_in_month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Month, Shift, Slot};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn september() -> RosterConfig {
        RosterConfig::new(Month::new(2025, 9).unwrap()).with_public_holidays([5])
    }

    #[test]
    fn test_weekday_requirement() {
        let config = september();
        // 2025-09-03 is a Wednesday.
        let req = daily_requirement(&config, config.month.date(3).unwrap());
        assert_eq!(req, DailyRequirement::new(1, 2, 2));
        assert_eq!(req.total(), 5);
    }

    #[test]
    fn test_weekend_and_holiday_requirement() {
        let config = september();
        let saturday = daily_requirement(&config, config.month.date(6).unwrap());
        let holiday = daily_requirement(&config, config.month.date(5).unwrap());
        assert_eq!(saturday, DailyRequirement::new(2, 2, 3));
        assert_eq!(holiday.total(), 7);
    }

    #[test]
    fn test_special_override_beats_defaults() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 2).unwrap();
        let config = september().with_special_date(date, DailyRequirement::new(2, 2, 3));
        assert_eq!(
            daily_requirement(&config, date),
            DailyRequirement::new(2, 2, 3)
        );

        // Overrides apply on weekends as well.
        let sunday = NaiveDate::from_ymd_opt(2025, 9, 7).unwrap();
        let config = config.with_special_date(sunday, DailyRequirement::new(1, 1, 1));
        assert_eq!(daily_requirement(&config, sunday).total(), 3);
    }

    #[test]
    fn test_workload_order_separates_distinct_loads() {
        let people: Vec<Person> = (1..=4).map(|id| Person::shift(id, format!("P{id}"))).collect();
        let mut grid = RosterGrid::new(Month::new(2025, 9).unwrap());
        // Person 1 works 6 days, person 2 works 3, persons 3 and 4 none.
        for day in 1..=6 {
            grid.set(day, 1, Shift::Morning.into());
        }
        for day in 1..=3 {
            grid.set(day, 2, Shift::Afternoon.into());
        }

        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            let order: Vec<PersonId> = workload_order(&people, &grid, &mut rng)
                .iter()
                .map(|p| p.id)
                .collect();
            assert_eq!(order.len(), 4);
            assert_eq!(order[2], 2);
            assert_eq!(order[3], 1);
        }
    }

    #[test]
    fn test_workload_order_mixes_ties() {
        let people: Vec<Person> = (1..=6).map(|id| Person::shift(id, format!("P{id}"))).collect();
        let grid = RosterGrid::new(Month::new(2025, 9).unwrap());
        let mut rng = SmallRng::seed_from_u64(7);

        let firsts: std::collections::HashSet<PersonId> = (0..40)
            .map(|_| workload_order(&people, &grid, &mut rng)[0].id)
            .collect();
        assert!(firsts.len() > 1);
    }

    #[test]
    fn test_place_leave_in_range_only() {
        let mut grid = RosterGrid::new(Month::new(2025, 9).unwrap());
        assert!(place_leave(&mut grid, 30, 1, Leave::Annual));
        assert!(!place_leave(&mut grid, 31, 1, Leave::Annual));
        assert!(!place_leave(&mut grid, 0, 1, Leave::Annual));
        assert_eq!(grid.slot(30, 1), Some(Slot::Leave(Leave::Annual)));
    }

    #[test]
    fn test_night_run_helpers() {
        let mut grid = RosterGrid::new(Month::new(2025, 9).unwrap());
        grid.set(4, 1, Shift::Night.into());
        grid.set(5, 1, Shift::Night.into());
        grid.set(9, 1, Shift::Night.into());
        grid.set(30, 1, Shift::Night.into());

        assert_eq!(night_run_ending(&grid, 1, 4), None);
        assert_eq!(night_run_ending(&grid, 1, 5), Some(2));
        assert_eq!(night_run_ending(&grid, 1, 9), Some(1));
        assert_eq!(night_run_ending(&grid, 1, 30), Some(1));
        assert_eq!(night_run_ending(&grid, 1, 6), None);

        assert_eq!(nights_before(&grid, 1, 6, 3), 2);
        assert_eq!(nights_before(&grid, 1, 1, 3), 0);

        assert_eq!(rest_days_after(5, 2, 30).collect::<Vec<_>>(), vec![6, 7]);
        assert_eq!(rest_days_after(9, 1, 30).collect::<Vec<_>>(), vec![10]);
        assert!(rest_days_after(30, 1, 30).next().is_none());
    }

    #[test]
    fn test_workdays_before() {
        let mut grid = RosterGrid::new(Month::new(2025, 9).unwrap());
        for day in 1..=5 {
            grid.set(day, 1, Shift::Morning.into());
        }
        grid.set(3, 2, Leave::Regular.into());
        grid.set(4, 2, Shift::Morning.into());

        assert_eq!(workdays_before(&grid, 1, 6, 6), 5);
        assert_eq!(workdays_before(&grid, 1, 6, 3), 3);
        assert_eq!(workdays_before(&grid, 2, 5, 6), 1);
    }
}
