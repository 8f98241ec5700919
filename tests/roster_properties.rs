//! End-to-end checks on generated rosters.

use shift_roster::export::RosterSheet;
use shift_roster::import::{accept_schedule, import_schedule};
use shift_roster::models::{
    DailyRequirement, Month, Person, Role, RosterConfig, RosterGrid, Shift, Slot, Violation,
};
use shift_roster::roster::{utils, GeneratorOptions, ScheduleGenerator};
use shift_roster::stats::RosterStats;
use shift_roster::validation::{validate_input, validate_schedule};

fn september() -> RosterConfig {
    let month = Month::new(2025, 9).unwrap();
    RosterConfig::new(month)
        .with_public_holidays([5])
        .with_special_date(month.date(20).unwrap(), DailyRequirement::new(2, 2, 3))
}

fn staff() -> Vec<Person> {
    let mut people: Vec<Person> = (1..=14)
        .map(|id| Person::shift(id, format!("Staff {id}")))
        .collect();
    people[0] = people[0].clone().with_requested_leaves([3, 4]);
    people[1] = people[1].clone().with_extra_leaves([10]);
    people[2] = people[2].clone().with_annual_leaves([15, 16, 17]);
    people.push(Person::non_shift(99, "Office").with_annual_leaves([22]));
    people
}

fn generate(seed: u64) -> (RosterConfig, Vec<Person>, shift_roster::roster::GenerationOutcome) {
    let config = september();
    let people = staff();
    let options = GeneratorOptions::default().with_seed(seed);
    let outcome = ScheduleGenerator::from_options(&config, &people, options)
        .generate()
        .unwrap();
    (config, people, outcome)
}

#[test]
fn test_input_is_clean() {
    assert!(validate_input(&september(), &staff()).is_ok());
}

#[test]
fn test_one_slot_per_person_per_day() {
    let (config, people, outcome) = generate(11);
    for date in config.month.dates() {
        let day = outcome.schedule.get(date).unwrap();
        for person in &people {
            let lists = Shift::ALL
                .iter()
                .filter(|&&shift| day.get(shift).contains(&person.id))
                .count();
            assert!(lists <= 1, "{} on {date}", person.name);
        }
    }
}

#[test]
fn test_non_shift_only_on_weekday_mornings() {
    let (config, _, outcome) = generate(12);
    for (date, day) in outcome.schedule.iter() {
        assert!(!day.afternoon.contains(&99));
        assert!(!day.night.contains(&99));
        if day.morning.contains(&99) {
            assert!(!config.is_weekend_or_holiday(date));
        }
    }
}

#[test]
fn test_protected_leave_never_overwritten() {
    let (_, people, outcome) = generate(13);
    for person in &people {
        for &day in person.extra_leaves.iter().chain(&person.annual_leaves) {
            let slot = outcome.grid.slot(day, person.id);
            assert!(
                matches!(slot, Some(Slot::Leave(_))),
                "{} day {day}: {slot:?}",
                person.name
            );
        }
    }
}

#[test]
fn test_reported_violations_match_revalidation() {
    let (config, people, outcome) = generate(14);
    assert_eq!(validate_schedule(&config, &people, &outcome.grid), outcome.violations);
}

#[test]
fn test_perfect_roster_meets_every_requirement() {
    let (config, _, outcome) = generate(15);
    if !outcome.is_perfect() {
        return;
    }
    for date in config.month.dates() {
        let required = utils::daily_requirement(&config, date);
        let day = outcome.schedule.get(date).unwrap();
        for shift in Shift::ALL {
            assert_eq!(day.get(shift).len() as u32, required.get(shift), "{date} {shift}");
        }
    }
}

#[test]
fn test_sequence_law_holds_without_sequence_violations() {
    let (config, people, outcome) = generate(16);
    let has_sequence_violation = outcome
        .violations
        .iter()
        .any(|v| matches!(v, Violation::Sequence { .. }));
    if has_sequence_violation {
        return;
    }
    for person in &people {
        for day in 2..=config.month.days_in_month() {
            if let (Some(prev), Some(next)) =
                (outcome.grid.shift(day - 1, person.id), outcome.grid.shift(day, person.id))
            {
                assert!(prev.allows_next(next), "{} {prev}->{next} on {day}", person.name);
            }
        }
    }
}

#[test]
fn test_export_import_round_trip() {
    let (config, people, outcome) = generate(17);
    let json = outcome.schedule.to_json().unwrap();
    let imported = import_schedule(&json, &config, &people).unwrap();

    assert_eq!(imported.schedule, outcome.schedule);
    let accepted = accept_schedule(outcome.schedule.clone(), &config, &people);
    assert_eq!(accepted.violations, imported.violations);
}

#[test]
fn test_stats_and_sheet_cover_everyone() {
    let (config, people, outcome) = generate(18);
    let stats = RosterStats::calculate(&outcome.schedule, &people);
    assert_eq!(stats.coverage.len(), 30);

    let assigned: usize = stats.coverage.iter().map(|c| c.total).sum();
    let counted: u32 = stats.personnel.iter().map(|p| p.total_shifts()).sum();
    assert_eq!(assigned, counted as usize);

    let sheet = RosterSheet::build(config.month, &outcome.schedule, &people);
    let shift_rows = people.iter().filter(|p| p.role == Role::Shift).count();
    assert_eq!(sheet.rows.len(), shift_rows + 2);
}

#[test]
fn test_special_date_requirement_applies() {
    let config = september();
    let date = config.month.date(20).unwrap();
    let req = utils::daily_requirement(&config, date);
    assert_eq!((req.morning, req.afternoon, req.night), (2, 2, 3));
    assert_eq!(req.total(), 7);
}

#[test]
fn test_hand_built_night_run_needs_rest() {
    let config = september();
    let people = vec![Person::shift(1, "Ani")];
    let mut grid = RosterGrid::new(config.month);
    grid.set(10, 1, Slot::Shift(Shift::Night));
    grid.set(11, 1, Slot::Shift(Shift::Night));
    grid.set(12, 1, Slot::Shift(Shift::Morning));

    let violations = validate_schedule(&config, &people, &grid);
    let rest_days: Vec<u32> = violations
        .iter()
        .filter_map(|v| match v {
            Violation::MandatoryLeaveMissing { day, .. } => Some(*day),
            _ => None,
        })
        .collect();
    assert_eq!(rest_days, vec![12, 13]);
    assert!(violations
        .iter()
        .any(|v| matches!(v, Violation::Sequence { day: 12, .. })));
}
