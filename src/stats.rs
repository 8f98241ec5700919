//! Roster workload statistics.
//!
//! Computes per-person workload and per-day coverage from a public
//! schedule. Leave is not part of the public shape, so leave counts come
//! from each person's pre-booked sets, with the same precedence as the
//! export (a shift on the day wins, then L, LT, CT).
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Morning / Afternoon / Night | Days on that shift list |
//! | Leave / Extra / Annual | Days off with that booking |
//! | Day coverage | P, S, M head counts and their total per date |

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{Leave, Person, PersonId, PublicSchedule, Shift};

/// Workload totals for one person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonnelStats {
    pub id: PersonId,
    pub name: String,
    pub morning: u32,
    pub afternoon: u32,
    pub night: u32,
    pub leave: u32,
    pub extra_leave: u32,
    pub annual_leave: u32,
}

impl PersonnelStats {
    /// Total shift assignments.
    pub fn total_shifts(&self) -> u32 {
        self.morning + self.afternoon + self.night
    }
}

/// Head counts for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCoverage {
    pub date: NaiveDate,
    #[serde(rename = "P")]
    pub morning: usize,
    #[serde(rename = "S")]
    pub afternoon: usize,
    #[serde(rename = "M")]
    pub night: usize,
    pub total: usize,
}

/// Workload and coverage summary of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterStats {
    /// One entry per person, in personnel order.
    pub personnel: Vec<PersonnelStats>,
    /// One entry per scheduled date, in date order.
    pub coverage: Vec<DayCoverage>,
}

impl RosterStats {
    /// Computes statistics for every date present in `schedule`.
    pub fn calculate(schedule: &PublicSchedule, people: &[Person]) -> Self {
        let mut personnel: Vec<PersonnelStats> = people
            .iter()
            .map(|p| PersonnelStats {
                id: p.id,
                name: p.name.clone(),
                ..PersonnelStats::default()
            })
            .collect();

        for (date, roster) in schedule.iter() {
            for (person, stats) in people.iter().zip(personnel.iter_mut()) {
                let counter = match roster.shift_of(person.id) {
                    Some(Shift::Morning) => &mut stats.morning,
                    Some(Shift::Afternoon) => &mut stats.afternoon,
                    Some(Shift::Night) => &mut stats.night,
                    None => match person.booked_leave_on(date.day()) {
                        Some(Leave::Regular) => &mut stats.leave,
                        Some(Leave::Extra) => &mut stats.extra_leave,
                        Some(Leave::Annual) => &mut stats.annual_leave,
                        None => continue,
                    },
                };
                *counter += 1;
            }
        }

        let coverage = schedule
            .iter()
            .map(|(date, roster)| DayCoverage {
                date,
                morning: roster.morning.len(),
                afternoon: roster.afternoon.len(),
                night: roster.night.len(),
                total: roster.total(),
            })
            .collect();

        Self {
            personnel,
            coverage,
        }
    }

    /// Stats for one person.
    pub fn for_person(&self, id: PersonId) -> Option<&PersonnelStats> {
        self.personnel.iter().find(|s| s.id == id)
    }

    /// Largest minus smallest shift total among the given people.
    pub fn workload_spread(&self, ids: impl IntoIterator<Item = PersonId>) -> u32 {
        let totals: Vec<u32> = ids
            .into_iter()
            .filter_map(|id| self.for_person(id))
            .map(PersonnelStats::total_shifts)
            .collect();
        match (totals.iter().max(), totals.iter().min()) {
            (Some(max), Some(min)) => max - min,
            _ => 0,
        }
    }
}
