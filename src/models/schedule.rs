//! Public schedule model.
//!
//! The externally exposed roster shape: for each ISO date, three id lists
//! keyed `P`, `S` and `M`. Leave is not carried; consumers re-derive it
//! from each person's leave sets.
//!
//! ```json
//! { "2025-09-01": { "P": [1], "S": [2, 3], "M": [4, 5] } }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{PersonId, Shift};
use crate::error::RosterError;

/// Shift assignments for one date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRoster {
    /// Morning (P) personnel.
    #[serde(rename = "P")]
    pub morning: Vec<PersonId>,
    /// Afternoon (S) personnel.
    #[serde(rename = "S")]
    pub afternoon: Vec<PersonId>,
    /// Night (M) personnel.
    #[serde(rename = "M")]
    pub night: Vec<PersonId>,
}

/// A complete roster in wire shape, keyed by date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicSchedule {
    days: BTreeMap<NaiveDate, DayRoster>,
}

impl DayRoster {
    /// Personnel on a shift.
    pub fn get(&self, shift: Shift) -> &[PersonId] {
        match shift {
            Shift::Morning => &self.morning,
            Shift::Afternoon => &self.afternoon,
            Shift::Night => &self.night,
        }
    }

    pub fn get_mut(&mut self, shift: Shift) -> &mut Vec<PersonId> {
        match shift {
            Shift::Morning => &mut self.morning,
            Shift::Afternoon => &mut self.afternoon,
            Shift::Night => &mut self.night,
        }
    }

    /// First shift (in P, S, M order) listing the person.
    pub fn shift_of(&self, person: PersonId) -> Option<Shift> {
        Shift::ALL
            .into_iter()
            .find(|&shift| self.get(shift).contains(&person))
    }

    /// Number of assignments across all shifts.
    pub fn total(&self) -> usize {
        self.morning.len() + self.afternoon.len() + self.night.len()
    }
}

impl PublicSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the roster for a date.
    pub fn insert(&mut self, date: NaiveDate, roster: DayRoster) {
        self.days.insert(date, roster);
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayRoster> {
        self.days.get(&date)
    }

    /// Dates and rosters in date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &DayRoster)> {
        self.days.iter().map(|(date, roster)| (*date, roster))
    }

    /// Number of dates.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Shift held by a person on a date, if any.
    pub fn shift_of(&self, date: NaiveDate, person: PersonId) -> Option<Shift> {
        self.get(date).and_then(|roster| roster.shift_of(person))
    }

    /// Serializes to the wire JSON shape.
    pub fn to_json(&self) -> Result<String, RosterError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
