//! Working roster grid.
//!
//! The mutable arena a single generation attempt fills in: one cell per
//! (day, person), each holding at most one [`Slot`]. An absent cell means
//! "unassigned". A grid is owned by exactly one attempt and is rebuilt
//! from scratch for the next one; helpers borrow it for the duration of a
//! call and never keep a copy.

use std::collections::BTreeMap;

use super::{DayRoster, Month, PersonId, PublicSchedule, Shift, Slot};

/// Per-attempt roster arena keyed by (day, person id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterGrid {
    month: Month,
    /// Index `day - 1` holds that day's cells.
    cells: Vec<BTreeMap<PersonId, Slot>>,
}

impl RosterGrid {
    /// Creates an empty grid with one entry per date of the month.
    pub fn new(month: Month) -> Self {
        Self {
            month,
            cells: vec![BTreeMap::new(); month.days_in_month() as usize],
        }
    }

    #[inline]
    pub fn month(&self) -> Month {
        self.month
    }

    #[inline]
    pub fn days_in_month(&self) -> u32 {
        self.cells.len() as u32
    }

    /// Whether `day` is a day number of the month.
    #[inline]
    pub fn contains_day(&self, day: u32) -> bool {
        day >= 1 && day <= self.days_in_month()
    }

    fn cells_of(&self, day: u32) -> Option<&BTreeMap<PersonId, Slot>> {
        if self.contains_day(day) {
            self.cells.get(day as usize - 1)
        } else {
            None
        }
    }

    /// Slot held by a person on a day. Out-of-range days are empty.
    pub fn slot(&self, day: u32, person: PersonId) -> Option<Slot> {
        self.cells_of(day)?.get(&person).copied()
    }

    /// Shift held by a person on a day, ignoring leave.
    pub fn shift(&self, day: u32, person: PersonId) -> Option<Shift> {
        self.slot(day, person).and_then(Slot::shift)
    }

    /// Whether a person holds a Night shift on a day.
    #[inline]
    pub fn is_night(&self, day: u32, person: PersonId) -> bool {
        self.shift(day, person) == Some(Shift::Night)
    }

    /// Writes a slot, returning the slot it replaced.
    ///
    /// Days outside the month are ignored.
    pub fn set(&mut self, day: u32, person: PersonId, slot: Slot) -> Option<Slot> {
        if !self.contains_day(day) {
            return None;
        }
        self.cells[day as usize - 1].insert(person, slot)
    }

    /// Cells of a day in person-id order.
    pub fn day(&self, day: u32) -> impl Iterator<Item = (PersonId, Slot)> + '_ {
        self.cells_of(day)
            .into_iter()
            .flat_map(|cells| cells.iter().map(|(id, slot)| (*id, *slot)))
    }

    /// Occurrences of a slot for a person across the month.
    pub fn count_slot(&self, person: PersonId, slot: Slot) -> u32 {
        self.cells
            .iter()
            .filter(|cells| cells.get(&person) == Some(&slot))
            .count() as u32
    }

    /// Total shift-category assignments for a person.
    pub fn total_shifts(&self, person: PersonId) -> u32 {
        self.cells
            .iter()
            .filter(|cells| cells.get(&person).is_some_and(|s| s.is_shift()))
            .count() as u32
    }

    /// Personnel holding a shift on a day, in id order.
    pub fn assigned(&self, day: u32, shift: Shift) -> Vec<PersonId> {
        self.day(day)
            .filter(|(_, slot)| *slot == Slot::Shift(shift))
            .map(|(id, _)| id)
            .collect()
    }

    /// Number of personnel holding a shift on a day.
    pub fn assigned_count(&self, day: u32, shift: Shift) -> u32 {
        self.day(day)
            .filter(|(_, slot)| *slot == Slot::Shift(shift))
            .count() as u32
    }

    /// Projects the grid onto the public schedule shape, dropping leave.
    pub fn to_public(&self) -> PublicSchedule {
        let mut schedule = PublicSchedule::new();
        for day in 1..=self.days_in_month() {
            let Some(date) = self.month.date(day) else {
                continue;
            };
            let mut roster = DayRoster::default();
            for (id, slot) in self.day(day) {
                if let Some(shift) = slot.shift() {
                    roster.get_mut(shift).push(id);
                }
            }
            schedule.insert(date, roster);
        }
        schedule
    }
}
