//! Per-slot eligibility rules.
//!
//! [`ConstraintChecker`] answers "may this person take this shift on this
//! day, given the grid as it stands?". It borrows the attempt's grid for
//! the duration of a query and holds no state of its own.
//!
//! # Rules
//! A candidate is refused when any of these hold:
//! 1. The cell is already occupied (shift or leave).
//! 2. A `non_shift` person is offered anything but a weekday Morning.
//! 3. Yesterday's shift forbids today's (M → M only; S → S/M only).
//! 4. A Night would reach the night quota.
//! 5. The person's regular leave already fills the leave quota.
//! 6. The person already worked the last five days.
//! 7. A Night would be the third in a row.
//! 8. A Night ending a run would owe rest on a day booked as LT/CT.
//! 9. Night capacity is tight and the person has at most one night left.

use chrono::NaiveDate;

use super::utils::{
    daily_requirement, nights_before, rest_days_after, workdays_before, MAX_CONSECUTIVE_NIGHTS,
    MAX_CONSECUTIVE_WORKDAYS,
};
use crate::models::{Person, Role, RosterConfig, RosterGrid, Shift, Slot};

/// Safety margin on projected night demand used by the horizon check.
pub const NIGHT_CAPACITY_MARGIN: f64 = 0.10;

/// Eligibility rules over a borrowed grid.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintChecker<'a> {
    config: &'a RosterConfig,
    people: &'a [Person],
    grid: &'a RosterGrid,
    night_margin: f64,
}

impl<'a> ConstraintChecker<'a> {
    pub fn new(config: &'a RosterConfig, people: &'a [Person], grid: &'a RosterGrid) -> Self {
        Self {
            config,
            people,
            grid,
            night_margin: NIGHT_CAPACITY_MARGIN,
        }
    }

    /// Overrides the horizon safety margin (fraction of remaining demand).
    pub fn with_night_margin(mut self, margin: f64) -> Self {
        self.night_margin = margin.max(0.0);
        self
    }

    fn date(&self, day: u32) -> Option<NaiveDate> {
        self.config.month.date(day)
    }

    /// Whether `person` may take `shift` on `day`.
    ///
    /// `has_night_capacity_margin` comes from
    /// [`has_future_night_capacity`](Self::has_future_night_capacity); when
    /// it is `false`, people with at most one night left are held back
    /// from Night duty.
    pub fn is_person_available(
        &self,
        person: &Person,
        day: u32,
        shift: Shift,
        has_night_capacity_margin: bool,
    ) -> bool {
        if self.grid.slot(day, person.id).is_some() {
            return false;
        }
        if !self.role_allows(person, day, shift) {
            return false;
        }

        let rules_hold = self.is_valid_sequence(person, day, shift)
            && self.is_within_night_limit(person, shift)
            && self.is_within_leave_limit(person)
            && self.is_within_max_consecutive_work(person, day)
            && self.is_within_max_consecutive_nights(person, day, shift)
            && self.can_take_mandatory_rest(person, day, shift);
        if !rules_hold {
            return false;
        }

        if shift == Shift::Night && !has_night_capacity_margin {
            return self.remaining_nights(person) > 1;
        }
        true
    }

    /// Whether the role permits `shift` on `day`.
    pub fn role_allows(&self, person: &Person, day: u32, shift: Shift) -> bool {
        match person.role {
            Role::Shift => true,
            Role::NonShift => shift == Shift::Morning && self.is_regular_weekday(day),
        }
    }

    /// Neither weekend nor public holiday.
    pub fn is_regular_weekday(&self, day: u32) -> bool {
        self.date(day)
            .is_some_and(|date| !self.config.is_weekend_or_holiday(date))
    }

    /// Yesterday's shift, if any, must allow `shift` today.
    pub fn is_valid_sequence(&self, person: &Person, day: u32, shift: Shift) -> bool {
        if day <= 1 {
            return true;
        }
        match self.grid.shift(day - 1, person.id) {
            Some(previous) => previous.allows_next(shift),
            None => true,
        }
    }

    /// Night shifts left before the quota is reached. May be negative.
    pub fn remaining_nights(&self, person: &Person) -> i64 {
        i64::from(self.config.max_night_shifts)
            - i64::from(self.grid.count_slot(person.id, Shift::Night.into()))
    }

    pub fn is_within_night_limit(&self, person: &Person, shift: Shift) -> bool {
        shift != Shift::Night || self.remaining_nights(person) > 0
    }

    pub fn is_within_leave_limit(&self, person: &Person) -> bool {
        self.grid.count_slot(person.id, Slot::REST) < self.config.max_regular_leaves
    }

    /// Fewer than five working days in a row end yesterday.
    pub fn is_within_max_consecutive_work(&self, person: &Person, day: u32) -> bool {
        workdays_before(self.grid, person.id, day, MAX_CONSECUTIVE_WORKDAYS)
            < MAX_CONSECUTIVE_WORKDAYS
    }

    /// A Night today would not make a third in a row.
    pub fn is_within_max_consecutive_nights(&self, person: &Person, day: u32, shift: Shift) -> bool {
        shift != Shift::Night
            || nights_before(self.grid, person.id, day, MAX_CONSECUTIVE_NIGHTS + 1)
                < MAX_CONSECUTIVE_NIGHTS
    }

    /// If a Night today ends a run, the owed rest days must not be booked
    /// as extra or annual leave.
    pub fn can_take_mandatory_rest(&self, person: &Person, day: u32, shift: Shift) -> bool {
        if shift != Shift::Night || self.grid.is_night(day + 1, person.id) {
            return true;
        }
        let run_length = 1 + nights_before(self.grid, person.id, day, MAX_CONSECUTIVE_NIGHTS);
        rest_days_after(day, run_length, self.grid.days_in_month()).all(|rest_day| {
            !self
                .grid
                .slot(rest_day, person.id)
                .and_then(Slot::leave)
                .is_some_and(|leave| leave.is_protected())
        })
    }

    /// Whether remaining night capacity covers remaining night demand.
    ///
    /// Demand is the Night head count from `day` to month end; capacity is
    /// the sum of unused night quota over `shift`-role personnel. Returns
    /// `true` when capacity reaches demand plus the safety margin.
    pub fn has_future_night_capacity(&self, day: u32) -> bool {
        let needed: u32 = (day..=self.grid.days_in_month())
            .filter_map(|d| self.date(d))
            .map(|date| daily_requirement(self.config, date).night)
            .sum();
        let capacity: i64 = self
            .people
            .iter()
            .filter(|p| p.is_shift_role())
            .map(|p| self.remaining_nights(p))
            .sum();
        let buffer = (f64::from(needed) * self.night_margin).ceil() as i64;
        capacity >= i64::from(needed) + buffer
    }
}
