//! Workload-balancing candidate selection.
//!
//! # Scoring
//! Among eligible `shift`-role candidates the lowest score wins:
//!
//! | Term | Value |
//! |------|-------|
//! | Total shifts | ×5 |
//! | Shifts of the requested kind | ×8 |
//! | Night, ≤1 night left | +500 |
//! | Night, ≤3 nights left | +50 |
//! | Night, otherwise | +10 × nights worked |
//! | Non-night, ≤1 night left | −10 |
//! | Non-night, ≥6 nights left | +5 |
//! | Jitter | uniform `[0, 3)` |
//!
//! Exact ties keep candidate order. When no `shift`-role candidate is
//! eligible, a weekday Morning falls back to the first eligible
//! `non_shift` candidate.
//!
//! # Emergency relaxation
//! [`PersonnelSelector::find_emergency_night`] is used only for Night slots
//! nobody normally qualifies for. It may exceed the night quota by one,
//! and in a second pass the five-day work limit by one, but never
//! double-books a day, breaks shift sequencing or allows a third night.

use rand::Rng;
use tracing::trace;

use super::checker::ConstraintChecker;
use super::utils::{workdays_before, MAX_CONSECUTIVE_WORKDAYS};
use crate::models::{Person, RosterConfig, RosterGrid, Shift};

/// Upper bound (exclusive) of the random tie-breaking jitter.
pub const SCORE_JITTER: f64 = 3.0;

/// Picks personnel for slots of a borrowed grid.
#[derive(Debug, Clone, Copy)]
pub struct PersonnelSelector<'a> {
    checker: ConstraintChecker<'a>,
    grid: &'a RosterGrid,
}

impl<'a> PersonnelSelector<'a> {
    pub fn new(config: &'a RosterConfig, people: &'a [Person], grid: &'a RosterGrid) -> Self {
        Self::with_checker(grid, ConstraintChecker::new(config, people, grid))
    }

    /// Uses a pre-configured checker over the same grid.
    pub fn with_checker(grid: &'a RosterGrid, checker: ConstraintChecker<'a>) -> Self {
        Self { checker, grid }
    }

    /// Best eligible candidate for `shift` on `day`, if any.
    pub fn find_available<'p, R: Rng>(
        &self,
        day: u32,
        shift: Shift,
        candidates: &[&'p Person],
        has_night_capacity_margin: bool,
        rng: &mut R,
    ) -> Option<&'p Person> {
        let eligible: Vec<&'p Person> = candidates
            .iter()
            .copied()
            .filter(|p| p.is_shift_role())
            .filter(|p| {
                self.checker
                    .is_person_available(p, day, shift, has_night_capacity_margin)
            })
            .collect();

        if !eligible.is_empty() {
            return self.select_best(&eligible, shift, rng);
        }

        if shift == Shift::Morning && self.checker.is_regular_weekday(day) {
            let fallback = candidates.iter().copied().find(|p| {
                !p.is_shift_role()
                    && self
                        .checker
                        .is_person_available(p, day, shift, has_night_capacity_margin)
            });
            if fallback.is_some() {
                return fallback;
            }
        }

        trace!(day, %shift, "no eligible personnel");
        None
    }

    /// Lowest-scoring candidate; the first one wins exact ties.
    pub fn select_best<'p, R: Rng>(
        &self,
        candidates: &[&'p Person],
        shift: Shift,
        rng: &mut R,
    ) -> Option<&'p Person> {
        candidates
            .iter()
            .map(|p| {
                let jitter = rng.random_range(0.0..SCORE_JITTER);
                (self.base_score(p, shift) as f64 + jitter, *p)
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, p)| p)
    }

    /// Deterministic part of a candidate's score (lower is better).
    pub fn base_score(&self, person: &Person, shift: Shift) -> i64 {
        let total = i64::from(self.grid.total_shifts(person.id));
        let same_kind = i64::from(self.grid.count_slot(person.id, shift.into()));
        let nights = i64::from(self.grid.count_slot(person.id, Shift::Night.into()));
        let remaining = self.checker.remaining_nights(person);

        let mut score = total * 5 + same_kind * 8;
        if shift == Shift::Night {
            score += if remaining <= 1 {
                500
            } else if remaining <= 3 {
                50
            } else {
                nights * 10
            };
        } else if remaining <= 1 {
            score -= 10;
        } else if remaining >= 6 {
            score += 5;
        }
        score
    }

    /// Relaxed search for a Night slot nobody normally qualifies for.
    ///
    /// Pass one allows one night over quota; pass two additionally allows
    /// a sixth consecutive working day.
    pub fn find_emergency_night<'p>(
        &self,
        day: u32,
        candidates: &[&'p Person],
    ) -> Option<&'p Person> {
        let over_quota_ok = |p: &Person| self.checker.remaining_nights(p) > -1;
        let base_ok = |p: &Person| {
            p.is_shift_role()
                && self.grid.slot(day, p.id).is_none()
                && self.checker.is_valid_sequence(p, day, Shift::Night)
                && self
                    .checker
                    .is_within_max_consecutive_nights(p, day, Shift::Night)
                && over_quota_ok(p)
        };

        let relaxed_quota = candidates
            .iter()
            .copied()
            .find(|p| base_ok(p) && self.checker.is_within_max_consecutive_work(p, day));
        if relaxed_quota.is_some() {
            return relaxed_quota;
        }

        candidates.iter().copied().find(|p| {
            base_ok(p)
                && workdays_before(self.grid, p.id, day, MAX_CONSECUTIVE_WORKDAYS + 1)
                    <= MAX_CONSECUTIVE_WORKDAYS
        })
    }
}
