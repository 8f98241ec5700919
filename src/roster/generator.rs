//! Multi-attempt randomized roster construction.
//!
//! # Algorithm
//!
//! Each attempt builds a fresh [`RosterGrid`]:
//!
//! 1. Place pre-booked leave (L, then LT, then CT; a later category
//!    overwrites an earlier one on the same day).
//! 2. For every day in order and every shift in order P, S, M, ask the
//!    [`PersonnelSelector`] for candidates until the daily requirement is
//!    met. An unfillable Night slot falls back to the emergency search; any
//!    other unfillable slot abandons the attempt.
//! 3. Propagate mandatory rest after every Night run until nothing changes
//!    (bounded number of passes). Rest overrides an assigned shift.
//! 4. Fill coverage gaps left by step 3 with relaxed sequencing checks.
//!
//! The finished grid is scored by [`validate_schedule`]. A zero-violation
//! attempt is returned immediately; otherwise the attempt with the fewest
//! violations is kept (earliest wins ties).
//!
//! # Randomness
//! Workload ordering and score jitter draw from the generator's RNG.
//! [`ScheduleGenerator::seeded`] gives reproducible runs.

use std::ops::ControlFlow;

use chrono::NaiveDate;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::checker::{ConstraintChecker, NIGHT_CAPACITY_MARGIN};
use super::selector::PersonnelSelector;
use super::utils::{
    daily_requirement, night_run_ending, place_leave, rest_days_after, workload_order,
};
use crate::error::RosterError;
use crate::models::{
    Leave, Person, PersonId, PublicSchedule, Role, RosterConfig, RosterGrid, Shift, Slot,
    Violation,
};
use crate::validation::validate_schedule;

/// Default attempt budget.
pub const DEFAULT_MAX_ATTEMPTS: usize = 20;
/// Default bound on mandatory-rest propagation passes.
pub const DEFAULT_MAX_PROPAGATION_PASSES: usize = 10;

/// Generator tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Attempts before giving up on a perfect roster.
    pub max_attempts: usize,
    /// Upper bound on mandatory-rest propagation passes per attempt.
    pub max_propagation_passes: usize,
    /// Safety margin on remaining night demand (fraction).
    pub night_safety_margin: f64,
    /// Fixed RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_propagation_passes: DEFAULT_MAX_PROPAGATION_PASSES,
            night_safety_margin: NIGHT_CAPACITY_MARGIN,
            seed: None,
        }
    }
}

impl GeneratorOptions {
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_max_propagation_passes(mut self, passes: usize) -> Self {
        self.max_propagation_passes = passes;
        self
    }

    pub fn with_night_safety_margin(mut self, margin: f64) -> Self {
        self.night_safety_margin = margin;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Progress notification, sent once per attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptProgress {
    /// 1-based attempt number.
    pub attempt: usize,
    pub max_attempts: usize,
    /// Violation count, or `None` if the attempt was abandoned.
    pub violations: Option<usize>,
}

/// A completed attempt and its score.
#[derive(Debug, Clone)]
pub struct AttemptResult {
    pub attempt: usize,
    pub grid: RosterGrid,
    pub violations: Vec<Violation>,
}

impl AttemptResult {
    #[inline]
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Keeps the result with fewer violations; the incumbent wins ties.
    pub fn keep_best(best: Option<Self>, candidate: Self) -> Self {
        match best {
            Some(best) if best.violation_count() <= candidate.violation_count() => best,
            _ => candidate,
        }
    }
}

/// Best roster found by a generation run.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Public projection of [`grid`](Self::grid).
    pub schedule: PublicSchedule,
    /// Residual violations; empty for a perfect roster.
    pub violations: Vec<Violation>,
    /// Attempt that produced the roster.
    pub attempt: usize,
    /// Full grid including leave slots.
    pub grid: RosterGrid,
}

impl GenerationOutcome {
    #[inline]
    pub fn is_perfect(&self) -> bool {
        self.violations.is_empty()
    }
}

impl From<AttemptResult> for GenerationOutcome {
    fn from(result: AttemptResult) -> Self {
        Self {
            schedule: result.grid.to_public(),
            violations: result.violations,
            attempt: result.attempt,
            grid: result.grid,
        }
    }
}

/// Randomized greedy roster generator.
///
/// # Example
///
/// ```
/// use shift_roster::models::{Month, Person, RosterConfig};
/// use shift_roster::roster::ScheduleGenerator;
///
/// let config = RosterConfig::new(Month::new(2025, 9).unwrap());
/// let people: Vec<Person> = (1..=12)
///     .map(|id| Person::shift(id, format!("Staff {id}")))
///     .collect();
///
/// let outcome = ScheduleGenerator::seeded(&config, &people, 42)
///     .generate()
///     .unwrap();
/// assert_eq!(outcome.schedule.len(), 30);
/// ```
#[derive(Debug)]
pub struct ScheduleGenerator<'a, R = SmallRng> {
    config: &'a RosterConfig,
    people: &'a [Person],
    options: GeneratorOptions,
    rng: R,
}

impl<'a> ScheduleGenerator<'a, SmallRng> {
    /// Creates a generator with default options and an entropy-seeded RNG.
    pub fn new(config: &'a RosterConfig, people: &'a [Person]) -> Self {
        Self::from_options(config, people, GeneratorOptions::default())
    }

    /// Creates a reproducible generator.
    pub fn seeded(config: &'a RosterConfig, people: &'a [Person], seed: u64) -> Self {
        Self::from_options(config, people, GeneratorOptions::default().with_seed(seed))
    }

    /// Creates a generator whose RNG follows `options.seed`.
    pub fn from_options(
        config: &'a RosterConfig,
        people: &'a [Person],
        options: GeneratorOptions,
    ) -> Self {
        let rng = match options.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Self {
            config,
            people,
            options,
            rng,
        }
    }
}

impl<'a, R: Rng> ScheduleGenerator<'a, R> {
    /// Creates a generator around a caller-supplied RNG.
    pub fn with_rng(config: &'a RosterConfig, people: &'a [Person], rng: R) -> Self {
        Self {
            config,
            people,
            options: GeneratorOptions::default(),
            rng,
        }
    }

    /// Replaces the tunables. `options.seed` is ignored; the RNG is already chosen.
    pub fn with_options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Runs the attempt loop and returns the best roster.
    ///
    /// # Errors
    /// [`RosterError::Exhausted`] if no attempt produced a grid.
    pub fn generate(&mut self) -> Result<GenerationOutcome, RosterError> {
        self.generate_with_progress(|_| {})
    }

    /// Like [`generate`](Self::generate), reporting each attempt to `on_progress`.
    #[instrument(
        skip_all,
        fields(month = %self.config.month, attempts = self.options.max_attempts)
    )]
    pub fn generate_with_progress<F>(
        &mut self,
        mut on_progress: F,
    ) -> Result<GenerationOutcome, RosterError>
    where
        F: FnMut(AttemptProgress),
    {
        let max_attempts = self.options.max_attempts;
        let mut last_error: Option<RosterError> = None;

        let flow = (1..=max_attempts).try_fold(None::<AttemptResult>, |best, attempt| {
            match self.run_attempt() {
                Ok(grid) => {
                    let violations = validate_schedule(self.config, self.people, &grid);
                    let count = violations.len();
                    info!(attempt, violations = count, "attempt finished");
                    on_progress(AttemptProgress {
                        attempt,
                        max_attempts,
                        violations: Some(count),
                    });

                    let result = AttemptResult {
                        attempt,
                        grid,
                        violations,
                    };
                    if count == 0 {
                        return ControlFlow::Break(result);
                    }
                    if best.as_ref().map_or(true, |b| count < b.violation_count()) {
                        debug!(attempt, violations = count, "new best attempt");
                    }
                    ControlFlow::Continue(Some(AttemptResult::keep_best(best, result)))
                }
                Err(err) => {
                    warn!(attempt, error = %err, "attempt abandoned");
                    on_progress(AttemptProgress {
                        attempt,
                        max_attempts,
                        violations: None,
                    });
                    last_error = Some(err);
                    ControlFlow::Continue(best)
                }
            }
        });

        let best = match flow {
            ControlFlow::Break(perfect) => {
                info!(attempt = perfect.attempt, "perfect roster found");
                perfect
            }
            ControlFlow::Continue(Some(best)) => {
                info!(
                    attempt = best.attempt,
                    violations = best.violation_count(),
                    "attempt budget spent, returning best roster"
                );
                best
            }
            ControlFlow::Continue(None) => {
                return Err(RosterError::Exhausted {
                    attempts: max_attempts,
                    reason: last_error
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| "no attempts were made".to_string()),
                })
            }
        };
        Ok(best.into())
    }

    /// One construction pass over a fresh grid.
    fn run_attempt(&mut self) -> Result<RosterGrid, RosterError> {
        let mut grid = RosterGrid::new(self.config.month);
        self.place_requested_leaves(&mut grid);
        self.fill_shifts(&mut grid)?;
        self.propagate_mandatory_leave(&mut grid);
        self.fill_gaps(&mut grid);
        Ok(grid)
    }

    fn checker<'g>(&self, grid: &'g RosterGrid) -> ConstraintChecker<'g>
    where
        'a: 'g,
    {
        ConstraintChecker::new(self.config, self.people, grid)
            .with_night_margin(self.options.night_safety_margin)
    }

    fn place_requested_leaves(&self, grid: &mut RosterGrid) {
        for leave in Leave::ALL {
            for person in self.people {
                for &day in person.leave_days(leave) {
                    place_leave(grid, day, person.id, leave);
                }
            }
        }
    }

    fn fill_shifts(&mut self, grid: &mut RosterGrid) -> Result<(), RosterError> {
        let config = self.config;
        for (day, date) in (1..).zip(config.month.dates()) {
            let requirement = daily_requirement(config, date);
            let candidates = workload_order(self.people, grid, &mut self.rng);
            let has_margin = self.checker(grid).has_future_night_capacity(day);

            for shift in Shift::ALL {
                while grid.assigned_count(day, shift) < requirement.get(shift) {
                    let person = self.pick(grid, date, day, shift, &candidates, has_margin)?;
                    grid.set(day, person, shift.into());
                }
            }
        }
        Ok(())
    }

    fn pick(
        &mut self,
        grid: &RosterGrid,
        date: NaiveDate,
        day: u32,
        shift: Shift,
        candidates: &[&'a Person],
        has_margin: bool,
    ) -> Result<PersonId, RosterError> {
        let selector = PersonnelSelector::with_checker(grid, self.checker(grid));
        if let Some(person) =
            selector.find_available(day, shift, candidates, has_margin, &mut self.rng)
        {
            return Ok(person.id);
        }
        if shift == Shift::Night {
            if let Some(person) = selector.find_emergency_night(day, candidates) {
                warn!(day, person = person.id, name = %person.name, "emergency night assignment");
                return Ok(person.id);
            }
        }
        Err(RosterError::NoEligiblePersonnel { date, shift })
    }

    /// Writes owed rest after every Night run until a pass changes nothing.
    fn propagate_mandatory_leave(&self, grid: &mut RosterGrid) {
        let days = grid.days_in_month();
        for pass in 1..=self.options.max_propagation_passes {
            let mut changed = false;
            for day in 1..=days {
                for person in self.people.iter().filter(|p| p.is_shift_role()) {
                    let Some(run_length) = night_run_ending(grid, person.id, day) else {
                        continue;
                    };
                    for rest_day in rest_days_after(day, run_length, days) {
                        match grid.slot(rest_day, person.id) {
                            Some(Slot::Leave(_)) => {}
                            None => {
                                grid.set(rest_day, person.id, Slot::REST);
                                changed = true;
                            }
                            Some(Slot::Shift(shift)) => {
                                warn!(
                                    day = rest_day,
                                    person = person.id,
                                    %shift,
                                    "mandatory rest overrides assigned shift"
                                );
                                grid.set(rest_day, person.id, Slot::REST);
                                changed = true;
                            }
                        }
                    }
                }
            }
            if !changed {
                debug!(pass, "mandatory rest settled");
                break;
            }
        }
    }

    /// Covers shortfalls with relaxed checks: sequencing against both
    /// neighbours first, then (P and S only) just "no day shift after a night".
    fn fill_gaps(&mut self, grid: &mut RosterGrid) {
        let config = self.config;
        for (day, date) in (1..).zip(config.month.dates()) {
            let requirement = daily_requirement(config, date);
            let regular_weekday = !config.is_weekend_or_holiday(date);

            for shift in Shift::ALL {
                let shortage = requirement
                    .get(shift)
                    .saturating_sub(grid.assigned_count(day, shift));
                if shortage == 0 {
                    continue;
                }
                let candidates = workload_order(self.people, grid, &mut self.rng);

                for _ in 0..shortage {
                    let found = candidates
                        .iter()
                        .find(|p| fits_gap(grid, p, day, shift, regular_weekday))
                        .or_else(|| {
                            (shift != Shift::Night)
                                .then(|| {
                                    candidates
                                        .iter()
                                        .find(|p| fits_gap_relaxed(grid, p, day, shift))
                                })
                                .flatten()
                        });
                    match found {
                        Some(person) => {
                            grid.set(day, person.id, shift.into());
                            debug!(day, %shift, person = person.id, "coverage gap filled");
                        }
                        None => {
                            debug!(day, %shift, "coverage gap left open");
                            break;
                        }
                    }
                }
            }
        }
    }
}

/// Free cell, role allows the shift, and no forbidden transition with
/// either neighbouring day.
fn fits_gap(
    grid: &RosterGrid,
    person: &Person,
    day: u32,
    shift: Shift,
    regular_weekday: bool,
) -> bool {
    if grid.slot(day, person.id).is_some() {
        return false;
    }
    if person.role == Role::NonShift && (shift != Shift::Morning || !regular_weekday) {
        return false;
    }
    let after_previous = grid
        .shift(day - 1, person.id)
        .map_or(true, |previous| previous.allows_next(shift));
    let before_next = grid
        .shift(day + 1, person.id)
        .map_or(true, |next| shift.allows_next(next));
    after_previous && before_next
}

/// Free cell, `shift` role, and not straight after a Night.
fn fits_gap_relaxed(grid: &RosterGrid, person: &Person, day: u32, shift: Shift) -> bool {
    person.is_shift_role()
        && grid.slot(day, person.id).is_none()
        && (shift == Shift::Night || !grid.is_night(day - 1, person.id))
}
