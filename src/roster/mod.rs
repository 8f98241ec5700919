//! Roster generation engine.
//!
//! Builds a monthly roster with a multi-attempt, randomized greedy
//! construction and keeps the attempt with the fewest rule violations.
//!
//! # Components
//!
//! | Type | Role |
//! |------|------|
//! | [`utils`] | Daily requirements, workload ordering, Night-run helpers |
//! | `ConstraintChecker` | Per-slot eligibility and the night-capacity horizon check |
//! | `PersonnelSelector` | Workload-balancing pick and emergency Night fallback |
//! | `ScheduleGenerator` | Attempt loop and per-attempt phases |
//!
//! All components borrow the attempt's [`RosterGrid`](crate::models::RosterGrid)
//! for the duration of a call; only the generator owns one.
//!
//! # Algorithm
//!
//! The search is a heuristic with no optimality guarantee: a roster with
//! zero violations is returned as soon as one is found, otherwise the best
//! of a bounded number of attempts.
//!
//! # References
//!
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"

mod checker;
mod generator;
mod selector;
pub mod utils;

pub use checker::{ConstraintChecker, NIGHT_CAPACITY_MARGIN};
pub use generator::{
    AttemptProgress, AttemptResult, GenerationOutcome, GeneratorOptions, ScheduleGenerator,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_PROPAGATION_PASSES,
};
pub use selector::{PersonnelSelector, SCORE_JITTER};
