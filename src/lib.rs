//! Monthly shift roster generation.
//!
//! Assigns personnel to Morning (P), Afternoon (S) and Night (M) shifts
//! and to leave days for one month, under daily coverage requirements,
//! shift sequencing rules, consecutive-run limits, mandatory rest after
//! night duty, and per-person monthly quotas.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Person`, `RosterConfig`, `Slot`,
//!   `RosterGrid`, `PublicSchedule`, `Violation`
//! - **`roster`**: Generation engine: utilities, constraint checker,
//!   personnel selector, multi-attempt generator
//! - **`validation`**: Input checks and the rule-violation analyzer
//! - **`import`**: Structural checking and scoring of external schedules
//! - **`export`**: Person × day sheet layout
//! - **`stats`**: Per-person workload and per-day coverage
//! - **`remote`**: Request/response contract of a remote generator
//!
//! # Example
//!
//! ```
//! use shift_roster::models::{Month, Person, RosterConfig};
//! use shift_roster::roster::ScheduleGenerator;
//! use shift_roster::validation::validate_schedule;
//!
//! let config = RosterConfig::new(Month::new(2025, 9).unwrap()).with_public_holidays([5]);
//! let mut people: Vec<Person> = (1..=12)
//!     .map(|id| Person::shift(id, format!("Staff {id}")))
//!     .collect();
//! people.push(Person::non_shift(13, "Office"));
//!
//! let outcome = ScheduleGenerator::seeded(&config, &people, 7).generate().unwrap();
//! let again = validate_schedule(&config, &people, &outcome.grid);
//! assert_eq!(again, outcome.violations);
//! ```
//!
//! # Logging
//!
//! The crate logs through `tracing` and never installs a subscriber.
//!
//! # References
//!
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod remote;
pub mod roster;
pub mod stats;
pub mod validation;

pub use error::RosterError;
