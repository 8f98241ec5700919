//! Roster domain models.
//!
//! Provides the data types for describing a monthly rostering problem
//! and its solutions.
//!
//! | Type | Role |
//! |------|------|
//! | `Person` | Staff member with role and pre-booked leave |
//! | `RosterConfig` | Month, holidays, coverage overrides, quotas |
//! | `Slot` | Content of one (date, person) cell: P/S/M or L/LT/CT |
//! | `RosterGrid` | Per-attempt working arena of slots |
//! | `PublicSchedule` | Wire shape: date → `P`/`S`/`M` id lists |
//! | `Violation` | Structured report of one broken rule |

mod config;
mod grid;
mod person;
mod schedule;
mod slot;
mod violation;

pub use config::{
    DailyRequirement, Month, RosterConfig, SpecialDate, DEFAULT_MAX_NIGHT_SHIFTS,
    DEFAULT_MAX_REGULAR_LEAVES,
};
pub use grid::RosterGrid;
pub use person::{Person, PersonId, Role};
pub use schedule::{DayRoster, PublicSchedule};
pub use slot::{Leave, Shift, Slot};
pub use violation::{QuotaKind, Violation, ViolationCategory};
