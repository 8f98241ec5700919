//! Crate error type.

use chrono::NaiveDate;
use thiserror::Error;

use crate::import::StructuralError;
use crate::models::Shift;

/// Errors raised by roster generation and the schedule boundary.
#[derive(Debug, Error)]
pub enum RosterError {
    /// No one could be placed on a slot; the current attempt is abandoned.
    #[error("no eligible personnel for shift {shift} on {date}")]
    NoEligiblePersonnel { date: NaiveDate, shift: Shift },

    /// Every attempt failed before producing a grid.
    #[error("failed to generate a schedule after {attempts} attempts: {reason}")]
    Exhausted { attempts: usize, reason: String },

    /// An externally supplied schedule failed structural checks.
    #[error("malformed schedule: {}", join_problems(.0))]
    MalformedSchedule(Vec<StructuralError>),

    #[error("invalid month `{0}`, expected YYYY-MM")]
    InvalidMonth(String),

    /// The remote generator reported the problem as infeasible.
    #[error("{message}")]
    Infeasible {
        message: String,
        suggestions: Vec<String>,
    },

    #[error("remote generator responded with status {0}")]
    RemoteStatus(u16),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn join_problems(problems: &[StructuralError]) -> String {
    problems
        .iter()
        .map(|p| p.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
