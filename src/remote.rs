//! Contract of the alternate remote generator.
//!
//! A remote solver can replace the local generator. It receives the
//! personnel list and configuration as JSON and answers with a schedule in
//! the public shape, or with status 422 and an explanation when the
//! problem is infeasible:
//!
//! ```json
//! { "detail": { "error": "infeasible", "message": "…", "suggestions": ["…"] } }
//! ```
//!
//! This module only builds the request body and interprets the response;
//! transport is up to the caller. A remote schedule is returned as-is;
//! pass it through [`crate::import::accept_schedule`] to score it.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::RosterError;
use crate::models::{DailyRequirement, Month, Person, PublicSchedule, RosterConfig};

/// Status the remote generator uses for infeasible problems.
pub const INFEASIBLE_STATUS: u16 = 422;

/// Request body sent to the remote generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRequest {
    pub personnel: Vec<Person>,
    pub config: RemoteConfig,
}

/// Configuration in the remote generator's vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub month: Month,
    pub public_holidays: Vec<u32>,
    /// Date → head counts. The first override for a date wins.
    pub special_dates: BTreeMap<NaiveDate, DailyRequirement>,
    pub max_night_shifts: u32,
    pub max_default_leaves: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_non_shift: Option<u32>,
}

impl RemoteRequest {
    pub fn new(config: &RosterConfig, people: &[Person]) -> Self {
        let mut special_dates = BTreeMap::new();
        for special in &config.special_dates {
            special_dates
                .entry(special.date)
                .or_insert(special.requirement);
        }
        Self {
            personnel: people.to_vec(),
            config: RemoteConfig {
                month: config.month,
                public_holidays: config.public_holidays.iter().copied().collect(),
                special_dates,
                max_night_shifts: config.max_night_shifts,
                max_default_leaves: config.max_regular_leaves,
                max_non_shift: config.max_non_shift,
            },
        }
    }

    pub fn to_json(&self) -> Result<String, RosterError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Deserialize)]
struct RemoteSchedule {
    schedule: PublicSchedule,
}

#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    detail: RemoteErrorDetail,
}

#[derive(Debug, Deserialize)]
struct RemoteErrorDetail {
    #[serde(default)]
    error: String,
    message: String,
    #[serde(default)]
    suggestions: Vec<String>,
}

/// Interprets a remote generator response.
///
/// # Errors
/// - [`RosterError::Infeasible`] on status 422 with a well-formed body
/// - [`RosterError::RemoteStatus`] on any other non-2xx status
/// - [`RosterError::Json`] if a body does not have the expected shape
pub fn parse_remote_response(status: u16, body: &str) -> Result<PublicSchedule, RosterError> {
    match status {
        200..=299 => {
            let response: RemoteSchedule = serde_json::from_str(body)?;
            Ok(response.schedule)
        }
        INFEASIBLE_STATUS => {
            let RemoteErrorBody { detail } = serde_json::from_str(body)?;
            warn!(error = %detail.error, "remote generator reported infeasible problem");
            Err(RosterError::Infeasible {
                message: detail.message,
                suggestions: detail.suggestions,
            })
        }
        other => Err(RosterError::RemoteStatus(other)),
    }
}
