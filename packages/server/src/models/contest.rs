use chrono::{DateTime, Utc};
use common::lifecycle::ContestSnapshot;
use common::{ContestStatus, Remaining};
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, double_option, validate_optional_position, validate_title};
use crate::entity::{contest, contest_participant, contest_problem};
use crate::error::AppError;

/// Request body for creating a contest.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateContestRequest {
    #[schema(example = "Weekly Round 12")]
    pub title: String,
    /// Markdown description.
    pub description: String,
    #[schema(example = "2025-09-01T08:00:00Z")]
    pub start_time: DateTime<Utc>,
    #[schema(example = "2025-09-01T11:00:00Z")]
    pub end_time: DateTime<Utc>,
}

/// Partial update of a contest. Absent fields are left unchanged.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateContestRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Manual status. `null` clears the override and derives the status
    /// from the timestamps again.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<ContestStatus>)]
    pub status_override: Option<Option<ContestStatus>>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContestListQuery {
    /// Page number (1-indexed).
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Items per page (1-100, default 20).
    #[param(example = 20)]
    pub per_page: Option<u64>,
    /// Case-insensitive title search.
    pub search: Option<String>,
    /// One of `created_at`, `start_time`, `title`.
    #[param(example = "start_time")]
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default).
    pub sort_order: Option<String>,
    /// Only contests whose resolved status matches.
    pub status: Option<ContestStatus>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AddContestProblemRequest {
    pub problem_id: i32,
    #[schema(example = "A")]
    pub label: String,
    pub position: Option<i32>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterParticipantRequest {
    /// Display handle (1-32 chars, letters, digits, `_` and `-`).
    #[schema(example = "tourist")]
    pub handle: String,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// Full contest record with its derived timing values.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Resolved status: the override if set, otherwise derived from the timestamps.
    pub status: ContestStatus,
    pub status_override: Option<ContestStatus>,
    pub participants: u64,
    #[schema(value_type = String, example = "01:30:00")]
    pub time_left: Remaining,
    #[schema(value_type = String, example = "00:00:00")]
    pub starts_in: Remaining,
    #[schema(example = 50.0)]
    pub progress: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContestResponse {
    pub fn new(m: contest::Model, participants: u64, now: DateTime<Utc>) -> Self {
        let snapshot = snapshot_of(&m, now);
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            start_time: m.start_time,
            end_time: m.end_time,
            status: snapshot.status,
            status_override: m.status_override,
            participants,
            time_left: snapshot.time_left,
            starts_in: snapshot.starts_in,
            progress: snapshot.progress,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Contest summary for list views.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestListItem {
    pub id: i32,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: ContestStatus,
    pub participants: u64,
    #[schema(value_type = String, example = "01:30:00")]
    pub time_left: Remaining,
    #[schema(example = 50.0)]
    pub progress: f64,
}

impl ContestListItem {
    pub fn new(m: contest::Model, participants: u64, now: DateTime<Utc>) -> Self {
        let snapshot = snapshot_of(&m, now);
        Self {
            id: m.id,
            title: m.title,
            start_time: m.start_time,
            end_time: m.end_time,
            status: snapshot.status,
            participants,
            time_left: snapshot.time_left,
            progress: snapshot.progress,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestListResponse {
    pub data: Vec<ContestListItem>,
    pub pagination: Pagination,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestProblemResponse {
    pub contest_id: i32,
    pub problem_id: i32,
    pub label: String,
    pub position: i32,
    pub problem_title: String,
}

impl ContestProblemResponse {
    pub fn new(m: contest_problem::Model, problem_title: String) -> Self {
        Self {
            contest_id: m.contest_id,
            problem_id: m.problem_id,
            label: m.label,
            position: m.position,
            problem_title,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestParticipantResponse {
    pub contest_id: i32,
    pub handle: String,
    pub registered_at: DateTime<Utc>,
}

impl From<contest_participant::Model> for ContestParticipantResponse {
    fn from(m: contest_participant::Model) -> Self {
        Self {
            contest_id: m.contest_id,
            handle: m.handle,
            registered_at: m.registered_at,
        }
    }
}

pub fn snapshot_of(m: &contest::Model, now: DateTime<Utc>) -> ContestSnapshot {
    ContestSnapshot::at(m.start_time, m.end_time, m.status_override, now)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_description(description: &str) -> Result<(), AppError> {
    if description.trim().is_empty() || description.len() > 1_000_000 {
        return Err(AppError::Validation(
            "Description must be non-empty and at most 1MB".into(),
        ));
    }
    Ok(())
}

/// Reject windows where `end_time` is not strictly after `start_time`.
pub fn validate_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), AppError> {
    if end <= start {
        return Err(AppError::Validation(
            "end_time must be after start_time".into(),
        ));
    }
    Ok(())
}

pub fn validate_create_contest(req: &CreateContestRequest) -> Result<(), AppError> {
    validate_title(&req.title)?;
    validate_description(&req.description)?;
    validate_window(req.start_time, req.end_time)
}

pub fn validate_update_contest(req: &UpdateContestRequest) -> Result<(), AppError> {
    if let Some(ref title) = req.title {
        validate_title(title)?;
    }
    if let Some(ref description) = req.description {
        validate_description(description)?;
    }
    if let (Some(start), Some(end)) = (req.start_time, req.end_time) {
        validate_window(start, end)?;
    }
    Ok(())
}

pub fn validate_add_contest_problem(req: &AddContestProblemRequest) -> Result<(), AppError> {
    let label = req.label.trim();
    if label.is_empty() || label.chars().count() > 10 {
        return Err(AppError::Validation("Label must be 1-10 characters".into()));
    }
    validate_optional_position(req.position)
}

pub fn validate_handle(handle: &str) -> Result<(), AppError> {
    let handle = handle.trim();
    if handle.is_empty() || handle.chars().count() > 32 {
        return Err(AppError::Validation("Handle must be 1-32 characters".into()));
    }
    if !handle
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AppError::Validation(
            "Handle must contain only letters, digits, '_' and '-'".into(),
        ));
    }
    Ok(())
}
