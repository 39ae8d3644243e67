use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, validate_title};
use crate::entity::problem;
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateProblemRequest {
    #[schema(example = "A + B")]
    pub title: String,
    /// Markdown statement.
    pub content: String,
    /// Milliseconds (1-30000).
    #[schema(example = 1000)]
    pub time_limit: i32,
    /// Kilobytes (1-1048576).
    #[schema(example = 262144)]
    pub memory_limit: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProblemResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub time_limit: i32,
    pub memory_limit: i32,
    pub created_at: DateTime<Utc>,
}

impl From<problem::Model> for ProblemResponse {
    fn from(m: problem::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            content: m.content,
            time_limit: m.time_limit,
            memory_limit: m.memory_limit,
            created_at: m.created_at,
        }
    }
}

/// Problem summary for list views; the statement is omitted.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProblemListItem {
    pub id: i32,
    pub title: String,
    pub time_limit: i32,
    pub memory_limit: i32,
    pub created_at: DateTime<Utc>,
}

impl From<problem::Model> for ProblemListItem {
    fn from(m: problem::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            time_limit: m.time_limit,
            memory_limit: m.memory_limit,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProblemListResponse {
    pub data: Vec<ProblemListItem>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProblemListQuery {
    #[param(example = 1)]
    pub page: Option<u64>,
    #[param(example = 20)]
    pub per_page: Option<u64>,
    /// Case-insensitive title search.
    pub search: Option<String>,
}

pub fn validate_create_problem(req: &CreateProblemRequest) -> Result<(), AppError> {
    validate_title(&req.title)?;
    if req.content.trim().is_empty() || req.content.len() > 1_000_000 {
        return Err(AppError::Validation(
            "Content must be non-empty and at most 1MB".into(),
        ));
    }
    if !(1..=30000).contains(&req.time_limit) {
        return Err(AppError::Validation("Time limit must be 1-30000 ms".into()));
    }
    if !(1..=1_048_576).contains(&req.memory_limit) {
        return Err(AppError::Validation(
            "Memory limit must be 1-1048576 KB".into(),
        ));
    }
    Ok(())
}
