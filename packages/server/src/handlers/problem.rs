use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;

use crate::entity::problem;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::{AppJson, AppQuery};
use crate::models::problem::*;
use crate::models::shared::{Pagination, escape_like, page_offset, page_window};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Problems",
    operation_id = "createProblem",
    summary = "Create a new problem",
    request_body = CreateProblemRequest,
    responses(
        (status = 201, description = "Problem created", body = ProblemResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(title = %payload.title))]
pub async fn create_problem(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateProblemRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_problem(&payload)?;

    let new_problem = problem::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        content: Set(payload.content),
        time_limit: Set(payload.time_limit),
        memory_limit: Set(payload.memory_limit),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = new_problem.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(ProblemResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Problems",
    operation_id = "listProblems",
    summary = "List problems with pagination and search",
    description = "Returns a paginated list of problems, newest first. Problem content is omitted from list results.",
    params(ProblemListQuery),
    responses(
        (status = 200, description = "List of problems", body = ProblemListResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_problems(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ProblemListQuery>,
) -> Result<Json<ProblemListResponse>, AppError> {
    let (page, per_page) = page_window(query.page, query.per_page);

    let mut select = problem::Entity::find();

    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(problem::Column::Title)))
                    .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
            );
        }
    }

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let data = select
        .order_by_desc(problem::Column::CreatedAt)
        .order_by_desc(problem::Column::Id)
        .offset(Some(page_offset(page, per_page)))
        .limit(Some(per_page))
        .all(&state.db)
        .await?
        .into_iter()
        .map(ProblemListItem::from)
        .collect();

    Ok(Json(ProblemListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Problems",
    operation_id = "getProblem",
    summary = "Get a problem by ID",
    params(("id" = i32, Path, description = "Problem ID")),
    responses(
        (status = 200, description = "Problem details", body = ProblemResponse),
        (status = 404, description = "Problem not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_problem(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProblemResponse>, AppError> {
    let model = problem::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Problem not found".into()))?;
    Ok(Json(model.into()))
}
