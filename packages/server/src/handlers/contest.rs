use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use common::lifecycle::resolve_status;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::{contest, contest_participant, contest_problem, problem};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::{AppJson, AppQuery};
use crate::models::contest::*;
use crate::models::shared::{Pagination, escape_like, page_offset, page_window, sort_order};
use crate::state::AppState;
use crate::utils::contest::*;

#[utoipa::path(
    post,
    path = "/",
    tag = "Contests",
    operation_id = "createContest",
    summary = "Create a new contest",
    description = "Creates a contest scheduled between `start_time` and `end_time`. The status is derived from the timestamps until an override is set.",
    request_body = CreateContestRequest,
    responses(
        (status = 201, description = "Contest created", body = ContestResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(title = %payload.title))]
pub async fn create_contest(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateContestRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_contest(&payload)?;

    let now = Utc::now();
    let new_contest = contest::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description),
        start_time: Set(payload.start_time),
        end_time: Set(payload.end_time),
        status_override: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_contest.insert(&state.db).await?;
    info!(contest_id = model.id, "Contest created");

    Ok((StatusCode::CREATED, Json(ContestResponse::new(model, 0, now))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Contests",
    operation_id = "listContests",
    summary = "List contests with pagination and search",
    description = "Returns a paginated list of contests. Supports case-insensitive title search, sorting by `created_at`, `start_time` or `title`, and filtering on the resolved status.",
    params(ContestListQuery),
    responses(
        (status = 200, description = "List of contests", body = ContestListResponse),
        (status = 400, description = "Invalid query (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_contests(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ContestListQuery>,
) -> Result<Json<ContestListResponse>, AppError> {
    let (page, per_page) = page_window(query.page, query.per_page);
    let now = Utc::now();

    let mut select = contest::Entity::find();

    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(contest::Column::Title)))
                    .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
            );
        }
    }

    if let Some(status) = query.status {
        select = select.filter(status_condition(status, now));
    }

    let sort_column = match query.sort_by.as_deref().unwrap_or("created_at") {
        "created_at" => contest::Column::CreatedAt,
        "start_time" => contest::Column::StartTime,
        "title" => contest::Column::Title,
        _ => {
            return Err(AppError::Validation(
                "sort_by must be one of: created_at, start_time, title".into(),
            ));
        }
    };

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let models = select
        .order_by(sort_column, sort_order(query.sort_order.as_deref()))
        .order_by_asc(contest::Column::Id)
        .offset(Some(page_offset(page, per_page)))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;

    let counts = participant_counts(&state.db, models.iter().map(|m| m.id).collect()).await?;
    let data = models
        .into_iter()
        .map(|m| {
            let participants = counts.get(&m.id).copied().unwrap_or(0);
            ContestListItem::new(m, participants, now)
        })
        .collect();

    Ok(Json(ContestListResponse {
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
    tag = "Contests",
    operation_id = "getContest",
    summary = "Get a contest by ID",
    description = "Returns the contest together with its resolved status, remaining time and progress computed at request time.",
    params(("id" = i32, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "Contest details", body = ContestResponse),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_contest(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ContestResponse>, AppError> {
    let model = find_contest(&state.db, id).await?;
    let participants = participant_count(&state.db, id).await?;
    Ok(Json(ContestResponse::new(model, participants, Utc::now())))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Contests",
    operation_id = "updateContest",
    summary = "Update an existing contest",
    description = "Partially updates a contest. An empty payload returns the current resource unchanged. `status_override: null` clears the override. Cross-field validation keeps `end_time` after `start_time` even when only one of them changes.",
    params(("id" = i32, Path, description = "Contest ID")),
    request_body = UpdateContestRequest,
    responses(
        (status = 200, description = "Contest updated", body = ContestResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_contest(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateContestRequest>,
) -> Result<Json<ContestResponse>, AppError> {
    validate_update_contest(&payload)?;

    if payload == UpdateContestRequest::default() {
        let existing = find_contest(&state.db, id).await?;
        let participants = participant_count(&state.db, id).await?;
        return Ok(Json(ContestResponse::new(existing, participants, Utc::now())));
    }

    let txn = state.db.begin().await?;
    let existing = find_contest_for_update(&txn, id).await?;

    validate_window(
        payload.start_time.unwrap_or(existing.start_time),
        payload.end_time.unwrap_or(existing.end_time),
    )?;

    let mut active: contest::ActiveModel = existing.into();

    if let Some(ref title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(start_time) = payload.start_time {
        active.start_time = Set(start_time);
    }
    if let Some(end_time) = payload.end_time {
        active.end_time = Set(end_time);
    }
    if let Some(status_override) = payload.status_override {
        info!(?status_override, "Contest status override changed");
        active.status_override = Set(status_override);
    }
    active.updated_at = Set(Utc::now());

    let model = active.update(&txn).await?;
    let participants = participant_count(&txn, id).await?;
    txn.commit().await?;

    Ok(Json(ContestResponse::new(model, participants, Utc::now())))
}

#[utoipa::path(
    post,
    path = "/{id}/problems",
    tag = "Contest Problems",
    operation_id = "addContestProblem",
    summary = "Add a problem to a contest",
    description = "Associates an existing problem with the contest under a label. Labels are unique within a contest. Position is appended at the end if omitted.",
    params(("id" = i32, Path, description = "Contest ID")),
    request_body = AddContestProblemRequest,
    responses(
        (status = 201, description = "Problem added to contest", body = ContestProblemResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Contest or problem not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Problem or label already in contest (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(contest_id))]
pub async fn add_contest_problem(
    State(state): State<AppState>,
    Path(contest_id): Path<i32>,
    AppJson(payload): AppJson<AddContestProblemRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_add_contest_problem(&payload)?;

    let txn = state.db.begin().await?;
    find_contest_for_update(&txn, contest_id).await?;

    let problem_title = problem::Entity::find_by_id(payload.problem_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Problem not found".into()))?
        .title;

    if contest_problem::Entity::find_by_id((contest_id, payload.problem_id))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "Problem is already in this contest".into(),
        ));
    }

    let label = payload.label.trim().to_string();
    let label_taken = contest_problem::Entity::find()
        .filter(contest_problem::Column::ContestId.eq(contest_id))
        .filter(contest_problem::Column::Label.eq(&label))
        .one(&txn)
        .await?
        .is_some();
    if label_taken {
        return Err(AppError::Conflict(format!(
            "Label '{label}' is already used in this contest"
        )));
    }

    let position = match payload.position {
        Some(p) => p,
        None => next_problem_position(&txn, contest_id).await?,
    };

    let model = contest_problem::ActiveModel {
        contest_id: Set(contest_id),
        problem_id: Set(payload.problem_id),
        label: Set(label),
        position: Set(position),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(ContestProblemResponse::new(model, problem_title)),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}/problems",
    tag = "Contest Problems",
    operation_id = "listContestProblems",
    summary = "List problems in a contest",
    description = "Returns the problems of a contest ordered by position.",
    params(("id" = i32, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "List of contest problems", body = Vec<ContestProblemResponse>),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(contest_id))]
pub async fn list_contest_problems(
    State(state): State<AppState>,
    Path(contest_id): Path<i32>,
) -> Result<Json<Vec<ContestProblemResponse>>, AppError> {
    find_contest(&state.db, contest_id).await?;

    let rows = contest_problem::Entity::find()
        .filter(contest_problem::Column::ContestId.eq(contest_id))
        .find_also_related(problem::Entity)
        .order_by_asc(contest_problem::Column::Position)
        .order_by_asc(contest_problem::Column::ProblemId)
        .all(&state.db)
        .await?;

    let items = rows
        .into_iter()
        .map(|(cp, prob)| ContestProblemResponse::new(cp, prob.map(|p| p.title).unwrap_or_default()))
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/{id}/participants",
    tag = "Contest Participants",
    operation_id = "registerParticipant",
    summary = "Register a participant",
    description = "Registers a handle for the contest. Only upcoming and live contests accept registrations.",
    params(("id" = i32, Path, description = "Contest ID")),
    request_body = RegisterParticipantRequest,
    responses(
        (status = 201, description = "Participant registered", body = ContestParticipantResponse),
        (status = 400, description = "Invalid handle (VALIDATION_ERROR) or contest over (CONTEST_CLOSED)", body = ErrorBody),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Handle already registered (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(contest_id, handle = %payload.handle))]
pub async fn register_participant(
    State(state): State<AppState>,
    Path(contest_id): Path<i32>,
    AppJson(payload): AppJson<RegisterParticipantRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_handle(&payload.handle)?;

    let txn = state.db.begin().await?;
    let existing = find_contest_for_update(&txn, contest_id).await?;

    let now = Utc::now();
    let status = resolve_status(
        existing.status_override,
        existing.start_time,
        existing.end_time,
        now,
    );
    if !status.accepts_registrations() {
        return Err(AppError::ContestClosed(status));
    }

    let new_participant = contest_participant::ActiveModel {
        contest_id: Set(contest_id),
        handle: Set(payload.handle.trim().to_string()),
        registered_at: Set(now),
    };

    match new_participant.insert(&txn).await {
        Ok(model) => {
            txn.commit().await?;
            Ok((
                StatusCode::CREATED,
                Json(ContestParticipantResponse::from(model)),
            ))
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(AppError::Conflict("Handle is already registered".into()))
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    get,
    path = "/{id}/participants",
    tag = "Contest Participants",
    operation_id = "listParticipants",
    summary = "List participants of a contest",
    description = "Returns all participants in the contest, ordered by registration time.",
    params(("id" = i32, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "List of participants", body = Vec<ContestParticipantResponse>),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(contest_id))]
pub async fn list_participants(
    State(state): State<AppState>,
    Path(contest_id): Path<i32>,
) -> Result<Json<Vec<ContestParticipantResponse>>, AppError> {
    find_contest(&state.db, contest_id).await?;

    let rows = contest_participant::Entity::find()
        .filter(contest_participant::Column::ContestId.eq(contest_id))
        .order_by_asc(contest_participant::Column::RegisteredAt)
        .order_by_asc(contest_participant::Column::Handle)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
