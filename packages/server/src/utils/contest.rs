use std::collections::HashMap;

use chrono::{DateTime, Utc};
use common::ContestStatus;
use sea_orm::sea_query::LockType;
use sea_orm::*;

use crate::entity::{contest, contest_participant, contest_problem};
use crate::error::AppError;

/// Look up a contest by ID, returning 404 if not found.
pub async fn find_contest<C: ConnectionTrait>(db: &C, id: i32) -> Result<contest::Model, AppError> {
    contest::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Contest not found".into()))
}

/// Same as [`find_contest`], locking the row for the rest of the transaction.
pub async fn find_contest_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<contest::Model, AppError> {
    contest::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Contest not found".into()))
}

/// Next free position at the end of a contest's problem list.
pub async fn next_problem_position<C: ConnectionTrait>(
    db: &C,
    contest_id: i32,
) -> Result<i32, AppError> {
    let max_pos: Option<i32> = contest_problem::Entity::find()
        .filter(contest_problem::Column::ContestId.eq(contest_id))
        .select_only()
        .column_as(contest_problem::Column::Position.max(), "max_pos")
        .into_tuple::<Option<i32>>()
        .one(db)
        .await?
        .flatten();
    max_pos
        .unwrap_or(-1)
        .checked_add(1)
        .ok_or_else(|| AppError::Validation("Position overflow".into()))
}

pub async fn participant_count<C: ConnectionTrait>(db: &C, contest_id: i32) -> Result<u64, AppError> {
    let count = contest_participant::Entity::find()
        .filter(contest_participant::Column::ContestId.eq(contest_id))
        .count(db)
        .await?;
    Ok(count)
}

/// Participant counts for several contests in one query. Contests without
/// participants are absent from the map.
pub async fn participant_counts<C: ConnectionTrait>(
    db: &C,
    contest_ids: Vec<i32>,
) -> Result<HashMap<i32, u64>, AppError> {
    if contest_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i32, i64)> = contest_participant::Entity::find()
        .select_only()
        .column(contest_participant::Column::ContestId)
        .column_as(contest_participant::Column::Handle.count(), "participants")
        .filter(contest_participant::Column::ContestId.is_in(contest_ids))
        .group_by(contest_participant::Column::ContestId)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, count)| (id, u64::try_from(count).unwrap_or(0)))
        .collect())
}

/// SQL condition selecting contests whose resolved status is `status` at `now`.
///
/// Mirrors `common::lifecycle::resolve_status`: an override matches directly,
/// otherwise the timestamps decide.
pub fn status_condition(status: ContestStatus, now: DateTime<Utc>) -> Condition {
    let derived = match status {
        ContestStatus::Upcoming => Some(Condition::all().add(contest::Column::StartTime.gt(now))),
        ContestStatus::Live => Some(
            Condition::all()
                .add(contest::Column::StartTime.lte(now))
                .add(contest::Column::EndTime.gt(now)),
        ),
        ContestStatus::Completed => Some(Condition::all().add(contest::Column::EndTime.lte(now))),
        ContestStatus::Cancelled => None,
    };

    let mut condition = Condition::any().add(contest::Column::StatusOverride.eq(status));
    if let Some(derived) = derived {
        condition = condition.add(
            derived.add(contest::Column::StatusOverride.is_null()),
        );
    }
    condition
}
