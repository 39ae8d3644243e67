use common::ContestStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contest")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    pub description: String, // in Markdown
    pub start_time: DateTimeUtc,
    pub end_time: DateTimeUtc,

    /// Manual administrative status. NULL means the status is derived from
    /// `start_time`/`end_time` at read time.
    pub status_override: Option<ContestStatus>,

    #[sea_orm(has_many)]
    pub participants: HasMany<super::contest_participant::Entity>,

    #[sea_orm(has_many, via = "contest_problem")]
    pub problems: HasMany<super::problem::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
