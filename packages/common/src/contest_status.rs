#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Display status of a contest.
///
/// `Upcoming`, `Live` and `Completed` are derived from the contest's
/// timestamps. `Cancelled` is never derived; it only appears when an
/// administrator stores it as an override.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum ContestStatus {
    /// The contest has not started yet.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "upcoming"))]
    Upcoming,
    /// The current time falls within `[start_time, end_time)`.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "live"))]
    Live,
    /// The contest has ended.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "completed"))]
    Completed,
    /// Forcibly stopped by an administrator.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "cancelled"))]
    Cancelled,
}

impl ContestStatus {
    /// Returns true if participants can still register.
    pub fn accepts_registrations(&self) -> bool {
        matches!(self, Self::Upcoming | Self::Live)
    }

    /// All possible status values.
    pub const ALL: &'static [ContestStatus] =
        &[Self::Upcoming, Self::Live, Self::Completed, Self::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Live => "live",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ContestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid status '{invalid}'. Valid values: upcoming, live, completed, cancelled")]
pub struct ParseStatusError {
    invalid: String,
}

impl FromStr for ContestStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(Self::Upcoming),
            "live" => Ok(Self::Live),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseStatusError {
                invalid: s.to_string(),
            }),
        }
    }
}
