use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::contest_status::ContestStatus;
use crate::timing::{self, Computed, Remaining};

/// Resolve the status shown for a contest.
///
/// A stored override always wins; without one the status is derived from
/// the timestamps at `now`.
pub fn resolve_status(
    status_override: Option<ContestStatus>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> ContestStatus {
    status_override.unwrap_or_else(|| timing::classify(start, end, now))
}

/// Whether a view showing a contest in `status` must recompute every tick.
pub fn needs_refresh(status: ContestStatus) -> bool {
    status == ContestStatus::Live
}

/// Every derived timing value for a contest at one instant.
#[derive(Clone, Debug, PartialEq, Serialize, utoipa::ToSchema)]
pub struct ContestSnapshot {
    pub status: ContestStatus,
    /// Time until the end of the contest, `HH:MM:SS`.
    #[schema(value_type = String, example = "01:30:00")]
    pub time_left: Remaining,
    /// Time until the start of the contest, `HH:MM:SS`.
    #[schema(value_type = String, example = "00:00:00")]
    pub starts_in: Remaining,
    /// Elapsed share of the contest window, 0-100.
    #[schema(example = 50.0)]
    pub progress: f64,
    pub computed_at: DateTime<Utc>,
}

impl ContestSnapshot {
    /// Terminal overrides (`completed`, `cancelled`) zero both countdowns;
    /// a `completed` override also pins progress to 100.
    pub fn at(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        status_override: Option<ContestStatus>,
        now: DateTime<Utc>,
    ) -> Self {
        let status = resolve_status(status_override, start, end, now);
        let terminal_override = matches!(
            status_override,
            Some(ContestStatus::Completed | ContestStatus::Cancelled)
        );

        let (time_left, starts_in) = if terminal_override {
            (Remaining::ZERO, Remaining::ZERO)
        } else {
            (timing::remaining(end, now), timing::until_start(start, now))
        };
        let progress = if status_override == Some(ContestStatus::Completed) {
            100.0
        } else {
            timing::progress(start, end, now)
        };

        Self {
            status,
            time_left,
            starts_in,
            progress,
            computed_at: now,
        }
    }

    /// Same as [`ContestSnapshot::at`] over raw timestamps.
    pub fn from_raw(
        start: &str,
        end: &str,
        status_override: Option<ContestStatus>,
        now: DateTime<Utc>,
    ) -> Computed<Self> {
        match (timing::parse_timestamp(start), timing::parse_timestamp(end)) {
            (Some(start), Some(end)) => Computed::Valid(Self::at(start, end, status_override, now)),
            _ => Computed::Invalid,
        }
    }

    pub fn needs_refresh(&self) -> bool {
        needs_refresh(self.status)
    }
}
