use std::ops::ControlFlow;
use std::time::Duration;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use chrono::{DateTime, Utc};
use common::{ContestSnapshot, ContestStatus, Ticker};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, instrument};

use crate::error::{AppError, ErrorBody};
use crate::models::contest::snapshot_of;
use crate::state::AppState;
use crate::utils::contest::find_contest;

/// Frames buffered per clock stream before ticks are skipped.
const CLOCK_BUFFER: usize = 4;

#[utoipa::path(
    get,
    path = "/{id}/timing",
    tag = "Contest Clock",
    operation_id = "getContestTiming",
    summary = "Get the contest timing snapshot",
    description = "Returns the resolved status, remaining time, time until start and progress computed at request time.",
    params(("id" = i32, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "Timing snapshot", body = ContestSnapshot),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_contest_timing(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ContestSnapshot>, AppError> {
    let model = find_contest(&state.db, id).await?;
    Ok(Json(snapshot_of(&model, Utc::now())))
}

#[utoipa::path(
    get,
    path = "/{id}/clock",
    tag = "Contest Clock",
    operation_id = "streamContestClock",
    summary = "Stream the contest clock",
    description = "Server-Sent Events stream of `snapshot` events. While the contest is live a frame is sent every tick; the stream ends after the first frame whose status is not live, so upcoming or finished contests yield exactly one frame. Disconnecting cancels the tick.",
    params(("id" = i32, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "Snapshot event stream", content_type = "text/event-stream", body = ContestSnapshot),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn stream_contest_clock(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, AppError> {
    let model = find_contest(&state.db, id).await?;
    let stream = clock_stream(
        model.start_time,
        model.end_time,
        model.status_override,
        state.config.clock.tick_interval(),
    );
    debug!(contest_id = id, "Clock stream opened");

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// `snapshot` events for one contest window, ticking on the wall clock.
pub fn clock_stream(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    status_override: Option<ContestStatus>,
    period: Duration,
) -> impl Stream<Item = Result<Event, axum::Error>> + Send + 'static {
    snapshot_stream(start, end, status_override, period, Utc::now)
        .map(|snapshot| Event::default().event("snapshot").json_data(&snapshot))
}

/// One snapshot per tick while live. Ends after the first non-live
/// snapshot has been delivered.
fn snapshot_stream<N>(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    status_override: Option<ContestStatus>,
    period: Duration,
    now: N,
) -> impl Stream<Item = ContestSnapshot> + Send + 'static
where
    N: Fn() -> DateTime<Utc> + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<ContestSnapshot>(CLOCK_BUFFER);
    let ticker = Ticker::start(period, move || {
        let snapshot = ContestSnapshot::at(start, end, status_override, now());
        let last = !snapshot.needs_refresh();
        match tx.try_send(snapshot) {
            Ok(()) if last => ControlFlow::Break(()),
            Ok(()) => ControlFlow::Continue(()),
            Err(TrySendError::Closed(_)) => ControlFlow::Break(()),
            // A slow reader misses live frames rather than queueing stale
            // ones. The closing frame is retried on the next tick.
            Err(TrySendError::Full(_)) => ControlFlow::Continue(()),
        }
    });

    // The ticker lives in the stream state: when axum drops the stream on
    // disconnect, the ticker is dropped and the tick task is cancelled.
    futures::stream::unfold((rx, ticker), |(mut rx, ticker)| async move {
        let snapshot = rx.recv().await?;
        Some((snapshot, (rx, ticker)))
    })
}
