use std::ops::ControlFlow;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A periodic tick boxed together with its cancellation handle.
///
/// The callback runs once immediately and then every `period` until it
/// returns `ControlFlow::Break`, [`Ticker::cancel`] is called, or the
/// `Ticker` is dropped. Whoever owns the `Ticker` owns the periodic work.
pub struct Ticker {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Must be called from within a tokio runtime.
    pub fn start<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut ticks: u64 = 0;

            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => {
                        debug!(ticks, "Ticker cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        ticks += 1;
                        if on_tick().is_break() {
                            debug!(ticks, "Ticker finished");
                            break;
                        }
                    }
                }
            }
        });

        debug!(period_ms = period.as_millis() as u64, "Ticker started");
        Self { token, handle }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Returns true once the tick task has exited, for any reason.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait until the tick task exits.
    pub async fn stopped(&mut self) {
        if self.handle.is_finished() {
            return;
        }
        // A panic in the callback ends the task too; either way it has stopped.
        let _ = (&mut self.handle).await;
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
