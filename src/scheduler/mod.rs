//! Scheduler module for driving probes on a fixed interval.

mod session;

pub use session::*;

use std::future::Future;
use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

/// Why the tick loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The running budget was exhausted.
    Completed,
    /// A stop signal arrived.
    Cancelled,
}

/// Run `on_tick` every `interval` until `budget` has elapsed or a stop signal
/// arrives on `stop_rx`.
///
/// The budget is checked after each tick, so at least one tick always fires.
/// Elapsed time advances by `interval` per tick; the time spent inside
/// `on_tick` is not counted against the budget.
pub async fn run_loop<F, Fut>(
    interval: Duration,
    budget: Duration,
    mut stop_rx: broadcast::Receiver<()>,
    mut on_tick: F,
) -> TerminationReason
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = ()>,
{
    let mut elapsed = Duration::ZERO;
    let mut index: u64 = 0;

    loop {
        if stop_requested(&mut stop_rx) {
            tracing::debug!("Stop signal observed before tick {}", index);
            return TerminationReason::Cancelled;
        }

        on_tick(index).await;

        if !wait_or_stop(&mut stop_rx, interval).await {
            tracing::debug!("Stop signal observed while waiting after tick {}", index);
            return TerminationReason::Cancelled;
        }

        elapsed += interval;
        index += 1;

        if elapsed >= budget {
            tracing::debug!("Running budget of {:?} exhausted after {} ticks", budget, index);
            return TerminationReason::Completed;
        }
    }
}

/// Non-blocking check for a pending stop signal.
fn stop_requested(stop_rx: &mut broadcast::Receiver<()>) -> bool {
    match stop_rx.try_recv() {
        Ok(()) | Err(TryRecvError::Lagged(_)) => true,
        Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => false,
    }
}

/// Sleep for `duration`. Returns `false` if a stop signal cut the wait short.
async fn wait_or_stop(stop_rx: &mut broadcast::Receiver<()>, duration: Duration) -> bool {
    let sleep = tokio::time::sleep(duration);
    tokio::pin!(sleep);

    tokio::select! {
        biased;
        signal = stop_rx.recv() => match signal {
            Ok(()) | Err(RecvError::Lagged(_)) => false,
            Err(RecvError::Closed) => {
                // Nobody can signal any more; finish the wait.
                sleep.await;
                true
            }
        },
        _ = &mut sleep => true,
    }
}
