use crate::consolidator::mutation::panic_message;
use crate::consolidator::Consolidator;
use crate::time::Clock;
use std::panic::{self, AssertUnwindSafe};
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

/// Runs a consolidation cycle every `period` until `cancel` fires. The period is measured from the
/// start of one cycle to the start of the next, so time spent inside a cycle doesn't add up. A cycle
/// that overruns its period is followed immediately by the next one.
///
/// The loop never dies from a bad cycle. A panic outside of mutation application is logged and the
/// next cycle proceeds as usual; if it happened before publishing, the previous model stays
/// published.
pub(crate) async fn run_consolidation_loop<C: Clock>(
    consolidator: Consolidator,
    mut clock: C,
    period: Duration,
    cancel: CancellationToken,
) {
    let logger = consolidator.logger().clone();
    slog::info!(logger, "Consolidation loop started");

    while !cancel.is_cancelled() {
        let next_run = clock.now() + period;

        match panic::catch_unwind(AssertUnwindSafe(|| consolidator.run_cycle(&cancel))) {
            Ok(outcome) => slog::trace!(logger, "Consolidation cycle complete: {:?}", outcome),
            Err(payload) => slog::error!(
                logger,
                "Unhandled panic in consolidation cycle: {}",
                panic_message(payload.as_ref())
            ),
        }

        if next_run <= clock.now() {
            continue;
        }

        tokio::select! {
            _ = clock.sleep_until(next_run) => {}
            _ = cancel.cancelled() => break,
        }
    }

    slog::info!(logger, "Consolidation loop stopped");
}
