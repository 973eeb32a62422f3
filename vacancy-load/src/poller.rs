use crate::context::RunContext;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::Instrument;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};
use vacancy_load_core::Role;

/// Start the background poller on coordinator processes. Workers get `None`.
pub fn spawn_background_poller(ctx: RunContext, interval: Duration) -> Option<JoinHandle<()>> {
    match ctx.role() {
        Role::Coordinator => Some(tokio::spawn(
            background_poller(ctx, interval).instrument(tracing::info_span!("poller")),
        )),
        Role::Worker => {
            debug!("Worker process; background poller disabled.");
            None
        }
    }
}

/// Wake every `interval` until the run starts stopping.
///
/// Placeholder for periodically fetching all vacancies; it only logs for now.
pub async fn background_poller(ctx: RunContext, interval: Duration) {
    while !ctx.run_state().is_stopping() {
        tokio::time::sleep(interval).await;
        info!("Background task to fetch all vacancies");
    }
    debug!("Background poller exiting in state {:?}", ctx.run_state());
}
