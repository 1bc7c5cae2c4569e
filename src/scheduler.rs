// Background scheduler loop: collect, publish, optionally push, sleep.
// The poll interval is re-read after every pass, so a reconfiguration takes
// effect on the next sleep, never on one already in progress.

use crate::collector::Collector;
use crate::publisher::Publisher;
use crate::push::Pusher;
use crate::runtime::RuntimeConfig;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Collector, store, settings and shutdown for the scheduler.
pub struct SchedulerDeps {
    pub collector: Arc<Collector>,
    pub publisher: Arc<Publisher>,
    pub runtime: Arc<RuntimeConfig>,
    pub pusher: Pusher,
    pub shutdown_rx: oneshot::Receiver<()>,
}

pub fn spawn(deps: SchedulerDeps) -> tokio::task::JoinHandle<()> {
    let SchedulerDeps {
        collector,
        publisher,
        runtime,
        pusher,
        mut shutdown_rx,
    } = deps;

    tokio::spawn(async move {
        tracing::info!(
            poll_interval = runtime.poll_interval_secs(),
            "Scheduler started"
        );
        loop {
            let snapshot = collector.collect(runtime.collect_settings()).await;
            let snapshot = publisher.publish(snapshot);

            if let Some(url) = runtime.push_url()
                && let Err(e) = pusher.push(&url, &snapshot).await
            {
                tracing::warn!(
                    error = %e,
                    operation = "push",
                    push_url = %url,
                    "Push failed"
                );
            }

            let delay = runtime.poll_interval();
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = &mut shutdown_rx => {
                    tracing::debug!("Scheduler shutting down");
                    break;
                }
            }
        }
    })
}
