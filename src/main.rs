use anyhow::Result;
use hostwatch::*;
use std::sync::Arc;
use std::time::Duration;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> Result<()> {
    let app_config = config::AppConfig::load()?;
    logging::init(&app_config.logging)?;
    tracing::info!(
        name = version::NAME,
        version = version::VERSION,
        "Starting"
    );

    let runtime = Arc::new(runtime::RuntimeConfig::from_config(&app_config));
    let source = Arc::new(sources::SysinfoSource::new());
    let collector = Arc::new(collector::Collector::new(source));
    let publisher = Arc::new(publisher::Publisher::new());
    let pusher = push::Pusher::new(Duration::from_secs(app_config.push.timeout_secs))?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let scheduler_handle = scheduler::spawn(scheduler::SchedulerDeps {
        collector,
        publisher: publisher.clone(),
        runtime: runtime.clone(),
        pusher,
        shutdown_rx,
    });

    let app = routes::app(publisher, runtime);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
        } => {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
            let _ = scheduler_handle.await;
        }
    }

    Ok(())
}
