// Snapshot collector: one collection pass over all metric sources.
// Adapter failures degrade their own sub-record; only CPU, memory and the
// process listing are essential, and their failure degrades the whole snapshot.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::{info, warn};

use crate::models::{DriverSummary, MetricsSnapshot, ProcessSample, Section, Snapshot};
use crate::sources::{MetricSource, SourceError};

/// Per-pass values read from the runtime config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectSettings {
    pub top_process_count: usize,
    pub cpu_alert_threshold: f64,
    pub mem_alert_threshold: f64,
}

pub struct Collector {
    source: Arc<dyn MetricSource>,
}

impl Collector {
    pub fn new(source: Arc<dyn MetricSource>) -> Self {
        Self { source }
    }

    /// Runs one pass on the blocking pool. Never fails: a panic inside the
    /// pass comes back as a join error and is turned into `Snapshot::Failed`.
    pub async fn collect(&self, settings: CollectSettings) -> Snapshot {
        let source = self.source.clone();
        match tokio::task::spawn_blocking(move || collect_blocking(source.as_ref(), &settings))
            .await
        {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, operation = "collect", "collection task aborted");
                Snapshot::failed(format!("collection task aborted: {e}"))
            }
        }
    }
}

/// Synchronous collection pass. Logs the cycle summary and threshold alerts.
pub fn collect_blocking(source: &dyn MetricSource, settings: &CollectSettings) -> Snapshot {
    match assemble(source, settings) {
        Ok(metrics) => {
            log_cycle(&metrics, settings);
            Snapshot::Metrics(Box::new(metrics))
        }
        Err(e) => {
            warn!(error = %e, operation = "collect", "collection pass failed");
            Snapshot::failed(e.to_string())
        }
    }
}

fn assemble(
    source: &dyn MetricSource,
    settings: &CollectSettings,
) -> Result<MetricsSnapshot, SourceError> {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
    let hw = source.hardware();
    let cpu = source.cpu()?;
    let memory = source.memory()?;
    let swap = section("swap", source.swap());

    let disks = match source.partitions() {
        Ok(partitions) => partitions
            .iter()
            .filter_map(|p| match source.disk_usage(p) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!(error = %e, mountpoint = %p.mountpoint, "disk entry dropped");
                    None
                }
            })
            .collect(),
        Err(e) => {
            warn!(error = %e, operation = "partitions", "disk listing failed");
            Vec::new()
        }
    };

    let network = section("network", source.network());
    let top_processes = rank_top_processes(source.processes()?, settings.top_process_count);

    let drivers = match source.drivers() {
        Ok(summary_lines) => DriverSummary::Lines { summary_lines },
        Err(e) => DriverSummary::Failed {
            error: e.to_string(),
        },
    };

    let interfaces = source.interfaces().unwrap_or_else(|e| {
        warn!(error = %e, operation = "interfaces", "interface listing failed");
        Default::default()
    });

    Ok(MetricsSnapshot {
        timestamp,
        hw,
        cpu,
        memory,
        swap,
        disks,
        network,
        top_processes,
        drivers,
        interfaces,
    })
}

fn section<T>(what: &'static str, result: Result<T, SourceError>) -> Section<T> {
    match result {
        Ok(v) => Section::Available(v),
        Err(e) => {
            warn!(error = %e, operation = what, "sub-record unavailable");
            Section::Unavailable {
                error: e.to_string(),
            }
        }
    }
}

/// Top `k` processes by CPU% descending. The sort is stable, so equal CPU%
/// keeps the order in which the OS enumerated the processes.
pub fn rank_top_processes(mut processes: Vec<ProcessSample>, k: usize) -> Vec<ProcessSample> {
    processes.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));
    processes.truncate(k);
    processes
}

fn log_cycle(m: &MetricsSnapshot, settings: &CollectSettings) {
    let cpu_avg = m.cpu.avg_pct;
    let mem_pct = m.memory.used_pct;
    let disks = m
        .disks
        .iter()
        .map(|d| format!("{}:{}%", d.mountpoint, d.used_pct))
        .collect::<Vec<_>>()
        .join(", ");
    let top = m
        .top_processes
        .iter()
        .map(|p| format!("{}({}%)", p.name, p.cpu_percent))
        .collect::<Vec<_>>()
        .join(", ");
    info!(
        "[metrics] CPU(avg)={:.1}% MEM={:.1}% DISKS={} TOPPROC={}",
        cpu_avg, mem_pct, disks, top
    );

    if cpu_avg > settings.cpu_alert_threshold {
        warn!(
            cpu_avg,
            threshold = settings.cpu_alert_threshold,
            "[alert] CPU average high: {:.1}%",
            cpu_avg
        );
    }
    if mem_pct > settings.mem_alert_threshold {
        warn!(
            mem_pct,
            threshold = settings.mem_alert_threshold,
            "[alert] memory usage high: {:.1}%",
            mem_pct
        );
    }
}
