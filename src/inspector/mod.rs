// On-demand process inspection for GET /process/{pid}.
// Heavier than the periodic pass (I/O counters, descriptors, sockets) and
// shares no state with it: each call builds its own sysinfo handle.

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
mod procfs;

use std::collections::BTreeMap;

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, Users};
use tracing::instrument;

use crate::models::{Connection, MemoryInfo, ProcessDetail, ProcessReport, percent};

#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("process does not exist")]
    NotFound,
    #[error("access denied")]
    AccessDenied,
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for InspectError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => InspectError::NotFound,
            std::io::ErrorKind::PermissionDenied => InspectError::AccessDenied,
            _ => InspectError::Other(e.to_string()),
        }
    }
}

/// Inspects `pid` on the blocking pool. Every failure comes back as an error
/// record tagged with the pid.
pub async fn inspect(pid: u32) -> ProcessReport {
    match tokio::task::spawn_blocking(move || inspect_blocking(pid)).await {
        Ok(report) => report,
        Err(e) => ProcessReport::Error {
            pid,
            error: e.to_string(),
        },
    }
}

#[instrument(level = "debug", fields(operation = "inspect"))]
pub fn inspect_blocking(pid: u32) -> ProcessReport {
    match collect_detail(pid) {
        Ok(detail) => ProcessReport::Detail(Box::new(detail)),
        Err(e) => {
            tracing::debug!(pid, error = %e, "process inspection failed");
            ProcessReport::Error {
                pid,
                error: e.to_string(),
            }
        }
    }
}

fn collect_detail(pid: u32) -> Result<ProcessDetail, InspectError> {
    #[cfg(target_os = "linux")]
    let stat = procfs::probe(pid)?;

    let sys_pid = Pid::from_u32(pid);
    let mut sys = System::new();
    sys.refresh_memory();
    sys.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[sys_pid]),
        true,
        refresh_kind(),
    );
    let process = sys.process(sys_pid).ok_or(InspectError::NotFound)?;

    let username = process.user_id().and_then(|uid| {
        Users::new_with_refreshed_list()
            .get_user_by_id(uid)
            .map(|u| u.name().to_string())
    });
    #[cfg(target_os = "linux")]
    let threads = stat.num_threads.max(1);
    // tasks() lists secondary threads only
    #[cfg(not(target_os = "linux"))]
    let threads = process.tasks().map_or(1, |t| t.len() + 1);

    Ok(ProcessDetail {
        pid,
        name: process.name().to_string_lossy().into_owned(),
        status: process.status().to_string().to_lowercase(),
        cpu_percent: process.cpu_usage() as f64,
        memory_info: MemoryInfo {
            rss: process.memory(),
            vms: process.virtual_memory(),
        },
        memory_percent: percent(process.memory(), sys.total_memory()),
        threads,
        username,
        io_counters: io_counters(pid, process),
        open_files: open_files(pid),
        connections: connections(pid),
    })
}

// Thread count comes from /proc/<pid>/stat, so the per-task walk is skipped.
#[cfg(target_os = "linux")]
fn refresh_kind() -> ProcessRefreshKind {
    ProcessRefreshKind::everything().without_tasks()
}

#[cfg(not(target_os = "linux"))]
fn refresh_kind() -> ProcessRefreshKind {
    ProcessRefreshKind::everything()
}

#[cfg(target_os = "linux")]
fn io_counters(pid: u32, _process: &sysinfo::Process) -> BTreeMap<String, u64> {
    procfs::io_counters(pid).unwrap_or_else(|e| {
        tracing::debug!(pid, error = %e, "io counters unavailable");
        BTreeMap::new()
    })
}

#[cfg(not(target_os = "linux"))]
fn io_counters(_pid: u32, process: &sysinfo::Process) -> BTreeMap<String, u64> {
    let usage = process.disk_usage();
    BTreeMap::from([
        ("read_bytes".to_string(), usage.total_read_bytes),
        ("write_bytes".to_string(), usage.total_written_bytes),
    ])
}

#[cfg(target_os = "linux")]
fn open_files(pid: u32) -> Vec<String> {
    procfs::open_files(pid).unwrap_or_else(|e| {
        tracing::debug!(pid, error = %e, "open files unavailable");
        Vec::new()
    })
}

#[cfg(not(target_os = "linux"))]
fn open_files(_pid: u32) -> Vec<String> {
    Vec::new()
}

#[cfg(target_os = "linux")]
fn connections(pid: u32) -> Vec<Connection> {
    procfs::connections(pid).unwrap_or_else(|e| {
        tracing::debug!(pid, error = %e, "connections unavailable");
        Vec::new()
    })
}

#[cfg(not(target_os = "linux"))]
fn connections(_pid: u32) -> Vec<Connection> {
    Vec::new()
}
