// Process models: top-N ranking entries and on-demand inspection records

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Lightweight per-process sample used for top-N ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    /// Relative to one core, so may exceed 100 on multi-core hosts.
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub rss: u64,
    pub vms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub ip: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub fd: Option<i32>,
    pub family: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub laddr: Endpoint,
    pub raddr: Option<Endpoint>,
    pub status: String,
}

/// Heavy per-pid record, computed per request and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessDetail {
    pub pid: u32,
    pub name: String,
    pub status: String,
    pub cpu_percent: f64,
    pub memory_info: MemoryInfo,
    pub memory_percent: f64,
    pub threads: usize,
    pub username: Option<String>,
    pub io_counters: BTreeMap<String, u64>,
    pub open_files: Vec<String>,
    pub connections: Vec<Connection>,
}

/// Result of inspecting one pid: the detail record, or an error tagged with the pid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProcessReport {
    Detail(Box<ProcessDetail>),
    Error { pid: u32, error: String },
}

impl ProcessReport {
    pub fn error(&self) -> Option<&str> {
        match self {
            ProcessReport::Error { error, .. } => Some(error),
            ProcessReport::Detail(_) => None,
        }
    }

    pub fn pid(&self) -> u32 {
        match self {
            ProcessReport::Detail(d) => d.pid,
            ProcessReport::Error { pid, .. } => *pid,
        }
    }
}
