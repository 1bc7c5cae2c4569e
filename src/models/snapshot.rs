// Snapshot published by the scheduler and served on GET /metrics

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    CpuBlock, DiskEntry, DriverSummary, HardwareInfo, MemoryBlock, NetworkCounters,
    ProcessSample, SwapBlock,
};

/// A sub-record that is either present or replaced by the reason it could not be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Section<T> {
    Available(T),
    Unavailable { error: String },
}

impl<T> Section<T> {
    pub fn available(&self) -> Option<&T> {
        match self {
            Section::Available(v) => Some(v),
            Section::Unavailable { .. } => None,
        }
    }
}

/// One fully assembled collection pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Capture time, RFC 3339 in UTC.
    pub timestamp: String,
    pub hw: HardwareInfo,
    pub cpu: CpuBlock,
    pub memory: MemoryBlock,
    pub swap: Section<SwapBlock>,
    pub disks: Vec<DiskEntry>,
    pub network: Section<NetworkCounters>,
    pub top_processes: Vec<ProcessSample>,
    pub drivers: DriverSummary,
    pub interfaces: BTreeMap<String, Vec<String>>,
}

/// Immutable value held by the publisher. Serializes untagged, so the JSON is
/// the metrics record itself, `{"error": ...}` or `{"status": "empty"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Snapshot {
    Metrics(Box<MetricsSnapshot>),
    Failed { error: String },
    Empty { status: String },
}

impl Snapshot {
    /// Sentinel served before the first collection pass completes.
    pub fn empty() -> Self {
        Snapshot::Empty {
            status: "empty".into(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Snapshot::Failed {
            error: error.into(),
        }
    }

    pub fn metrics(&self) -> Option<&MetricsSnapshot> {
        match self {
            Snapshot::Metrics(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Snapshot::Empty { .. })
    }
}
