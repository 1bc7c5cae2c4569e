// CPU, memory, swap, network, driver and hardware identity models

use serde::{Deserialize, Serialize};

/// Best-effort hardware and OS identity. Every field is `null` when its source is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwareInfo {
    pub system: Option<String>,
    pub node: Option<String>,
    pub release: Option<String>,
    pub version: Option<String>,
    pub machine: Option<String>,
    pub processor: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuBlock {
    pub physical_cores: Option<usize>,
    pub total_cores: usize,
    /// Utilization per logical core, in percent.
    pub usage_pct: Vec<f64>,
    pub avg_pct: f64,
}

impl CpuBlock {
    pub fn from_per_core(physical_cores: Option<usize>, usage_pct: Vec<f64>) -> Self {
        let avg_pct = if usage_pct.is_empty() {
            0.0
        } else {
            usage_pct.iter().sum::<f64>() / usage_pct.len() as f64
        };
        Self {
            physical_cores,
            total_cores: usage_pct.len(),
            usage_pct,
            avg_pct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryBlock {
    pub total: u64,
    pub available: u64,
    pub used: u64,
    pub used_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapBlock {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub used_pct: f64,
}

/// Cumulative counters across all interfaces since boot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub packets_sent: u64,
    pub packets_recv: u64,
}

/// Line count of the platform driver listing, or a marker naming the tool that failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DriverSummary {
    Lines { summary_lines: usize },
    Failed { error: String },
}

/// `part / whole` in percent, rounded to one decimal; 0 when `whole` is 0.
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let pct = (part as f64 / whole as f64) * 100.0;
    (pct * 10.0).round() / 10.0
}
