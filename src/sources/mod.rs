// Metric source adapters: one accessor per OS counter category

#[cfg_attr(windows, allow(dead_code))]
mod linux;
mod sysinfo_source;
#[cfg_attr(not(windows), allow(dead_code))]
mod windows;

use std::collections::BTreeMap;

use crate::models::{
    CpuBlock, DiskEntry, HardwareInfo, MemoryBlock, NetworkCounters, Partition, ProcessSample,
    SwapBlock,
};

pub use sysinfo_source::SysinfoSource;

/// Failure local to one adapter. The collector degrades only the affected sub-record.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("{what} unavailable: {reason}")]
    Unavailable { what: &'static str, reason: String },
    #[error("mount point {0} could not be resolved")]
    MountUnavailable(String),
    #[error("{tool}_failed")]
    ToolFailed { tool: &'static str },
}

/// Read-only access to OS counters. Methods block and are called from the blocking pool.
///
/// `disk_usage` is queried once per partition so that a mount point which fails
/// to resolve drops only its own entry.
pub trait MetricSource: Send + Sync {
    fn hardware(&self) -> HardwareInfo;
    fn cpu(&self) -> Result<CpuBlock, SourceError>;
    fn memory(&self) -> Result<MemoryBlock, SourceError>;
    fn swap(&self) -> Result<SwapBlock, SourceError>;
    fn partitions(&self) -> Result<Vec<Partition>, SourceError>;
    fn disk_usage(&self, partition: &Partition) -> Result<DiskEntry, SourceError>;
    fn network(&self) -> Result<NetworkCounters, SourceError>;
    fn processes(&self) -> Result<Vec<ProcessSample>, SourceError>;
    /// Number of lines printed by the platform driver listing tool.
    fn drivers(&self) -> Result<usize, SourceError>;
    fn interfaces(&self) -> Result<BTreeMap<String, Vec<String>>, SourceError>;
}

/// Vendor and model of the machine. Windows asks WMI, everything else reads DMI files.
pub(crate) fn vendor_and_model() -> (Option<String>, Option<String>) {
    #[cfg(windows)]
    {
        windows::computer_system()
    }
    #[cfg(not(windows))]
    {
        (
            linux::read_dmi_field("sys_vendor"),
            linux::read_dmi_field("product_name"),
        )
    }
}

/// Runs the driver listing tool for this platform and counts its output lines.
pub(crate) fn count_driver_lines() -> Result<usize, SourceError> {
    #[cfg(windows)]
    {
        windows::driverquery_lines()
    }
    #[cfg(not(windows))]
    {
        linux::lsmod_lines()
    }
}
