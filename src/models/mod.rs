// Domain models: periodic snapshot, top processes, per-pid inspection

mod process;
mod snapshot;
mod storage;
mod system;

pub use process::{Connection, Endpoint, MemoryInfo, ProcessDetail, ProcessReport, ProcessSample};
pub use snapshot::{MetricsSnapshot, Section, Snapshot};
pub use storage::{DiskEntry, Partition};
pub use system::{
    CpuBlock, DriverSummary, HardwareInfo, MemoryBlock, NetworkCounters, SwapBlock, percent,
};
