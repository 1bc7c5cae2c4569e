// Production metric source backed by sysinfo

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use sysinfo::{
    Disks, Networks, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind, Users,
};
use tracing::instrument;

use super::{MetricSource, SourceError};
use crate::models::{
    CpuBlock, DiskEntry, HardwareInfo, MemoryBlock, NetworkCounters, Partition, ProcessSample,
    SwapBlock, percent,
};

/// Holds the sysinfo handles between cycles so CPU usage is measured since the previous pass.
pub struct SysinfoSource {
    sys: Mutex<System>,
    disks: Mutex<Disks>,
    networks: Mutex<Networks>,
    users: Mutex<Users>,
    hardware: OnceLock<HardwareInfo>,
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

// Handles are refreshed on every pass, so state left by a panicking holder is harmless.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

impl SysinfoSource {
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        Self {
            sys: Mutex::new(sys),
            disks: Mutex::new(Disks::new_with_refreshed_list()),
            networks: Mutex::new(Networks::new_with_refreshed_list()),
            users: Mutex::new(Users::new_with_refreshed_list()),
            hardware: OnceLock::new(),
        }
    }

    fn read_hardware(&self) -> HardwareInfo {
        let processor = lock(&self.sys)
            .cpus()
            .first()
            .map(|c| c.brand().trim().to_string())
            .filter(|s| !s.is_empty());
        let (manufacturer, model) = super::vendor_and_model();
        HardwareInfo {
            system: System::name(),
            node: System::host_name(),
            release: System::kernel_version(),
            version: System::os_version(),
            machine: Some(std::env::consts::ARCH.to_string()),
            processor,
            manufacturer,
            model,
        }
    }
}

impl MetricSource for SysinfoSource {
    fn hardware(&self) -> HardwareInfo {
        self.hardware.get_or_init(|| self.read_hardware()).clone()
    }

    #[instrument(skip(self), level = "debug", fields(source = "sysinfo", operation = "cpu"))]
    fn cpu(&self) -> Result<CpuBlock, SourceError> {
        let mut sys = lock(&self.sys);
        sys.refresh_cpu_usage();
        let per_core: Vec<f64> = sys
            .cpus()
            .iter()
            .map(|c| round1((c.cpu_usage() as f64).clamp(0.0, 100.0)))
            .collect();
        if per_core.is_empty() {
            return Err(SourceError::Unavailable {
                what: "cpu",
                reason: "no logical cores reported".into(),
            });
        }
        Ok(CpuBlock::from_per_core(
            System::physical_core_count(),
            per_core,
        ))
    }

    #[instrument(skip(self), level = "debug", fields(source = "sysinfo", operation = "memory"))]
    fn memory(&self) -> Result<MemoryBlock, SourceError> {
        let mut sys = lock(&self.sys);
        sys.refresh_memory();
        let total = sys.total_memory();
        if total == 0 {
            return Err(SourceError::Unavailable {
                what: "memory",
                reason: "total memory reported as zero".into(),
            });
        }
        let available = sys.available_memory();
        let used = total.saturating_sub(available);
        Ok(MemoryBlock {
            total,
            available,
            used,
            used_pct: percent(used, total),
        })
    }

    fn swap(&self) -> Result<SwapBlock, SourceError> {
        let sys = lock(&self.sys);
        // refresh_memory in memory() also covers swap
        let total = sys.total_swap();
        let used = sys.used_swap();
        Ok(SwapBlock {
            total,
            used,
            free: sys.free_swap(),
            used_pct: percent(used, total),
        })
    }

    fn partitions(&self) -> Result<Vec<Partition>, SourceError> {
        let mut disks = lock(&self.disks);
        disks.refresh(true);
        Ok(disks
            .list()
            .iter()
            .map(|d| Partition {
                device: d.name().to_string_lossy().into_owned(),
                mountpoint: d.mount_point().to_string_lossy().into_owned(),
                fstype: d.file_system().to_string_lossy().into_owned(),
            })
            .collect())
    }

    fn disk_usage(&self, partition: &Partition) -> Result<DiskEntry, SourceError> {
        let disks = lock(&self.disks);
        let disk = disks
            .list()
            .iter()
            .find(|d| d.mount_point().to_string_lossy() == partition.mountpoint.as_str())
            .ok_or_else(|| SourceError::MountUnavailable(partition.mountpoint.clone()))?;
        let total = disk.total_space();
        let free = disk.available_space();
        let used = total.saturating_sub(free);
        Ok(DiskEntry {
            device: partition.device.clone(),
            mountpoint: partition.mountpoint.clone(),
            fstype: partition.fstype.clone(),
            total,
            used,
            free,
            used_pct: percent(used, total),
        })
    }

    fn network(&self) -> Result<NetworkCounters, SourceError> {
        let mut networks = lock(&self.networks);
        networks.refresh(true);
        Ok(networks
            .list()
            .values()
            .fold(NetworkCounters::default(), |mut acc, data| {
                acc.bytes_sent += data.total_transmitted();
                acc.bytes_recv += data.total_received();
                acc.packets_sent += data.total_packets_transmitted();
                acc.packets_recv += data.total_packets_received();
                acc
            }))
    }

    #[instrument(skip(self), level = "debug", fields(source = "sysinfo", operation = "processes"))]
    fn processes(&self) -> Result<Vec<ProcessSample>, SourceError> {
        let mut sys = lock(&self.sys);
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing()
                .with_cpu()
                .with_memory()
                .with_user(UpdateKind::OnlyIfNotSet),
        );
        let total_memory = sys.total_memory();
        let mut users = lock(&self.users);
        // accounts created after startup
        if sys
            .processes()
            .values()
            .filter_map(|p| p.user_id())
            .any(|uid| users.get_user_by_id(uid).is_none())
        {
            users.refresh();
        }
        Ok(sys
            .processes()
            .iter()
            .map(|(pid, p)| ProcessSample {
                pid: pid.as_u32(),
                name: p.name().to_string_lossy().into_owned(),
                cpu_percent: round1(p.cpu_usage() as f64),
                memory_percent: percent(p.memory(), total_memory),
                username: p
                    .user_id()
                    .and_then(|uid| users.get_user_by_id(uid))
                    .map(|u| u.name().to_string()),
            })
            .collect())
    }

    fn drivers(&self) -> Result<usize, SourceError> {
        super::count_driver_lines()
    }

    fn interfaces(&self) -> Result<BTreeMap<String, Vec<String>>, SourceError> {
        let mut networks = lock(&self.networks);
        networks.refresh(true);
        Ok(networks
            .list()
            .iter()
            .map(|(name, data)| {
                let mut addrs: Vec<String> = data
                    .ip_networks()
                    .iter()
                    .map(|n| n.addr.to_string())
                    .collect();
                let mac = data.mac_address();
                if !mac.is_unspecified() {
                    addrs.push(mac.to_string());
                }
                (name.clone(), addrs)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_while_holding_sys_does_not_break_later_cycles() {
        let source = SysinfoSource::new();
        let poisoned = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = source.sys.lock().unwrap();
            panic!("collector pass panicked");
        }));
        assert!(poisoned.is_err());
        assert!(source.sys.is_poisoned());

        for _ in 0..3 {
            assert!(source.cpu().is_ok());
            assert!(source.memory().is_ok());
            assert!(source.processes().is_ok());
        }
    }

    #[test]
    fn unknown_uid_reloads_user_list() {
        let source = SysinfoSource::new();
        *source.users.lock().unwrap() = Users::new();

        let own = std::process::id();
        let sample = source
            .processes()
            .unwrap()
            .into_iter()
            .find(|p| p.pid == own)
            .expect("own process listed");

        let sys = source.sys.lock().unwrap();
        let expected = sys
            .process(sysinfo::Pid::from_u32(own))
            .and_then(|p| p.user_id())
            .and_then(|uid| {
                Users::new_with_refreshed_list()
                    .get_user_by_id(uid)
                    .map(|u| u.name().to_string())
            });
        assert_eq!(sample.username, expected);
    }
}
