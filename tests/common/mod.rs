// Shared test helpers: a scriptable metric source and snapshot builders
#![allow(dead_code)]

use hostwatch::collector::CollectSettings;
use hostwatch::models::*;
use hostwatch::sources::{MetricSource, SourceError};
use std::collections::BTreeMap;

/// In-memory source. Each flag makes one adapter fail the way a real OS call would.
pub struct FakeSource {
    pub per_core: Vec<f64>,
    pub memory_used_pct: f64,
    pub mounts: Vec<&'static str>,
    pub failing_mounts: Vec<&'static str>,
    pub processes: Vec<ProcessSample>,
    pub fail_cpu: bool,
    pub fail_swap: bool,
    pub fail_network: bool,
    pub fail_drivers: bool,
    pub fail_interfaces: bool,
    pub panic_in_memory: bool,
}

impl Default for FakeSource {
    fn default() -> Self {
        Self {
            per_core: vec![10.0, 30.0],
            memory_used_pct: 50.0,
            mounts: vec!["/", "/home"],
            failing_mounts: vec![],
            processes: vec![
                process(1, "init", 0.0),
                process(42, "postgres", 12.5),
                process(77, "cargo", 55.0),
            ],
            fail_cpu: false,
            fail_swap: false,
            fail_network: false,
            fail_drivers: false,
            fail_interfaces: false,
            panic_in_memory: false,
        }
    }
}

pub fn process(pid: u32, name: &str, cpu_percent: f64) -> ProcessSample {
    ProcessSample {
        pid,
        name: name.into(),
        cpu_percent,
        memory_percent: 1.0,
        username: Some("root".into()),
    }
}

pub fn settings(top_process_count: usize) -> CollectSettings {
    CollectSettings {
        top_process_count,
        cpu_alert_threshold: 90.0,
        mem_alert_threshold: 90.0,
    }
}

impl MetricSource for FakeSource {
    fn hardware(&self) -> HardwareInfo {
        HardwareInfo {
            system: Some("Linux".into()),
            manufacturer: Some("ACME".into()),
            ..Default::default()
        }
    }

    fn cpu(&self) -> Result<CpuBlock, SourceError> {
        if self.fail_cpu {
            return Err(SourceError::Unavailable {
                what: "cpu",
                reason: "no logical cores reported".into(),
            });
        }
        Ok(CpuBlock::from_per_core(Some(1), self.per_core.clone()))
    }

    fn memory(&self) -> Result<MemoryBlock, SourceError> {
        if self.panic_in_memory {
            panic!("memory counters exploded");
        }
        let total = 1000;
        let used = (self.memory_used_pct * 10.0) as u64;
        Ok(MemoryBlock {
            total,
            available: total - used,
            used,
            used_pct: percent(used, total),
        })
    }

    fn swap(&self) -> Result<SwapBlock, SourceError> {
        if self.fail_swap {
            return Err(SourceError::Unavailable {
                what: "swap",
                reason: "permission denied".into(),
            });
        }
        Ok(SwapBlock {
            total: 200,
            used: 50,
            free: 150,
            used_pct: 25.0,
        })
    }

    fn partitions(&self) -> Result<Vec<Partition>, SourceError> {
        Ok(self
            .mounts
            .iter()
            .map(|m| Partition {
                device: format!("/dev/fake{}", m.len()),
                mountpoint: m.to_string(),
                fstype: "ext4".into(),
            })
            .collect())
    }

    fn disk_usage(&self, partition: &Partition) -> Result<DiskEntry, SourceError> {
        if self.failing_mounts.contains(&partition.mountpoint.as_str()) {
            return Err(SourceError::MountUnavailable(partition.mountpoint.clone()));
        }
        Ok(DiskEntry {
            device: partition.device.clone(),
            mountpoint: partition.mountpoint.clone(),
            fstype: partition.fstype.clone(),
            total: 100,
            used: 40,
            free: 60,
            used_pct: 40.0,
        })
    }

    fn network(&self) -> Result<NetworkCounters, SourceError> {
        if self.fail_network {
            return Err(SourceError::Unavailable {
                what: "network",
                reason: "no interfaces".into(),
            });
        }
        Ok(NetworkCounters {
            bytes_sent: 10,
            bytes_recv: 20,
            packets_sent: 1,
            packets_recv: 2,
        })
    }

    fn processes(&self) -> Result<Vec<ProcessSample>, SourceError> {
        Ok(self.processes.clone())
    }

    fn drivers(&self) -> Result<usize, SourceError> {
        if self.fail_drivers {
            return Err(SourceError::ToolFailed { tool: "lsmod" });
        }
        Ok(120)
    }

    fn interfaces(&self) -> Result<BTreeMap<String, Vec<String>>, SourceError> {
        if self.fail_interfaces {
            return Err(SourceError::Unavailable {
                what: "interfaces",
                reason: "netlink closed".into(),
            });
        }
        Ok(BTreeMap::from([(
            "lo".to_string(),
            vec!["127.0.0.1".to_string(), "::1".to_string()],
        )]))
    }
}

/// Snapshot whose every numeric field encodes `cycle`, so a reader can detect mixed cycles.
pub fn snapshot_for_cycle(cycle: u64) -> Snapshot {
    Snapshot::Metrics(Box::new(MetricsSnapshot {
        timestamp: format!("cycle-{cycle}"),
        hw: HardwareInfo::default(),
        cpu: CpuBlock::from_per_core(Some(cycle as usize), vec![cycle as f64]),
        memory: MemoryBlock {
            total: cycle,
            available: cycle,
            used: cycle,
            used_pct: 0.0,
        },
        swap: Section::Available(SwapBlock {
            total: cycle,
            used: cycle,
            free: cycle,
            used_pct: 0.0,
        }),
        disks: vec![DiskEntry {
            device: format!("/dev/d{cycle}"),
            mountpoint: "/".into(),
            fstype: "ext4".into(),
            total: cycle,
            used: cycle,
            free: cycle,
            used_pct: 0.0,
        }],
        network: Section::Available(NetworkCounters {
            bytes_sent: cycle,
            bytes_recv: cycle,
            packets_sent: cycle,
            packets_recv: cycle,
        }),
        top_processes: vec![process(cycle as u32, "p", 0.0)],
        drivers: DriverSummary::Lines {
            summary_lines: cycle as usize,
        },
        interfaces: BTreeMap::new(),
    }))
}

/// The cycle a snapshot from `snapshot_for_cycle` was built for; panics if its fields disagree.
pub fn cycle_of(snapshot: &Snapshot) -> u64 {
    let m = snapshot.metrics().expect("metrics snapshot");
    let cycle = m.memory.total;
    let swap = m.swap.available().expect("swap");
    let net = m.network.available().expect("network");
    let consistent = m.timestamp == format!("cycle-{cycle}")
        && m.cpu.physical_cores == Some(cycle as usize)
        && m.memory.used == cycle
        && swap.free == cycle
        && m.disks[0].total == cycle
        && net.packets_recv == cycle
        && m.top_processes[0].pid == cycle as u32
        && m.drivers
            == DriverSummary::Lines {
                summary_lines: cycle as usize,
            };
    assert!(consistent, "snapshot mixes fields from different cycles");
    cycle
}

/// Accepts connections and never answers. Returns the URL to push to.
pub async fn silent_collector() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{addr}/ingest")
}
