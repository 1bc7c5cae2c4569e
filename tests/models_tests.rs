// Model serialization tests (JSON field names and untagged shapes)

mod common;

use common::{process, snapshot_for_cycle};
use hostwatch::models::*;
use serde_json::json;

#[test]
fn test_metrics_snapshot_uses_snake_case_keys() {
    let json = serde_json::to_value(snapshot_for_cycle(2)).unwrap();
    for key in [
        "timestamp",
        "hw",
        "cpu",
        "memory",
        "swap",
        "disks",
        "network",
        "top_processes",
        "drivers",
        "interfaces",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert!(json["cpu"].get("usage_pct").is_some());
    assert!(json["cpu"].get("total_cores").is_some());
    assert!(json["disks"][0].get("mountpoint").is_some());
    assert!(json["memory"].get("used_pct").is_some());
}

#[test]
fn test_unavailable_section_serializes_as_error_object() {
    let swap: Section<SwapBlock> = Section::Unavailable {
        error: "swap unavailable: denied".into(),
    };
    assert_eq!(
        serde_json::to_value(&swap).unwrap(),
        json!({ "error": "swap unavailable: denied" })
    );
    let back: Section<SwapBlock> =
        serde_json::from_value(json!({ "error": "swap unavailable: denied" })).unwrap();
    assert!(back.available().is_none());
}

#[test]
fn test_driver_summary_shapes() {
    assert_eq!(
        serde_json::to_value(DriverSummary::Lines { summary_lines: 3 }).unwrap(),
        json!({ "summary_lines": 3 })
    );
    assert_eq!(
        serde_json::to_value(DriverSummary::Failed {
            error: "driverquery_failed".into()
        })
        .unwrap(),
        json!({ "error": "driverquery_failed" })
    );
}

#[test]
fn test_hardware_info_unknown_fields_are_null() {
    let json = serde_json::to_value(HardwareInfo::default()).unwrap();
    assert!(json["manufacturer"].is_null());
    assert!(json["model"].is_null());
}

#[test]
fn test_cpu_block_average() {
    let cpu = CpuBlock::from_per_core(Some(2), vec![10.0, 20.0, 30.0, 40.0]);
    assert_eq!(cpu.total_cores, 4);
    assert_eq!(cpu.avg_pct, 25.0);
    let empty = CpuBlock::from_per_core(None, vec![]);
    assert_eq!(empty.avg_pct, 0.0);
}

#[test]
fn test_percent_rounds_and_handles_zero_total() {
    assert_eq!(percent(1, 3), 33.3);
    assert_eq!(percent(5, 0), 0.0);
    assert_eq!(percent(10, 10), 100.0);
}

#[test]
fn test_process_report_error_shape() {
    let report = ProcessReport::Error {
        pid: 7,
        error: "access denied".into(),
    };
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({ "pid": 7, "error": "access denied" })
    );
}

#[test]
fn test_connection_kind_serializes_as_type() {
    let conn = Connection {
        fd: Some(3),
        family: "AF_INET".into(),
        kind: "SOCK_STREAM".into(),
        laddr: Endpoint {
            ip: "127.0.0.1".into(),
            port: 8000,
        },
        raddr: None,
        status: "LISTEN".into(),
    };
    let json = serde_json::to_value(&conn).unwrap();
    assert_eq!(json["type"], "SOCK_STREAM");
    assert!(json["raddr"].is_null());
}

#[test]
fn test_process_sample_fields() {
    let json = serde_json::to_value(process(9, "nginx", 4.5)).unwrap();
    assert_eq!(
        json,
        json!({
            "pid": 9,
            "name": "nginx",
            "cpu_percent": 4.5,
            "memory_percent": 1.0,
            "username": "root",
        })
    );
}
