// Runtime-adjustable settings shared by the scheduler (reader) and POST /config (writer).
// Each field is swapped independently; a reader may see interval and push URL
// from different reconfigurations, which is accepted.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::collector::CollectSettings;
use crate::config::AppConfig;

pub struct RuntimeConfig {
    poll_interval_secs: AtomicU64,
    push_url: RwLock<Option<String>>,
    cpu_alert_threshold: AtomicU64,
    mem_alert_threshold: AtomicU64,
    top_process_count: AtomicUsize,
}

/// Parsed reconfiguration request. `None` leaves the setting unchanged;
/// `push_url: Some(None)` clears it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub poll_interval: Option<u64>,
    pub push_url: Option<Option<String>>,
}

/// Values echoed back by POST /config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigEcho {
    pub ok: bool,
    pub poll_interval: u64,
    pub push_url: Option<String>,
}

impl ConfigUpdate {
    /// Lenient parse: malformed or out-of-range values are dropped, not rejected.
    pub fn from_json(body: &Value) -> Self {
        let poll_interval = body.get("poll_interval").and_then(parse_interval);
        let push_url = match body.get("push_url") {
            None => None,
            Some(Value::Null) => Some(None),
            Some(Value::String(s)) if s.trim().is_empty() => Some(None),
            Some(Value::String(s)) => Some(Some(s.trim().to_string())),
            Some(_) => None,
        };
        Self {
            poll_interval,
            push_url,
        }
    }
}

/// Whole seconds >= 1. Accepts integers, floats (truncated) and numeric strings.
fn parse_interval(v: &Value) -> Option<u64> {
    let secs = match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    u64::try_from(secs).ok().filter(|&s| s >= 1)
}

impl RuntimeConfig {
    pub fn new(
        poll_interval_secs: u64,
        push_url: Option<String>,
        settings: CollectSettings,
    ) -> Self {
        Self {
            poll_interval_secs: AtomicU64::new(poll_interval_secs.max(1)),
            push_url: RwLock::new(push_url),
            cpu_alert_threshold: AtomicU64::new(settings.cpu_alert_threshold.to_bits()),
            mem_alert_threshold: AtomicU64::new(settings.mem_alert_threshold.to_bits()),
            top_process_count: AtomicUsize::new(settings.top_process_count),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.monitoring.poll_interval_secs,
            config.push.url.clone(),
            CollectSettings {
                top_process_count: config.monitoring.top_process_count,
                cpu_alert_threshold: config.monitoring.cpu_alert_threshold,
                mem_alert_threshold: config.monitoring.mem_alert_threshold,
            },
        )
    }

    pub fn poll_interval_secs(&self) -> u64 {
        self.poll_interval_secs.load(Ordering::Relaxed)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs())
    }

    pub fn push_url(&self) -> Option<String> {
        self.push_url
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn collect_settings(&self) -> CollectSettings {
        CollectSettings {
            top_process_count: self.top_process_count.load(Ordering::Relaxed),
            cpu_alert_threshold: f64::from_bits(self.cpu_alert_threshold.load(Ordering::Relaxed)),
            mem_alert_threshold: f64::from_bits(self.mem_alert_threshold.load(Ordering::Relaxed)),
        }
    }

    /// Applies the fields present in `update` and returns the resulting values.
    pub fn apply(&self, update: ConfigUpdate) -> ConfigEcho {
        if let Some(secs) = update.poll_interval {
            self.poll_interval_secs.store(secs, Ordering::Relaxed);
            tracing::info!(poll_interval = secs, "poll interval changed");
        }
        if let Some(url) = update.push_url {
            tracing::info!(push_url = ?url, "push URL changed");
            *self.push_url.write().unwrap_or_else(PoisonError::into_inner) = url;
        }
        ConfigEcho {
            ok: true,
            poll_interval: self.poll_interval_secs(),
            push_url: self.push_url(),
        }
    }
}
