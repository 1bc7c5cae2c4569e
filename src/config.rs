use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub push: PushConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

/// Initial values of the runtime config; poll interval and push URL can change later via POST /config.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_top_process_count")]
    pub top_process_count: usize,
    #[serde(default = "default_alert_threshold")]
    pub cpu_alert_threshold: f64,
    #[serde(default = "default_alert_threshold")]
    pub mem_alert_threshold: f64,
}

fn default_poll_interval_secs() -> u64 {
    3
}

fn default_top_process_count() -> usize {
    8
}

fn default_alert_threshold() -> f64 {
    90.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushConfig {
    /// Remote collector URL; absent disables push.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_push_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_push_timeout_secs(),
        }
    }
}

fn default_push_timeout_secs() -> u64 {
    5
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    Console,
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; RUST_LOG takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_target")]
    pub target: LogTarget,
    /// Appended to (in addition to stdout) when `target = "file"`.
    #[serde(default = "default_log_file")]
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            target: default_log_target(),
            file: default_log_file(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_target() -> LogTarget {
    LogTarget::Console
}

fn default_log_file() -> String {
    "./hostwatch.log".into()
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.server.host.is_empty(),
            "server.host must be non-empty"
        );
        anyhow::ensure!(
            self.monitoring.poll_interval_secs >= 1,
            "monitoring.poll_interval_secs must be >= 1, got {}",
            self.monitoring.poll_interval_secs
        );
        anyhow::ensure!(
            self.monitoring.top_process_count > 0,
            "monitoring.top_process_count must be > 0, got {}",
            self.monitoring.top_process_count
        );
        for (name, value) in [
            ("cpu_alert_threshold", self.monitoring.cpu_alert_threshold),
            ("mem_alert_threshold", self.monitoring.mem_alert_threshold),
        ] {
            anyhow::ensure!(
                value > 0.0 && value <= 100.0,
                "monitoring.{} must be in (0, 100], got {}",
                name,
                value
            );
        }
        anyhow::ensure!(
            self.push.timeout_secs > 0,
            "push.timeout_secs must be > 0, got {}",
            self.push.timeout_secs
        );
        if let Some(url) = &self.push.url {
            anyhow::ensure!(!url.trim().is_empty(), "push.url must be non-empty when set");
        }
        anyhow::ensure!(
            self.logging.target != LogTarget::File || !self.logging.file.is_empty(),
            "logging.file must be non-empty when logging.target = \"file\""
        );
        Ok(())
    }
}
