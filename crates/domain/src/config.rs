//! Process configuration, loaded by each binary from a YAML file; every
//! field has a sensible default so `Config::default()` is a usable dev
//! configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub db: DbConfig,
    pub auth: AuthConfig,
    pub healthcheck_path: String,
    pub scheduler_cycle_time: u64,
    pub notifier: NotifierConfig,
    pub reminder: ReminderConfig,
    pub user_validator: UserValidatorConfig,
    pub messengers: Vec<MessengerConfig>,
    pub iris_plan_integration: IrisPlanIntegrationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            db: DbConfig::default(),
            auth: AuthConfig::default(),
            healthcheck_path: "/healthcheck".to_string(),
            scheduler_cycle_time: 3600,
            notifier: NotifierConfig::default(),
            reminder: ReminderConfig::default(),
            user_validator: UserValidatorConfig::default(),
            messengers: Vec::new(),
            iris_plan_integration: IrisPlanIntegrationConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DbConfig {
    /// Connection string for the backing store's persistence file/dir.
    /// Named `conn_str` to mirror the familiar `db.conn.str` config key.
    pub conn_str: String,
    pub driver_kwargs: std::collections::HashMap<String, String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub module: String,
    pub sso_module: Option<String>,
    /// Bypasses all checks and may synthesize a test user.
    pub debug: bool,
    pub require_auth: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            module: "hmac".to_string(),
            sso_module: None,
            debug: false,
            require_auth: true,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    pub default_timezone: String,
    /// When true, sends go to a logging "blackhole" instead of a
    /// messenger transport.
    pub skipsend: bool,
    pub poll_interval_seconds: u64,
    pub sender_count: usize,
    pub channel_capacity: usize,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            default_timezone: "US/Pacific".to_string(),
            skipsend: false,
            poll_interval_seconds: 60,
            sender_count: 8,
            channel_capacity: 1024,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    pub activated: bool,
    pub interval_seconds: u64,
    pub lookahead_seconds: i64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            activated: false,
            interval_seconds: 300,
            lookahead_seconds: 3600,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct UserValidatorConfig {
    pub activated: bool,
    pub interval_seconds: u64,
    pub subject: String,
    pub body: String,
}

impl Default for UserValidatorConfig {
    fn default() -> Self {
        Self {
            activated: false,
            interval_seconds: 86400,
            subject: "Missing call contact".to_string(),
            body: "You have upcoming on-call shifts but no call contact on file.".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MessengerConfig {
    pub name: String,
    pub mode: String,
    pub options: std::collections::HashMap<String, String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct IrisPlanIntegrationConfig {
    pub activated: bool,
    pub api_host: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigSeverity {
    Warning,
    Error,
}

pub struct ConfigIssue {
    pub severity: ConfigSeverity,
    pub message: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Config {
    /// Load from a YAML file, falling back to defaults if `path` doesn't
    /// exist.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            Ok(serde_yaml::from_str(&raw)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.server.port == 0 {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Error,
                message: "server.port must be nonzero".to_string(),
            });
        }
        if !self.auth.require_auth && !self.auth.debug {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Warning,
                message: "auth.require_auth is false outside of debug mode".to_string(),
            });
        }
        if self.scheduler_cycle_time == 0 {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Error,
                message: "scheduler_cycle_time must be nonzero".to_string(),
            });
        }
        issues
    }
}
