use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use client_logging::{client_info, client_warn};
use report_core::{FormSettings, ReportDefaults};
use report_engine::ClientSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "news_report.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("tasks_base is not a usable URL: {0}")]
    InvalidTasksBase(String),
}

/// Client settings read from a RON file. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub tasks_base: String,
    pub poll_interval_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub language: String,
    pub time_range: String,
    pub count_hint: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        let defaults = ReportDefaults::default();
        Self {
            tasks_base: client.tasks_base,
            poll_interval_ms: client.poll_interval.as_millis() as u64,
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.as_secs(),
            language: defaults.language,
            time_range: defaults.time_range,
            count_hint: defaults.count_hint,
        }
    }
}

impl ClientConfig {
    /// Loads `path`, or `./news_report.ron` when no path is given and that file exists.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::read(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::read(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = ron::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        client_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn with_tasks_base(mut self, tasks_base: Option<String>) -> Self {
        if let Some(tasks_base) = tasks_base {
            self.tasks_base = tasks_base;
        }
        self
    }

    pub fn client_settings(&self) -> ClientSettings {
        let mut poll_interval_ms = self.poll_interval_ms;
        if poll_interval_ms == 0 {
            client_warn!("poll_interval_ms is 0, using the default");
            poll_interval_ms = ClientConfig::default().poll_interval_ms;
        }
        ClientSettings {
            tasks_base: self.tasks_base.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            poll_interval: Duration::from_millis(poll_interval_ms),
        }
    }

    /// Form settings; the service origin is the scheme, host and port of `tasks_base`.
    pub fn form_settings(&self) -> Result<FormSettings, ConfigError> {
        let base = Url::parse(&self.tasks_base)
            .map_err(|err| ConfigError::InvalidTasksBase(err.to_string()))?;
        let origin = base.origin();
        if !origin.is_tuple() {
            return Err(ConfigError::InvalidTasksBase(self.tasks_base.clone()));
        }
        Ok(FormSettings {
            defaults: ReportDefaults {
                language: self.language.clone(),
                time_range: self.time_range.clone(),
                count_hint: self.count_hint.clone(),
            },
            service_origin: origin.ascii_serialization(),
        })
    }
}
