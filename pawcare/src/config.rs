use std::fs;

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt as tracing_fmt;
use tracing_subscriber::prelude::*;
use uuid::Uuid;

use common::{CategoryCode, InvalidCategory, ProblemCategory, User};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    #[default]
    Daily,
    Weekly,
    Never,
}

impl LogRotation {
    #[must_use]
    pub const fn to_rotation(self) -> Rotation {
        match self {
            Self::Daily => Rotation::DAILY,
            Self::Weekly => Rotation::WEEKLY,
            Self::Never => Rotation::NEVER,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

const fn default_max_log_files() -> usize {
    7
}

const fn default_active() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub server: Server,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub users: Vec<UserEntry>,
    #[serde(default)]
    pub categories: Vec<CategorySeed>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Server {
    pub listen: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    pub dir: String,
    #[serde(default)]
    pub rotation: LogRotation,
    #[serde(default = "default_max_log_files")]
    pub max_log_files: usize,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            dir: "/tmp".to_string(),
            rotation: LogRotation::default(),
            max_log_files: default_max_log_files(),
            format: LogFormat::default(),
        }
    }
}

/// A principal known to the authentication layer, with its bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserEntry {
    pub id: Uuid,
    pub email: String,
    pub token: Uuid,
}

impl UserEntry {
    #[must_use]
    pub fn user(&self) -> User {
        User {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

/// Problem category loaded into the store at startup.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CategorySeed {
    pub code: CategoryCode,
    pub name: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl CategorySeed {
    pub fn to_category(&self) -> Result<ProblemCategory, InvalidCategory> {
        ProblemCategory::new(self.code.clone(), &self.name, self.priority, self.active)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Failed to setup logging: {0}")]
    LoggingSetup(tracing_appender::rolling::InitError),
}

impl Config {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let config_file = fs::read_to_string(path)?;
        let cfg: Self = toml::from_str(&config_file)?;
        Ok(cfg)
    }

    pub fn init_logger(&self) -> Result<(WorkerGuard, WorkerGuard), ConfigError> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let (stdout_nb, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());

        let file_appender = Builder::new()
            .rotation(self.logging.rotation.to_rotation())
            .filename_prefix("pawcare")
            .filename_suffix("log")
            .max_log_files(self.logging.max_log_files)
            .build(&self.logging.dir)
            .map_err(ConfigError::LoggingSetup)?;
        let (file_nb, file_guard) = tracing_appender::non_blocking(file_appender);

        let registry = tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_fmt::layer().with_writer(stdout_nb));

        match self.logging.format {
            LogFormat::Text => {
                registry
                    .with(tracing_fmt::layer().with_writer(file_nb))
                    .init();
            }
            LogFormat::Json => {
                registry
                    .with(tracing_fmt::layer().json().with_writer(file_nb))
                    .init();
            }
        }

        Ok((stdout_guard, file_guard))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: Server {
                listen: "127.0.0.1:8080".to_string(),
            },
            logging: Logging::default(),
            users: Vec::new(),
            categories: Vec::new(),
        }
    }
}
