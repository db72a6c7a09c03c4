use std::{env, net::SocketAddr, path::PathBuf, time::Duration};
use thiserror::Error;
use tracing::info;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/checklist.json";
const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {key}")]
    Invalid { key: &'static str, value: String },

    #[error("{0} must be set when CHECKLIST_BACKEND=remote")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendKind {
    Local { data_path: PathBuf },
    Remote { endpoint: String, timeout: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub backend: BackendKind,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;

        let backend = match lookup("CHECKLIST_BACKEND").as_deref().map(str::trim) {
            None | Some("") | Some("local") => BackendKind::Local {
                data_path: lookup("APP_DATA_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            },
            Some("remote") => {
                let endpoint = lookup("CHECKLIST_REMOTE_URL")
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty())
                    .ok_or(ConfigError::Missing("CHECKLIST_REMOTE_URL"))?;
                let secs = parse_or(
                    "CHECKLIST_REMOTE_TIMEOUT_SECS",
                    lookup("CHECKLIST_REMOTE_TIMEOUT_SECS"),
                    DEFAULT_REMOTE_TIMEOUT_SECS,
                )?;
                BackendKind::Remote {
                    endpoint,
                    timeout: Duration::from_secs(secs),
                }
            }
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "CHECKLIST_BACKEND",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self { port, backend })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub fn log_summary(&self) {
        match &self.backend {
            BackendKind::Local { data_path } => {
                info!(port = self.port, path = %data_path.display(), "using local checklist file");
            }
            BackendKind::Remote { endpoint, timeout } => {
                info!(port = self.port, %endpoint, timeout_secs = timeout.as_secs(), "using remote checklist sheet");
            }
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(ConfigError::Invalid { key, value }),
        },
    }
}
