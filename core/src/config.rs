//! Client configuration: which GraphQL endpoint to talk to.
//!
//! Precedence, lowest first: built-in default, `todo-client.toml`,
//! `TODO_GRAPHQL_ENDPOINT`, then whatever the front end overrides with
//! `ClientConfig::with_endpoint`.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3000/graphql";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const CONFIG_FILE: &str = "todo-client.toml";
pub const ENDPOINT_ENV: &str = "TODO_GRAPHQL_ENDPOINT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("graphql endpoint must not be empty")]
    EmptyEndpoint,

    #[error("invalid graphql endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// A config for `endpoint` with default settings otherwise.
    pub fn new(endpoint: &str) -> Result<Self, ConfigError> {
        Self::default().with_endpoint(endpoint)
    }

    /// Load from `path`, or from `todo-client.toml` in the working directory
    /// when `path` is `None`. A missing default file is not an error; a
    /// missing explicit one is.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => read_file(path)?,
            None => match read_file(Path::new(CONFIG_FILE)) {
                Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                    FileConfig::default()
                }
                other => other?,
            },
        };
        let env_endpoint = std::env::var(ENDPOINT_ENV).ok();
        resolve(file, env_endpoint.as_deref())
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, ConfigError> {
        self.endpoint = validate_endpoint(endpoint)?;
        Ok(self)
    }
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve(file: FileConfig, env_endpoint: Option<&str>) -> Result<ClientConfig, ConfigError> {
    let mut config = ClientConfig::default();
    if let Some(endpoint) = file.endpoint.as_deref() {
        config = config.with_endpoint(endpoint)?;
    }
    if let Some(secs) = file.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(endpoint) = env_endpoint {
        config = config.with_endpoint(endpoint)?;
    }
    Ok(config)
}

fn validate_endpoint(raw: &str) -> Result<String, ConfigError> {
    let endpoint = raw.trim();
    if endpoint.is_empty() {
        return Err(ConfigError::EmptyEndpoint);
    }
    let url = Url::parse(endpoint).map_err(|e| ConfigError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(endpoint.to_string())
}
