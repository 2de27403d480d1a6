//! Server configuration.
//!
//! Values come from (lowest to highest precedence) the built-in defaults, an
//! optional YAML file, the `LISTEN` environment variable and finally the
//! positional port given on the command line.

use anyhow::Context;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming a YAML configuration file.
pub const CONFIG_ENV: &str = "MINIHTTPD_CONFIG";

/// Environment variable overriding the listen address (`host:port`).
pub const LISTEN_ENV: &str = "LISTEN";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind; 0 picks an ephemeral port.
    pub port: u16,
    /// Capacity of the per-connection request buffer. Bounds the longest token.
    pub buffer_size: usize,
    /// Chunk size used when streaming files in and out.
    pub chunk_size: usize,
    /// Ceiling on concurrently served connections. Unbounded when unset.
    pub max_connections: Option<usize>,
    /// Upper bound on the lifetime of one connection. Unbounded when unset.
    pub client_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory request targets are resolved against.
    pub root: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 0,
            buffer_size: 8192,
            chunk_size: 8192,
            max_connections: None,
            client_timeout_secs: None,
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    pub fn client_timeout(&self) -> Option<Duration> {
        self.client_timeout_secs.map(Duration::from_secs)
    }
}

impl LoggingConfig {
    /// Maps the configured level onto a tracing level, falling back to `INFO`.
    pub fn tracing_level(&self) -> tracing::Level {
        self.level.parse().unwrap_or(tracing::Level::INFO)
    }
}

impl Config {
    /// Builds the effective configuration from an optional file, the process
    /// environment and an optional port override.
    pub fn load(path: Option<&Path>, port: Option<u16>) -> anyhow::Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);

        let mut cfg = match path.map(Path::to_path_buf).or(from_env) {
            Some(file) => Self::from_file(&file)?,
            None => Self::default(),
        };

        cfg.apply_env(|key| std::env::var(key).ok())?;

        if let Some(port) = port {
            cfg.server.port = port;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Applies environment overrides through `lookup`, so callers (and tests)
    /// decide where variables come from.
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(listen) = lookup(LISTEN_ENV) {
            let addr: SocketAddr = listen
                .parse()
                .with_context(|| format!("{LISTEN_ENV} is not a socket address: {listen}"))?;
            self.server.host = addr.ip().to_string();
            self.server.port = addr.port();
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.buffer_size < 16 {
            anyhow::bail!("server.buffer_size must be at least 16 bytes");
        }
        if self.server.chunk_size == 0 {
            anyhow::bail!("server.chunk_size must be positive");
        }
        if self.server.max_connections == Some(0) {
            anyhow::bail!("server.max_connections must be positive when set");
        }
        Ok(())
    }
}
