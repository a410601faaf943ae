//! Server configuration
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! yields a usable configuration. The host and port given on the command line
//! override whatever the file says.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub limits: LimitsConfig,
    pub store: StoreConfig,
}

/// Listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How long a connection may sit idle waiting for bytes before it is closed.
    pub read_timeout_secs: u64,
}

/// Request size limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Upper bound for the per-connection receive buffer.
    pub max_buffer_size: usize,
    /// Largest accepted `Content-Length`.
    pub max_body_size: usize,
    /// Maximum number of lines in a header block, request line included.
    pub max_header_lines: usize,
    /// Maximum length of a single header line, CRLF excluded.
    pub max_header_line_length: usize,
}

/// Dynamic resource store settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Number of slots.
    pub capacity: usize,
    pub content_length_policy: ContentLengthPolicy,
}

/// What to do with a `PUT` that carries no `Content-Length` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentLengthPolicy {
    /// Treat the body as empty.
    #[default]
    Lenient,
    /// Answer 411 Length Required.
    Required,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            read_timeout_secs: 30,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_buffer_size: 16 * 1024,
            max_body_size: 8 * 1024,
            max_header_lines: 100,
            max_header_line_length: 1024,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            content_length_policy: ContentLengthPolicy::default(),
        }
    }
}

impl Config {
    /// Reads and validates a YAML configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let cfg: Config = if s.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(s).context("failed to parse YAML")?
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.store.capacity == 0 {
            anyhow::bail!("store.capacity must be greater than zero");
        }
        if self.limits.max_body_size >= self.limits.max_buffer_size {
            anyhow::bail!(
                "limits.max_body_size ({}) must be smaller than limits.max_buffer_size ({})",
                self.limits.max_body_size,
                self.limits.max_buffer_size
            );
        }
        if self.limits.max_header_lines == 0 || self.limits.max_header_line_length == 0 {
            anyhow::bail!("header limits must be greater than zero");
        }
        if self.server.read_timeout_secs == 0 {
            anyhow::bail!("server.read_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    /// Address string suitable for `TcpListener::bind`.
    pub fn listen_addr(&self) -> String {
        if self.server.host.contains(':') {
            format!("[{}]:{}", self.server.host, self.server.port)
        } else {
            format!("{}:{}", self.server.host, self.server.port)
        }
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.server.read_timeout_secs)
    }
}
