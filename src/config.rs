//! Connection and run configuration
//!
//! The IMAP connection parameters live in a JSON file using the
//! camelCase field names common to IMAP client config files:
//!
//! ```json
//! {
//!   "user": "reports@example.com",
//!   "password": "secret",
//!   "host": "imap.example.com",
//!   "port": 993,
//!   "tls": true,
//!   "tlsOptions": { "rejectUnauthorized": true },
//!   "authTimeout": 10000
//! }
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const IMAPS_PORT: u16 = 993;
const IMAP_PORT: u16 = 143;

/// STARTTLS policy for connections that do not use implicit TLS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoTls {
    /// Stay on plain TCP.
    #[default]
    Never,
    /// Upgrade with STARTTLS.
    Always,
    /// Upgrade with STARTTLS; same behaviour as `Always`, kept so that
    /// existing config files parse.
    Required,
}

impl AutoTls {
    #[must_use]
    pub const fn upgrades(self) -> bool {
        matches!(self, Self::Always | Self::Required)
    }
}

/// Certificate handling for TLS connections.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsOptions {
    /// Verify the server certificate against the Mozilla root set.
    /// Disable for self-signed servers.
    #[serde(default = "default_true")]
    pub reject_unauthorized: bool,
    /// Name used for SNI and verification, defaults to the host.
    pub servername: Option<String>,
}

impl Default for TlsOptions {
    fn default() -> Self {
        Self {
            reject_unauthorized: true,
            servername: None,
        }
    }
}

/// IMAP connection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImapConfig {
    pub host: String,
    pub port: Option<u16>,
    pub user: String,
    pub password: String,
    #[serde(default = "default_true")]
    pub tls: bool,
    #[serde(default)]
    pub autotls: AutoTls,
    #[serde(default)]
    pub tls_options: TlsOptions,
    /// Deadline in milliseconds for connect, TLS and LOGIN.
    pub auth_timeout: Option<u64>,
    #[serde(default = "default_mailbox")]
    pub mailbox: String,
}

impl ImapConfig {
    /// Load the configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file does not exist, cannot be
    /// read, or is not a valid configuration object.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Config(format!(
                "The email config file {} does not exist",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {e}", path.display())))?;

        Self::from_json(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Parse the configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the JSON is malformed or a required
    /// field is missing.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(format!("Invalid config: {e}")))
    }

    /// The port to connect to, falling back on the protocol default.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
            .unwrap_or(if self.tls { IMAPS_PORT } else { IMAP_PORT })
    }

    /// Whether the connection will be encrypted at any point.
    #[must_use]
    pub const fn uses_tls(&self) -> bool {
        self.tls || self.autotls.upgrades()
    }

    #[must_use]
    pub fn server_name(&self) -> &str {
        self.tls_options.servername.as_deref().unwrap_or(&self.host)
    }

    #[must_use]
    pub fn auth_timeout(&self) -> Option<Duration> {
        self.auth_timeout.map(Duration::from_millis)
    }
}

/// Options for a single run, derived once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub config_path: PathBuf,
    pub output_dir: PathBuf,
    pub delete_after_parse: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("./email.conf"),
            output_dir: PathBuf::from("./out"),
            delete_after_parse: true,
        }
    }
}

const fn default_true() -> bool {
    true
}

fn default_mailbox() -> String {
    "INBOX".to_string()
}
