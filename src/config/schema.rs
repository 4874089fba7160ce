//! Configuration schema for config.toml.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CytoscapeConfig {
    /// Host running Cytoscape Desktop with CyREST.
    pub cytoscape_host: String,

    /// CyREST port.
    pub cytoscape_port: u16,

    /// CyREST API version path segment.
    pub api_version: String,

    /// Upper bound for any single request to Cytoscape, in seconds.
    pub request_timeout_secs: u64,

    /// NDEx website used when a tool call does not name one.
    pub ndex_url: String,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Append logs to this file instead of stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
}

impl Default for CytoscapeConfig {
    fn default() -> Self {
        Self {
            cytoscape_host: "localhost".into(),
            cytoscape_port: 1234,
            api_version: "v1".into(),
            request_timeout_secs: 60,
            ndex_url: "http://ndexbio.org".into(),
            log_level: "info".into(),
            log_file: None,
        }
    }
}

impl CytoscapeConfig {
    /// CyREST root, e.g. `http://localhost:1234/v1`.
    pub fn base_url(&self) -> String {
        format!(
            "http://{}:{}/{}",
            self.cytoscape_host,
            self.cytoscape_port,
            self.api_version.trim_matches('/')
        )
    }

    /// CyNDEx-2 root on the same CyREST server.
    pub fn cyndex_url(&self) -> String {
        format!(
            "http://{}:{}/cyndex2/v1",
            self.cytoscape_host, self.cytoscape_port
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolved log file path, with `~` expanded.
    pub fn resolved_log_file(&self) -> Option<String> {
        self.log_file
            .as_deref()
            .map(|p| shellexpand::tilde(p).into_owned())
    }
}
