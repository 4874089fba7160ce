pub mod schema;

pub use schema::CytoscapeConfig;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variables that override the file.
pub const ENV_HOST: &str = "CYTOSCAPE_HOST";
pub const ENV_PORT: &str = "CYTOSCAPE_PORT";
pub const ENV_TIMEOUT: &str = "CYTOSCAPE_TIMEOUT_SECS";
pub const ENV_NDEX_URL: &str = "NDEX_URL";
pub const ENV_LOG_FILE: &str = "CYTOSCAPE_MCP_LOG_FILE";

/// Default config location (~/.cytoscape-mcp/config.toml).
pub fn default_config_path() -> PathBuf {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().join(".cytoscape-mcp"))
        .unwrap_or_else(|| PathBuf::from(".cytoscape-mcp"))
        .join("config.toml")
}

/// Load config from the given path, or return defaults.
pub fn load_config(path: &Path) -> Result<CytoscapeConfig> {
    if path.exists() {
        let contents =
            std::fs::read_to_string(path).context("Failed to read cytoscape-mcp config file")?;
        let config: CytoscapeConfig =
            toml::from_str(&contents).context("Failed to parse cytoscape-mcp config (TOML)")?;
        Ok(config)
    } else {
        Ok(CytoscapeConfig::default())
    }
}

/// Load config from `path`, then apply environment overrides from the process.
pub fn load_effective_config(path: &Path) -> Result<CytoscapeConfig> {
    let mut config = load_config(path)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Apply overrides from an environment lookup. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut CytoscapeConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(host) = get(ENV_HOST) {
        config.cytoscape_host = host;
    }
    if let Some(port) = get(ENV_PORT) {
        config.cytoscape_port = port
            .trim()
            .parse()
            .with_context(|| format!("{} is not a valid port: {}", ENV_PORT, port))?;
    }
    if let Some(secs) = get(ENV_TIMEOUT) {
        config.request_timeout_secs = secs
            .trim()
            .parse()
            .with_context(|| format!("{} is not a number of seconds: {}", ENV_TIMEOUT, secs))?;
    }
    if let Some(url) = get(ENV_NDEX_URL) {
        config.ndex_url = url;
    }
    if let Some(file) = get(ENV_LOG_FILE) {
        config.log_file = Some(file);
    }
    Ok(())
}

/// Save config to the given path (TOML format).
pub fn save_config(config: &CytoscapeConfig, path: &Path) -> Result<()> {
    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents).context("Failed to write config file")?;
    Ok(())
}
