pub mod types;


pub use types::*;

use crate::routing::RESERVED_CAPTURE_NAMES;
use anyhow::Result;
use std::path::Path;

impl GatewayConfig {
    /// Load configuration from a file (if it exists) and apply environment
    /// variable overrides. When the file does not exist, built-in defaults
    /// are used so the gateway starts with zero configuration for local
    /// development.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config: GatewayConfig = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            match path.extension().and_then(|e| e.to_str()) {
                Some("toml") => toml::from_str(&content)?,
                Some("json") => serde_json::from_str(&content)?,
                Some(ext) => anyhow::bail!("unsupported config format: .{ext}, use .toml or .json"),
                None => anyhow::bail!("config file has no extension, use .toml or .json"),
            }
        } else {
            tracing::info!("config file not found at {}, using defaults", path.display());
            GatewayConfig::default()
        };

        config.apply_env_overrides();

        config.validate()?;
        tracing::info!(
            header = %config.routing.header,
            workspace_host_suffix = %config.routing.workspace_host_suffix,
            workspace_host_suffix_regex = config.routing.workspace_host_suffix_regex.as_deref().unwrap_or(""),
            "loaded gateway configuration"
        );
        Ok(config)
    }

    /// Deployments usually inject the suffix per cluster through the
    /// environment, so these win over the file.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("WSPROXY_HOST_HEADER") {
            self.routing.header = v;
        }
        if let Ok(v) = std::env::var("WSPROXY_WORKSPACE_HOST_SUFFIX") {
            self.routing.workspace_host_suffix = v;
        }
        if let Ok(v) = std::env::var("WSPROXY_WORKSPACE_HOST_SUFFIX_REGEX") {
            self.routing.workspace_host_suffix_regex = if v.is_empty() { None } else { Some(v) };
        }
    }

    pub fn validate(&self) -> Result<()> {
        let routing = &self.routing;

        if routing.header.is_empty() {
            anyhow::bail!("routing.header must not be empty");
        }
        if http::HeaderName::from_bytes(routing.header.as_bytes()).is_err() {
            anyhow::bail!("routing.header '{}' is not a valid header name", routing.header);
        }
        if routing.workspace_host_suffix.is_empty() {
            anyhow::bail!("routing.workspace_host_suffix must not be empty");
        }

        if let Some(ref re) = routing.workspace_host_suffix_regex {
            let compiled = regex::Regex::new(re).map_err(|e| {
                anyhow::anyhow!("routing.workspace_host_suffix_regex '{}' is invalid: {}", re, e)
            })?;
            // The suffix is spliced into patterns that already name these groups.
            if let Some(name) = compiled
                .capture_names()
                .flatten()
                .find(|name| RESERVED_CAPTURE_NAMES.contains(name))
            {
                anyhow::bail!(
                    "routing.workspace_host_suffix_regex must not define capture group '{}'",
                    name
                );
            }
        }
        Ok(())
    }
}
