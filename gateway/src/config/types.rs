use serde::{Deserialize, Serialize};

/// Top-level gateway configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub routing: RoutingConfig,
}

/// Host-based workspace routing.
///
/// `workspace_host_suffix` is a literal domain suffix (e.g.
/// `.ws.example.com`). `workspace_host_suffix_regex` is an optional regex
/// variant used by the IDE branch so one gateway can serve workspaces of
/// several clusters; when unset the literal suffix is used instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Request header carrying the hostname to classify. `Host` means the
    /// request's own host, with any `:port` stripped.
    #[serde(default = "default_host_header")]
    pub header: String,

    #[serde(default = "default_workspace_host_suffix")]
    pub workspace_host_suffix: String,

    #[serde(default)]
    pub workspace_host_suffix_regex: Option<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            header: default_host_header(),
            workspace_host_suffix: default_workspace_host_suffix(),
            workspace_host_suffix_regex: None,
        }
    }
}

impl RoutingConfig {
    /// The literal suffix as a regex fragment.
    pub fn suffix_pattern(&self) -> String {
        regex::escape(&self.workspace_host_suffix)
    }

    /// The suffix regex for the IDE branch, falling back to the literal suffix.
    pub fn all_cluster_suffix_pattern(&self) -> String {
        match self.workspace_host_suffix_regex.as_deref() {
            Some(re) if !re.is_empty() => re.to_string(),
            _ => self.suffix_pattern(),
        }
    }
}

fn default_host_header() -> String {
    "Host".to_string()
}

fn default_workspace_host_suffix() -> String {
    ".ws.localhost".to_string()
}
