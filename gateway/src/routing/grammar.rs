//! Token grammars for workspace hostnames.
//!
//! The capture group names double as the route variable keys handed to
//! downstream handlers.

use crate::error::GatewayError;
use regex::Regex;

pub const WORKSPACE_ID_VAR: &str = "workspaceID";
pub const WORKSPACE_PORT_VAR: &str = "workspacePort";
pub const FOREIGN_ORIGIN_VAR: &str = "foreignOrigin";
pub const FOREIGN_PATH_VAR: &str = "foreignPath";

/// Capture group holding the optional legacy frontend prefix.
pub(crate) const FRONTEND_PREFIX_GROUP: &str = "frontendPrefix";

/// Group names the router splices around the configured suffix regex. A
/// suffix regex defining any of these would not compile.
pub const RESERVED_CAPTURE_NAMES: &[&str] = &[
    WORKSPACE_ID_VAR,
    WORKSPACE_PORT_VAR,
    FOREIGN_PATH_VAR,
    FRONTEND_PREFIX_GROUP,
];

/// A v4 UUID with a letter first, or a generated id like `pink-panda-ns35kd21`.
pub const WORKSPACE_ID_PATTERN: &str = "(?P<workspaceID>[a-f][0-9a-f]{7}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}|[0-9a-z]{2,16}-[0-9a-z]{2,16}-[0-9a-z]{8})";

/// Decimal port followed by a `-` separator that is not captured.
pub const WORKSPACE_PORT_PATTERN: &str = "(?P<workspacePort>[0-9]+)-";

// Drop once no frontend addresses workspaces through these prefixes anymore.
pub const LEGACY_PREFIX_PATTERN: &str = "(?P<frontendPrefix>webview-|browser-|extensions-)?";

pub(crate) fn compile(pattern: String) -> Result<Regex, GatewayError> {
    Regex::new(&pattern).map_err(|source| GatewayError::InvalidPattern { pattern, source })
}
