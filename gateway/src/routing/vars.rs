use crate::routing::grammar::{
    FOREIGN_ORIGIN_VAR, FOREIGN_PATH_VAR, WORKSPACE_ID_VAR, WORKSPACE_PORT_VAR,
};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Variables produced by a successful match, scoped to a single request.
///
/// The legacy frontend prefix (`webview-`, `browser-`, `extensions-`) is
/// kept apart from a real foreign origin. The keyed view (`get`, `iter`)
/// still reports it under `foreignOrigin` when no foreign origin exists,
/// which is what consumers of the named variables expect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteVars {
    workspace_id: Option<String>,
    workspace_port: Option<String>,
    foreign_origin: Option<String>,
    foreign_path: Option<String>,
    frontend_prefix: Option<String>,
}

impl RouteVars {
    pub(crate) fn for_workspace(id: &str) -> Self {
        Self {
            workspace_id: Some(id.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn set_workspace_port(&mut self, port: &str) {
        self.workspace_port = Some(port.to_string());
    }

    pub(crate) fn set_foreign(&mut self, origin: &str, path: &str) {
        self.foreign_origin = Some(origin.to_string());
        self.foreign_path = Some(path.to_string());
    }

    pub(crate) fn set_frontend_prefix(&mut self, prefix: &str) {
        self.frontend_prefix = Some(prefix.to_string());
    }

    pub fn workspace_id(&self) -> Option<&str> {
        self.workspace_id.as_deref()
    }

    pub fn workspace_port(&self) -> Option<&str> {
        self.workspace_port.as_deref()
    }

    /// Origin of a foreign-content front door, e.g. `somehost-` for
    /// `somehost-foreign.<suffix>`.
    pub fn foreign_origin(&self) -> Option<&str> {
        self.foreign_origin.as_deref()
    }

    /// Remainder of the path after the workspace coordinates, with its
    /// leading `/`.
    pub fn foreign_path(&self) -> Option<&str> {
        self.foreign_path.as_deref()
    }

    /// Legacy frontend prefix of a plain workspace host. Empty when the host
    /// carried none.
    pub fn frontend_prefix(&self) -> Option<&str> {
        self.frontend_prefix.as_deref()
    }

    pub fn is_foreign(&self) -> bool {
        self.foreign_path.is_some()
    }

    /// Look up a variable by its route variable key.
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            WORKSPACE_ID_VAR => self.workspace_id(),
            WORKSPACE_PORT_VAR => self.workspace_port(),
            FOREIGN_ORIGIN_VAR => self.foreign_origin().or_else(|| self.frontend_prefix()),
            FOREIGN_PATH_VAR => self.foreign_path(),
            _ => None,
        }
    }

    /// Present variables in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        [
            WORKSPACE_ID_VAR,
            WORKSPACE_PORT_VAR,
            FOREIGN_ORIGIN_VAR,
            FOREIGN_PATH_VAR,
        ]
        .into_iter()
        .filter_map(move |key| self.get(key).map(|value| (key, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl Serialize for RouteVars {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// The routing target of a request: workspace id and, for the port branch,
/// the exposed port. `port` is empty when the IDE branch matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct WorkspaceCoords {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Port")]
    pub port: String,
}

impl WorkspaceCoords {
    /// Missing variables read as empty strings.
    pub fn from_vars(vars: &RouteVars) -> Self {
        Self {
            id: vars.get(WORKSPACE_ID_VAR).unwrap_or_default().to_string(),
            port: vars.get(WORKSPACE_PORT_VAR).unwrap_or_default().to_string(),
        }
    }
}
