use crate::error::GatewayError;
use crate::routing::grammar::{
    compile, FOREIGN_PATH_VAR, FRONTEND_PREFIX_GROUP, LEGACY_PREFIX_PATTERN, WORKSPACE_ID_PATTERN,
    WORKSPACE_ID_VAR, WORKSPACE_PORT_PATTERN, WORKSPACE_PORT_VAR,
};
use crate::routing::vars::RouteVars;
use regex::{Captures, Regex};

/// Decides whether a request belongs to a branch.
///
/// Implementations are pure: the same hostname and path always give the same
/// answer, and nothing is retained between calls. `None` means no match.
pub trait HostMatcher: Send + Sync + std::fmt::Debug {
    fn matches(&self, hostname: &str, path: &str) -> Option<RouteVars>;

    /// Source of the compiled patterns, in evaluation order.
    fn patterns(&self) -> Vec<&str>;
}

/// Matches a fixed `blobserve` subdomain regardless of path. Yields no variables.
#[derive(Debug)]
pub struct BlobserveMatcher {
    host: Regex,
}

impl BlobserveMatcher {
    pub fn new(suffix: &str) -> Result<Self, GatewayError> {
        Ok(Self {
            host: compile(format!("^blobserve(?:{})$", suffix))?,
        })
    }
}

impl HostMatcher for BlobserveMatcher {
    fn matches(&self, hostname: &str, _path: &str) -> Option<RouteVars> {
        if hostname.is_empty() || !self.host.is_match(hostname) {
            return None;
        }
        Some(RouteVars::default())
    }

    fn patterns(&self) -> Vec<&str> {
        vec![self.host.as_str()]
    }
}

/// Matches workspace IDE hosts: `[webview-|browser-|extensions-]<id><suffix>`,
/// or `<origin>foreign<suffix>` with the id in the first path segment.
#[derive(Debug)]
pub struct WorkspaceMatcher {
    inner: CoordinateMatcher,
}

impl WorkspaceMatcher {
    pub fn new(suffix: &str) -> Result<Self, GatewayError> {
        Ok(Self {
            inner: CoordinateMatcher::new(suffix, false)?,
        })
    }
}

impl HostMatcher for WorkspaceMatcher {
    fn matches(&self, hostname: &str, path: &str) -> Option<RouteVars> {
        self.inner.matches(hostname, path)
    }

    fn patterns(&self) -> Vec<&str> {
        self.inner.patterns()
    }
}

/// Matches exposed workspace ports: `[prefix]<port>-<id><suffix>`, or
/// `<origin>foreign<suffix>` with `/<port>-<id>` leading the path.
#[derive(Debug)]
pub struct PortMatcher {
    inner: CoordinateMatcher,
}

impl PortMatcher {
    pub fn new(suffix: &str) -> Result<Self, GatewayError> {
        Ok(Self {
            inner: CoordinateMatcher::new(suffix, true)?,
        })
    }
}

impl HostMatcher for PortMatcher {
    fn matches(&self, hostname: &str, path: &str) -> Option<RouteVars> {
        self.inner.matches(hostname, path)
    }

    fn patterns(&self) -> Vec<&str> {
        self.inner.patterns()
    }
}

/// Recognizes the generic foreign-content front door, where the workspace
/// coordinates are encoded in the path instead of the hostname.
#[derive(Debug)]
struct ForeignContentDetector {
    host: Regex,
    path: Regex,
}

impl ForeignContentDetector {
    fn new(suffix: &str, coordinates: &str) -> Result<Self, GatewayError> {
        Ok(Self {
            host: compile(format!("^(.*)foreign(?:{})$", suffix))?,
            path: compile(format!(
                "^/{}(?P<{}>/.*)",
                coordinates, FOREIGN_PATH_VAR
            ))?,
        })
    }

    /// The origin prefix if `hostname` is a foreign-content host.
    fn origin<'h>(&self, hostname: &'h str) -> Option<&'h str> {
        self.host
            .captures(hostname)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    fn path_captures<'p>(&self, path: &'p str) -> Option<Captures<'p>> {
        self.path.captures(path)
    }
}

/// Shared shape of the IDE and port matchers; they differ only in whether
/// a port token precedes the workspace id.
#[derive(Debug)]
struct CoordinateMatcher {
    primary: Regex,
    foreign: ForeignContentDetector,
    with_port: bool,
    /// False when the suffix regex contributes capture groups of its own; the
    /// frontend prefix is then not reported.
    reports_frontend_prefix: bool,
}

impl CoordinateMatcher {
    fn new(suffix: &str, with_port: bool) -> Result<Self, GatewayError> {
        let coordinates = if with_port {
            format!("{}{}", WORKSPACE_PORT_PATTERN, WORKSPACE_ID_PATTERN)
        } else {
            WORKSPACE_ID_PATTERN.to_string()
        };

        // The suffix is grouped so a top-level alternation stays under the anchor.
        let primary = compile(format!(
            "^{}{}(?:{})$",
            LEGACY_PREFIX_PATTERN, coordinates, suffix
        ))?;
        // Whole match + prefix + id (+ port).
        let expected_groups = if with_port { 4 } else { 3 };
        let reports_frontend_prefix = primary.captures_len() == expected_groups;

        Ok(Self {
            primary,
            foreign: ForeignContentDetector::new(suffix, &coordinates)?,
            with_port,
            reports_frontend_prefix,
        })
    }

    fn matches(&self, hostname: &str, path: &str) -> Option<RouteVars> {
        if hostname.is_empty() {
            return None;
        }

        // A foreign-content host is never resolved through the primary pattern.
        if let Some(origin) = self.foreign.origin(hostname) {
            let caps = self.foreign.path_captures(path)?;
            let mut vars = self.coordinates(&caps)?;
            let foreign_path = caps.name(FOREIGN_PATH_VAR).map_or("", |m| m.as_str());
            vars.set_foreign(origin, foreign_path);
            return Some(vars);
        }

        let caps = self.primary.captures(hostname)?;
        let mut vars = self.coordinates(&caps)?;
        if self.reports_frontend_prefix {
            let prefix = caps.name(FRONTEND_PREFIX_GROUP).map_or("", |m| m.as_str());
            vars.set_frontend_prefix(prefix);
        }
        Some(vars)
    }

    /// Workspace id (and port) from a match; an empty capture is no match.
    fn coordinates(&self, caps: &Captures<'_>) -> Option<RouteVars> {
        let id = non_empty(caps, WORKSPACE_ID_VAR)?;
        let mut vars = RouteVars::for_workspace(id);
        if self.with_port {
            vars.set_workspace_port(non_empty(caps, WORKSPACE_PORT_VAR)?);
        }
        Some(vars)
    }

    fn patterns(&self) -> Vec<&str> {
        vec![
            self.foreign.host.as_str(),
            self.foreign.path.as_str(),
            self.primary.as_str(),
        ]
    }
}

fn non_empty<'h>(caps: &Captures<'h>, name: &str) -> Option<&'h str> {
    caps.name(name).map(|m| m.as_str()).filter(|s| !s.is_empty())
}
