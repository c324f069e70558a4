use crate::config::RoutingConfig;
use crate::error::GatewayError;
use crate::routing::host::HostSource;
use crate::routing::matcher::{BlobserveMatcher, HostMatcher, PortMatcher, WorkspaceMatcher};
use crate::routing::vars::{RouteVars, WorkspaceCoords};
use http::{HeaderMap, Uri};
use std::fmt;

/// Routing intent of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    Ide,
    Port,
    Blobserve,
}

impl Branch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Ide => "ide",
            Branch::Port => "port",
            Branch::Blobserve => "blobserve",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The branch that claimed a request and the variables its matcher produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub branch: Branch,
    pub vars: RouteVars,
}

impl RouteMatch {
    pub fn coords(&self) -> WorkspaceCoords {
        WorkspaceCoords::from_vars(&self.vars)
    }
}

#[derive(Debug)]
pub struct RouteBranch {
    pub branch: Branch,
    pub matcher: Box<dyn HostMatcher>,
}

impl RouteBranch {
    pub fn new(branch: Branch, matcher: impl HostMatcher + 'static) -> Self {
        Self {
            branch,
            matcher: Box::new(matcher),
        }
    }
}

/// Classifies requests into branches by hostname and path.
///
/// Branches are evaluated in the order given; the first matcher to accept
/// a request owns it. All patterns are compiled on construction and only
/// read afterwards, so one router is shared by every connection.
#[derive(Debug)]
pub struct WorkspaceRouter {
    host_source: HostSource,
    branches: Vec<RouteBranch>,
}

impl WorkspaceRouter {
    pub fn new(host_source: HostSource, branches: Vec<RouteBranch>) -> Self {
        Self {
            host_source,
            branches,
        }
    }

    /// The standard branch set: blobserve, then port, then ide.
    ///
    /// Blobserve and port hosts match the literal suffix; the ide branch uses
    /// the suffix regex so it can serve workspaces of every cluster.
    pub fn host_based(cfg: &RoutingConfig) -> Result<Self, GatewayError> {
        let host_source = HostSource::from_header_name(&cfg.header)?;
        let suffix = cfg.suffix_pattern();
        let all_cluster_suffix = cfg.all_cluster_suffix_pattern();

        let branches = vec![
            RouteBranch::new(Branch::Blobserve, BlobserveMatcher::new(&suffix)?),
            RouteBranch::new(Branch::Port, PortMatcher::new(&suffix)?),
            RouteBranch::new(Branch::Ide, WorkspaceMatcher::new(&all_cluster_suffix)?),
        ];

        tracing::info!(
            "routing: compiled workspace router, header={}, suffix={}, ide_suffix={}",
            host_source.name(),
            suffix,
            all_cluster_suffix,
        );

        Ok(Self::new(host_source, branches))
    }

    pub fn hostname<'a>(&self, headers: &'a HeaderMap, uri: &'a Uri) -> &'a str {
        self.host_source.hostname(headers, uri)
    }

    /// First matching branch, or `None` when the request belongs to no
    /// workspace.
    pub fn classify(&self, hostname: &str, path: &str) -> Option<RouteMatch> {
        self.branches.iter().find_map(|b| {
            b.matcher.matches(hostname, path).map(|vars| RouteMatch {
                branch: b.branch,
                vars,
            })
        })
    }

    pub fn branches(&self) -> &[RouteBranch] {
        &self.branches
    }

    pub fn host_source(&self) -> &HostSource {
        &self.host_source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> WorkspaceRouter {
        WorkspaceRouter::host_based(&RoutingConfig {
            header: "Host".into(),
            workspace_host_suffix: ".ws.example.com".into(),
            workspace_host_suffix_regex: None,
        })
        .unwrap()
    }

    fn coords(id: &str, port: &str) -> WorkspaceCoords {
        WorkspaceCoords {
            id: id.into(),
            port: port.into(),
        }
    }

    /// Accepts any host starting with a given prefix.
    #[derive(Debug)]
    struct PrefixMatcher(&'static str);

    impl HostMatcher for PrefixMatcher {
        fn matches(&self, hostname: &str, _path: &str) -> Option<RouteVars> {
            hostname
                .starts_with(self.0)
                .then(|| RouteVars::for_workspace(self.0))
        }

        fn patterns(&self) -> Vec<&str> {
            vec![self.0]
        }
    }

    #[test]
    fn test_ide_branch() {
        let m = router()
            .classify("pink-panda-ns35kd21.ws.example.com", "/")
            .unwrap();
        assert_eq!(m.branch, Branch::Ide);
        assert_eq!(m.coords(), coords("pink-panda-ns35kd21", ""));
    }

    #[test]
    fn test_port_branch() {
        let m = router()
            .classify("8080-pink-panda-ns35kd21.ws.example.com", "/")
            .unwrap();
        assert_eq!(m.branch, Branch::Port);
        assert_eq!(m.coords(), coords("pink-panda-ns35kd21", "8080"));
    }

    #[test]
    fn test_blobserve_branch() {
        let r = router();
        for path in ["/", "/image/foo/bar", ""] {
            let m = r.classify("blobserve.ws.example.com", path).unwrap();
            assert_eq!(m.branch, Branch::Blobserve);
            assert!(m.vars.is_empty());
        }
    }

    #[test]
    fn test_foreign_content_via_ide() {
        let m = router()
            .classify(
                "somehost-foreign.ws.example.com",
                "/pink-panda-ns35kd21/index.html",
            )
            .unwrap();
        assert_eq!(m.branch, Branch::Ide);
        assert_eq!(m.coords(), coords("pink-panda-ns35kd21", ""));
        assert_eq!(m.vars.foreign_path(), Some("/index.html"));
        assert_eq!(m.vars.foreign_origin(), Some("somehost-"));
    }

    #[test]
    fn test_foreign_content_via_port() {
        let m = router()
            .classify(
                "somehost-foreign.ws.example.com",
                "/3000-pink-panda-ns35kd21/index.html",
            )
            .unwrap();
        assert_eq!(m.branch, Branch::Port);
        assert_eq!(m.coords(), coords("pink-panda-ns35kd21", "3000"));
    }

    #[test]
    fn test_no_match() {
        let r = router();
        assert!(r.classify("unknown.example.org", "/anything").is_none());
        assert!(r.classify("", "/").is_none());
        assert!(r.classify("somehost-foreign.ws.example.com", "/index.html").is_none());
    }

    #[test]
    fn test_classify_is_idempotent() {
        let r = router();
        for (host, path) in [
            ("pink-panda-ns35kd21.ws.example.com", "/"),
            ("8080-pink-panda-ns35kd21.ws.example.com", "/x"),
            ("somehost-foreign.ws.example.com", "/pink-panda-ns35kd21/a"),
            ("unknown.example.org", "/"),
        ] {
            assert_eq!(r.classify(host, path), r.classify(host, path));
        }
    }

    #[test]
    fn test_round_trip_port_host() {
        let r = router();
        let id = "a7dcf253-f6a2-4bd6-a4b2-6b8c6e7f1b2c";
        let host = format!("{}-{}.ws.example.com", 22999, id);
        let m = r.classify(&host, "/").unwrap();
        assert_eq!(m.branch, Branch::Port);
        assert_eq!(m.coords(), coords(id, "22999"));
    }

    #[test]
    fn test_standard_branch_order() {
        let order: Vec<Branch> = router().branches().iter().map(|b| b.branch).collect();
        assert_eq!(order, vec![Branch::Blobserve, Branch::Port, Branch::Ide]);
    }

    #[test]
    fn test_first_registered_branch_wins() {
        let r = WorkspaceRouter::new(
            HostSource::Host,
            vec![
                RouteBranch::new(Branch::Blobserve, PrefixMatcher("blob")),
                RouteBranch::new(Branch::Port, PrefixMatcher("b")),
            ],
        );
        assert_eq!(r.classify("blobserve", "/").unwrap().branch, Branch::Blobserve);
        assert_eq!(r.classify("bar", "/").unwrap().branch, Branch::Port);

        let reversed = WorkspaceRouter::new(
            HostSource::Host,
            vec![
                RouteBranch::new(Branch::Port, PrefixMatcher("b")),
                RouteBranch::new(Branch::Blobserve, PrefixMatcher("blob")),
            ],
        );
        assert_eq!(reversed.classify("blobserve", "/").unwrap().branch, Branch::Port);
    }

    #[test]
    fn test_blobserve_host_never_reaches_other_branches() {
        let r = router();
        let m = r.classify("blobserve.ws.example.com", "/pink-panda-ns35kd21/x").unwrap();
        assert_eq!(m.branch, Branch::Blobserve);
        assert_eq!(m.coords(), WorkspaceCoords::default());
    }

    #[test]
    fn test_forwarded_host_header() {
        let r = WorkspaceRouter::host_based(&RoutingConfig {
            header: "x-wsproxy-host".into(),
            workspace_host_suffix: ".ws.example.com".into(),
            workspace_host_suffix_regex: None,
        })
        .unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("host", "ws-proxy.internal:8080".parse().unwrap());
        headers.insert("x-wsproxy-host", "pink-panda-ns35kd21.ws.example.com".parse().unwrap());
        let uri: Uri = "/".parse().unwrap();
        let host = r.hostname(&headers, &uri);
        assert_eq!(host, "pink-panda-ns35kd21.ws.example.com");
        assert_eq!(r.classify(host, "/").unwrap().branch, Branch::Ide);
    }

    #[test]
    fn test_multi_cluster_suffix_applies_to_ide_only() {
        let r = WorkspaceRouter::host_based(&RoutingConfig {
            header: "Host".into(),
            workspace_host_suffix: ".ws-eu01.example.com".into(),
            workspace_host_suffix_regex: Some(r"\.ws-[a-z]{2}[0-9]{2}\.example\.com".into()),
        })
        .unwrap();
        let m = r.classify("pink-panda-ns35kd21.ws-us02.example.com", "/").unwrap();
        assert_eq!(m.branch, Branch::Ide);
        assert!(r.classify("8080-pink-panda-ns35kd21.ws-us02.example.com", "/").is_none());
        assert_eq!(
            r.classify("8080-pink-panda-ns35kd21.ws-eu01.example.com", "/").unwrap().branch,
            Branch::Port
        );
    }

    #[test]
    fn test_alternation_suffix_stays_anchored() {
        let r = WorkspaceRouter::host_based(&RoutingConfig {
            header: "Host".into(),
            workspace_host_suffix: ".ws.a.com".into(),
            workspace_host_suffix_regex: Some(r"\.ws\.a\.com|\.ws\.b\.com".into()),
        })
        .unwrap();
        for host in [
            "pink-panda-ns35kd21.ws.a.com",
            "pink-panda-ns35kd21.ws.b.com",
        ] {
            let m = r.classify(host, "/").unwrap();
            assert_eq!(m.branch, Branch::Ide);
            assert_eq!(m.coords(), coords("pink-panda-ns35kd21", ""));
            assert_eq!(m.vars.get("foreignOrigin"), Some(""));
        }
        assert!(r.classify("pink-panda-ns35kd21.ws.a.com.evil.org", "/").is_none());
        assert!(r.classify("somehost-foreign.ws.a.com.evil.org", "/pink-panda-ns35kd21/x").is_none());
        assert!(r
            .classify("somehost-foreign.ws.b.com", "/pink-panda-ns35kd21/x")
            .is_some());
    }

    #[test]
    fn test_invalid_header_rejected() {
        let err = WorkspaceRouter::host_based(&RoutingConfig {
            header: "bad header".into(),
            workspace_host_suffix: ".ws.example.com".into(),
            workspace_host_suffix_regex: None,
        })
        .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidHeader(_)));
    }
}
