use crate::routing::Branch;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use std::net::SocketAddr;
use std::time::Instant;

pub type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

pub fn full_body(data: impl Into<Bytes>) -> BoxBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

pub fn empty_body() -> BoxBody {
    Full::new(Bytes::new())
        .map_err(|never| match never {})
        .boxed()
}

/// Per-request bookkeeping for logging and metrics.
pub struct RequestContext {
    pub host: String,
    pub uri_path: String,
    pub method: String,
    pub peer_addr: SocketAddr,
    pub branch: Option<Branch>,
    pub start: Instant,
}

impl RequestContext {
    pub fn new(host: String, uri_path: String, method: String, peer_addr: SocketAddr) -> Self {
        Self {
            host,
            uri_path,
            method,
            peer_addr,
            branch: None,
            start: Instant::now(),
        }
    }

    pub fn branch_label(&self) -> &'static str {
        self.branch.map_or("none", |b| b.as_str())
    }

    pub fn finalize_metrics(&self, resp_status: u16) {
        metrics::counter!(
            "wsproxy_requests_total",
            "branch" => self.branch_label(),
            "method" => self.method.clone(),
            "status_code" => resp_status.to_string(),
        )
        .increment(1);

        metrics::histogram!(
            "wsproxy_request_duration_seconds",
            "branch" => self.branch_label(),
        )
        .record(self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_label() {
        let mut ctx = RequestContext::new(
            "blobserve.ws.example.com".into(),
            "/".into(),
            "GET".into(),
            "127.0.0.1:50000".parse().unwrap(),
        );
        assert_eq!(ctx.branch_label(), "none");
        ctx.branch = Some(Branch::Blobserve);
        assert_eq!(ctx.branch_label(), "blobserve");
    }
}
