use crate::proxy::context::{empty_body, full_body, BoxBody, RequestContext};
use crate::routing::{Branch, RouteMatch};
use crate::server::GatewayState;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use hyper::body::Incoming;
use hyper::{Request, Response};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;

pub type HandlerFuture = Pin<Box<dyn Future<Output = Response<BoxBody>> + Send>>;

/// Serves the requests a branch has claimed. Forwarding to the workspace
/// (backend lookup, connection pooling, header rewriting) plugs in here.
pub trait BranchHandler: Send + Sync {
    fn handle(&self, req: Request<Incoming>, route: RouteMatch) -> HandlerFuture;
}

/// One handler per branch.
#[derive(Clone)]
pub struct BranchHandlers {
    ide: Arc<dyn BranchHandler>,
    port: Arc<dyn BranchHandler>,
    blobserve: Arc<dyn BranchHandler>,
}

impl BranchHandlers {
    pub fn new(
        ide: Arc<dyn BranchHandler>,
        port: Arc<dyn BranchHandler>,
        blobserve: Arc<dyn BranchHandler>,
    ) -> Self {
        Self {
            ide,
            port,
            blobserve,
        }
    }

    /// The same handler for every branch.
    pub fn uniform(handler: Arc<dyn BranchHandler>) -> Self {
        Self::new(handler.clone(), handler.clone(), handler)
    }

    pub fn get(&self, branch: Branch) -> &Arc<dyn BranchHandler> {
        match branch {
            Branch::Ide => &self.ide,
            Branch::Port => &self.port,
            Branch::Blobserve => &self.blobserve,
        }
    }
}

impl Default for BranchHandlers {
    fn default() -> Self {
        Self::uniform(Arc::new(EchoHandler))
    }
}

/// Answers every request with its classification instead of forwarding it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

impl BranchHandler for EchoHandler {
    fn handle(&self, _req: Request<Incoming>, route: RouteMatch) -> HandlerFuture {
        Box::pin(std::future::ready(echo_response(&route)))
    }
}

pub fn echo_response(route: &RouteMatch) -> Response<BoxBody> {
    let body = serde_json::json!({
        "branch": route.branch.as_str(),
        "coords": route.coords(),
        "vars": route.vars,
    });
    let mut resp = Response::new(full_body(body.to_string()));
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    resp
}

/// Response for requests no branch claimed.
pub fn not_found(path: &str, hostname: &str) -> Response<BoxBody> {
    debug!("proxy: no match for path {}, host: {}", path, hostname);
    let mut resp = Response::new(empty_body());
    *resp.status_mut() = StatusCode::NOT_FOUND;
    resp
}

/// Classify a request and hand it to the handler of the branch that claims
/// it; unclaimed requests get a 404.
pub async fn handle_request(
    req: Request<Incoming>,
    state: GatewayState,
    peer_addr: SocketAddr,
) -> Result<Response<BoxBody>, hyper::Error> {
    let host = state.router.hostname(req.headers(), req.uri()).to_string();
    let mut ctx = RequestContext::new(
        host,
        req.uri().path().to_string(),
        req.method().as_str().to_string(),
        peer_addr,
    );

    let resp = match state.router.classify(&ctx.host, &ctx.uri_path) {
        Some(route) => {
            ctx.branch = Some(route.branch);
            debug!(
                "proxy: request classified, branch={}, host={}, path={}, workspace_id={}, peer={}",
                route.branch,
                ctx.host,
                ctx.uri_path,
                route.vars.workspace_id().unwrap_or(""),
                ctx.peer_addr,
            );
            state.handlers.get(route.branch).handle(req, route).await
        }
        None => not_found(&ctx.uri_path, &ctx.host),
    };

    ctx.finalize_metrics(resp.status().as_u16());
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RouteVars;
    use http_body_util::BodyExt;

    async fn body_json(resp: Response<BoxBody>) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_is_empty_404() {
        let resp = not_found("/anything", "unknown.example.org");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_echo_response() {
        let route = RouteMatch {
            branch: Branch::Blobserve,
            vars: RouteVars::default(),
        };
        let resp = echo_response(&route);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({
                "branch": "blobserve",
                "coords": {"ID": "", "Port": ""},
                "vars": {},
            })
        );
    }

    #[test]
    fn test_handlers_by_branch() {
        struct Fixed;
        impl BranchHandler for Fixed {
            fn handle(&self, _req: Request<Incoming>, _route: RouteMatch) -> HandlerFuture {
                Box::pin(std::future::ready(Response::new(empty_body())))
            }
        }

        let echo: Arc<dyn BranchHandler> = Arc::new(EchoHandler);
        let fixed: Arc<dyn BranchHandler> = Arc::new(Fixed);
        let handlers = BranchHandlers::new(echo.clone(), fixed.clone(), echo.clone());
        assert!(Arc::ptr_eq(handlers.get(Branch::Ide), &echo));
        assert!(Arc::ptr_eq(handlers.get(Branch::Port), &fixed));
        assert!(Arc::ptr_eq(handlers.get(Branch::Blobserve), &echo));
    }
}
