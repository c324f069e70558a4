use super::GatewayState;
use crate::proxy::context::{full_body, BoxBody};
use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use hyper::Response;

fn respond(status: StatusCode, content_type: &'static str, body: String) -> Response<BoxBody> {
    let mut resp = Response::new(full_body(body));
    *resp.status_mut() = status;
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    resp
}

fn json(status: StatusCode, value: serde_json::Value) -> Response<BoxBody> {
    let body = serde_json::to_string_pretty(&value).unwrap_or_default();
    respond(status, "application/json", body)
}

pub fn handle_admin(path: &str, state: &GatewayState) -> Result<Response<BoxBody>, hyper::Error> {
    let resp = match path {
        "/health" | "/healthz" => json(StatusCode::OK, serde_json::json!({"status": "ok"})),

        "/ready" | "/readyz" => {
            let routing = &state.config.routing;
            json(
                StatusCode::OK,
                serde_json::json!({
                    "status": "ready",
                    "header": routing.header,
                    "workspace_host_suffix": routing.workspace_host_suffix,
                    "workspace_host_suffix_regex": routing.workspace_host_suffix_regex,
                }),
            )
        }

        "/metrics" => match state.metrics {
            Some(ref metrics) => respond(
                StatusCode::OK,
                "text/plain; version=0.0.4; charset=utf-8",
                metrics.render(),
            ),
            None => json(
                StatusCode::SERVICE_UNAVAILABLE,
                serde_json::json!({"error": "metrics recorder not installed"}),
            ),
        },

        "/routes" => {
            let branches: Vec<serde_json::Value> = state
                .router
                .branches()
                .iter()
                .map(|b| {
                    serde_json::json!({
                        "branch": b.branch.as_str(),
                        "patterns": b.matcher.patterns(),
                    })
                })
                .collect();
            json(
                StatusCode::OK,
                serde_json::json!({
                    "header": state.router.host_source().name(),
                    "branches": branches,
                }),
            )
        }

        _ => json(StatusCode::NOT_FOUND, serde_json::json!({"error": "not found"})),
    };
    Ok(resp)
}
