mod admin;
pub mod bootstrap;
mod state;

pub use state::GatewayState;

use crate::proxy;
use anyhow::Result;
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{error, info};

/// Run the workspace proxy server with graceful shutdown support.
pub async fn run_proxy_server(
    listen: &str,
    state: GatewayState,
    shutdown: Arc<Notify>,
) -> Result<()> {
    let addr: SocketAddr = listen.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("server: proxy listening, addr={}", addr);
    serve_proxy(listener, state, shutdown).await
}

/// Accept loop over an already bound listener.
///
/// When `shutdown` is notified the server stops accepting new connections and
/// waits up to `DRAIN_TIMEOUT` for in-flight connections to finish.
pub async fn serve_proxy(
    listener: TcpListener,
    state: GatewayState,
    shutdown: Arc<Notify>,
) -> Result<()> {
    const DRAIN_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

    // Metrics gauges are write-only, so track the count separately for draining.
    let active_conns = Arc::new(AtomicI64::new(0));

    // Registered once up front so a notification sent while a connection is
    // being set up is not missed.
    let stopped = shutdown.notified();
    tokio::pin!(stopped);
    stopped.as_mut().enable();

    loop {
        let accepted = tokio::select! {
            result = listener.accept() => result,
            _ = stopped.as_mut() => {
                info!("server: proxy: stop accepting new connections, draining...");
                break;
            }
        };

        let (stream, peer_addr) = match accepted {
            Ok(v) => {
                metrics::counter!("wsproxy_connections_total", "status" => "accepted").increment(1);
                v
            }
            Err(e) => {
                error!("server: proxy: accept failed, error={}", e);
                metrics::counter!("wsproxy_connections_total", "status" => "error").increment(1);
                continue;
            }
        };

        metrics::gauge!("wsproxy_connections_active").increment(1.0);
        active_conns.fetch_add(1, Ordering::Relaxed);

        let state = state.clone();
        let active_conns = active_conns.clone();

        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let svc = service_fn(move |req: Request<Incoming>| {
                let state = state.clone();
                async move { proxy::handle_request(req, state, peer_addr).await }
            });

            if let Err(e) = auto::Builder::new(TokioExecutor::new())
                .http1()
                .keep_alive(true)
                .http2()
                .keep_alive_interval(Some(std::time::Duration::from_secs(20)))
                .serve_connection_with_upgrades(io, svc)
                .await
            {
                if !e.to_string().contains("connection closed") {
                    error!(
                        "server: proxy: connection error, peer={}, error={}",
                        peer_addr, e
                    );
                }
            }

            metrics::gauge!("wsproxy_connections_active").decrement(1.0);
            active_conns.fetch_sub(1, Ordering::Relaxed);
        });
    }

    let active = active_conns.load(Ordering::Relaxed);
    if active > 0 {
        info!(
            "server: proxy: waiting for {} active connections to drain",
            active
        );
        let drain = async {
            while active_conns.load(Ordering::Relaxed) > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            }
        };
        match tokio::time::timeout(DRAIN_TIMEOUT, drain).await {
            Ok(_) => info!("server: proxy: all connections drained"),
            Err(_) => info!(
                "server: proxy: drain timeout ({}s), {} connections still active",
                DRAIN_TIMEOUT.as_secs(),
                active_conns.load(Ordering::Relaxed)
            ),
        }
    }

    Ok(())
}

/// Run the admin server for health/readiness checks, metrics and router
/// introspection.
pub async fn run_admin_server(listen: &str, state: GatewayState) -> Result<()> {
    let addr: SocketAddr = listen.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("server: admin listening, addr={}", addr);

    loop {
        let (stream, _) = listener.accept().await?;
        let state = state.clone();

        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let svc = service_fn(move |req: Request<Incoming>| {
                let state = state.clone();
                async move { admin::handle_admin(req.uri().path(), &state) }
            });

            if let Err(e) = auto::Builder::new(TokioExecutor::new())
                .http1()
                .keep_alive(true)
                .serve_connection_with_upgrades(io, svc)
                .await
            {
                if !e.to_string().contains("connection closed") {
                    error!("server: admin: connection error, error={}", e);
                }
            }
        });
    }
}
