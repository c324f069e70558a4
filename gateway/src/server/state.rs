use crate::config::GatewayConfig;
use crate::metrics::Metrics;
use crate::proxy::BranchHandlers;
use crate::routing::WorkspaceRouter;
use anyhow::Result;
use std::sync::Arc;

/// Shared gateway state, cheaply cloneable.
///
/// Built once at startup; the router and its compiled patterns are
/// read-only afterwards.
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<GatewayConfig>,
    pub router: Arc<WorkspaceRouter>,
    pub handlers: BranchHandlers,
    /// Absent when no recorder was installed (tests, embedding).
    pub metrics: Option<Metrics>,
}

impl GatewayState {
    pub fn new(config: GatewayConfig, handlers: BranchHandlers) -> Result<Self> {
        let router = WorkspaceRouter::host_based(&config.routing)?;
        Ok(Self {
            config: Arc::new(config),
            router: Arc::new(router),
            handlers,
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }
}
