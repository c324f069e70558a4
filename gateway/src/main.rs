#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use workspace_gateway::proxy::BranchHandlers;
use workspace_gateway::server;

#[derive(Parser)]
#[command(
    name = "workspace-gateway",
    about = "Routes workspace, port and blobserve hosts to their handlers"
)]
struct Cli {
    /// Path to gateway config file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    listen: String,

    /// Admin API listen address (for health/metrics)
    #[arg(long, default_value = "0.0.0.0:9091")]
    admin_listen: String,

    /// Tokio worker threads (default: one per CPU)
    #[arg(long)]
    worker_threads: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    if let Some(n) = cli.worker_threads {
        builder.worker_threads(n.max(1));
    }
    let rt = builder.enable_all().build()?;

    rt.block_on(server::bootstrap::run(
        server::bootstrap::BootstrapArgs {
            config_path: cli.config,
            listen: cli.listen,
            admin_listen: cli.admin_listen,
        },
        // Forwarding is provided by the embedding deployment; standalone the
        // gateway reports how it classified each request.
        BranchHandlers::default(),
    ))
}
