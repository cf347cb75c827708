use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::Parser as _;
use liquid_swap::bus::DEFAULT_WORKERS_PER_SUBJECT;
use liquid_swap::bus::grpc::SwapBusService;
use liquid_swap::bus::router::{ProtocolRouter, RouterConfig};
use liquid_swap::liquid::exec::ProcessGateway;
use liquid_swap::liquid::wallet::{
    DEFAULT_BIN_DIR, DEFAULT_CONF_FILE, WALLET_CLI_PROGRAM, WalletCliConfig,
};
use liquid_swap::swap::MINIMUM_FEE_RATE;
use liquid_swap::swap::service::{OrchestratorConfig, SwapOrchestrator};
use tonic::transport::Server;

#[derive(Debug, clap::Parser)]
struct Args {
    #[arg(long, default_value = "127.0.0.1:50051")]
    listen_addr: String,

    /// Elements configuration file handed to the wallet tool.
    #[arg(long, default_value = DEFAULT_CONF_FILE)]
    elements_conf: PathBuf,

    #[arg(long, default_value = WALLET_CLI_PROGRAM)]
    wallet_program: String,

    /// Directory holding the wallet tool; empty resolves the program as given, without `PATH`.
    #[arg(long, default_value = DEFAULT_BIN_DIR)]
    wallet_bin_dir: PathBuf,

    /// Do not broadcast on finalize, return the broadcast-ready transaction instead.
    #[arg(long)]
    no_broadcast: bool,

    #[arg(long, default_value_t = MINIMUM_FEE_RATE)]
    min_fee_rate: f64,

    /// Deadline for the guard wait plus the tool run; 0 disables it.
    #[arg(long, default_value_t = 120)]
    exec_timeout_secs: u64,

    #[arg(long, default_value_t = DEFAULT_WORKERS_PER_SUBJECT)]
    workers_per_subject: usize,

    /// Subscribe Swap.AcceptProposal.
    #[arg(long)]
    enable_accept: bool,

    #[arg(long, default_value_t = 300)]
    request_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    liquid_swap::logging::init().ok();

    let args = Args::parse();
    let listen_addr: SocketAddr = args.listen_addr.parse().context("parse listen_addr")?;

    let wallet = WalletCliConfig {
        program: args.wallet_program,
        bin_dir: (!args.wallet_bin_dir.as_os_str().is_empty()).then_some(args.wallet_bin_dir),
        conf_file: args.elements_conf,
        broadcast_on_finalize: !args.no_broadcast,
        min_fee_rate: args.min_fee_rate,
    };
    let cfg = OrchestratorConfig {
        wallet,
        exec_timeout: (args.exec_timeout_secs > 0)
            .then(|| Duration::from_secs(args.exec_timeout_secs)),
    };

    let orchestrator = Arc::new(SwapOrchestrator::new(cfg, ProcessGateway));
    let wallet = orchestrator.wallet();
    let program = wallet.program_path();
    if !program.is_absolute() {
        tracing::warn!(
            program = %program.display(),
            "wallet program is not absolute, resolved without the service PATH"
        );
    }
    tracing::info!(
        program = %program.display(),
        conf_file = %wallet.conf_file().display(),
        broadcast_on_finalize = wallet.config().broadcast_on_finalize,
        min_fee_rate = wallet.config().min_fee_rate,
        "wallet tool configured"
    );

    let router = Arc::new(ProtocolRouter::new(
        RouterConfig {
            workers_per_subject: args.workers_per_subject,
            enable_accept: args.enable_accept,
        },
        orchestrator,
    ));

    tracing::info!(
        %listen_addr,
        subjects = ?router.subjects(),
        "liquid swap service started"
    );

    Server::builder()
        .timeout(Duration::from_secs(args.request_timeout_secs))
        .add_service(SwapBusService::new(router).into_server())
        .serve_with_shutdown(listen_addr, shutdown_signal())
        .await
        .context("serve gRPC")?;

    tracing::info!("liquid swap service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
