//! # speedtrace CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 读数回放与遥测重建
//! - 序列查询与用时差比较
//! - 会话配置校验

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_delta, run_info, run_query, run_rebuild, run_reconstruct, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging based on CLI options
    init_observability(&cli)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "speedtrace starting"
    );

    // Execute command
    let result = match &cli.command {
        Commands::Reconstruct(args) => run_reconstruct(args).await,
        Commands::Rebuild(args) => run_rebuild(args),
        Commands::Delta(args) => run_delta(args),
        Commands::Query(args) => run_query(args),
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize tracing and the optional metrics exporter from CLI options
fn init_observability(cli: &Cli) -> Result<()> {
    let level = observability::ObservabilityConfig::level_for_verbosity(cli.quiet, cli.verbose);

    observability::init_with_config(observability::ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: (cli.metrics_port != 0).then_some(cli.metrics_port),
        default_log_level: level.to_string(),
    })
}
