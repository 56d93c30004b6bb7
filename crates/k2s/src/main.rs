//! K2s CLI - Kubernetes distribution for Windows and Linux hosts
//!
//! This is the main entry point for the k2s command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};
use commands::common::{CommandContext, ReportedFailure};
use k2s_psexec::CancellationToken;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // failures reported by scripts are already on the terminal
            if e.downcast_ref::<ReportedFailure>().is_none() {
                output::error(&format!("{:#}", e));
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupt received, stopping script");
            on_interrupt.cancel();
        }
    });

    let install_dir = k2s_core::config::resolve_install_dir(cli.install_dir.as_deref())?;
    debug!("Install directory: {}", install_dir.display());
    let ctx = CommandContext::load(&install_dir, cli.verbose, cli.quiet, cancel)?;

    match cli.command {
        Commands::Install(args) => commands::install::run(args, &ctx).await,
        Commands::Uninstall(args) => commands::uninstall::run(args, &ctx).await,
        Commands::Start => commands::start::start(&ctx).await,
        Commands::Stop => commands::start::stop(&ctx).await,
        Commands::Status(args) => commands::status::run(args, &ctx).await,
        Commands::Node(cmd) => commands::node::run(cmd, &ctx).await,
        Commands::System(cmd) => commands::system::run(cmd, &ctx).await,
        Commands::Addons(cmd) => commands::addons::run(cmd, &ctx).await,
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
