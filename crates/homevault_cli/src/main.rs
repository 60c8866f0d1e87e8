//! `homevault`: mirror a fixed list of home configuration files into a backup
//! archive and back, for the native home and the default secondary instance.

mod cli;
mod conf;
mod context;
mod instance;
mod profile;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, run};
use crate::conf::C_LOG_FILTER_DEFAULT;
use crate::context::SpecVaultContext;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(C_LOG_FILTER_DEFAULT)),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let spec_ctx = SpecVaultContext::from_env()?;
    run(cli.command, &spec_ctx)?;
    Ok(())
}
