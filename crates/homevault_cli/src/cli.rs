use clap::{Parser, Subcommand};
use homevault_io_fs::{MirrorTreeError, ReportMirror, mirror_trees};

use crate::context::SpecVaultContext;
use crate::profile::EnumVaultDirection;

/// Back up and restore hand-picked configuration files of both homes.
#[derive(Debug, Parser)]
#[command(name = "homevault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Copy live files into the backup archive
    Backup,
    /// Copy archived files back into the live homes
    Restore,
}

impl Commands {
    pub fn direction(self) -> EnumVaultDirection {
        match self {
            Self::Backup => EnumVaultDirection::Backup,
            Self::Restore => EnumVaultDirection::Restore,
        }
    }
}

/// Run one command against `spec_ctx`, returning `(profile name, report)` pairs.
///
/// Per-entry failures stay inside the reports; only an invalid exclusion
/// table fails the call.
pub fn run(
    command: Commands,
    spec_ctx: &SpecVaultContext,
) -> Result<Vec<(String, ReportMirror)>, MirrorTreeError> {
    let direction = command.direction();
    tracing::info!(
        user = %spec_ctx.user_name,
        backup = %spec_ctx.path_dir_backup.display(),
        "{} started",
        direction.tag()
    );

    let l_jobs: Vec<_> = spec_ctx
        .l_profiles
        .iter()
        .map(|spec_profile| spec_profile.derive_mirror_job(direction, &spec_ctx.path_dir_backup))
        .collect();
    let l_reports = mirror_trees(&l_jobs, &spec_ctx.spec_options)?;

    let l_results: Vec<(String, ReportMirror)> = spec_ctx
        .l_profiles
        .iter()
        .map(|spec_profile| spec_profile.name.clone())
        .zip(l_reports)
        .collect();
    for (name, report) in &l_results {
        tracing::info!("{}", report.format(&format!("[{}:{name}]", direction.tag())));
    }
    Ok(l_results)
}
