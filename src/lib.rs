use std::sync::Arc;

use crate::cli::Cli;
use crate::domain::backend::local_inventory::LocalInventory;
use crate::domain::backend::{InfrastructureBackend, PlatformBackend};
use crate::domain::clock::SystemClock;
use crate::domain::config::{PoolConfig, default_workspace};
use crate::domain::confirm::LineConfirm;
use crate::domain::dispatcher::OperationDispatcher;
use crate::domain::process_guard::{PROCESS_NAME, ProcessGuard};
use crate::error::Result;

pub mod api;
pub mod cli;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;
pub mod report;

/// Runs one command line to completion against the local inventory backend.
///
/// The single-instance lock is taken before anything is logged or provisioned, so a
/// conflicting invocation leaves no trace besides its error message.
pub fn run(cli: Cli) -> Result<()> {
    let workspace = cli.workspace.clone().unwrap_or_else(default_workspace);
    let config = PoolConfig::load(&workspace, cli.config.as_deref())?;
    let _guard = ProcessGuard::acquire(&config.lock_dir, PROCESS_NAME)?;

    logger::init(&config.log_dir, &config.log_level);
    log::info!("Workspace {}, inventory {}.", config.workspace.display(), config.state_file.display());

    let request = cli.command.into_request(&whoami::username);

    let inventory = Arc::new(LocalInventory::new(
        &config.state_file,
        &config.node_domain,
        config.supported_versions.clone(),
        config.verification.clone(),
    ));
    let infrastructure: Arc<dyn InfrastructureBackend> = inventory.clone();
    let platform: Arc<dyn PlatformBackend> = inventory;

    let mut dispatcher =
        OperationDispatcher::new(infrastructure, platform, Arc::new(SystemClock), Box::new(LineConfirm::stdio()), config.dispatch_settings());

    log::info!("Running {} operation.", request.operation());
    let outcome = dispatcher.dispatch(request)?;
    report::print_outcome(&outcome)?;

    Ok(())
}
