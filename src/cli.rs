use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::dispatcher::LATEST_VERSION;
use crate::domain::operation::{OperationRequest, TopologyRequest};

#[derive(Debug, Parser)]
#[command(name = "cluster-pool")]
#[command(about = "Provision, deploy and tear down master/infra/compute cluster stacks", long_about = None)]
pub struct Cli {
    /// Workspace directory holding configuration, lock, logs and inventory
    #[arg(long, global = true, env = "CLUSTER_POOL_HOME")]
    pub workspace: Option<PathBuf>,

    /// Configuration file (defaults to <workspace>/config.json)
    #[arg(long, global = true, env = "CLUSTER_POOL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a cluster stack without deploying the platform
    Create {
        #[command(flatten)]
        topology: TopologyArgs,
    },

    /// Create a stack and deploy the platform onto it
    Deploy {
        /// Platform version to deploy (major.minor, or "latest")
        #[arg(long, default_value = LATEST_VERSION)]
        version: String,

        #[command(flatten)]
        topology: TopologyArgs,
    },

    /// Delete a cluster and its stack
    Delete {
        /// Name of the cluster
        cluster_name: String,

        /// Owner of the stack
        #[arg(long, value_parser = parse_owner)]
        owner: Option<String>,

        /// Delete without asking for confirmation
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Args)]
pub struct TopologyArgs {
    /// Number of master nodes
    #[arg(long = "master_count", visible_alias = "master-count", default_value_t = 1, allow_negative_numbers = true)]
    pub master_count: i64,

    /// Number of infra nodes
    #[arg(long = "infra_count", visible_alias = "infra-count", default_value_t = 1, allow_negative_numbers = true)]
    pub infra_count: i64,

    /// Number of compute nodes
    #[arg(long = "compute_count", visible_alias = "compute-count", default_value_t = 3, allow_negative_numbers = true)]
    pub compute_count: i64,

    /// Owner of the stack (defaults to the login name)
    #[arg(long, value_parser = parse_owner)]
    pub owner: Option<String>,
}

impl TopologyArgs {
    fn into_topology(self, default_owner: &dyn Fn() -> String) -> TopologyRequest {
        let owner = self.owner.unwrap_or_else(default_owner);
        TopologyRequest::new(self.master_count, self.infra_count, self.compute_count, owner)
    }
}

fn parse_owner(value: &str) -> Result<String, String> {
    let owner = value.trim();
    if owner.is_empty() {
        return Err("owner must not be empty".to_string());
    }
    Ok(owner.to_string())
}

impl Commands {
    /// Builds the request, filling a missing owner from `default_owner`.
    pub fn into_request(self, default_owner: &dyn Fn() -> String) -> OperationRequest {
        match self {
            Commands::Create { topology } => OperationRequest::Create { topology: topology.into_topology(default_owner) },
            Commands::Deploy { version, topology } => OperationRequest::Deploy { topology: topology.into_topology(default_owner), version },
            Commands::Delete { cluster_name, owner, force } => OperationRequest::Delete { cluster_name, owner, force },
        }
    }
}
