use std::collections::BTreeSet;

use crate::domain::backend::infrastructure::{Instance, Stack};
use crate::domain::id::StackName;
use crate::domain::node_allocator::NodeAllocation;
use crate::domain::node_role::NodeRole;
use crate::error::{Error, Result};

/// A deployed platform bound to a stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub stack: Stack,
    /// `None` while the stack carries no platform deployment.
    pub version: Option<String>,
}

impl Cluster {
    pub fn name(&self) -> &StackName {
        &self.stack.name
    }

    pub fn master_nodes(&self) -> impl Iterator<Item = &Instance> {
        self.stack.instances.iter().filter(|instance| instance.role == NodeRole::Master)
    }

    /// The node remote commands are executed against.
    pub fn designated_master(&self) -> Result<&Instance> {
        self.master_nodes()
            .next()
            .ok_or_else(|| Error::Collaborator(format!("Cluster {} has no master node to run commands on", self.stack.name)))
    }
}

/// Deployer that installs the platform onto stacks and runs commands on their nodes.
pub trait PlatformBackend: std::fmt::Debug + Send + Sync {
    fn supported_versions(&self) -> Result<BTreeSet<String>>;

    /// Provisions the stack for `allocation` and deploys `version` onto it.
    fn create_cluster(&self, name: &StackName, allocation: &NodeAllocation, version: &str) -> Result<Cluster>;

    fn get_cluster(&self, name: &str) -> Result<Cluster>;

    fn delete_cluster(&self, cluster: &Cluster) -> Result<()>;

    /// Runs `command` on `node` of `cluster` and returns its standard output.
    fn run_command(&self, cluster: &Cluster, node: &Instance, command: &str) -> Result<String>;
}
