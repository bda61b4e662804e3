use crate::domain::id::{NodeName, StackName};
use crate::domain::node_role::NodeRole;
use crate::error::Result;

/// One provisioned node of a stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub name: NodeName,
    pub role: NodeRole,
    /// Reachable address (fqdn) of the node.
    pub address: String,
}

/// A named group of provisioned instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    pub name: StackName,
    pub instances: Vec<Instance>,
}

impl Stack {
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.instances.iter().map(|instance| instance.address.as_str())
    }
}

/// Provider that creates and destroys stacks of nodes.
///
/// Implementations own all stack state; callers query it on every use and never cache it.
pub trait InfrastructureBackend: std::fmt::Debug + Send + Sync {
    fn stack_exists(&self, name: &str) -> Result<bool>;

    /// `node_names` and `node_roles` are positionally aligned.
    fn create_stack(&self, name: &StackName, node_names: &[NodeName], node_roles: &[NodeRole]) -> Result<Stack>;

    fn delete_stack(&self, name: &StackName) -> Result<()>;
}
