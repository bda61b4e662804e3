use crate::domain::id::NodeName;
use crate::domain::node_role::NodeRole;
use crate::domain::operation::TopologyRequest;

/// Node names and their role tags for one topology. `names[i]` carries role `roles[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeAllocation {
    pub names: Vec<NodeName>,
    pub roles: Vec<NodeRole>,
}

impl NodeAllocation {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn count(&self, role: NodeRole) -> usize {
        self.roles.iter().filter(|r| **r == role).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeName, NodeRole)> {
        self.names.iter().zip(self.roles.iter().copied())
    }
}

/// `count` names for `role`, numbered from 1: `master-1`, `master-2`, ...
pub fn node_names(role: NodeRole, count: usize) -> Vec<NodeName> {
    (1..=count).map(|ordinal| NodeName::new(format!("{}-{}", role, ordinal))).collect()
}

/// Allocates names for every requested node, masters first, then infra, then compute.
///
/// Counts are expected to be validated already; a non-positive count yields no nodes
/// for that role.
pub fn allocate(topology: &TopologyRequest) -> NodeAllocation {
    let mut allocation = NodeAllocation::default();

    for role in NodeRole::ORDER {
        let count = usize::try_from(requested(topology, role)).unwrap_or(0);
        allocation.names.extend(node_names(role, count));
        allocation.roles.extend(std::iter::repeat_n(role, count));
    }

    log::debug!(
        "Allocated {} node(s): {} master, {} infra, {} compute.",
        allocation.len(),
        allocation.count(NodeRole::Master),
        allocation.count(NodeRole::Infra),
        allocation.count(NodeRole::Compute)
    );
    allocation
}

fn requested(topology: &TopologyRequest, role: NodeRole) -> i64 {
    match role {
        NodeRole::Master => topology.master_count,
        NodeRole::Infra => topology.infra_count,
        NodeRole::Compute => topology.compute_count,
    }
}
