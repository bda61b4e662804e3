use std::fmt;

/// The three lifecycle operations the tool can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Deploy,
    Delete,
}

impl Operation {
    /// Fields that must pass validation before the operation may touch a backend,
    /// in the order they are reported.
    pub fn required_fields(&self) -> &'static [Field] {
        match self {
            Operation::Create => &[Field::MasterCount, Field::InfraCount, Field::ComputeCount],
            Operation::Deploy => &[Field::MasterCount, Field::InfraCount, Field::ComputeCount, Field::Version],
            Operation::Delete => &[Field::ClusterName],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Deploy => "deploy",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    MasterCount,
    InfraCount,
    ComputeCount,
    Version,
    ClusterName,
}

impl Field {
    /// Name as spelled on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Field::MasterCount => "master_count",
            Field::InfraCount => "infra_count",
            Field::ComputeCount => "compute_count",
            Field::Version => "version",
            Field::ClusterName => "cluster_name",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw value of a field, as handed to its predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Count(i64),
    Text(&'a str),
}

/// Requested node counts and owner. Counts are kept signed so that
/// non-positive input survives parsing and is rejected by validation instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyRequest {
    pub master_count: i64,
    pub infra_count: i64,
    pub compute_count: i64,
    pub owner: String,
}

impl TopologyRequest {
    pub fn new(master_count: i64, infra_count: i64, compute_count: i64, owner: impl Into<String>) -> Self {
        Self { master_count, infra_count, compute_count, owner: owner.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationRequest {
    Create { topology: TopologyRequest },
    Deploy { topology: TopologyRequest, version: String },
    Delete { cluster_name: String, owner: Option<String>, force: bool },
}

impl OperationRequest {
    pub fn operation(&self) -> Operation {
        match self {
            OperationRequest::Create { .. } => Operation::Create,
            OperationRequest::Deploy { .. } => Operation::Deploy,
            OperationRequest::Delete { .. } => Operation::Delete,
        }
    }

    /// Value of `field` for this request, `None` when the operation does not carry it.
    pub fn field_value(&self, field: Field) -> Option<FieldValue<'_>> {
        match (self, field) {
            (OperationRequest::Create { topology } | OperationRequest::Deploy { topology, .. }, Field::MasterCount) => {
                Some(FieldValue::Count(topology.master_count))
            }
            (OperationRequest::Create { topology } | OperationRequest::Deploy { topology, .. }, Field::InfraCount) => {
                Some(FieldValue::Count(topology.infra_count))
            }
            (OperationRequest::Create { topology } | OperationRequest::Deploy { topology, .. }, Field::ComputeCount) => {
                Some(FieldValue::Count(topology.compute_count))
            }
            (OperationRequest::Deploy { version, .. }, Field::Version) => Some(FieldValue::Text(version)),
            (OperationRequest::Delete { cluster_name, .. }, Field::ClusterName) => Some(FieldValue::Text(cluster_name)),
            _ => None,
        }
    }
}
