use crate::error::ConversionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Master,
    Infra,
    Compute,
}

impl NodeRole {
    /// Allocation order of the roles. Name and role sequences are both built in this order.
    pub const ORDER: [NodeRole; 3] = [NodeRole::Master, NodeRole::Infra, NodeRole::Compute];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::Master => "master",
            NodeRole::Infra => "infra",
            NodeRole::Compute => "compute",
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeRole {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "master" => Ok(NodeRole::Master),
            "infra" => Ok(NodeRole::Infra),
            "compute" => Ok(NodeRole::Compute),
            _ => Err(ConversionError::UnknownNodeRole(s.to_string())),
        }
    }
}
