use serde::{Deserialize, Serialize};

/// State file of the local inventory backend.
#[derive(Debug, Deserialize, Clone, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDto {
    #[serde(default)]
    pub stacks: Vec<StackRecordDto>,
}

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StackRecordDto {
    pub name: String,
    pub instances: Vec<InstanceRecordDto>,
    /// Deployed platform version, absent for bare stacks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstanceRecordDto {
    pub name: String,
    pub role: String,
    pub address: String,
}
