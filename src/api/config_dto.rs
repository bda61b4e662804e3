use serde::{Deserialize, Serialize};

/// On-disk configuration. Every key is optional; missing keys fall back to defaults.
#[derive(Debug, Deserialize, Clone, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PoolConfigDto {
    pub supported_versions: Option<Vec<String>>,
    pub version_policy: Option<String>,
    pub lock_dir: Option<String>,
    pub log_dir: Option<String>,
    pub log_level: Option<String>,
    pub state_file: Option<String>,
    pub node_domain: Option<String>,
    pub unique_stack_suffix: Option<bool>,
    pub max_nodes_per_role: Option<i64>,
    pub verification_commands: Option<VerificationCommandsDto>,
}

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationCommandsDto {
    pub version: String,
    pub nodes: String,
}
