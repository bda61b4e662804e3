use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::api::config_dto::PoolConfigDto;
use crate::domain::dispatcher::{DispatchSettings, VerificationCommands};
use crate::domain::naming::NamingPolicy;
use crate::domain::operation::FieldValue;
use crate::domain::validation::{DEFAULT_MAX_NODES_PER_ROLE, VersionPolicy, is_version_pattern};
use crate::error::{ConversionError, Error, Result};
use crate::loader::parser::parse_json_file;

pub const DEFAULT_SUPPORTED_VERSIONS: [&str; 3] = ["3.11", "4.12", "4.14"];
pub const CONFIG_FILE: &str = "config.json";
const WORKSPACE_DIR: &str = ".cluster_pool";

/// Runtime configuration with every path resolved against the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub workspace: PathBuf,
    pub supported_versions: BTreeSet<String>,
    pub version_policy: VersionPolicy,
    pub lock_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub state_file: PathBuf,
    pub node_domain: String,
    pub unique_stack_suffix: bool,
    pub max_nodes_per_role: i64,
    pub verification: VerificationCommands,
}

impl TryFrom<(PoolConfigDto, PathBuf)> for PoolConfig {
    type Error = ConversionError;

    fn try_from(args: (PoolConfigDto, PathBuf)) -> std::result::Result<Self, Self::Error> {
        let (dto, workspace) = args;

        let supported_versions: BTreeSet<String> = match dto.supported_versions {
            Some(versions) => versions.into_iter().collect(),
            None => DEFAULT_SUPPORTED_VERSIONS.iter().map(|v| v.to_string()).collect(),
        };
        if let Some(bad) = supported_versions.iter().find(|v| !is_version_pattern(FieldValue::Text(v))) {
            return Err(ConversionError::MalformedSupportedVersion(bad.clone()));
        }

        let version_policy = match dto.version_policy {
            Some(policy) => VersionPolicy::from_str(&policy)?,
            None => VersionPolicy::default(),
        };

        let max_nodes_per_role = dto.max_nodes_per_role.unwrap_or(DEFAULT_MAX_NODES_PER_ROLE);
        if max_nodes_per_role < 1 {
            return Err(ConversionError::InvalidNodeLimit(max_nodes_per_role));
        }

        let resolve = |value: Option<String>, default: PathBuf| value.map(|v| workspace.join(v)).unwrap_or(default);
        let lock_dir = resolve(dto.lock_dir, workspace.clone());
        let log_dir = resolve(dto.log_dir, workspace.join("logs"));
        let state_file = resolve(dto.state_file, workspace.join("inventory.json"));

        let verification = dto
            .verification_commands
            .map(|commands| VerificationCommands { version: commands.version, nodes: commands.nodes })
            .unwrap_or_default();

        Ok(PoolConfig {
            supported_versions,
            version_policy,
            lock_dir,
            log_dir,
            log_level: dto.log_level.unwrap_or_else(|| "info".to_string()),
            state_file,
            node_domain: dto.node_domain.unwrap_or_else(|| "pool.local".to_string()),
            unique_stack_suffix: dto.unique_stack_suffix.unwrap_or(false),
            max_nodes_per_role,
            verification,
            workspace,
        })
    }
}

impl PoolConfig {
    /// Loads `config_path`, or `<workspace>/config.json` when no path is given.
    ///
    /// A missing default file means built-in defaults; a missing explicit file is an error.
    pub fn load(workspace: &Path, config_path: Option<&Path>) -> Result<PoolConfig> {
        let dto = match config_path {
            Some(path) => parse_json_file::<PoolConfigDto>(path)?,
            None => {
                let default_path = workspace.join(CONFIG_FILE);
                if default_path.is_file() { parse_json_file::<PoolConfigDto>(&default_path)? } else { PoolConfigDto::default() }
            }
        };

        PoolConfig::try_from((dto, workspace.to_path_buf())).map_err(Error::from)
    }

    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            naming: NamingPolicy::new(self.unique_stack_suffix),
            version_policy: self.version_policy,
            max_nodes_per_role: self.max_nodes_per_role,
            verification: self.verification.clone(),
        }
    }
}

/// `~/.cluster_pool`, or the current directory when no home directory is known.
pub fn default_workspace() -> PathBuf {
    dirs::home_dir().map(|home| home.join(WORKSPACE_DIR)).unwrap_or_else(|| PathBuf::from("."))
}
