use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::backend::{Cluster, InfrastructureBackend, PlatformBackend, Stack};
use crate::domain::clock::Clock;
use crate::domain::confirm::Confirm;
use crate::domain::naming::NamingPolicy;
use crate::domain::node_allocator;
use crate::domain::operation::{OperationRequest, TopologyRequest};
use crate::domain::validation::{DEFAULT_MAX_NODES_PER_ROLE, ParameterValidator, VersionPolicy};
use crate::error::{Error, Result};

pub const CANCELLED_BY_OPERATOR: &str = "cancelled by operator";
pub const LATEST_VERSION: &str = "latest";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Parsed,
    Validated,
    Creating,
    Deploying,
    Deleting,
    Succeeded,
    Failed,
}

/// What a finished operation reports back to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created { stack: Stack },
    Deployed { cluster: Cluster, version_report: String, nodes_report: String },
    Deleted { name: String },
    Cancelled { name: String },
}

/// Commands run on the designated master after a deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCommands {
    pub version: String,
    pub nodes: String,
}

impl Default for VerificationCommands {
    fn default() -> Self {
        Self { version: "oc version".to_string(), nodes: "oc get nodes".to_string() }
    }
}

#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub naming: NamingPolicy,
    pub version_policy: VersionPolicy,
    pub max_nodes_per_role: i64,
    pub verification: VerificationCommands,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            naming: NamingPolicy::default(),
            version_policy: VersionPolicy::default(),
            max_nodes_per_role: DEFAULT_MAX_NODES_PER_ROLE,
            verification: VerificationCommands::default(),
        }
    }
}

/// Runs one operation request through validation and into the matching backend calls.
///
/// Every operation makes at most one mutating backend call, and none at all unless
/// validation passed first.
pub struct OperationDispatcher {
    infrastructure: Arc<dyn InfrastructureBackend>,
    platform: Arc<dyn PlatformBackend>,
    clock: Arc<dyn Clock>,
    confirm: Box<dyn Confirm>,
    settings: DispatchSettings,
    history: Vec<DispatchState>,
    failure: Option<String>,
}

impl OperationDispatcher {
    pub fn new(
        infrastructure: Arc<dyn InfrastructureBackend>,
        platform: Arc<dyn PlatformBackend>,
        clock: Arc<dyn Clock>,
        confirm: Box<dyn Confirm>,
        settings: DispatchSettings,
    ) -> Self {
        Self { infrastructure, platform, clock, confirm, settings, history: Vec::new(), failure: None }
    }

    pub fn state(&self) -> Option<DispatchState> {
        self.history.last().copied()
    }

    /// States visited by the last dispatch, in order.
    pub fn history(&self) -> &[DispatchState] {
        &self.history
    }

    /// Reason the last dispatch ended in `Failed`.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn dispatch(&mut self, request: OperationRequest) -> Result<Outcome> {
        self.history.clear();
        self.failure = None;
        self.transition(DispatchState::Parsed);

        match self.run(request) {
            Ok(outcome @ Outcome::Cancelled { .. }) => {
                self.fail(CANCELLED_BY_OPERATOR.to_string());
                Ok(outcome)
            }
            Ok(outcome) => {
                self.transition(DispatchState::Succeeded);
                Ok(outcome)
            }
            Err(e) => {
                self.fail(e.to_string());
                Err(e)
            }
        }
    }

    fn run(&mut self, request: OperationRequest) -> Result<Outcome> {
        let supported_versions = match &request {
            OperationRequest::Deploy { .. } => self.platform.supported_versions()?,
            _ => BTreeSet::new(),
        };
        let request = resolve_version_alias(request, &supported_versions);

        let verdict = {
            let validator =
                ParameterValidator::new(self.infrastructure.as_ref(), supported_versions, self.settings.version_policy, self.settings.max_nodes_per_role);
            validator.validate(&request)
        };
        if !verdict.is_valid {
            return Err(Error::Validation(verdict.invalid_fields));
        }
        self.transition(DispatchState::Validated);

        match request {
            OperationRequest::Create { topology } => self.create(&topology),
            OperationRequest::Deploy { topology, version } => self.deploy(&topology, &version),
            OperationRequest::Delete { cluster_name, owner, force } => {
                if let Some(owner) = owner {
                    log::debug!("Delete of {} requested by {}.", cluster_name, owner);
                }
                self.delete(&cluster_name, force)
            }
        }
    }

    fn create(&mut self, topology: &TopologyRequest) -> Result<Outcome> {
        self.transition(DispatchState::Creating);

        let allocation = node_allocator::allocate(topology);
        let stack_name = self.settings.naming.stack_name(&topology.owner, self.clock.as_ref());

        log::info!("Creating stack {} with {} node(s).", stack_name, allocation.len());
        let stack = self.infrastructure.create_stack(&stack_name, &allocation.names, &allocation.roles)?;
        log::info!("Stack {} created with {} instance(s).", stack.name, stack.instances.len());

        Ok(Outcome::Created { stack })
    }

    fn deploy(&mut self, topology: &TopologyRequest, version: &str) -> Result<Outcome> {
        self.transition(DispatchState::Deploying);

        let allocation = node_allocator::allocate(topology);
        let stack_name = self.settings.naming.stack_name(&topology.owner, self.clock.as_ref());

        log::info!("Deploying version {} as cluster {} with {} node(s).", version, stack_name, allocation.len());
        let cluster = self.platform.create_cluster(&stack_name, &allocation, version)?;

        let master = cluster.designated_master()?.clone();
        let version_report = self.platform.run_command(&cluster, &master, &self.settings.verification.version)?;
        let nodes_report = self.platform.run_command(&cluster, &master, &self.settings.verification.nodes)?;

        Ok(Outcome::Deployed { cluster, version_report, nodes_report })
    }

    fn delete(&mut self, cluster_name: &str, force: bool) -> Result<Outcome> {
        self.transition(DispatchState::Deleting);

        let cluster = self.platform.get_cluster(cluster_name)?;

        if !force {
            let question = format!("Are you sure you want to delete cluster {}?", cluster_name);
            if !self.confirm.confirm(&question)? {
                log::info!("Deletion of cluster {} declined by operator.", cluster_name);
                return Ok(Outcome::Cancelled { name: cluster_name.to_string() });
            }
        }

        log::info!("Deleting cluster {}.", cluster_name);
        self.platform.delete_cluster(&cluster)?;

        Ok(Outcome::Deleted { name: cluster_name.to_string() })
    }

    fn transition(&mut self, next: DispatchState) {
        log::debug!("Dispatcher state {:?} -> {:?}", self.state(), next);
        self.history.push(next);
    }

    fn fail(&mut self, reason: String) {
        log::error!("Operation failed: {}", reason);
        self.failure = Some(reason);
        self.transition(DispatchState::Failed);
    }
}

/// Replaces a `latest` deploy version with the highest supported `major.minor` version.
fn resolve_version_alias(request: OperationRequest, supported_versions: &BTreeSet<String>) -> OperationRequest {
    match request {
        OperationRequest::Deploy { topology, version } if version.eq_ignore_ascii_case(LATEST_VERSION) => {
            let version = latest_version(supported_versions).unwrap_or(version);
            log::debug!("Resolved version alias '{}' to {}.", LATEST_VERSION, version);
            OperationRequest::Deploy { topology, version }
        }
        other => other,
    }
}

pub fn latest_version(supported_versions: &BTreeSet<String>) -> Option<String> {
    supported_versions.iter().filter_map(|version| major_minor(version).map(|key| (key, version))).max_by_key(|(key, _)| *key).map(|(_, version)| version.clone())
}

fn major_minor(version: &str) -> Option<(u64, u64)> {
    let (major, rest) = version.split_once('.')?;
    let minor: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    Some((major.parse().ok()?, minor.parse().ok()?))
}
