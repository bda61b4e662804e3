use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::api::inventory_dto::{InstanceRecordDto, InventoryDto, StackRecordDto};
use crate::domain::backend::infrastructure::{Instance, InfrastructureBackend, Stack};
use crate::domain::backend::platform::{Cluster, PlatformBackend};
use crate::domain::dispatcher::VerificationCommands;
use crate::domain::id::{NodeName, StackName};
use crate::domain::node_allocator::NodeAllocation;
use crate::domain::node_role::NodeRole;
use crate::error::{Error, Result};
use crate::loader::parser::{parse_json_file_or_default, write_json_file};

/// Simulated provider and deployer backed by a JSON state file.
///
/// Every call re-reads the state file, so several tool invocations see each other's stacks.
#[derive(Debug, Clone)]
pub struct LocalInventory {
    state_file: PathBuf,
    node_domain: String,
    supported_versions: BTreeSet<String>,
    /// Commands `run_command` answers; any other command yields empty output.
    commands: VerificationCommands,
}

impl LocalInventory {
    pub fn new(
        state_file: impl Into<PathBuf>,
        node_domain: impl Into<String>,
        supported_versions: BTreeSet<String>,
        commands: VerificationCommands,
    ) -> Self {
        Self { state_file: state_file.into(), node_domain: node_domain.into(), supported_versions, commands }
    }

    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    fn load(&self) -> Result<InventoryDto> {
        parse_json_file_or_default(&self.state_file)
    }

    fn save(&self, inventory: &InventoryDto) -> Result<()> {
        write_json_file(&self.state_file, inventory)
    }

    fn address(&self, stack: &StackName, node: &NodeName) -> String {
        format!("{}.{}.{}", node, stack, self.node_domain)
    }

    fn record(&self, name: &StackName, node_names: &[NodeName], node_roles: &[NodeRole], version: Option<&str>) -> Result<StackRecordDto> {
        if node_names.len() != node_roles.len() {
            return Err(Error::Collaborator(format!(
                "Stack {} got {} node names but {} role tags",
                name,
                node_names.len(),
                node_roles.len()
            )));
        }

        let instances = node_names
            .iter()
            .zip(node_roles)
            .map(|(node, role)| InstanceRecordDto { name: node.to_string(), role: role.to_string(), address: self.address(name, node) })
            .collect();

        Ok(StackRecordDto { name: name.to_string(), instances, version: version.map(str::to_string) })
    }

    fn insert(&self, record: StackRecordDto) -> Result<StackRecordDto> {
        let mut inventory = self.load()?;
        if inventory.stacks.iter().any(|stack| stack.name == record.name) {
            return Err(Error::Collaborator(format!("Stack {} already exists", record.name)));
        }

        inventory.stacks.push(record.clone());
        self.save(&inventory)?;
        log::info!("LocalInventory: recorded stack {} in {}.", record.name, self.state_file.display());
        Ok(record)
    }

    fn remove(&self, name: &str, kind: &'static str) -> Result<()> {
        let mut inventory = self.load()?;
        let before = inventory.stacks.len();
        inventory.stacks.retain(|stack| stack.name != name);

        if inventory.stacks.len() == before {
            return Err(Error::NotFound { kind, name: name.to_string() });
        }

        self.save(&inventory)?;
        log::info!("LocalInventory: removed {} {}.", kind, name);
        Ok(())
    }
}

fn to_stack(record: StackRecordDto) -> Result<(Stack, Option<String>)> {
    let instances = record
        .instances
        .into_iter()
        .map(|instance| -> Result<Instance> {
            Ok(Instance { name: NodeName::new(instance.name), role: NodeRole::from_str(&instance.role)?, address: instance.address })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((Stack { name: StackName::new(record.name), instances }, record.version))
}

impl InfrastructureBackend for LocalInventory {
    fn stack_exists(&self, name: &str) -> Result<bool> {
        Ok(self.load()?.stacks.iter().any(|stack| stack.name == name))
    }

    fn create_stack(&self, name: &StackName, node_names: &[NodeName], node_roles: &[NodeRole]) -> Result<Stack> {
        let record = self.insert(self.record(name, node_names, node_roles, None)?)?;
        Ok(to_stack(record)?.0)
    }

    fn delete_stack(&self, name: &StackName) -> Result<()> {
        self.remove(name.as_str(), "Stack")
    }
}

impl PlatformBackend for LocalInventory {
    fn supported_versions(&self) -> Result<BTreeSet<String>> {
        Ok(self.supported_versions.clone())
    }

    fn create_cluster(&self, name: &StackName, allocation: &NodeAllocation, version: &str) -> Result<Cluster> {
        if !self.supported_versions.contains(version) {
            return Err(Error::Collaborator(format!("Version {} is unreachable for cluster {}", version, name)));
        }

        let record = self.insert(self.record(name, &allocation.names, &allocation.roles, Some(version))?)?;
        let (stack, version) = to_stack(record)?;
        Ok(Cluster { stack, version })
    }

    fn get_cluster(&self, name: &str) -> Result<Cluster> {
        let record = self
            .load()?
            .stacks
            .into_iter()
            .find(|stack| stack.name == name)
            .ok_or_else(|| Error::NotFound { kind: "Cluster", name: name.to_string() })?;

        let (stack, version) = to_stack(record)?;
        Ok(Cluster { stack, version })
    }

    fn delete_cluster(&self, cluster: &Cluster) -> Result<()> {
        self.remove(cluster.name().as_str(), "Cluster")
    }

    fn run_command(&self, cluster: &Cluster, node: &Instance, command: &str) -> Result<String> {
        log::debug!("LocalInventory: {} $ {}", node.address, command);

        if command == self.commands.version {
            let version = cluster.version.as_deref().unwrap_or("not deployed");
            return Ok(format!("server {}\nplatform {}\n", node.address, version));
        }

        if command == self.commands.nodes {
            let mut output = format!("{:<20} {:<8} {}\n", "NAME", "ROLE", "ADDRESS");
            for instance in &cluster.stack.instances {
                output.push_str(&format!("{:<20} {:<8} {}\n", instance.name, instance.role, instance.address));
            }
            return Ok(output);
        }

        Ok(String::new())
    }
}
