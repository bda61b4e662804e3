pub mod infrastructure;
pub mod local_inventory;
pub mod platform;

pub use infrastructure::{Instance, InfrastructureBackend, Stack};
pub use platform::{Cluster, PlatformBackend};
