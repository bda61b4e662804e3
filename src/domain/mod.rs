pub mod backend;
pub mod clock;
pub mod config;
pub mod confirm;
pub mod dispatcher;
pub mod id;
pub mod naming;
pub mod node_allocator;
pub mod node_role;
pub mod operation;
pub mod process_guard;
pub mod validation;
