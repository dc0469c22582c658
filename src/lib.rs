pub mod commands;
pub mod config;
pub mod error;
pub mod fs;
pub mod identity;
pub mod logging;
pub mod models;
pub mod sequence;
pub mod store;
pub mod workflow;

pub use error::{ErrorKind, WorkflowError, WorkflowResult};
