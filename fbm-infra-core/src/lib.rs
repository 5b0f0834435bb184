//! Configuration loading and deployment planning for federated-learning
//! deployments.
//!
//! A deployment is one network site plus any number of node sites, each
//! described by a section of an INI file. [`config`] turns that file into a
//! validated [`config::Config`]; [`plan`] derives the stack names, address
//! ranges and peering links the cloud orchestration layer needs.

pub mod config;
pub mod environment;
pub mod error;
pub mod plan;

pub use config::{Config, ConfigLoader, NetworkConfig, NodeConfig};
pub use environment::DeploymentEnvironment;
pub use error::{FbmError, FbmResult};
pub use plan::{DeploymentPlan, OutputFormat};
