pub mod commands;

// Re-export commonly used types
pub use fbm_infra_core::{
    config::{Config, ConfigLoader, DirectorySource},
    environment::DeploymentEnvironment,
    error::{FbmError, FbmResult},
    plan::{DeploymentPlan, OutputFormat},
};
