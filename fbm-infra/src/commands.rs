//! Command handlers behind the `fbm-infra` binary
//!
//! Handlers return the text to print so they can be tested without
//! spawning the binary.

use fbm_infra_core::config::{ConfigLoader, DirectorySource, UnknownKeyPolicy};
use fbm_infra_core::{DeploymentEnvironment, DeploymentPlan, FbmResult, OutputFormat};
use std::path::Path;
use tracing::info;

pub fn loader(config_dir: &Path, allow_unknown_keys: bool) -> ConfigLoader<DirectorySource> {
    let policy = if allow_unknown_keys {
        UnknownKeyPolicy::Ignore
    } else {
        UnknownKeyPolicy::Reject
    };
    ConfigLoader::new(DirectorySource::new(config_dir)).unknown_keys(policy)
}

/// Load a configuration and describe it in one line
pub fn validate(loader: &ConfigLoader<DirectorySource>, name: Option<&str>) -> FbmResult<String> {
    let name = name.unwrap_or_default();
    let config = loader.load(name)?;

    let nodes: Vec<&str> = config
        .nodes
        .iter()
        .map(|node| node.node_name.as_str())
        .collect();
    let summary = if nodes.is_empty() {
        format!(
            "Configuration '{}' is valid: network {} ({}) with no nodes",
            name, config.network.name_prefix, config.network.site_name
        )
    } else {
        format!(
            "Configuration '{}' is valid: network {} ({}) with {} node(s): {}",
            name,
            config.network.name_prefix,
            config.network.site_name,
            nodes.len(),
            nodes.join(", ")
        )
    };
    Ok(summary)
}

/// Load a configuration and render its deployment plan
pub fn plan(
    loader: &ConfigLoader<DirectorySource>,
    name: Option<&str>,
    environment: &DeploymentEnvironment,
    format: OutputFormat,
) -> FbmResult<String> {
    let name = name.unwrap_or_default();
    let config = loader.load(name)?;
    let plan = DeploymentPlan::build(name, &config, environment)?;

    if !environment.is_pinned() {
        info!("No account/region set; plan is environment-agnostic");
    }
    info!(
        "Planned {} stacks for '{}' as {}",
        plan.stack_ids().len(),
        name,
        format
    );
    plan.render(format)
}

/// Names of the configurations available in the loader's directory
pub fn list(loader: &ConfigLoader<DirectorySource>) -> FbmResult<Vec<String>> {
    loader.source().available()
}
