//! Target account and region for a deployment
//!
//! The library never reads process environment variables itself. Callers
//! resolve the account and region (the CLI reads `CDK_DEFAULT_ACCOUNT` and
//! `CDK_DEFAULT_REGION`) and pass a [`DeploymentEnvironment`] explicitly.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentEnvironment {
    pub account: Option<String>,
    pub region: Option<String>,
}

impl DeploymentEnvironment {
    pub fn new(account: Option<String>, region: Option<String>) -> Self {
        Self {
            account: account.filter(|value| !value.is_empty()),
            region: region.filter(|value| !value.is_empty()),
        }
    }

    /// Whether the deployment is pinned to an account and region; an
    /// unpinned deployment is environment-agnostic.
    pub fn is_pinned(&self) -> bool {
        self.account.is_some() && self.region.is_some()
    }
}
