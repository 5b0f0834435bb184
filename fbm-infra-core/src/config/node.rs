//! Node site configuration

use super::shape::{FieldSpec, Record, Shape};
use crate::error::{FbmError, FbmResult};
use serde::{Deserialize, Serialize};

/// Fields accepted in a node section.
///
/// Flag defaults: training-plan approval is on, default training plans are
/// off and the development GUI image is used unless a site opts in.
pub const NODE_SHAPE: Shape = Shape {
    name: "node",
    fields: &[
        FieldSpec::text("name_prefix"),
        FieldSpec::text("site_name").with_aliases(&["site_description"]),
        FieldSpec::text("domain_name"),
        FieldSpec::optional_text("bucket_name").with_aliases(&["import_bucket_name"]),
        FieldSpec::optional_text("param_vpn_cert_arn"),
        FieldSpec::optional_text("stack_name"),
        FieldSpec::flag("enable_training_plan_approval", true),
        FieldSpec::flag("allow_default_training_plans", false),
        FieldSpec::flag("use_production_gui", false),
    ],
};

/// One participating site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Name of the section this node was read from
    pub node_name: String,
    pub name_prefix: String,
    pub site_name: String,
    pub domain_name: String,

    /// Import bucket; derived from `node_name` when not set
    pub bucket_name: Option<String>,

    pub param_vpn_cert_arn: Option<String>,

    /// Explicit stack name, replacing `{name_prefix}NodeStack`
    pub stack_name: Option<String>,

    pub enable_training_plan_approval: bool,
    pub allow_default_training_plans: bool,
    pub use_production_gui: bool,
}

impl NodeConfig {
    pub fn new(
        node_name: impl Into<String>,
        name_prefix: impl Into<String>,
        site_name: impl Into<String>,
        domain_name: impl Into<String>,
    ) -> Self {
        Self {
            node_name: node_name.into(),
            name_prefix: name_prefix.into(),
            site_name: site_name.into(),
            domain_name: domain_name.into(),
            bucket_name: None,
            param_vpn_cert_arn: None,
            stack_name: None,
            enable_training_plan_approval: true,
            allow_default_training_plans: false,
            use_production_gui: false,
        }
    }

    pub fn resolved_stack_name(&self) -> String {
        self.stack_name
            .clone()
            .unwrap_or_else(|| format!("{}NodeStack", self.name_prefix))
    }

    /// Bucket name after applying the `{node_name}-import-bucket` derivation
    pub fn resolved_bucket_name(&self) -> String {
        match &self.bucket_name {
            Some(bucket) => bucket.clone(),
            None => format!("{}-import-bucket", self.node_name)
                .to_lowercase()
                .replace('_', "-"),
        }
    }
}

impl TryFrom<Record> for NodeConfig {
    type Error = FbmError;

    fn try_from(mut record: Record) -> FbmResult<Self> {
        Ok(Self {
            node_name: record.section().to_string(),
            name_prefix: record.take_text("name_prefix")?,
            site_name: record.take_text("site_name")?,
            domain_name: record.take_text("domain_name")?,
            bucket_name: record.take_optional_text("bucket_name")?,
            param_vpn_cert_arn: record.take_optional_text("param_vpn_cert_arn")?,
            stack_name: record.take_optional_text("stack_name")?,
            enable_training_plan_approval: record.take_flag("enable_training_plan_approval")?,
            allow_default_training_plans: record.take_flag("allow_default_training_plans")?,
            use_production_gui: record.take_flag("use_production_gui")?,
        })
    }
}
