//! Network site configuration

use super::shape::{FieldSpec, Record, Shape};
use crate::error::{FbmError, FbmResult};
use serde::{Deserialize, Serialize};

/// Section holding the network site; every other section is a node
pub const NETWORK_SECTION: &str = "network";

/// Fields accepted in the `[network]` section
pub const NETWORK_SHAPE: Shape = Shape {
    name: "network",
    fields: &[
        FieldSpec::text("name_prefix"),
        FieldSpec::text("site_name").with_aliases(&["site_description"]),
        FieldSpec::text("domain_name"),
        FieldSpec::optional_text("param_vpn_cert_arn"),
        FieldSpec::optional_text("stack_name"),
        FieldSpec::flag("enable_https", false),
    ],
};

/// The federation-coordinating site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Always [`NETWORK_SECTION`]
    pub node_name: String,

    /// Namespace for generated resource identifiers
    pub name_prefix: String,

    /// Human-readable site description
    pub site_name: String,

    /// Private DNS zone served inside the site's VPC
    pub domain_name: String,

    /// Parameter store key holding the VPN certificate ARN
    pub param_vpn_cert_arn: Option<String>,

    /// Explicit stack name, replacing `{name_prefix}NetworkStack`
    pub stack_name: Option<String>,

    pub enable_https: bool,
}

impl NetworkConfig {
    pub fn new(
        name_prefix: impl Into<String>,
        site_name: impl Into<String>,
        domain_name: impl Into<String>,
    ) -> Self {
        Self {
            node_name: NETWORK_SECTION.to_string(),
            name_prefix: name_prefix.into(),
            site_name: site_name.into(),
            domain_name: domain_name.into(),
            param_vpn_cert_arn: None,
            stack_name: None,
            enable_https: false,
        }
    }

    /// Stack name after applying the override
    pub fn resolved_stack_name(&self) -> String {
        self.stack_name
            .clone()
            .unwrap_or_else(|| format!("{}NetworkStack", self.name_prefix))
    }
}

impl TryFrom<Record> for NetworkConfig {
    type Error = FbmError;

    fn try_from(mut record: Record) -> FbmResult<Self> {
        Ok(Self {
            node_name: NETWORK_SECTION.to_string(),
            name_prefix: record.take_text("name_prefix")?,
            site_name: record.take_text("site_name")?,
            domain_name: record.take_text("domain_name")?,
            param_vpn_cert_arn: record.take_optional_text("param_vpn_cert_arn")?,
            stack_name: record.take_optional_text("stack_name")?,
            enable_https: record.take_flag("enable_https")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::shape::convert;
    use crate::config::source::Section;

    #[test]
    fn test_network_from_minimal_section() {
        let section: Section = [
            ("name_prefix", "Test"),
            ("site_name", "Test Federated"),
            ("domain_name", "test.testfederated"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let record = convert(NETWORK_SECTION, &section, &NETWORK_SHAPE).unwrap();
        let network = NetworkConfig::try_from(record).unwrap();

        assert_eq!(
            network,
            NetworkConfig::new("Test", "Test Federated", "test.testfederated")
        );
        assert_eq!(network.resolved_stack_name(), "TestNetworkStack");
    }

    #[test]
    fn test_stack_name_override() {
        let mut network = NetworkConfig::new("Fbm", "Federated", "passian.federated");
        network.stack_name = Some("FederatedNetwork".to_string());
        assert_eq!(network.resolved_stack_name(), "FederatedNetwork");
    }
}
