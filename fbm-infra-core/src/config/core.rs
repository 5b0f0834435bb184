//! Configuration aggregate and loader

use super::network::{NetworkConfig, NETWORK_SECTION, NETWORK_SHAPE};
use super::node::{NodeConfig, NODE_SHAPE};
use super::shape::UnknownKeyPolicy;
use super::source::{DirectorySource, IniDocument, SectionSource};
use crate::error::{FbmError, FbmResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Upper bound on node sections; each site needs two /16-aligned octets
/// of the 10.0.0.0/8 range and the network site takes the first pair.
pub const MAX_NODES: usize = 127;

/// Complete deployment configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,

    /// Node sites in section order
    pub nodes: Vec<NodeConfig>,
}

impl Config {
    /// Build a validated configuration from parsed sections, rejecting
    /// unknown keys
    pub fn parse(document: &IniDocument) -> FbmResult<Self> {
        Self::parse_with_policy(document, UnknownKeyPolicy::default())
    }

    pub fn parse_with_policy(document: &IniDocument, policy: UnknownKeyPolicy) -> FbmResult<Self> {
        let inherited = document.defaults();

        let section = document
            .section(NETWORK_SECTION)
            .ok_or_else(|| FbmError::MissingSection {
                section: NETWORK_SECTION.to_string(),
            })?;
        let network = NetworkConfig::try_from(NETWORK_SHAPE.convert(
            NETWORK_SECTION,
            section,
            inherited,
            policy,
        )?)?;

        let nodes = document
            .sections()
            .filter(|(name, _)| *name != NETWORK_SECTION)
            .map(|(name, section)| {
                NODE_SHAPE
                    .convert(name, section, inherited, policy)
                    .and_then(NodeConfig::try_from)
            })
            .collect::<FbmResult<Vec<_>>>()?;

        let config = Self { network, nodes };
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-section invariants
    pub fn validate(&self) -> FbmResult<()> {
        if self.nodes.len() > MAX_NODES {
            return Err(FbmError::configuration(
                "nodes",
                format!(
                    "{} node sections configured, at most {} are supported",
                    self.nodes.len(),
                    MAX_NODES
                ),
            ));
        }

        let sites = std::iter::once((
            self.network.node_name.as_str(),
            self.network.name_prefix.as_str(),
            self.network.resolved_stack_name(),
        ))
        .chain(self.nodes.iter().map(|node| {
            (
                node.node_name.as_str(),
                node.name_prefix.as_str(),
                node.resolved_stack_name(),
            )
        }));

        let mut prefixes: HashMap<&str, &str> = HashMap::new();
        let mut stacks: HashMap<String, &str> = HashMap::new();
        for (node_name, prefix, stack) in sites {
            if prefix.is_empty() {
                return Err(FbmError::configuration(
                    format!("[{}]", node_name),
                    "name_prefix cannot be empty",
                ));
            }
            if let Some(other) = prefixes.insert(prefix, node_name) {
                return Err(FbmError::configuration(
                    format!("[{}]", node_name),
                    format!("name_prefix '{}' is already used by [{}]", prefix, other),
                ));
            }
            if let Some(other) = stacks.insert(stack.clone(), node_name) {
                return Err(FbmError::configuration(
                    format!("[{}]", node_name),
                    format!("stack name '{}' is already used by [{}]", stack, other),
                ));
            }
        }

        let mut buckets: HashMap<String, &str> = HashMap::new();
        for node in &self.nodes {
            let bucket = node.resolved_bucket_name();
            if let Some(other) = buckets.insert(bucket.clone(), &node.node_name) {
                return Err(FbmError::configuration(
                    format!("[{}]", node.node_name),
                    format!("bucket '{}' is already used by [{}]", bucket, other),
                ));
            }
        }

        Ok(())
    }

    pub fn node(&self, node_name: &str) -> Option<&NodeConfig> {
        self.nodes.iter().find(|node| node.node_name == node_name)
    }
}

/// Loads named configurations from a [`SectionSource`]
#[derive(Debug, Clone)]
pub struct ConfigLoader<S> {
    source: S,
    policy: UnknownKeyPolicy,
}

impl<S: SectionSource> ConfigLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            policy: UnknownKeyPolicy::default(),
        }
    }

    pub fn unknown_keys(mut self, policy: UnknownKeyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Load and validate the configuration called `name`
    pub fn load(&self, name: &str) -> FbmResult<Config> {
        if name.trim().is_empty() {
            return Err(FbmError::MissingName);
        }

        let document = self.source.read(name)?;
        let config = Config::parse_with_policy(&document, self.policy)?;

        info!(
            "Loaded configuration '{}': network {} with {} node(s)",
            name,
            config.network.name_prefix,
            config.nodes.len()
        );
        Ok(config)
    }
}

/// Load `<config_dir>/<name>.cfg`
pub fn read_config_file<P: AsRef<Path>>(config_dir: P, name: &str) -> FbmResult<Config> {
    ConfigLoader::new(DirectorySource::new(config_dir.as_ref())).load(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::source::MemorySource;

    const TWO_NODES: &str = r#"
[network]
name_prefix = Fbm
site_name = Federated
domain_name = passian.federated

[nodeb]
name_prefix = FbmNodeB
site_name = Clinical Node B
domain_name = passian.clinicalb

[nodea]
name_prefix = FbmNodeA
site_name = Clinical Node A
domain_name = passian.clinicala
"#;

    #[test]
    fn test_nodes_keep_section_order() {
        let config = Config::parse(&IniDocument::parse(TWO_NODES).unwrap()).unwrap();
        let names: Vec<_> = config.nodes.iter().map(|n| n.node_name.as_str()).collect();
        assert_eq!(names, vec!["nodeb", "nodea"]);
        assert_eq!(config.node("nodea").unwrap().name_prefix, "FbmNodeA");
    }

    #[test]
    fn test_missing_network_section() {
        let doc = IniDocument::parse("[nodea]\nname_prefix = A\n").unwrap();
        assert!(matches!(
            Config::parse(&doc),
            Err(FbmError::MissingSection { ref section }) if section == "network"
        ));
    }

    #[test]
    fn test_network_only() {
        let doc = IniDocument::parse(
            "[network]\nname_prefix = Fbm\nsite_name = Federated\ndomain_name = passian.federated\n",
        )
        .unwrap();
        let config = Config::parse(&doc).unwrap();
        assert!(config.nodes.is_empty());
    }

    #[test]
    fn test_prefix_collision_rejected() {
        let text = TWO_NODES.replace("FbmNodeB", "Fbm");
        let err = Config::parse(&IniDocument::parse(&text).unwrap()).unwrap_err();
        assert!(err.to_string().contains("name_prefix 'Fbm' is already used by [network]"));
    }

    #[test]
    fn test_stack_name_collision_rejected() {
        let text = TWO_NODES.replace(
            "domain_name = passian.clinicala",
            "domain_name = passian.clinicala\nstack_name = FbmNodeBNodeStack",
        );
        let err = Config::parse(&IniDocument::parse(&text).unwrap()).unwrap_err();
        assert!(err.to_string().contains("stack name 'FbmNodeBNodeStack'"));
    }

    #[test]
    fn test_bucket_collision_rejected() {
        let text = TWO_NODES
            .replace(
                "domain_name = passian.clinicala",
                "domain_name = passian.clinicala\nbucket_name = shared",
            )
            .replace(
                "domain_name = passian.clinicalb",
                "domain_name = passian.clinicalb\nbucket_name = shared",
            );
        let err = Config::parse(&IniDocument::parse(&text).unwrap()).unwrap_err();
        assert!(err.to_string().contains("bucket 'shared'"));
    }

    #[test]
    fn test_empty_overrides_fall_back_to_derived_names() {
        let text = format!("{}stack_name =\nbucket_name =\n", TWO_NODES);
        let config = Config::parse(&IniDocument::parse(&text).unwrap()).unwrap();

        let node = config.node("nodea").unwrap();
        assert_eq!(node.stack_name, None);
        assert_eq!(node.bucket_name, None);
        assert_eq!(node.resolved_stack_name(), "FbmNodeANodeStack");
        assert_eq!(node.resolved_bucket_name(), "nodea-import-bucket");

        let plan = crate::plan::DeploymentPlan::build(
            "dev",
            &config,
            &crate::environment::DeploymentEnvironment::default(),
        )
        .unwrap();
        assert_eq!(plan.nodes[1].stacks.node.id, "FbmNodeANodeStack");
        assert_eq!(plan.nodes[1].bucket_name, "nodea-import-bucket");
        assert_eq!(plan.peering.links[1].id, "PeerFbmNetworkStackFbmNodeANodeStack");
    }

    #[test]
    fn test_empty_network_stack_name_falls_back() {
        let text = TWO_NODES.replace(
            "domain_name = passian.federated",
            "domain_name = passian.federated\nstack_name =",
        );
        let config = Config::parse(&IniDocument::parse(&text).unwrap()).unwrap();
        assert_eq!(config.network.resolved_stack_name(), "FbmNetworkStack");
    }

    #[test]
    fn test_loader_requires_name() {
        let loader = ConfigLoader::new(MemorySource::new());
        assert!(matches!(loader.load(""), Err(FbmError::MissingName)));
        assert!(matches!(loader.load("  "), Err(FbmError::MissingName)));
        assert!(matches!(loader.load("dev"), Err(FbmError::NotFound { .. })));
    }

    #[test]
    fn test_loader_policy() {
        let text = format!("{}colour = blue\n", TWO_NODES);
        let loader = ConfigLoader::new(MemorySource::new().with("dev", text));
        assert!(matches!(loader.load("dev"), Err(FbmError::UnknownField { .. })));

        let lenient = loader.clone().unknown_keys(UnknownKeyPolicy::Ignore);
        assert_eq!(lenient.load("dev").unwrap().nodes.len(), 2);
    }
}
