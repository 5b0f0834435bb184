//! Deployment plan derived from a validated configuration
//!
//! The plan names every stack the orchestration layer creates, assigns each
//! site its address ranges and lists the VPC peering links between the
//! network site and the nodes. It is pure data: nothing here talks to a
//! cloud API.

pub mod addressing;

pub use addressing::SiteAddressing;

use crate::config::{Config, NetworkConfig, NodeConfig};
use crate::environment::DeploymentEnvironment;
use crate::error::{FbmError, FbmResult};
use ipnet::Ipv4Net;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::debug;

/// Tag carrying the site's node name on every site stack
pub const NODE_NAME_TAG: &str = "passianfl-node-name";

/// Tag carrying the configuration name on every stack
pub const CONFIG_TAG: &str = "passianfl-config";

/// One deployable stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackPlan {
    pub id: String,
    pub description: String,
    pub tags: BTreeMap<String, String>,
}

impl StackPlan {
    fn for_site(id: String, description: String, node_name: &str) -> Self {
        let mut tags = BTreeMap::new();
        tags.insert(NODE_NAME_TAG.to_string(), node_name.to_string());
        Self {
            id,
            description,
            tags,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkStacks {
    pub network: StackPlan,
    pub services: StackPlan,
    pub researcher: StackPlan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkSitePlan {
    pub node_name: String,
    pub name_prefix: String,
    pub site_name: String,
    pub domain_name: String,
    pub addressing: SiteAddressing,
    pub vpn_cert_parameter: Option<String>,
    pub enable_https: bool,
    pub stacks: NetworkStacks,
}

impl NetworkSitePlan {
    fn new(network: &NetworkConfig) -> FbmResult<Self> {
        let prefix = &network.name_prefix;
        let site = &network.site_name;
        let node_name = &network.node_name;

        Ok(Self {
            node_name: node_name.clone(),
            name_prefix: prefix.clone(),
            site_name: site.clone(),
            domain_name: network.domain_name.clone(),
            addressing: SiteAddressing::for_site(0)?,
            vpn_cert_parameter: network.param_vpn_cert_arn.clone(),
            enable_https: network.enable_https,
            stacks: NetworkStacks {
                network: StackPlan::for_site(
                    network.resolved_stack_name(),
                    format!("FBM network stack for {}", site),
                    node_name,
                ),
                services: StackPlan::for_site(
                    format!("{}NetworkServiceStack", prefix),
                    format!("FBM network services stack for {}", site),
                    node_name,
                ),
                researcher: StackPlan::for_site(
                    format!("{}ResearcherServiceStack", prefix),
                    format!("FBM researcher services stack for {}", site),
                    node_name,
                ),
            },
        })
    }
}

/// Feature switches passed to a node's services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeFlags {
    pub enable_training_plan_approval: bool,
    pub allow_default_training_plans: bool,
    pub use_production_gui: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeStacks {
    pub data_import: StackPlan,
    pub node: StackPlan,
    pub services: StackPlan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSitePlan {
    pub node_name: String,
    pub name_prefix: String,
    pub site_name: String,
    pub domain_name: String,
    pub addressing: SiteAddressing,
    pub vpn_cert_parameter: Option<String>,
    pub bucket_name: String,
    pub flags: NodeFlags,
    pub stacks: NodeStacks,
}

impl NodeSitePlan {
    fn new(node: &NodeConfig, network_number: u32) -> FbmResult<Self> {
        let prefix = &node.name_prefix;
        let site = &node.site_name;
        let node_name = &node.node_name;

        Ok(Self {
            node_name: node_name.clone(),
            name_prefix: prefix.clone(),
            site_name: site.clone(),
            domain_name: node.domain_name.clone(),
            addressing: SiteAddressing::for_site(network_number)?,
            vpn_cert_parameter: node.param_vpn_cert_arn.clone(),
            bucket_name: node.resolved_bucket_name(),
            flags: NodeFlags {
                enable_training_plan_approval: node.enable_training_plan_approval,
                allow_default_training_plans: node.allow_default_training_plans,
                use_production_gui: node.use_production_gui,
            },
            stacks: NodeStacks {
                data_import: StackPlan::for_site(
                    format!("{}DataImportStack", prefix),
                    format!("FBM data import stack for {}", site),
                    node_name,
                ),
                node: StackPlan::for_site(
                    node.resolved_stack_name(),
                    format!("FBM node stack for {}", site),
                    node_name,
                ),
                services: StackPlan::for_site(
                    format!("{}NodeServiceStack", prefix),
                    format!("FBM network services stack for {}", site),
                    node_name,
                ),
            },
        })
    }
}

/// VPC peering between the network site and one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeeringLink {
    pub id: String,
    pub dns_resolution_id: String,
    pub network_stack: String,
    pub node_stack: String,
    pub network_cidr: Ipv4Net,
    pub node_cidr: Ipv4Net,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeeringPlan {
    pub stack: StackPlan,
    pub links: Vec<PeeringLink>,
}

impl PeeringPlan {
    fn new(network: &NetworkSitePlan, nodes: &[NodeSitePlan]) -> Self {
        let network_stack = &network.stacks.network.id;
        let links = nodes
            .iter()
            .map(|node| {
                let node_stack = &node.stacks.node.id;
                PeeringLink {
                    id: format!("Peer{}{}", network_stack, node_stack),
                    dns_resolution_id: format!("PeerConnectionDNSResolution{}", node_stack),
                    network_stack: network_stack.clone(),
                    node_stack: node_stack.clone(),
                    network_cidr: network.addressing.vpc_cidr,
                    node_cidr: node.addressing.vpc_cidr,
                }
            })
            .collect();

        Self {
            stack: StackPlan {
                id: format!("{}PeeringStack", network.name_prefix),
                description: "FBM peering stack".to_string(),
                tags: BTreeMap::new(),
            },
            links,
        }
    }
}

/// Everything the orchestration layer needs to lay out a deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentPlan {
    pub config_name: String,
    pub environment: DeploymentEnvironment,
    /// Tags applied to every stack
    pub tags: BTreeMap<String, String>,
    pub network: NetworkSitePlan,
    pub nodes: Vec<NodeSitePlan>,
    pub peering: PeeringPlan,
}

impl DeploymentPlan {
    pub fn build(
        config_name: &str,
        config: &Config,
        environment: &DeploymentEnvironment,
    ) -> FbmResult<Self> {
        config.validate()?;

        let network = NetworkSitePlan::new(&config.network)?;
        let nodes = config
            .nodes
            .iter()
            .zip(1u32..)
            .map(|(node, network_number)| NodeSitePlan::new(node, network_number))
            .collect::<FbmResult<Vec<_>>>()?;
        let peering = PeeringPlan::new(&network, &nodes);

        let mut tags = BTreeMap::new();
        tags.insert(CONFIG_TAG.to_string(), config_name.to_string());

        let plan = Self {
            config_name: config_name.to_string(),
            environment: environment.clone(),
            tags,
            network,
            nodes,
            peering,
        };
        plan.check_stack_ids()?;

        debug!(
            "Planned {} stacks for configuration '{}'",
            plan.stack_ids().len(),
            config_name
        );
        Ok(plan)
    }

    /// Stack ids in deployment order: network site, nodes, peering
    pub fn stack_ids(&self) -> Vec<&str> {
        let network = &self.network.stacks;
        let mut ids = vec![
            network.network.id.as_str(),
            network.services.id.as_str(),
            network.researcher.id.as_str(),
        ];
        for node in &self.nodes {
            ids.push(node.stacks.data_import.id.as_str());
            ids.push(node.stacks.node.id.as_str());
            ids.push(node.stacks.services.id.as_str());
        }
        ids.push(self.peering.stack.id.as_str());
        ids
    }

    fn check_stack_ids(&self) -> FbmResult<()> {
        let mut seen = HashSet::new();
        for id in self.stack_ids() {
            if !seen.insert(id) {
                return Err(FbmError::configuration(
                    "stacks",
                    format!("stack id '{}' would be created twice", id),
                ));
            }
        }
        Ok(())
    }

    pub fn render(&self, format: OutputFormat) -> FbmResult<String> {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| FbmError::serialization("render plan as JSON", e)),
            OutputFormat::Yaml => serde_yaml::to_string(self)
                .map_err(|e| FbmError::serialization("render plan as YAML", e)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}
