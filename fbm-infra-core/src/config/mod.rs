//! Deployment configuration loading
//!
//! A deployment is described by one INI file per environment
//! (`config/dev.cfg`, `config/prod.cfg`, ...). The file must contain a
//! `[network]` section for the federation site; every other section
//! describes one node site and its name becomes the node's name.
//!
//! # Example Configuration
//!
//! ```ini
//! # Values shared by every section
//! [DEFAULT]
//! param_vpn_cert_arn = /fbm/vpn-cert-arn
//!
//! [network]
//! name_prefix = Fbm
//! site_name = Federated
//! domain_name = passian.federated
//! enable_https = yes
//!
//! [nodea]
//! name_prefix = FbmNodeA
//! stack_name = FbmNodeStackA
//! site_name = Clinical Node A
//! domain_name = passian.clinicala
//! bucket_name = clinical-node-a-import-bucket
//! enable_training_plan_approval = True
//! allow_default_training_plans = no
//! use_production_gui = 1
//! ```
//!
//! Loading goes through three steps: a [`SectionSource`] resolves the name
//! to an [`IniDocument`], each section is converted against a static
//! [`Shape`], and the typed records are validated together as a [`Config`].

pub mod core;
pub mod network;
pub mod node;
pub mod shape;
pub mod source;

pub use core::{read_config_file, Config, ConfigLoader, MAX_NODES};
pub use network::{NetworkConfig, NETWORK_SECTION, NETWORK_SHAPE};
pub use node::{NodeConfig, NODE_SHAPE};
pub use shape::{
    convert, parse_bool, FieldDefault, FieldKind, FieldSpec, Record, Shape, UnknownKeyPolicy,
    Value,
};
pub use source::{DirectorySource, IniDocument, MemorySource, Section, SectionSource};
