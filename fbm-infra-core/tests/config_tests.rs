use fbm_infra_core::config::{
    read_config_file, Config, ConfigLoader, DirectorySource, IniDocument, NetworkConfig,
    NodeConfig, UnknownKeyPolicy,
};
use fbm_infra_core::FbmError;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn shipped_config_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("config")
}

fn write_config(dir: &TempDir, name: &str, content: &str) {
    fs::write(dir.path().join(format!("{}.cfg", name)), content).unwrap();
}

#[test]
fn test_dev_config() {
    let config = read_config_file(shipped_config_dir(), "dev").unwrap();

    assert_eq!(config.network.name_prefix, "Test");
    assert_eq!(config.network.site_name, "Test Federated");
    assert_eq!(config.network.domain_name, "test.testfederated");
    assert_eq!(config.nodes.len(), 1);
    assert_eq!(config.nodes[0].name_prefix, "TestA");
    assert_eq!(config.nodes[0].stack_name.as_deref(), Some("TestNodeStackA"));
    assert_eq!(config.nodes[0].site_name, "Test Node A");
    assert_eq!(config.nodes[0].domain_name, "test.testclinicala");
    assert_eq!(
        config.nodes[0].bucket_name.as_deref(),
        Some("test-a-import-bucket")
    );
}

#[test]
fn test_prod_config() {
    let config = read_config_file(shipped_config_dir(), "prod").unwrap();

    assert_eq!(config.network.name_prefix, "Fbm");
    assert_eq!(config.network.site_name, "Federated");
    assert_eq!(config.network.domain_name, "passian.federated");
    assert_eq!(config.nodes.len(), 2);
    assert_eq!(config.nodes[0].name_prefix, "FbmNodeA");
    assert_eq!(config.nodes[0].resolved_stack_name(), "FbmNodeStackA");
    assert_eq!(config.nodes[0].site_name, "Clinical Node A");
    assert_eq!(config.nodes[0].domain_name, "passian.clinicala");
    assert_eq!(
        config.nodes[0].resolved_bucket_name(),
        "clinical-node-a-import-bucket"
    );
    assert_eq!(config.nodes[1].name_prefix, "FbmNodeB");
    assert_eq!(config.nodes[1].resolved_stack_name(), "FbmNodeStackB");
    assert_eq!(config.nodes[1].site_name, "Clinical Node B");
    assert_eq!(config.nodes[1].domain_name, "passian.clinicalb");
    assert_eq!(
        config.nodes[1].resolved_bucket_name(),
        "clinical-node-b-import-bucket"
    );
}

#[test]
fn test_shipped_configs_listed() {
    let names = DirectorySource::new(shipped_config_dir()).available().unwrap();
    assert!(names.contains(&"dev".to_string()));
    assert!(names.contains(&"prod".to_string()));
}

#[test]
fn test_single_node_scenario() {
    let temp = TempDir::new().unwrap();
    write_config(
        &temp,
        "test",
        r#"
[network]
name_prefix = Test
site_name = Test Federated
domain_name = test.testfederated

[nodea]
name_prefix = TestA
site_name = Test Node A
domain_name = test.testclinicala
bucket_name = test-a-import-bucket
"#,
    );

    let config = read_config_file(temp.path(), "test").unwrap();

    let mut expected_node = NodeConfig::new("nodea", "TestA", "Test Node A", "test.testclinicala");
    expected_node.bucket_name = Some("test-a-import-bucket".to_string());

    assert_eq!(
        config,
        Config {
            network: NetworkConfig::new("Test", "Test Federated", "test.testfederated"),
            nodes: vec![expected_node],
        }
    );
}

#[test]
fn test_flag_spellings() {
    let temp = TempDir::new().unwrap();
    write_config(
        &temp,
        "flags",
        r#"
[network]
name_prefix = Test
site_name = Test Federated
domain_name = test.testfederated
enable_https = On

[nodea]
name_prefix = TestA
site_name = Test Node A
domain_name = test.testclinicala
enable_training_plan_approval = yes
allow_default_training_plans = False
use_production_gui = TRUE
"#,
    );

    let config = read_config_file(temp.path(), "flags").unwrap();
    let node = &config.nodes[0];

    assert!(config.network.enable_https);
    assert!(node.enable_training_plan_approval);
    assert!(!node.allow_default_training_plans);
    assert!(node.use_production_gui);
}

#[test]
fn test_nodes_follow_file_order_not_alphabetical() {
    let temp = TempDir::new().unwrap();
    write_config(
        &temp,
        "order",
        r#"
[zurich]
name_prefix = Zurich
site_name = Zurich
domain_name = fl.zurich

[network]
name_prefix = Fed
site_name = Federation
domain_name = fl.fed

[athens]
name_prefix = Athens
site_name = Athens
domain_name = fl.athens
"#,
    );

    let config = read_config_file(temp.path(), "order").unwrap();
    let names: Vec<_> = config.nodes.iter().map(|n| n.node_name.as_str()).collect();
    assert_eq!(names, vec!["zurich", "athens"]);
}

#[test]
fn test_missing_and_unknown_names() {
    let temp = TempDir::new().unwrap();

    assert!(matches!(
        read_config_file(temp.path(), ""),
        Err(FbmError::MissingName)
    ));

    match read_config_file(temp.path(), "staging") {
        Err(FbmError::NotFound { name, .. }) => assert_eq!(name, "staging"),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_missing_field_names_the_field() {
    let temp = TempDir::new().unwrap();
    write_config(
        &temp,
        "broken",
        "[network]\nname_prefix = Test\nsite_name = Test Federated\n",
    );

    let err = read_config_file(temp.path(), "broken").unwrap_err();
    assert!(matches!(
        err,
        FbmError::MissingField { ref field, .. } if field == "domain_name"
    ));
    assert!(err.to_string().contains("Missing field: domain_name"));
}

#[test]
fn test_invalid_flag_is_fatal() {
    let temp = TempDir::new().unwrap();
    write_config(
        &temp,
        "broken",
        "[network]\nname_prefix = T\nsite_name = T\ndomain_name = t\nenable_https = sometimes\n",
    );

    let err = read_config_file(temp.path(), "broken").unwrap_err();
    assert!(err.to_string().contains("Invalid value for field enable_https"));
}

#[test]
fn test_default_section_inherited() {
    let doc = IniDocument::parse(
        r#"
[DEFAULT]
param_vpn_cert_arn = /fbm/vpn-cert-arn
use_production_gui = yes
bucket_name = ignored-for-network

[network]
name_prefix = Fbm
site_name = Federated
domain_name = passian.federated

[nodea]
name_prefix = FbmNodeA
site_name = Clinical Node A
domain_name = passian.clinicala
use_production_gui = no
bucket_name = clinical-a

[nodeb]
name_prefix = FbmNodeB
site_name = Clinical Node B
domain_name = passian.clinicalb
"#,
    )
    .unwrap();

    let config = Config::parse(&doc).unwrap();

    assert_eq!(
        config.network.param_vpn_cert_arn.as_deref(),
        Some("/fbm/vpn-cert-arn")
    );
    assert!(!config.nodes[0].use_production_gui);
    assert!(config.nodes[1].use_production_gui);
    assert_eq!(config.nodes[1].bucket_name.as_deref(), Some("ignored-for-network"));
    assert_eq!(
        config.nodes[1].param_vpn_cert_arn.as_deref(),
        Some("/fbm/vpn-cert-arn")
    );
}

#[test]
fn test_unknown_key_rejected_unless_ignored() {
    let temp = TempDir::new().unwrap();
    write_config(
        &temp,
        "typo",
        "[network]\nname_prefix = T\nsite_name = T\ndomain_name = t\ndomain_nmae = t\n",
    );

    let strict = ConfigLoader::new(DirectorySource::new(temp.path()));
    match strict.load("typo") {
        Err(FbmError::UnknownField { section, field }) => {
            assert_eq!(section, "network");
            assert_eq!(field, "domain_nmae");
        }
        other => panic!("expected UnknownField, got {:?}", other),
    }

    let lenient = strict.unknown_keys(UnknownKeyPolicy::Ignore);
    assert_eq!(lenient.load("typo").unwrap().network.domain_name, "t");
}

#[test]
fn test_syntax_error_surfaces_through_loader() {
    let temp = TempDir::new().unwrap();
    write_config(&temp, "broken", "name_prefix = Test\n[network]\n");

    let err = read_config_file(temp.path(), "broken").unwrap_err();
    assert!(matches!(err, FbmError::Syntax { line: 1, .. }));
}
