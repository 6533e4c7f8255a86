use vaakya::infrastructure::observability::TracingConfig;

#[test]
fn given_explicit_values_when_creating_config_then_kept() {
    let config = TracingConfig::new("prod", true);

    assert_eq!(config.environment, "prod");
    assert!(config.json_format);
}

#[test]
fn given_default_config_when_created_then_environment_is_set() {
    let config = TracingConfig::default();
    assert!(!config.environment.is_empty());
}
