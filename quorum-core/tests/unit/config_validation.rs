use quorum_core::infrastructure::config::AppConfig;

#[test]
fn default_config_is_valid() {
    AppConfig::default().validate().expect("defaults validate");
}

#[test]
fn json_with_partial_fields_falls_back_to_defaults() {
    let config = AppConfig::from_json_str(r#"{"node_rpc_url": "http://127.0.0.1:8080", "chain_id": 4}"#).expect("load");
    assert_eq!(config.node_rpc_url, "http://127.0.0.1:8080");
    assert_eq!(config.chain_id, Some(4));
    assert_eq!(config.submission.submit_attempts, 3);
    assert_eq!(config.transaction.expiration_ttl_secs, 600);
}

#[test]
fn test_validate_when_limits_are_zero_then_every_error_is_reported() {
    let mut config = AppConfig::default();
    config.submission.submit_attempts = 0;
    config.submission.poll_interval_millis = 0;
    config.transaction.expiration_ttl_secs = 0;

    let errors = config.validate().expect_err("invalid limits");
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().any(|e| e.contains("submit_attempts")));
    assert!(errors.iter().any(|e| e.contains("poll_interval_millis")));
    assert!(errors.iter().any(|e| e.contains("expiration_ttl_secs")));
}

#[test]
fn test_from_json_when_invalid_then_config_error() {
    assert!(AppConfig::from_json_str("{not json").is_err());
    assert!(AppConfig::from_json_str(r#"{"submission": {"submit_attempts": 0}}"#).is_err());
}
