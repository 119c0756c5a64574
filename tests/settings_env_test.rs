use remote_config::ClientSettings;
use remote_config_core::LoadMode;

// Kept alone in its own test binary: it mutates process environment.
#[test]
fn test_environment_variables_override_defaults() {
    std::env::set_var("REMOTE_CONFIG__CLIENT__ENVIRONMENT", "canary");
    std::env::set_var("REMOTE_CONFIG__CLIENT__MODE", "local_only");
    std::env::set_var("REMOTE_CONFIG__STORE__PATH", "/tmp/canary.json");

    let settings = ClientSettings::load(None).unwrap();

    assert_eq!(settings.client.environment, "canary");
    assert_eq!(settings.client.mode, LoadMode::LocalOnly);
    assert_eq!(settings.store.path, "/tmp/canary.json");

    std::env::remove_var("REMOTE_CONFIG__CLIENT__ENVIRONMENT");
    std::env::remove_var("REMOTE_CONFIG__CLIENT__MODE");
    std::env::remove_var("REMOTE_CONFIG__STORE__PATH");
}
