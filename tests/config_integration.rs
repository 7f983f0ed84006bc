use exam_chat_gateway::config::AppConfig;
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("GATEWAY_SERVER__PORT");
        env::remove_var("GATEWAY_API__PUBLIC_URL");
        env::remove_var("GATEWAY_API__INTERNAL_URL");
        env::remove_var("GATEWAY_AUTH__HOME_REDIRECT");
        env::remove_var("CONFIG_FILE");
        env::remove_var("PORT");
        env::remove_var("PUBLIC_API_URL");
        env::remove_var("INTERNAL_API_URL");
        env::remove_var("HOME_REDIRECT");
        env::remove_var("APP_ENV");
    }
}

fn load() -> AppConfig {
    AppConfig::load_from_args(["gateway"]).expect("Failed to load config")
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = load();
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.auth.home_redirect, "/");
    assert_eq!(config.auth.cookie_max_age_secs, 604_800);
    assert!(!config.production);
    assert!(config.api.public_url.is_none());
    assert!(config.api.internal_url.is_none());
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("GATEWAY_SERVER__PORT", "9090");
        env::set_var("GATEWAY_API__INTERNAL_URL", "http://backend:8000");
    }

    let config = load();
    assert_eq!(config.server.port, 9090);
    assert_eq!(
        config.api.internal_url.as_deref(),
        Some("http://backend:8000")
    );

    clear_env_vars();
}

#[test]
#[serial]
fn test_deployment_env_names() {
    clear_env_vars();
    unsafe {
        env::set_var("PUBLIC_API_URL", "https://api.example.com");
        env::set_var("APP_ENV", "production");
        env::set_var("GATEWAY_API__PUBLIC_URL", "https://ignored.example.com");
    }

    let config = load();
    assert_eq!(
        config.api.public_url.as_deref(),
        Some("https://api.example.com")
    );
    assert!(config.production);

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_flag_beats_env() {
    clear_env_vars();
    unsafe {
        env::set_var("GATEWAY_SERVER__PORT", "9090");
    }

    let config = AppConfig::load_from_args(["gateway", "--port", "4040"]).unwrap();
    assert_eq!(config.server.port, 4040);

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("Failed to create temp config");
    write!(
        file,
        r#"
server:
  port: 7070
api:
  public_url: "https://api.example.com"
auth:
  home_redirect: "/chat"
locale: "en"
"#
    )
    .unwrap();

    unsafe {
        env::set_var("CONFIG_FILE", file.path());
    }

    let config = load();
    assert_eq!(config.server.port, 7070);
    assert_eq!(
        config.api.public_url.as_deref(),
        Some("https://api.example.com")
    );
    assert_eq!(config.auth.home_redirect, "/chat");
    assert_eq!(config.locale, "en");

    clear_env_vars();
}

#[test]
#[serial]
fn test_cwd_config_fallback() {
    clear_env_vars();

    let config_content = r#"
server:
  port: 6060
    "#;
    let cwd_path = "config.yaml";
    fs::write(cwd_path, config_content).expect("Failed to write ./config.yaml");

    let config = AppConfig::load_from_args(["gateway"]);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        assert_eq!(config.expect("Failed to load config").server.port, 6060);
    }));

    fs::remove_file(cwd_path).unwrap();

    if let Err(e) = result {
        std::panic::resume_unwind(e);
    }
}

#[test]
#[serial]
fn test_missing_config_file_is_an_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args(["gateway", "--config", "/nonexistent/gateway.yaml"]);
    assert!(result.is_err());
}
