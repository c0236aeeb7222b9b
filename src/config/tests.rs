use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_foodie_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("FOODIE_PORT");
        env::remove_var("FOODIE_BIND_ADDR");
        env::remove_var("FOODIE_DATA_PATH");
        env::remove_var("FOODIE_INDEX_PATH");
        env::remove_var("FOODIE_MODEL_PATH");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8000);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert_eq!(config.data_path, PathBuf::from("static/restaurants.csv"));
    assert_eq!(config.index_path, PathBuf::from("static/reviews.idx"));
    assert!(config.model_path.is_none());
}

#[test]
fn test_socket_addr() {
    let config = Config::default();
    assert_eq!(config.socket_addr(), "127.0.0.1:8000");

    let config = Config {
        port: 3000,
        bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "0.0.0.0:3000");
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_foodie_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.port, 8000);
    assert_eq!(config.data_path, PathBuf::from("static/restaurants.csv"));
    assert!(config.model_path.is_none());
}

#[test]
#[serial]
fn test_from_env_with_overrides() {
    clear_foodie_env();

    let config = with_env_vars(
        &[
            ("FOODIE_PORT", "9001"),
            ("FOODIE_BIND_ADDR", "0.0.0.0"),
            ("FOODIE_DATA_PATH", "/data/restaurants.csv"),
            ("FOODIE_INDEX_PATH", "/data/reviews.idx"),
            ("FOODIE_MODEL_PATH", "/models/minilm"),
        ],
        || Config::from_env().expect("should parse overrides"),
    );

    assert_eq!(config.port, 9001);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0))
    );
    assert_eq!(config.data_path, PathBuf::from("/data/restaurants.csv"));
    assert_eq!(config.index_path, PathBuf::from("/data/reviews.idx"));
    assert_eq!(config.model_path, Some(PathBuf::from("/models/minilm")));
}

#[test]
#[serial]
fn test_invalid_port_is_rejected() {
    clear_foodie_env();

    let result = with_env_vars(&[("FOODIE_PORT", "0")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::InvalidPort { .. })));

    let result = with_env_vars(&[("FOODIE_PORT", "not-a-port")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::PortParseError { .. })));
}

#[test]
#[serial]
fn test_invalid_bind_addr_is_rejected() {
    clear_foodie_env();

    let result = with_env_vars(&[("FOODIE_BIND_ADDR", "not-an-ip")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::InvalidBindAddr { .. })));
}

#[test]
#[serial]
fn test_empty_model_path_is_none() {
    clear_foodie_env();

    let config = with_env_vars(&[("FOODIE_MODEL_PATH", "  ")], || {
        Config::from_env().expect("should parse")
    });
    assert!(config.model_path.is_none());
}

#[test]
fn test_validate_missing_model_dir() {
    let config = Config {
        model_path: Some(PathBuf::from("/nonexistent/minilm")),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::PathNotFound { .. })
    ));
}

#[test]
fn test_validate_model_path_must_be_directory() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let config = Config {
        model_path: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotADirectory { .. })
    ));
}

#[test]
fn test_validate_missing_data_paths_are_allowed() {
    // Missing dataset/index degrade at load time, not at validation.
    let config = Config {
        data_path: PathBuf::from("/nonexistent/restaurants.csv"),
        index_path: PathBuf::from("/nonexistent/reviews.idx"),
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}
