use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use tempfile::TempDir;

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

fn clear_petal_env() {
    let names: Vec<String> = env::vars()
        .map(|(k, _)| k)
        .filter(|k| k.starts_with("PETAL_"))
        .collect();
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for name in names {
        unsafe { env::remove_var(name) };
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert_eq!(config.qdrant_url, "http://localhost:6334");
    assert_eq!(config.collection, "products");
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.candidate_pool, 200);
    assert_eq!(config.top_k, 1);
    assert!((config.keyword_alpha - 1.2).abs() < f32::EPSILON);
    assert_eq!(config.max_rerank_chars, 1800);
    assert_eq!(config.default_brand, "Laneige");
    assert!(config.embedding_url.is_none());
    assert!(config.reranker_url.is_none());
    assert!(config.cache_path.is_none());
    assert!(!config.mock_provider);
}

#[test]
fn test_socket_addr() {
    let config = Config::default();
    assert_eq!(config.socket_addr(), "127.0.0.1:8080");

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
    clear_petal_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.port, 8080);
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.default_brand, "Laneige");
}

#[test]
#[serial]
fn test_from_env_custom_port() {
    clear_petal_env();

    with_env_vars(&[("PETAL_PORT", "3000")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.port, 3000);
    });
}

#[test]
#[serial]
fn test_from_env_zero_port_rejected() {
    clear_petal_env();

    with_env_vars(&[("PETAL_PORT", "0")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
    });
}

#[test]
#[serial]
fn test_from_env_invalid_port() {
    clear_petal_env();

    with_env_vars(&[("PETAL_PORT", "eighty")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::PortParseError { .. }));
    });
}

#[test]
#[serial]
fn test_from_env_ipv6_bind_addr() {
    clear_petal_env();

    with_env_vars(&[("PETAL_BIND_ADDR", "::1")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(
            config.bind_addr,
            IpAddr::V6(std::net::Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1))
        );
    });
}

#[test]
#[serial]
fn test_from_env_ranking_overrides() {
    clear_petal_env();

    with_env_vars(
        &[
            ("PETAL_CANDIDATE_POOL", "50"),
            ("PETAL_TOP_K", "3"),
            ("PETAL_KEYWORD_ALPHA", "0.8"),
            ("PETAL_MAX_RERANK_CHARS", "512"),
            ("PETAL_MAX_RETRIES", "2"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.candidate_pool, 50);
            assert_eq!(config.top_k, 3);
            assert!((config.keyword_alpha - 0.8).abs() < f32::EPSILON);
            assert_eq!(config.max_rerank_chars, 512);
            assert_eq!(config.max_retries, 2);
        },
    );
}

#[test]
#[serial]
fn test_from_env_invalid_number_reports_variable() {
    clear_petal_env();

    with_env_vars(&[("PETAL_MAX_RETRIES", "many")], || {
        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidNumber { name, value, .. } => {
                assert_eq!(name, "PETAL_MAX_RETRIES");
                assert_eq!(value, "many");
            }
            other => panic!("unexpected error: {other}"),
        }
    });
}

#[test]
#[serial]
fn test_from_env_blank_optional_is_none() {
    clear_petal_env();

    with_env_vars(
        &[("PETAL_EMBEDDING_URL", "   "), ("PETAL_CATALOG_PATH", "")],
        || {
            let config = Config::from_env().expect("should parse");
            assert!(config.embedding_url.is_none());
            assert!(config.catalog_path.is_none());
        },
    );
}

#[test]
#[serial]
fn test_from_env_mock_provider_flag() {
    clear_petal_env();

    with_env_vars(&[("PETAL_MOCK_PROVIDER", "1")], || {
        let config = Config::from_env().expect("should parse");
        assert!(config.mock_provider);
    });
}

#[test]
fn test_validate_default_ok() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validate_missing_catalog() {
    let config = Config {
        catalog_path: Some(PathBuf::from("/definitely/not/here.json")),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::PathNotFound { .. })
    ));
}

#[test]
fn test_validate_catalog_must_be_file() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        catalog_path: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::NotAFile { .. })));
}

#[test]
fn test_validate_cache_path_must_be_dir() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("cache.bin");
    std::fs::write(&file, b"x").unwrap();

    let config = Config {
        cache_path: Some(file),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotADirectory { .. })
    ));
}

#[test]
fn test_validate_rejects_zero_pool_and_negative_alpha() {
    let config = Config {
        candidate_pool: 0,
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::OutOfRange { .. })));

    let config = Config {
        keyword_alpha: -1.0,
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::OutOfRange { .. })));
}
