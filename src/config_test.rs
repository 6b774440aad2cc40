use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_when_nothing_set() {
    let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.host.to_string(), DEFAULT_HOST);
    assert_eq!(config.storage_path, PathBuf::from(DEFAULT_STORAGE_PATH));
    assert_eq!(config.cors_origin, DEFAULT_CORS_ORIGIN);
}

#[test]
fn reads_all_overrides() {
    let config = ServerConfig::from_lookup(lookup_from(&[
        ("HOST", "127.0.0.1"),
        ("PORT", "9090"),
        ("STORAGE_PATH", "/var/lib/neighbor/data.yaml"),
        ("CORS_ORIGIN", "*"),
    ]))
    .unwrap();

    assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9090");
    assert_eq!(config.storage_path, PathBuf::from("/var/lib/neighbor/data.yaml"));
    assert_eq!(config.cors_origin, "*");
}

#[test]
fn blank_storage_path_falls_back_to_default() {
    let config = ServerConfig::from_lookup(lookup_from(&[("STORAGE_PATH", "  ")])).unwrap();
    assert_eq!(config.storage_path, PathBuf::from(DEFAULT_STORAGE_PATH));
}

#[test]
fn invalid_port_is_rejected() {
    let err = ServerConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { var: "PORT", value: "eighty".into() });
}

#[test]
fn invalid_host_is_rejected() {
    let err = ServerConfig::from_lookup(lookup_from(&[("HOST", "not-an-ip")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "HOST", .. }));
}
