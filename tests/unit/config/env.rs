use std::collections::HashMap;

use super::*;

fn config(vars: &[(&str, &str)]) -> ServerConfig {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    ServerConfig::from_lookup(|k| map.get(k).cloned())
}

#[test]
fn defaults_when_nothing_is_set() {
    let cfg = config(&[]);
    assert_eq!(cfg.port, 8888);
    assert_eq!(cfg.webhook_url, None);
    assert_eq!(cfg.self_url, "http://localhost:8888");
    assert_eq!(cfg.export_dir, PathBuf::from("export"));
    assert_eq!(cfg.assets_dir, PathBuf::from("."));
}

#[test]
fn self_url_follows_port() {
    let cfg = config(&[("PORT", "9001")]);
    assert_eq!(cfg.port, 9001);
    assert_eq!(cfg.self_url, "http://localhost:9001");
}

#[test]
fn bad_port_falls_back() {
    assert_eq!(config(&[("PORT", "eighty")]).port, DEFAULT_PORT);
    assert_eq!(config(&[("PORT", "70000")]).port, DEFAULT_PORT);
}

#[test]
fn webhook_prefers_primary_variable() {
    let cfg = config(&[("WEBHOOK_URL", "http://a"), ("ZAPIER_URL", "http://b")]);
    assert_eq!(cfg.webhook_url.as_deref(), Some("http://a"));

    let cfg = config(&[("ZAPIER_URL", "http://b")]);
    assert_eq!(cfg.webhook_url.as_deref(), Some("http://b"));
}

#[test]
fn blank_values_count_as_unset() {
    let cfg = config(&[("WEBHOOK_URL", " "), ("SELF_URL", ""), ("EXPORT_DIR", "")]);
    assert_eq!(cfg.webhook_url, None);
    assert_eq!(cfg.self_url, "http://localhost:8888");
    assert_eq!(cfg.export_dir, PathBuf::from("export"));
}

#[test]
fn explicit_values_are_used() {
    let cfg = config(&[
        ("SELF_URL", "https://cards.example"),
        ("EXPORT_DIR", "/var/cards"),
        ("ASSETS_DIR", "/srv/assets"),
    ]);
    assert_eq!(cfg.self_url, "https://cards.example");
    assert_eq!(cfg.export_dir, PathBuf::from("/var/cards"));
    assert_eq!(cfg.assets_dir, PathBuf::from("/srv/assets"));
}
