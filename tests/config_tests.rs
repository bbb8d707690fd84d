use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use counterwatch::config::{load_watch_list, Config};
use counterwatch::kernel::watch::{StaticWatchList, WatchListProvider, WatchTarget};
use counterwatch::ConfigError;
use uuid::Uuid;

fn required() -> HashMap<&'static str, String> {
    HashMap::from([
        ("APIC_HOST", "apic.example.net".to_string()),
        ("APIC_USERNAME", "admin".to_string()),
        ("APIC_PASSWORD", "s3cret".to_string()),
        ("PHANTOM_HOST", "phantom.example.net".to_string()),
        ("PHANTOM_TOKEN", "tok3n".to_string()),
    ])
}

fn load(vars: &HashMap<&'static str, String>) -> Result<Config, ConfigError> {
    Config::from_lookup(|key| vars.get(key).cloned())
}

fn temp_file(content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("counterwatch-{}.json", Uuid::new_v4()));
    fs::write(&path, content).expect("write temp watch list");
    path
}

#[test]
fn test_defaults() {
    let config = load(&required()).unwrap();

    assert_eq!(config.apic_host, "apic.example.net");
    assert_eq!(config.poll.poll_interval, Duration::from_secs(60));
    assert_eq!(config.poll.retry_interval, Duration::from_secs(10));
    assert_eq!(config.poll.container_id, 28);
    assert_eq!(config.request_timeout, Duration::from_secs(10));
    assert!(config.apic_verify_tls);
    assert!(config.phantom_verify_tls);
    assert_eq!(config.log_level, "info");
    assert_eq!(config.watch_list, StaticWatchList::default());
}

#[test]
fn test_default_watch_list_order() {
    let list = StaticWatchList::default();
    let classes: Vec<&str> = list.list().iter().map(|t| t.class.as_str()).collect();

    assert_eq!(classes, vec!["dbgEpgToIpRslt", "dbgIpToEpgRslt"]);
    assert!(list.list().iter().all(|t| t.counter == "totTxP" && t.threshold.is_none()));
    assert_eq!(list.list(), StaticWatchList::default().list(), "same sequence every call");
}

#[test]
fn test_each_required_key_is_enforced() {
    for key in ["APIC_HOST", "APIC_USERNAME", "APIC_PASSWORD", "PHANTOM_HOST", "PHANTOM_TOKEN"] {
        let mut vars = required();
        vars.remove(key);
        let err = load(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(k) if k == key), "{key}: {err}");

        let mut blank = required();
        blank.insert(key, "   ".to_string());
        assert!(matches!(load(&blank).unwrap_err(), ConfigError::Missing(_)));
    }
}

#[test]
fn test_overrides() {
    let mut vars = required();
    vars.insert("POLL_INTERVAL_SECS", "120".to_string());
    vars.insert("RETRY_INTERVAL_SECS", "5".to_string());
    vars.insert("PHANTOM_CONTAINER_ID", "41".to_string());
    vars.insert("APIC_VERIFY_TLS", "false".to_string());
    vars.insert("LOG_LEVEL", "DEBUG".to_string());

    let config = load(&vars).unwrap();
    assert_eq!(config.poll.poll_interval, Duration::from_secs(120));
    assert_eq!(config.poll.retry_interval, Duration::from_secs(5));
    assert_eq!(config.poll.container_id, 41);
    assert!(!config.apic_verify_tls);
    assert_eq!(config.log_level, "debug");
}

#[test]
fn test_invalid_numbers_rejected() {
    let mut vars = required();
    vars.insert("POLL_INTERVAL_SECS", "soon".to_string());
    let err = load(&vars).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "POLL_INTERVAL_SECS", .. }));

    let mut vars = required();
    vars.insert("PHANTOM_VERIFY_TLS", "maybe".to_string());
    assert!(matches!(load(&vars).unwrap_err(), ConfigError::Invalid { key: "PHANTOM_VERIFY_TLS", .. }));

    let mut vars = required();
    vars.insert("REQUEST_TIMEOUT_SECS", "0".to_string());
    assert!(matches!(load(&vars).unwrap_err(), ConfigError::Invalid { key: "REQUEST_TIMEOUT_SECS", .. }));
}

#[test]
fn test_retry_must_be_shorter_than_poll() {
    let mut vars = required();
    vars.insert("POLL_INTERVAL_SECS", "30".to_string());
    vars.insert("RETRY_INTERVAL_SECS", "30".to_string());

    let err = load(&vars).unwrap_err();
    assert!(matches!(err, ConfigError::RetryNotShorter { retry: 30, poll: 30 }));
}

#[test]
fn test_watch_list_from_file() {
    let path = temp_file(
        r#"[
            {"class": "dbgAcTrail", "counter": "totRxP", "threshold": 100},
            {"class": "dbgEpToEpRslt", "counter": "totTxP"}
        ]"#,
    );
    let mut vars = required();
    vars.insert("WATCH_LIST_PATH", path.display().to_string());

    let config = load(&vars).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(
        config.watch_list.list(),
        &[
            WatchTarget {
                class: "dbgAcTrail".to_string(),
                counter: "totRxP".to_string(),
                threshold: Some(100),
            },
            WatchTarget::new("dbgEpToEpRslt", "totTxP"),
        ]
    );
}

#[test]
fn test_bad_watch_lists_rejected() {
    for content in ["[]", "not json", r#"[{"class": "x"}]"#] {
        let path = temp_file(content);
        let err = load_watch_list(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::WatchList { .. }), "{content}: {err}");
    }

    let missing = std::env::temp_dir().join(format!("counterwatch-{}.json", Uuid::new_v4()));
    assert!(matches!(load_watch_list(&missing).unwrap_err(), ConfigError::WatchList { .. }));
}

#[test]
fn test_debug_output_hides_credentials() {
    let config = load(&required()).unwrap();
    let rendered = format!("{config:?}");

    assert!(rendered.contains("apic.example.net"));
    assert!(!rendered.contains("s3cret"));
    assert!(!rendered.contains("tok3n"));
}
