use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;
use vigil_config::{StoreConfig, VigilConfigLoader};

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn loads_full_file() {
    let tmp = TempDir::new().unwrap();
    let file_yaml = r#"
source:
  url: "https://www.ndma.gov.pk/advisories"
  label: "NDMA Pakistan"
browser:
  webdriver_url: "http://localhost:4444"
  headless: false
  ready_timeout_secs: 5
server:
  bind: "127.0.0.1:8080"
sync:
  interval_mins: 30
  collection: "advisories-staging"
store:
  provider: firestore
  project_id: "pwd-alerts"
  auth_token: "${VIGIL_TEST_STORE_TOKEN}"
"#;
    let p = write_yaml(&tmp, "vigil.yaml", file_yaml);

    temp_env::with_var("VIGIL_TEST_STORE_TOKEN", Some("secret-token"), || {
        let config = VigilConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load config");

        assert_eq!(config.browser.webdriver_url, "http://localhost:4444");
        assert!(!config.browser.headless);
        assert_eq!(config.browser.ready_timeout_secs, 5);
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.sync.interval_mins, 30);
        assert_eq!(config.sync.collection, "advisories-staging");

        match &config.store {
            StoreConfig::Firestore {
                project_id,
                auth_token,
                endpoint,
            } => {
                assert_eq!(project_id, "pwd-alerts");
                assert_eq!(auth_token.as_deref(), Some("secret-token"));
                assert_eq!(endpoint, "https://firestore.googleapis.com");
            }
            other => panic!("expected firestore store config, got {other:?}"),
        }
    });
}

#[test]
#[serial]
fn missing_file_falls_back_to_defaults() {
    let config = VigilConfigLoader::new()
        .with_file("/definitely/not/here/vigil.yaml")
        .load()
        .expect("defaults load without a file");

    assert_eq!(config.source.url, "https://www.ndma.gov.pk/advisories");
    assert_eq!(config.source.label, "NDMA Pakistan");
    assert!(config.browser.headless);
    assert_eq!(config.browser.ready_timeout_secs, 20);
    assert_eq!(config.server.bind, "0.0.0.0:5000");
    assert_eq!(config.sync.interval_mins, 15);
    assert_eq!(config.sync.collection, "advisories");
    assert!(matches!(config.store, StoreConfig::Memory));
}

#[test]
#[serial]
fn environment_overrides_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "vigil.yaml",
        r#"
sync:
  collection: "from-file"
"#,
    );

    temp_env::with_var("VIGIL_SYNC__COLLECTION", Some("from-env"), || {
        let config = VigilConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load config");
        assert_eq!(config.sync.collection, "from-env");
    });
}
