//! Tests for configuration file loading and precedence.

use std::path::Path;

use netpolgen::config::{load_config, Config, CONFIG_PATH_ENV};
use netpolgen::translate::PortMode;

fn write_config(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, contents).expect("write config");
    path
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn load_config_reads_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), "namespace = \"payments\"\nstrict = true\n");

    let config = load_config(&path).expect("should load");
    assert_eq!(config.namespace, "payments");
    assert!(config.strict);
    assert_eq!(config.port_mode, PortMode::Numeric);
}

#[test]
fn load_config_reports_path_on_parse_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), "namespace = [");

    let err = load_config(&path).expect_err("should fail");
    assert!(format!("{err:#}").contains("config.toml"));
}

#[test]
fn explicit_path_must_exist() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope.toml");
    assert!(Config::load_with(Some(&missing), no_env).is_err());
}

#[test]
fn env_var_selects_config_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), "port_mode = \"passthrough\"\n");
    let path_str = path.display().to_string();

    let config = Config::load_with(None, |key| {
        (key == CONFIG_PATH_ENV).then(|| path_str.clone())
    })
    .expect("should load")
    .config;
    assert_eq!(config.port_mode, PortMode::Passthrough);
}

#[test]
fn env_overrides_beat_file_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), "namespace = \"from-file\"\n");

    let config = Config::load_with(Some(&path), |key| {
        (key == "NETPOLGEN_NAMESPACE").then(|| "from-env".to_owned())
    })
    .expect("should load")
    .config;
    assert_eq!(config.namespace, "from-env");
}

#[test]
fn empty_namespace_in_file_loads_but_fails_validation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), "namespace = \"\"\n");

    let loaded = Config::load_with(Some(&path), no_env).expect("later layers may still fix it");
    assert!(loaded.config.validate().is_err());
}

#[test]
fn invalid_env_override_is_returned_not_applied() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), "port_mode = \"passthrough\"\n");

    let loaded = Config::load_with(Some(&path), |key| {
        (key == "NETPOLGEN_PORT_MODE").then(|| "bogus".to_owned())
    })
    .expect("should load");
    assert_eq!(loaded.config.port_mode, PortMode::Passthrough);
    assert_eq!(loaded.rejected_overrides.len(), 1);
    assert_eq!(loaded.rejected_overrides[0].var, "NETPOLGEN_PORT_MODE");
    assert_eq!(loaded.rejected_overrides[0].value, "bogus");
}
