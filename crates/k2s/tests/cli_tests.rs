//! Integration tests for the k2s binary
//!
//! Covers the paths that finish before any PowerShell script runs: setup
//! guards, catalog-driven addon commands and flag validation.

mod common;

use common::{stderr, stdout, Installation, DASHBOARD_MANIFEST, INGRESS_MANIFEST};
use serde_json::{json, Value};

fn catalog() -> Installation {
    Installation::new()
        .with_manifest("dashboard", DASHBOARD_MANIFEST)
        .with_manifest("ingress", INGRESS_MANIFEST)
}

#[test]
fn test_addons_ls_requires_installation() {
    let output = catalog().k2s(&["addons", "ls"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("K2s is not installed"));
}

#[test]
fn test_addons_ls_json() {
    let install = catalog().installed(json!([
        {"Name": "ingress", "Implementation": "traefik"},
    ]));

    let output = install.k2s(&["addons", "ls", "-o", "json"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let rows: Value = serde_json::from_str(&stdout(&output)).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0]["name"], "dashboard");
    assert_eq!(rows[0]["enabled"], false);
    assert_eq!(rows[1]["name"], "ingress");
    assert_eq!(rows[1]["implementation"], "traefik");
    assert_eq!(rows[1]["enabled"], true);
    assert_eq!(rows[2]["implementation"], "nginx");
}

#[test]
fn test_status_json_when_not_installed() {
    let output = Installation::new().k2s(&["status", "-o", "json"]);

    assert!(!output.status.success());
    let status: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(status["failure"]["code"], "system-not-installed");
    assert_eq!(status["failure"]["severity"], "warning");
}

#[test]
fn test_unknown_addons_command() {
    let output = catalog().k2s(&["addons", "upgrade", "dashboard"]);

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("Unknown addons command 'upgrade'"), "{}", err);
    assert!(err.contains("disable, enable"), "{}", err);
}

#[test]
fn test_range_checked_before_script_runs() {
    let output = catalog().k2s(&["addons", "enable", "dashboard", "--replicas", "9"]);

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("invalid value for flag '--replicas'"), "{}", err);
    assert!(err.contains("out of range [1,3]"), "{}", err);
}

#[test]
fn test_validation_set_checked_before_script_runs() {
    let output = catalog().k2s(&["addons", "enable", "ingress", "traefik", "--mode", "open"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("valid values are [default|secure]"));
}

#[test]
fn test_wrong_flag_type_is_a_usage_error() {
    let output = catalog().k2s(&["addons", "enable", "dashboard", "-r", "many"]);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_addon_command_requires_installation() {
    let output = catalog().k2s(&["addons", "disable", "dashboard"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("K2s is not installed"));
}

#[test]
fn test_export_rejects_unknown_addons() {
    let install = catalog().installed(json!([]));
    let out_dir = install.path().join("export");

    let output = install.k2s(&[
        "addons",
        "export",
        "ingress nginx",
        "gpu",
        "-d",
        &out_dir.to_string_lossy(),
    ]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown addon(s): gpu"));
}

#[test]
fn test_invalid_manifest_reports_path() {
    let install = catalog()
        .with_manifest("broken", "apiVersion: v1\nkind: Addon\n")
        .installed(json!([]));

    let output = install.k2s(&["addons", "ls"]);

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("Failed to load addons"), "{}", err);
    assert!(err.contains("broken"), "{}", err);
}

#[test]
fn test_addon_status_asks_for_implementation() {
    let output = catalog().k2s(&["addons", "status", "ingress"]);

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(
        err.contains("Addon 'ingress' has several implementations, specify one of: nginx, traefik"),
        "{}",
        err
    );
}
