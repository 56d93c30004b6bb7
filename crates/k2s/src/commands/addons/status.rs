//! Addon status command

use anyhow::{bail, Result};
use k2s_addons::{Addon, Addons, Implementation};
use k2s_core::Failure;
use serde::{Deserialize, Serialize};

use crate::cli::{AddonStatusArgs, OutputFormat};
use crate::commands::common::{report_failure, CommandContext, ReportedFailure};
use crate::output;

const STATUS_SCRIPT: &str = "Get-Status.ps1";
const STATUS_MESSAGE_TYPE: &str = "AddonStatus";

/// Status reported by an addon's status script
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonStatus {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub props: Vec<StatusProp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,
}

/// A single checked property
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusProp {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub okay: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub async fn run(args: AddonStatusArgs, ctx: &CommandContext) -> Result<()> {
    let addons = ctx.addons()?;
    let (addon, implementation) =
        resolve_target(&addons, &args.addon, args.implementation.as_deref())?;

    ctx.ensure_installed()?;

    let status: AddonStatus = ctx
        .query(
            &implementation.directory.join(STATUS_SCRIPT),
            STATUS_MESSAGE_TYPE,
            ctx.base_params(),
        )
        .await?;

    if args.output == OutputFormat::Json {
        output::json(&status)?;
        // the failure is part of the printed document
        return match status.failure {
            Some(failure) => Err(ReportedFailure(failure).into()),
            None => Ok(()),
        };
    }

    if let Some(failure) = status.failure {
        return Err(report_failure(failure));
    }

    output::header(&format!("Addon '{}'", implementation.addons_cmd_name));
    output::kv("Description", &addon.metadata.description);

    match status.enabled {
        Some(true) => output::success("enabled"),
        _ => {
            output::info("disabled");
            return Ok(());
        }
    }

    for prop in &status.props {
        print_prop(prop);
    }
    Ok(())
}

/// Addon and implementation named on the command line
fn resolve_target<'a>(
    addons: &'a Addons,
    addon_name: &str,
    implementation: Option<&str>,
) -> Result<(&'a Addon, &'a Implementation)> {
    if let Some(found) = addons.resolve(addon_name, implementation) {
        return Ok(found);
    }

    let Some(addon) = addons.find(addon_name) else {
        bail!("Unknown addon '{}'", addon_name);
    };
    let names: Vec<&str> = addon
        .spec
        .implementations
        .iter()
        .map(|i| i.name.as_str())
        .collect();

    match implementation {
        Some(name) => bail!(
            "Unknown implementation '{}' of addon '{}', available: {}",
            name,
            addon_name,
            names.join(", ")
        ),
        None => bail!(
            "Addon '{}' has several implementations, specify one of: {}",
            addon_name,
            names.join(", ")
        ),
    }
}

fn print_prop(prop: &StatusProp) {
    let text = prop
        .message
        .clone()
        .or_else(|| prop.value.as_ref().map(|v| format!("{}: {}", prop.name, value_text(v))))
        .unwrap_or_else(|| prop.name.clone());

    match prop.okay {
        Some(true) => output::success(&text),
        Some(false) => output::warning(&text),
        None => output::kv(&prop.name, &text),
    }
}

fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k2s_addons::{AddonMetadata, AddonSpec, OfflineUsage};
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};

    fn addon(name: &str, implementations: &[&str]) -> Addon {
        let mut addon = Addon {
            api_version: "v1".into(),
            kind: "Addon".into(),
            directory: PathBuf::new(),
            metadata: AddonMetadata {
                name: name.into(),
                description: String::new(),
            },
            spec: AddonSpec {
                implementations: implementations
                    .iter()
                    .map(|i| Implementation {
                        name: i.to_string(),
                        description: String::new(),
                        directory: PathBuf::new(),
                        addons_cmd_name: String::new(),
                        export_directory_name: String::new(),
                        commands: BTreeMap::new(),
                        offline_usage: OfflineUsage::default(),
                    })
                    .collect(),
            },
        };
        addon.set_directory(&Path::new("/k2s/addons").join(name));
        addon
    }

    fn addons() -> Addons {
        Addons(vec![
            addon("ingress", &["nginx", "traefik"]),
            addon("dashboard", &["dashboard"]),
        ])
    }

    #[test]
    fn test_resolve_target() {
        let addons = addons();

        let (_, implementation) = resolve_target(&addons, "dashboard", None).unwrap();
        assert_eq!(implementation.addons_cmd_name, "dashboard");

        let (_, implementation) = resolve_target(&addons, "ingress", Some("traefik")).unwrap();
        assert_eq!(implementation.directory, Path::new("/k2s/addons/ingress/traefik"));
    }

    #[test]
    fn test_resolve_target_requires_implementation() {
        let err = resolve_target(&addons(), "ingress", None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Addon 'ingress' has several implementations, specify one of: nginx, traefik"
        );
    }

    #[test]
    fn test_resolve_target_unknown_names() {
        let addons = addons();

        let err = resolve_target(&addons, "gpu", None).unwrap_err();
        assert_eq!(err.to_string(), "Unknown addon 'gpu'");

        let err = resolve_target(&addons, "ingress", Some("haproxy")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown implementation 'haproxy' of addon 'ingress', available: nginx, traefik"
        );
    }

    #[test]
    fn test_decode_status() {
        let status: AddonStatus = serde_json::from_str(
            r#"{
                "name": "ingress",
                "implementation": "nginx",
                "enabled": true,
                "props": [
                    {"name": "IsIngressRunning", "value": true, "okay": true, "message": "The ingress controller is running"},
                    {"name": "Replicas", "value": 2}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(status.implementation.as_deref(), Some("nginx"));
        assert_eq!(status.enabled, Some(true));
        assert_eq!(status.props.len(), 2);
        assert_eq!(status.props[1].okay, None);
        assert_eq!(value_text(status.props[1].value.as_ref().unwrap()), "2");
        assert!(status.failure.is_none());
    }

    #[test]
    fn test_decode_status_with_failure() {
        let status: AddonStatus = serde_json::from_str(
            r#"{"name": "dashboard", "failure": {"severity": "warning", "code": "system-not-running", "message": "not running"}}"#,
        )
        .unwrap();

        let failure = status.failure.unwrap();
        assert_eq!(failure.code, "system-not-running");
        assert!(status.props.is_empty());
    }
}
