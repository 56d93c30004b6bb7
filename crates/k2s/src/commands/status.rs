//! Status command

use anyhow::Result;
use k2s_core::{Failure, SetupInfo};
use serde::{Deserialize, Serialize};
use tabled::{settings::Style, Table, Tabled};

use super::common::{report_failure, CommandContext, ReportedFailure};
use crate::cli::{OutputFormat, StatusArgs};
use crate::output;

const STATUS_SCRIPT: &str = "lib/scripts/k2s/status/Get-Status.ps1";
const STATUS_MESSAGE_TYPE: &str = "Status";

/// Status reported by the status script
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running_state: Option<RunningState>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<Node>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pods: Option<Vec<Pod>>,

    #[serde(default)]
    pub failure: Option<Failure>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningState {
    pub is_running: bool,

    #[serde(default)]
    pub issues: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[tabled(rename = "STATUS")]
    pub status: String,
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "ROLE")]
    pub role: String,
    #[tabled(rename = "AGE")]
    pub age: String,
    #[tabled(rename = "VERSION")]
    pub kubelet_version: String,
    #[tabled(rename = "INTERNAL-IP")]
    pub internal_ip: String,
    #[tabled(skip)]
    #[serde(default)]
    pub is_ready: bool,
}

#[derive(Debug, Serialize, Deserialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    #[tabled(rename = "STATUS")]
    pub status: String,
    #[tabled(rename = "NAMESPACE")]
    pub namespace: String,
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "READY")]
    pub ready: String,
    #[tabled(rename = "RESTARTS")]
    pub restarts: String,
    #[tabled(rename = "AGE")]
    pub age: String,
    #[tabled(skip)]
    #[serde(default)]
    pub is_running: bool,
}

/// JSON document printed by `status -o json`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    setup_name: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,

    #[serde(flatten)]
    status: &'a SystemStatus,
}

pub async fn run(args: StatusArgs, ctx: &CommandContext) -> Result<()> {
    let setup = match SetupInfo::load(&ctx.config.setup_file()) {
        Ok(setup) => setup,
        Err(e) => match Failure::from_setup_error(&e) {
            Some(failure) if args.output == OutputFormat::Json => {
                let status = SystemStatus {
                    failure: Some(failure.clone()),
                    ..Default::default()
                };
                print_json(None, &status)?;
                return Err(ReportedFailure(failure).into());
            }
            Some(failure) => return Err(report_failure(failure)),
            None => return Err(e.into()),
        },
    };

    let status: SystemStatus = ctx
        .query(
            &ctx.script(STATUS_SCRIPT),
            STATUS_MESSAGE_TYPE,
            ctx.base_params(),
        )
        .await?;

    if args.output == OutputFormat::Json {
        print_json(Some(&setup), &status)?;
        return match status.failure {
            Some(failure) => Err(ReportedFailure(failure).into()),
            None => Ok(()),
        };
    }

    if let Some(failure) = status.failure {
        return Err(report_failure(failure));
    }

    print_status(&setup, &status);
    Ok(())
}

fn print_json(setup: Option<&SetupInfo>, status: &SystemStatus) -> Result<()> {
    output::json(&StatusReport {
        setup_name: setup.map(|s| s.setup_name.as_str()),
        version: setup.map(|s| s.version.as_str()),
        status,
    })
}

fn print_status(setup: &SetupInfo, status: &SystemStatus) {
    output::header("K2s status");
    output::kv("Setup", &setup.setup_name);
    output::kv("Version", &setup.version);
    if setup.linux_only {
        output::kv("Mode", "Linux-only");
    }

    let Some(running_state) = &status.running_state else {
        return;
    };

    if !running_state.is_running {
        output::warning("The system is stopped");
        for issue in &running_state.issues {
            output::kv("Issue", issue);
        }
        return;
    }
    output::success("The system is running");

    if let Some(nodes) = status.nodes.as_deref().filter(|n| !n.is_empty()) {
        output::header("Nodes");
        let mut table = Table::new(nodes);
        table.with(Style::sharp());
        println!("{}", table);

        if nodes.iter().all(|n| n.is_ready) {
            output::success("All nodes are ready");
        } else {
            output::warning("Some nodes are not ready");
        }
    }

    if let Some(pods) = status.pods.as_deref().filter(|p| !p.is_empty()) {
        output::header("Pods");
        let mut table = Table::new(pods);
        table.with(Style::sharp());
        println!("{}", table);

        if pods.iter().all(|p| p.is_running) {
            output::success("All essential pods are running");
        } else {
            output::warning("Some essential pods are not running");
        }
    }
}
