//! CLI argument parsing with clap
//!
//! The static command tree is derived here. Addon commands such as
//! `k2s addons enable <addon>` depend on the installed addons and are built
//! at runtime from the catalog (see `commands::addons::build`).

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// K2s - Kubernetes distribution for Windows and Linux hosts
#[derive(Parser, Debug)]
#[command(name = "k2s")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// K2s installation directory
    #[arg(long, global = true, env = "K2S_INSTALL_DIR")]
    pub install_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install K2s
    Install(InstallArgs),

    /// Uninstall K2s
    Uninstall(UninstallArgs),

    /// Start the cluster
    Start,

    /// Stop the cluster
    Stop,

    /// Show cluster status
    Status(StatusArgs),

    /// Manage cluster nodes
    #[command(subcommand)]
    Node(NodeCommands),

    /// System backup and restore
    #[command(subcommand)]
    System(SystemCommands),

    /// Manage addons
    #[command(subcommand)]
    Addons(AddonsCommands),
}

/// Output format of status commands
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human readable tables
    #[default]
    Table,

    /// JSON
    Json,
}

// Install command
#[derive(Args, Debug, Default)]
pub struct InstallArgs {
    /// Install config file (defaults to cfg/install.yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of virtual CPUs of the control-plane VM
    #[arg(long)]
    pub master_cpus: Option<String>,

    /// Memory of the control-plane VM, e.g. 8GB
    #[arg(long)]
    pub master_memory: Option<String>,

    /// Disk size of the control-plane VM, e.g. 50GB
    #[arg(long)]
    pub master_disk: Option<String>,

    /// HTTP proxy used during installation
    #[arg(long)]
    pub proxy: Option<String>,

    /// Install the Linux control plane only
    #[arg(long)]
    pub linux_only: bool,
}

// Uninstall command
#[derive(Args, Debug, Default)]
pub struct UninstallArgs {
    /// Also delete the files kept for offline installation
    #[arg(short, long)]
    pub delete_files_for_offline_installation: bool,
}

// Status command
#[derive(Args, Debug, Default)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

// Node commands
#[derive(Subcommand, Debug)]
pub enum NodeCommands {
    /// Add a worker node
    Add(NodeAddArgs),

    /// Remove a worker node
    Remove(NodeRemoveArgs),
}

#[derive(Args, Debug)]
pub struct NodeAddArgs {
    /// IP address of the machine
    #[arg(short, long)]
    pub ip_addr: String,

    /// User name for remote access
    #[arg(short, long)]
    pub username: String,

    /// Node name, defaults to the host name of the machine
    #[arg(short, long)]
    pub name: Option<String>,
}

#[derive(Args, Debug)]
pub struct NodeRemoveArgs {
    /// Name of the node
    #[arg(short, long)]
    pub name: String,
}

// System commands
#[derive(Subcommand, Debug)]
pub enum SystemCommands {
    /// Back up cluster resources and persistent volumes
    Backup(BackupArgs),

    /// Restore a system backup
    Restore(RestoreArgs),
}

#[derive(Args, Debug)]
pub struct BackupArgs {
    /// Backup archive to create
    #[arg(short, long)]
    pub file: PathBuf,

    /// Do not back up container images
    #[arg(long)]
    pub skip_images: bool,
}

#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Backup archive to restore
    #[arg(short, long)]
    pub file: PathBuf,
}

// Addons commands
#[derive(Subcommand, Debug)]
pub enum AddonsCommands {
    /// List addons and their state
    #[command(visible_alias = "list")]
    Ls(AddonsListArgs),

    /// Show the status of an addon
    Status(AddonStatusArgs),

    /// Export addons for offline use
    Export(AddonExportArgs),

    /// Import exported addons
    Import(AddonImportArgs),

    /// Addon commands declared by the installed addons (e.g. enable, disable)
    #[command(external_subcommand)]
    Dynamic(Vec<String>),
}

#[derive(Args, Debug)]
pub struct AddonsListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

#[derive(Args, Debug)]
pub struct AddonStatusArgs {
    /// Addon name
    pub addon: String,

    /// Implementation name, required for addons with several implementations
    pub implementation: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

#[derive(Args, Debug)]
pub struct AddonExportArgs {
    /// Addons to export, "<addon>" or "<addon> <implementation>"; all when omitted
    pub names: Vec<String>,

    /// Target directory of the export archive
    #[arg(short, long)]
    pub directory: PathBuf,
}

#[derive(Args, Debug)]
pub struct AddonImportArgs {
    /// Addons to import from the archive; all when omitted
    pub names: Vec<String>,

    /// Export archive
    #[arg(short, long)]
    pub zip: PathBuf,
}
