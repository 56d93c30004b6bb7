//! Addon manifest types matching addon.manifest.schema.json

use crate::constraints::Constraint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Addon definition from addon.manifest.yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addon {
    /// Manifest API version
    pub api_version: String,

    /// Manifest kind
    pub kind: String,

    /// Directory holding the manifest, set while loading
    #[serde(skip)]
    pub directory: PathBuf,

    /// Addon metadata
    pub metadata: AddonMetadata,

    /// Addon spec
    pub spec: AddonSpec,
}

/// Addon metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddonMetadata {
    /// Addon name, unique across the catalog
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,
}

/// Addon spec
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddonSpec {
    pub implementations: Vec<Implementation>,
}

/// A named variant of an addon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Implementation {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Implementation directory, derived while loading
    #[serde(skip)]
    pub directory: PathBuf,

    /// Command path below `k2s addons <cmd>`, derived while loading
    #[serde(skip)]
    pub addons_cmd_name: String,

    /// Directory name used by addon export/import, derived while loading
    #[serde(skip)]
    pub export_directory_name: String,

    /// Commands by name (e.g. "enable", "disable")
    #[serde(default)]
    pub commands: BTreeMap<String, AddonCmd>,

    #[serde(default, rename = "offline_usage")]
    pub offline_usage: OfflineUsage,
}

/// One command of an implementation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddonCmd {
    #[serde(default, rename = "cli")]
    pub cli_config: Option<CliConfig>,

    #[serde(rename = "script")]
    pub script_config: ScriptConfig,
}

/// CLI part of a command
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub flags: Vec<CliFlag>,

    #[serde(default)]
    pub examples: CliExamples,
}

/// A user-facing flag definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliFlag {
    pub name: String,

    #[serde(default)]
    pub shorthand: Option<String>,

    /// Default value; its variant determines the flag type
    pub default: FlagValue,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub constraints: Option<Constraint>,
}

/// Typed flag value
///
/// Decoded from the manifest's `default`; any YAML type other than string,
/// bool, integer or float is rejected while parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl FlagValue {
    /// Type name used in help and error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FlagValue::Bool(_) => "bool",
            FlagValue::Int(_) => "int",
            FlagValue::Float(_) => "float",
            FlagValue::String(_) => "string",
        }
    }

    /// Numeric view of the value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FlagValue::Int(v) => Some(*v as f64),
            FlagValue::Float(v) => Some(*v),
            FlagValue::String(s) => s.trim().parse().ok(),
            FlagValue::Bool(_) => None,
        }
    }
}

impl std::fmt::Display for FlagValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlagValue::Bool(v) => write!(f, "{}", v),
            FlagValue::Int(v) => write!(f, "{}", v),
            FlagValue::Float(v) => write!(f, "{}", v),
            FlagValue::String(v) => write!(f, "{}", v),
        }
    }
}

impl CliFlag {
    /// Description followed by the rendered constraint
    pub fn full_description(&self) -> String {
        let constraint = self
            .constraints
            .as_ref()
            .map(|c| c.to_string())
            .unwrap_or_default();

        match (self.description.as_deref().unwrap_or(""), constraint.as_str()) {
            ("", c) => c.to_string(),
            (d, "") => d.to_string(),
            (d, c) => format!("{} {}", d, c),
        }
    }
}

/// Usage examples of a command
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CliExamples(pub Vec<CliExample>);

/// A single usage example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliExample {
    pub cmd: String,

    #[serde(default)]
    pub comment: Option<String>,
}

impl std::fmt::Display for CliExample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(comment) = &self.comment {
            writeln!(f, "  # {}", comment)?;
        }
        write!(f, "  {}", self.cmd)
    }
}

impl std::fmt::Display for CliExamples {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", rendered.join("\n"))
    }
}

impl CliExamples {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Script part of a command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptConfig {
    /// Script path relative to the implementation directory
    pub sub_path: String,

    #[serde(default)]
    pub parameter_mappings: Vec<ParameterMapping>,
}

/// Links a CLI flag to a script parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterMapping {
    pub cli_flag_name: String,
    pub script_parameter_name: String,
}

/// Resources needed for offline export/import
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfflineUsage {
    #[serde(default)]
    pub linux: LinuxOfflineUsage,

    #[serde(default)]
    pub windows: WindowsOfflineUsage,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinuxOfflineUsage {
    #[serde(default)]
    pub repos: Vec<String>,

    #[serde(default)]
    pub deb: Vec<String>,

    #[serde(default)]
    pub additional_images: Vec<String>,

    #[serde(default)]
    pub curl: Vec<CurlPackage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowsOfflineUsage {
    #[serde(default)]
    pub curl: Vec<CurlPackage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurlPackage {
    pub url: String,
    pub destination: String,
}

impl Addon {
    /// Set the addon directory and derive implementation fields
    pub fn set_directory(&mut self, directory: &Path) {
        self.directory = directory.to_path_buf();

        let addon_name = self.metadata.name.clone();
        for implementation in &mut self.spec.implementations {
            implementation.derive_fields(&addon_name, directory);
        }
    }

    /// Implementation by name
    pub fn implementation(&self, name: &str) -> Option<&Implementation> {
        self.spec.implementations.iter().find(|i| i.name == name)
    }

    /// The implementation named after the addon itself
    pub fn default_implementation(&self) -> Option<&Implementation> {
        self.implementation(&self.metadata.name)
    }

    /// True when the addon only has an implementation named after itself
    pub fn is_single_implementation(&self) -> bool {
        self.spec.implementations.len() == 1 && self.default_implementation().is_some()
    }
}

impl Implementation {
    fn derive_fields(&mut self, addon_name: &str, addon_dir: &Path) {
        if self.name == addon_name {
            self.directory = addon_dir.to_path_buf();
            self.addons_cmd_name = addon_name.to_string();
            self.export_directory_name = addon_name.to_string();
        } else {
            self.directory = addon_dir.join(&self.name);
            self.addons_cmd_name = format!("{} {}", addon_name, self.name);
            self.export_directory_name = format!("{}_{}", addon_name, self.name);
        }
    }

    /// Absolute path of a command's script
    pub fn script_path(&self, cmd: &AddonCmd) -> PathBuf {
        cmd.script_config
            .sub_path
            .split(['/', '\\'])
            .filter(|s| !s.is_empty())
            .fold(self.directory.clone(), |path, part| path.join(part))
    }
}

/// The loaded addon catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Addons(pub Vec<Addon>);

impl std::ops::Deref for Addons {
    type Target = [Addon];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Addons {
    /// Addon by name
    pub fn find(&self, name: &str) -> Option<&Addon> {
        self.0.iter().find(|a| a.metadata.name == name)
    }

    /// Addons sorted by name
    pub fn sorted(&self) -> Vec<&Addon> {
        let mut addons: Vec<&Addon> = self.0.iter().collect();
        addons.sort_by(|a, b| a.metadata.name.cmp(&b.metadata.name));
        addons
    }

    /// Resolve an addon and implementation
    ///
    /// Without an implementation name the addon's default implementation is
    /// used, falling back to its only implementation.
    pub fn resolve(
        &self,
        addon: &str,
        implementation: Option<&str>,
    ) -> Option<(&Addon, &Implementation)> {
        let found = self.find(addon)?;
        let implementation = match implementation {
            Some(name) => found.implementation(name)?,
            None => found.default_implementation().or_else(|| {
                (found.spec.implementations.len() == 1)
                    .then(|| &found.spec.implementations[0])
            })?,
        };
        Some((found, implementation))
    }

    /// Resolve a "<addon>" or "<addon> <impl>" command name
    pub fn resolve_cmd_name(&self, cmd_name: &str) -> Option<(&Addon, &Implementation)> {
        self.0.iter().find_map(|addon| {
            addon
                .spec
                .implementations
                .iter()
                .find(|i| i.addons_cmd_name == cmd_name)
                .map(|i| (addon, i))
        })
    }

    /// All command names declared by any implementation, sorted
    pub fn command_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .0
            .iter()
            .flat_map(|a| a.spec.implementations.iter())
            .flat_map(|i| i.commands.keys().map(|k| k.as_str()))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}
