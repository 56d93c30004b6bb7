//! Mapping of CLI flag values to script parameters

use crate::constraints::ConstraintError;
use crate::types::{AddonCmd, CliFlag, FlagValue};
use std::collections::BTreeMap;
use thiserror::Error;

/// Flag values given on the command line, by flag name
pub type FlagValues = BTreeMap<String, FlagValue>;

/// A script parameter derived from a flag
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptParameter {
    pub name: String,
    pub value: FlagValue,
}

/// Flag value rejected before the script runs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlagError {
    #[error("invalid value for flag '--{flag}': {source}")]
    Constraint {
        flag: String,
        #[source]
        source: ConstraintError,
    },

    #[error("invalid value for flag '--{flag}': expected {expected}, got '{value}'")]
    WrongType {
        flag: String,
        expected: &'static str,
        value: String,
    },
}

impl AddonCmd {
    /// Declared flags of the command
    pub fn flags(&self) -> &[CliFlag] {
        self.cli_config
            .as_ref()
            .map(|c| c.flags.as_slice())
            .unwrap_or_default()
    }

    /// Check flag values against their type and constraints
    ///
    /// Values for undeclared flags are ignored; missing values fall back to
    /// the flag default.
    pub fn validate_flags(&self, values: &FlagValues) -> Result<(), FlagError> {
        for flag in self.flags() {
            let Some(value) = values.get(&flag.name) else {
                continue;
            };

            if std::mem::discriminant(value) != std::mem::discriminant(&flag.default)
                && !matches!((&flag.default, value), (FlagValue::Float(_), FlagValue::Int(_)))
            {
                return Err(FlagError::WrongType {
                    flag: flag.name.clone(),
                    expected: flag.default.type_name(),
                    value: value.to_string(),
                });
            }

            if let Some(constraint) = &flag.constraints {
                constraint
                    .validate(value)
                    .map_err(|source| FlagError::Constraint {
                        flag: flag.name.clone(),
                        source,
                    })?;
            }
        }
        Ok(())
    }

    /// Script parameters in mapping order
    ///
    /// Each mapped flag contributes its given value or its default.
    pub fn script_parameters(&self, values: &FlagValues) -> Vec<ScriptParameter> {
        let flags = self.flags();

        self.script_config
            .parameter_mappings
            .iter()
            .filter_map(|mapping| {
                let value = values.get(&mapping.cli_flag_name).or_else(|| {
                    flags
                        .iter()
                        .find(|f| f.name == mapping.cli_flag_name)
                        .map(|f| &f.default)
                })?;

                Some(ScriptParameter {
                    name: mapping.script_parameter_name.clone(),
                    value: value.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::Constraint;
    use crate::types::{CliConfig, ParameterMapping, ScriptConfig};

    fn cmd() -> AddonCmd {
        AddonCmd {
            cli_config: Some(CliConfig {
                flags: vec![
                    CliFlag {
                        name: "ingress".into(),
                        shorthand: None,
                        default: FlagValue::String("none".into()),
                        description: None,
                        constraints: Some(Constraint::ValidationSet(vec![
                            "none".into(),
                            "nginx".into(),
                            "traefik".into(),
                        ])),
                    },
                    CliFlag {
                        name: "replicas".into(),
                        shorthand: Some("r".into()),
                        default: FlagValue::Int(1),
                        description: None,
                        constraints: Some(Constraint::Range { min: 1.0, max: 5.0 }),
                    },
                    CliFlag {
                        name: "unmapped".into(),
                        shorthand: None,
                        default: FlagValue::Bool(false),
                        description: None,
                        constraints: None,
                    },
                ],
                examples: Default::default(),
            }),
            script_config: ScriptConfig {
                sub_path: "Enable.ps1".into(),
                parameter_mappings: vec![
                    ParameterMapping {
                        cli_flag_name: "replicas".into(),
                        script_parameter_name: "Replicas".into(),
                    },
                    ParameterMapping {
                        cli_flag_name: "ingress".into(),
                        script_parameter_name: "Ingress".into(),
                    },
                ],
            },
        }
    }

    #[test]
    fn test_validate_flags() {
        let mut values = FlagValues::new();
        values.insert("ingress".into(), FlagValue::String("nginx".into()));
        values.insert("replicas".into(), FlagValue::Int(3));
        assert!(cmd().validate_flags(&values).is_ok());

        values.insert("replicas".into(), FlagValue::Int(9));
        let err = cmd().validate_flags(&values).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for flag '--replicas': value 9 out of range [1,5]"
        );
    }

    #[test]
    fn test_validate_flags_wrong_type() {
        let mut values = FlagValues::new();
        values.insert("unmapped".into(), FlagValue::String("yes".into()));
        let err = cmd().validate_flags(&values).unwrap_err();
        assert!(matches!(err, FlagError::WrongType { expected: "bool", .. }));
    }

    #[test]
    fn test_script_parameters_use_defaults() {
        let mut values = FlagValues::new();
        values.insert("ingress".into(), FlagValue::String("traefik".into()));

        let params = cmd().script_parameters(&values);
        assert_eq!(
            params,
            vec![
                ScriptParameter {
                    name: "Replicas".into(),
                    value: FlagValue::Int(1),
                },
                ScriptParameter {
                    name: "Ingress".into(),
                    value: FlagValue::String("traefik".into()),
                },
            ]
        );
    }

    #[test]
    fn test_command_without_cli() {
        let cmd = AddonCmd {
            cli_config: None,
            script_config: ScriptConfig {
                sub_path: "Disable.ps1".into(),
                parameter_mappings: vec![],
            },
        };
        assert!(cmd.flags().is_empty());
        assert!(cmd.validate_flags(&FlagValues::new()).is_ok());
        assert!(cmd.script_parameters(&FlagValues::new()).is_empty());
    }
}
