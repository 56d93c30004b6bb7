//! CLI flag constraints
//!
//! A constraint is declared in the manifest as
//!
//! ```yaml
//! constraints:
//!   kind: validation-set
//!   validationSet: [nginx, traefik]
//! ```
//!
//! or
//!
//! ```yaml
//! constraints:
//!   kind: range
//!   range: { min: 1, max: 10 }
//! ```

use crate::types::FlagValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const KIND_VALIDATION_SET: &str = "validation-set";
const KIND_RANGE: &str = "range";

/// Constraint on a flag value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawConstraint", into = "RawConstraint")]
pub enum Constraint {
    /// Value must be one of the listed strings
    ValidationSet(Vec<String>),

    /// Value must be a number within the inclusive bounds
    Range { min: f64, max: f64 },
}

/// Constraint violation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstraintError {
    #[error("invalid value '{value}', valid values are [{}]", .valid.join("|"))]
    InvalidValue { value: String, valid: Vec<String> },

    #[error("'{value}' is not a number")]
    NotANumber { value: String },

    #[error("value {value} out of range [{min},{max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },
}

impl Constraint {
    /// Check a flag value
    pub fn validate(&self, value: &FlagValue) -> Result<(), ConstraintError> {
        match self {
            Constraint::ValidationSet(valid) => {
                let rendered = value.to_string();
                if valid.iter().any(|v| *v == rendered) {
                    Ok(())
                } else {
                    Err(ConstraintError::InvalidValue {
                        value: rendered,
                        valid: valid.clone(),
                    })
                }
            }
            Constraint::Range { min, max } => {
                let number = value.as_f64().ok_or_else(|| ConstraintError::NotANumber {
                    value: value.to_string(),
                })?;

                if number < *min || number > *max {
                    return Err(ConstraintError::OutOfRange {
                        value: number,
                        min: *min,
                        max: *max,
                    });
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::ValidationSet(valid) => write!(f, "valid values: [{}]", valid.join("|")),
            Constraint::Range { min, max } => write!(f, "valid range: [{},{}]", min, max),
        }
    }
}

/// Manifest representation of a constraint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConstraint {
    kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    validation_set: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    range: Option<RawRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawRange {
    min: f64,
    max: f64,
}

impl TryFrom<RawConstraint> for Constraint {
    type Error = String;

    fn try_from(raw: RawConstraint) -> Result<Self, Self::Error> {
        match raw.kind.as_str() {
            KIND_VALIDATION_SET => raw
                .validation_set
                .map(Constraint::ValidationSet)
                .ok_or_else(|| "validation set must not be nil".to_string()),
            KIND_RANGE => raw
                .range
                .map(|r| Constraint::Range {
                    min: r.min,
                    max: r.max,
                })
                .ok_or_else(|| "range must not be nil".to_string()),
            other => Err(format!("unknown constraint type '{}'", other)),
        }
    }
}

impl From<Constraint> for RawConstraint {
    fn from(constraint: Constraint) -> Self {
        match constraint {
            Constraint::ValidationSet(valid) => RawConstraint {
                kind: KIND_VALIDATION_SET.to_string(),
                validation_set: Some(valid),
                range: None,
            },
            Constraint::Range { min, max } => RawConstraint {
                kind: KIND_RANGE.to_string(),
                validation_set: None,
                range: Some(RawRange { min, max }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[&str]) -> Constraint {
        Constraint::ValidationSet(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_validation_set_accepts_member() {
        let constraint = set(&["nginx", "traefik"]);
        assert!(constraint.validate(&FlagValue::String("nginx".into())).is_ok());
    }

    #[test]
    fn test_validation_set_is_case_sensitive() {
        let constraint = set(&["nginx", "traefik"]);
        let err = constraint
            .validate(&FlagValue::String("Nginx".into()))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value 'Nginx', valid values are [nginx|traefik]"
        );
    }

    #[test]
    fn test_validation_set_renders_non_strings() {
        let constraint = set(&["1", "2", "true"]);
        assert!(constraint.validate(&FlagValue::Int(2)).is_ok());
        assert!(constraint.validate(&FlagValue::Bool(true)).is_ok());
        assert!(constraint.validate(&FlagValue::Int(3)).is_err());
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let constraint = Constraint::Range { min: 1.0, max: 10.0 };
        assert!(constraint.validate(&FlagValue::Int(1)).is_ok());
        assert!(constraint.validate(&FlagValue::Int(10)).is_ok());
        assert!(constraint.validate(&FlagValue::Float(5.5)).is_ok());
        assert!(constraint.validate(&FlagValue::String("7".into())).is_ok());

        let err = constraint.validate(&FlagValue::Int(11)).unwrap_err();
        assert_eq!(err.to_string(), "value 11 out of range [1,10]");

        let err = constraint.validate(&FlagValue::Float(0.5)).unwrap_err();
        assert_eq!(err.to_string(), "value 0.5 out of range [1,10]");
    }

    #[test]
    fn test_range_not_a_number() {
        let constraint = Constraint::Range { min: 1.0, max: 10.0 };
        let err = constraint
            .validate(&FlagValue::String("abc".into()))
            .unwrap_err();
        assert_eq!(err, ConstraintError::NotANumber { value: "abc".into() });
        assert_eq!(err.to_string(), "'abc' is not a number");

        assert!(constraint.validate(&FlagValue::Bool(true)).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(set(&["a", "b", "c"]).to_string(), "valid values: [a|b|c]");
        assert_eq!(
            Constraint::Range { min: 1.0, max: 2.5 }.to_string(),
            "valid range: [1,2.5]"
        );
    }

    #[test]
    fn test_decode() {
        let constraint: Constraint =
            serde_yaml_ng::from_str("kind: validation-set\nvalidationSet: [a, b]\n").unwrap();
        assert_eq!(constraint, set(&["a", "b"]));

        let constraint: Constraint =
            serde_yaml_ng::from_str("kind: range\nrange: { min: 1, max: 3 }\n").unwrap();
        assert_eq!(constraint, Constraint::Range { min: 1.0, max: 3.0 });
    }

    #[test]
    fn test_decode_errors() {
        let err = serde_yaml_ng::from_str::<Constraint>("kind: list\n").unwrap_err();
        assert!(err.to_string().contains("unknown constraint type"));

        let err = serde_yaml_ng::from_str::<Constraint>("kind: range\n").unwrap_err();
        assert!(err.to_string().contains("must not be nil"));

        let err = serde_yaml_ng::from_str::<Constraint>("kind: validation-set\n").unwrap_err();
        assert!(err.to_string().contains("must not be nil"));
    }
}
