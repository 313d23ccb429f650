// ABOUTME: Container property values: plain scalars or environment variable references.
// ABOUTME: References are resolved once, when the project file is turned into a configuration.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

/// A property value as written in the project file.
///
/// Ports are usually written bare (`cargo.servlet.port: 8080`), so numbers
/// and booleans are accepted alongside strings and stringified on resolve.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    Number(i64),
    Flag(bool),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<EnvDefault>,
    },
}

/// Fallback for an unset variable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvDefault {
    Text(String),
    Number(i64),
}

impl EnvDefault {
    fn to_value(&self) -> String {
        match self {
            EnvDefault::Text(text) => text.clone(),
            EnvDefault::Number(n) => n.to_string(),
        }
    }
}

impl EnvValue {
    /// The property value, reading the environment for references.
    pub fn resolve(&self) -> Result<String> {
        match self {
            EnvValue::Literal(text) => Ok(text.clone()),
            EnvValue::Number(n) => Ok(n.to_string()),
            EnvValue::Flag(flag) => Ok(flag.to_string()),
            EnvValue::FromEnv { var, default } => match std::env::var(var) {
                Ok(value) if !value.is_empty() => Ok(value),
                _ => default
                    .as_ref()
                    .map(EnvDefault::to_value)
                    .ok_or_else(|| Error::MissingEnvVar(var.clone())),
            },
        }
    }
}

/// Resolve every property, failing on the first unset variable without a default.
pub fn resolve_env_map(map: &BTreeMap<String, EnvValue>) -> Result<BTreeMap<String, String>> {
    let mut resolved = BTreeMap::new();
    for (key, value) in map {
        resolved.insert(key.clone(), value.resolve()?);
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_numbers_become_strings() {
        let props: BTreeMap<String, EnvValue> =
            serde_yaml::from_str("cargo.servlet.port: 8080\ncargo.debug: true\n").unwrap();
        let resolved = resolve_env_map(&props).unwrap();
        assert_eq!(resolved["cargo.servlet.port"], "8080");
        assert_eq!(resolved["cargo.debug"], "true");
    }

    #[test]
    fn numeric_default_is_used_when_unset() {
        let value: EnvValue =
            serde_yaml::from_str("env: CARGOLIFT_SURELY_UNSET_VAR\ndefault: 1199\n").unwrap();
        temp_env::with_var_unset("CARGOLIFT_SURELY_UNSET_VAR", || {
            assert_eq!(value.resolve().unwrap(), "1199");
        });
    }
}
