// ABOUTME: Validated container identifier such as "tomcat9x" or "jboss7x".
// ABOUTME: Identifiers key the container registry, so they follow a strict lowercase format.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContainerIdError {
    #[error("container id cannot be empty")]
    Empty,

    #[error("container id exceeds maximum length of 63 characters")]
    TooLong,

    #[error("container id must start with a letter")]
    StartsWithNonLetter,

    #[error("container id must be lowercase")]
    NotLowercase,

    #[error("invalid character in container id: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(value: &str) -> Result<Self, ContainerIdError> {
        if value.is_empty() {
            return Err(ContainerIdError::Empty);
        }

        if value.len() > 63 {
            return Err(ContainerIdError::TooLong);
        }

        if !value.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(ContainerIdError::StartsWithNonLetter);
        }

        for c in value.chars() {
            if c.is_ascii_uppercase() {
                return Err(ContainerIdError::NotLowercase);
            }
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' {
                return Err(ContainerIdError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ContainerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ContainerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::new(&value).map_err(serde::de::Error::custom)
    }
}
