// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! The application-server language runtime a version is written for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::AimError;

/// Runtimes AIM knows how to front with an application-server process.
///
/// `Python27`, `Go`, and `Php` all share a Python dev-appserver front-end;
/// `Java` uses a distinct front-end with its own heap accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Runtime {
    Python27,
    Go,
    Php,
    Java,
}

impl FromStr for Runtime {
    type Err = AimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "python27" => Ok(Runtime::Python27),
            "go" => Ok(Runtime::Go),
            "php" => Ok(Runtime::Php),
            "java" => Ok(Runtime::Java),
            other => Err(AimError::BadConfiguration(format!("unknown runtime {other}"))),
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Runtime::Python27 => "python27",
            Runtime::Go => "go",
            Runtime::Php => "php",
            Runtime::Java => "java",
        };
        write!(f, "{s}")
    }
}

impl<'de> Deserialize<'de> for Runtime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Runtime::from_str(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_runtimes() {
        assert_eq!(Runtime::from_str("python27").unwrap(), Runtime::Python27);
        assert_eq!(Runtime::from_str("go").unwrap(), Runtime::Go);
        assert_eq!(Runtime::from_str("php").unwrap(), Runtime::Php);
        assert_eq!(Runtime::from_str("java").unwrap(), Runtime::Java);
    }

    #[test]
    fn rejects_unknown_runtime() {
        assert!(Runtime::from_str("ruby").is_err());
    }
}
