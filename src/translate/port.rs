//! Port token normalization.

use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::policy::PortValue;

/// How port tokens are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortMode {
    /// Parse as a decimal port number; bad tokens are dropped with a diagnostic.
    #[default]
    Numeric,
    /// Copy the token verbatim as a named port.
    Passthrough,
}

impl fmt::Display for PortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => f.write_str("numeric"),
            Self::Passthrough => f.write_str("passthrough"),
        }
    }
}

impl FromStr for PortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numeric" => Ok(Self::Numeric),
            "passthrough" => Ok(Self::Passthrough),
            other => Err(format!(
                "unknown port mode '{other}', expected 'numeric' or 'passthrough'"
            )),
        }
    }
}

/// Why a port token was rejected in numeric mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// Not a decimal integer.
    #[error("'{token}' is not a decimal port number")]
    Invalid {
        /// Offending token.
        token: String,
    },

    /// A decimal integer outside 1..=65535.
    #[error("'{token}' is outside the port range 1-65535")]
    OutOfRange {
        /// Offending token.
        token: String,
    },
}

/// Normalize one port token according to `mode`.
///
/// Passthrough mode never fails.
///
/// # Errors
///
/// In numeric mode, returns [`PortError::Invalid`] for non-decimal tokens
/// and [`PortError::OutOfRange`] for `0` or values above 65535.
pub fn parse_port(token: &str, mode: PortMode) -> Result<PortValue, PortError> {
    match mode {
        PortMode::Passthrough => Ok(PortValue::Name(token.to_owned())),
        PortMode::Numeric => match token.parse::<u16>() {
            Ok(0) => Err(PortError::OutOfRange {
                token: token.to_owned(),
            }),
            Ok(port) => Ok(port.into()),
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => Err(PortError::OutOfRange {
                token: token.to_owned(),
            }),
            Err(_) => Err(PortError::Invalid {
                token: token.to_owned(),
            }),
        },
    }
}
