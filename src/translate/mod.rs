//! Translation core: service model in, NetworkPolicy records out.
//!
//! Pipeline per service: every entry goes through the rule builder
//! ([`rules::build_rules`]), whose port tokens go through the port parser
//! ([`port::parse_port`]); the assembler ([`assembler::assemble`]) merges the
//! resulting rule groups into one policy named by [`sanitize::sanitize`].
//!
//! Everything here is pure and synchronous. Recoverable problems (bad port
//! tokens) are returned as [`Diagnostic`] values next to the result, and
//! mirrored as `warn` events for operators.

use std::fmt;

use serde::Serialize;

use crate::policy::{NetworkPolicy, PolicyType};

pub mod assembler;
pub mod port;
pub mod rules;
pub mod sanitize;

pub use assembler::{assemble, translate};
pub use port::{parse_port, PortError, PortMode};
pub use rules::{build_rules, EntryRules};
pub use sanitize::{is_dns1123_label, sanitize};

/// A port token that was dropped from a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Display name of the service being translated.
    pub service: String,
    /// Display name of the entry holding the token.
    pub entry: String,
    /// Rule direction the token belonged to.
    pub direction: PolicyType,
    /// The offending token, verbatim.
    pub token: String,
    /// Why it was dropped.
    pub reason: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "service '{}' entry '{}': dropped {} port '{}': {}",
            self.service,
            self.entry,
            self.direction.to_string().to_lowercase(),
            self.token,
            self.reason
        )
    }
}

/// One assembled policy plus the diagnostics raised while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    /// The policy.
    pub policy: NetworkPolicy,
    /// Dropped tokens, in entry order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of translating a whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translation {
    /// One policy per input service, in input order.
    pub policies: Vec<NetworkPolicy>,
    /// All diagnostics, in input order.
    pub diagnostics: Vec<Diagnostic>,
}

impl Translation {
    /// True when no port token was dropped.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
