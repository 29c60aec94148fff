//! Per-entry rule construction.

use tracing::warn;

use crate::model::ServiceEntry;
use crate::policy::{PolicyPort, PolicyType, PortGroup};

use super::port::{parse_port, PortMode};
use super::Diagnostic;

/// Rule groups produced by a single service entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryRules {
    /// Ingress group from the destination ports, if any survived parsing.
    pub ingress: Option<PortGroup>,
    /// Egress group from the source ports, if any survived parsing.
    pub egress: Option<PortGroup>,
    /// Tokens dropped while parsing, ingress first.
    pub diagnostics: Vec<Diagnostic>,
}

/// Build the ingress and egress groups for one entry of `service_name`.
///
/// Each port is paired with the entry's protocol verbatim. An empty port
/// list yields no group; so does a list where every token was dropped, since
/// a rule without ports would match all ports.
pub fn build_rules(service_name: &str, entry: &ServiceEntry, mode: PortMode) -> EntryRules {
    let mut diagnostics = Vec::new();
    let ingress = build_group(
        service_name,
        entry,
        PolicyType::Ingress,
        &entry.destination_ports,
        mode,
        &mut diagnostics,
    );
    let egress = build_group(
        service_name,
        entry,
        PolicyType::Egress,
        &entry.source_ports,
        mode,
        &mut diagnostics,
    );
    EntryRules {
        ingress,
        egress,
        diagnostics,
    }
}

fn build_group(
    service_name: &str,
    entry: &ServiceEntry,
    direction: PolicyType,
    tokens: &[String],
    mode: PortMode,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<PortGroup> {
    let mut ports = Vec::with_capacity(tokens.len());
    for token in tokens {
        match parse_port(token, mode) {
            Ok(port) => ports.push(PolicyPort {
                port,
                protocol: entry.l4_protocol.clone(),
            }),
            Err(e) => {
                warn!(
                    service = %service_name,
                    entry = %entry.display_name,
                    direction = %direction,
                    token = %token,
                    error = %e,
                    "dropping unparsable port"
                );
                diagnostics.push(Diagnostic {
                    service: service_name.to_owned(),
                    entry: entry.display_name.clone(),
                    direction,
                    token: token.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if ports.is_empty() {
        None
    } else {
        Some(PortGroup { ports })
    }
}
