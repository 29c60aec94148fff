//! Service-level policy assembly.

use tracing::debug;

use crate::model::{Service, ServiceDocument};
use crate::policy::{NetworkPolicy, PolicyType};

use super::port::PortMode;
use super::rules::build_rules;
use super::sanitize::sanitize;
use super::{Assembly, Translation};

/// Merge every entry of `service` into one policy in `namespace`.
///
/// Groups keep the order of the entries that produced them. `policyTypes`
/// lists `Ingress` then `Egress`, each only if that side has a group.
/// `namespace` is copied as-is.
pub fn assemble(service: &Service, namespace: &str, mode: PortMode) -> Assembly {
    let name = sanitize(&service.display_name);
    let mut policy = NetworkPolicy::new(name, namespace);
    let mut diagnostics = Vec::new();

    for entry in &service.service_entries {
        let rules = build_rules(&service.display_name, entry, mode);
        policy.spec.ingress.extend(rules.ingress);
        policy.spec.egress.extend(rules.egress);
        diagnostics.extend(rules.diagnostics);
    }

    if !policy.spec.ingress.is_empty() {
        policy.spec.policy_types.push(PolicyType::Ingress);
    }
    if !policy.spec.egress.is_empty() {
        policy.spec.policy_types.push(PolicyType::Egress);
    }

    debug!(
        service = %service.display_name,
        policy = %policy.name(),
        ingress = policy.spec.ingress.len(),
        egress = policy.spec.egress.len(),
        "assembled network policy"
    );

    Assembly {
        policy,
        diagnostics,
    }
}

/// Translate every service of `document`, in input order.
pub fn translate(document: &ServiceDocument, namespace: &str, mode: PortMode) -> Translation {
    let mut translation = Translation::default();
    for service in &document.services {
        let assembly = assemble(service, namespace, mode);
        translation.policies.push(assembly.policy);
        translation.diagnostics.extend(assembly.diagnostics);
    }
    translation
}
