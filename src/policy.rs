//! Kubernetes NetworkPolicy resource types.
//!
//! One set of structural types is shared by ingress and egress so the
//! port/protocol pairing lives in a single place ([`PolicyPort`]).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// API version of every emitted policy.
pub const API_VERSION: &str = "networking.k8s.io/v1";

/// Kind of every emitted policy.
pub const KIND: &str = "NetworkPolicy";

/// Pod selector label key that carries the sanitized service name.
pub const APP_LABEL: &str = "app";

/// Kubernetes NetworkPolicy.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPolicy {
    /// API version (always [`API_VERSION`]).
    pub api_version: String,
    /// Kind (always [`KIND`]).
    pub kind: String,
    /// Metadata
    pub metadata: PolicyMetadata,
    /// Spec
    pub spec: PolicySpec,
}

impl NetworkPolicy {
    /// Create a policy selecting pods labelled `app=<name>` with no rules.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            api_version: API_VERSION.to_owned(),
            kind: KIND.to_owned(),
            metadata: PolicyMetadata {
                name: name.clone(),
                namespace: namespace.into(),
            },
            spec: PolicySpec {
                pod_selector: PodSelector::app(name),
                policy_types: Vec::new(),
                ingress: Vec::new(),
                egress: Vec::new(),
            },
        }
    }

    /// Resource name.
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// True when the policy has no rules in either direction.
    pub fn is_degenerate(&self) -> bool {
        self.spec.policy_types.is_empty()
    }
}

/// Metadata for the policy resource.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyMetadata {
    /// Resource name
    pub name: String,
    /// Resource namespace
    pub namespace: String,
}

/// NetworkPolicy spec.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PolicySpec {
    /// Pods this policy applies to.
    pub pod_selector: PodSelector,
    /// Enforced directions, always `Ingress` before `Egress`.
    pub policy_types: Vec<PolicyType>,
    /// Ingress rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingress: Vec<PortGroup>,
    /// Egress rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub egress: Vec<PortGroup>,
}

/// Label selector for the target pods.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PodSelector {
    /// Match labels
    pub match_labels: BTreeMap<String, String>,
}

impl PodSelector {
    /// Selector matching `app=<value>`.
    pub fn app(value: impl Into<String>) -> Self {
        let mut match_labels = BTreeMap::new();
        match_labels.insert(APP_LABEL.to_owned(), value.into());
        Self { match_labels }
    }
}

/// Direction a policy enforces.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PolicyType {
    /// Inbound traffic to the selected pods.
    Ingress,
    /// Outbound traffic from the selected pods.
    Egress,
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ingress => f.write_str("Ingress"),
            Self::Egress => f.write_str("Egress"),
        }
    }
}

/// One ingress or egress rule: a list of ports sharing the rule's scope.
///
/// Never constructed empty by the translator.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortGroup {
    /// Ports
    pub ports: Vec<PolicyPort>,
}

/// Port/protocol pair.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyPort {
    /// Port number or name
    pub port: PortValue,
    /// Protocol, verbatim from the input entry
    pub protocol: String,
}

/// Kubernetes `IntOrString` port.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PortValue {
    /// Numeric port, rendered as a YAML integer.
    Number(u16),
    /// Named (or opaque) port, rendered as a YAML string.
    Name(String),
}

impl fmt::Display for PortValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Name(s) => f.write_str(s),
        }
    }
}

impl From<u16> for PortValue {
    fn from(value: u16) -> Self {
        Self::Number(value)
    }
}
