//! Input document model for service connectivity exports.
//!
//! The shape mirrors what segmentation analyzers export:
//! `{ "services": [ { "display_name", "service_entries": [ ... ] } ] }`.
//! Only `services` is required. Every other field may be missing or `null`
//! and then defaults to empty. Unknown fields are ignored so full exports
//! can be fed in unmodified.

use std::path::Path;

use serde::{Deserialize, Deserializer};

/// Errors raised while loading the input document.
///
/// All of these are fatal: they prevent the translation core from running.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The input file could not be read.
    #[error("failed to read input file {path}: {source}")]
    Read {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The input is not a structurally valid service document.
    #[error("failed to parse service document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Top-level input document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceDocument {
    /// Services in input order.
    #[serde(deserialize_with = "null_as_default")]
    pub services: Vec<Service>,
}

/// A named group of service entries that maps to one NetworkPolicy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Service {
    /// Free-form display name. Not unique and not DNS-safe.
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,

    /// Protocol/port entries in input order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_entries: Vec<ServiceEntry>,
}

/// One protocol/port rule within a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceEntry {
    /// Free-form entry name, used only in diagnostics.
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,

    /// L4 protocol, passed through verbatim (e.g. `TCP`, `UDP`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub l4_protocol: String,

    /// Destination port tokens; non-empty yields an ingress rule.
    #[serde(default, deserialize_with = "null_as_default")]
    pub destination_ports: Vec<String>,

    /// Source port tokens; non-empty yields an egress rule.
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_ports: Vec<String>,
}

impl Service {
    /// Create a service with the given display name and entries.
    pub fn new(display_name: impl Into<String>, service_entries: Vec<ServiceEntry>) -> Self {
        Self {
            display_name: display_name.into(),
            service_entries,
        }
    }
}

impl ServiceEntry {
    /// Create an entry with a protocol and no ports.
    pub fn new(display_name: impl Into<String>, l4_protocol: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            l4_protocol: l4_protocol.into(),
            ..Self::default()
        }
    }

    /// Set the destination (ingress) port tokens.
    pub fn with_destination_ports<I, S>(mut self, ports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.destination_ports = ports.into_iter().map(Into::into).collect();
        self
    }

    /// Set the source (egress) port tokens.
    pub fn with_source_ports<I, S>(mut self, ports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_ports = ports.into_iter().map(Into::into).collect();
        self
    }
}

/// Parse a service document from a JSON string.
///
/// # Errors
///
/// Returns [`InputError::Parse`] if the JSON is malformed or `services` is
/// missing.
pub fn parse_document(json: &str) -> Result<ServiceDocument, InputError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a service document from disk.
///
/// # Errors
///
/// Returns [`InputError::Read`] if the file cannot be read and
/// [`InputError::Parse`] if its contents are not a valid document.
pub fn load_document(path: &Path) -> Result<ServiceDocument, InputError> {
    let contents = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let document = parse_document(&contents)?;
    tracing::debug!(
        path = %path.display(),
        services = document.services.len(),
        "loaded service document"
    );
    Ok(document)
}

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
