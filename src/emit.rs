//! YAML rendering of translated policies.
//!
//! Each policy becomes one YAML document introduced by a `---` line, in the
//! order given. Documents with the same name are written as-is.

use std::io::Write;

use crate::policy::NetworkPolicy;

/// Document separator written before every policy.
pub const DOCUMENT_SEPARATOR: &str = "---\n";

/// Errors raised while rendering or writing policies.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// A policy could not be serialized to YAML.
    #[error("failed to serialize policy '{name}': {source}")]
    Serialize {
        /// Name of the policy that failed.
        name: String,
        /// Underlying serializer error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The output could not be written.
    #[error("failed to write policies: {0}")]
    Write(#[from] std::io::Error),
}

/// Render one policy as a `---`-prefixed YAML document.
///
/// # Errors
///
/// Returns [`EmitError::Serialize`] if YAML serialization fails.
pub fn render_policy(policy: &NetworkPolicy) -> Result<String, EmitError> {
    let body = serde_yaml::to_string(policy).map_err(|source| EmitError::Serialize {
        name: policy.name().to_owned(),
        source,
    })?;
    Ok(format!("{DOCUMENT_SEPARATOR}{body}"))
}

/// Render all policies into one multi-document YAML stream.
///
/// # Errors
///
/// Returns [`EmitError::Serialize`] for the first policy that fails.
pub fn render_documents(policies: &[NetworkPolicy]) -> Result<String, EmitError> {
    let mut out = String::new();
    for policy in policies {
        out.push_str(&render_policy(policy)?);
    }
    Ok(out)
}

/// Write all policies to `writer` and flush it.
///
/// # Errors
///
/// Returns an error if serialization or the underlying write fails.
pub fn write_documents<W: Write>(
    writer: &mut W,
    policies: &[NetworkPolicy],
) -> Result<(), EmitError> {
    for policy in policies {
        writer.write_all(render_policy(policy)?.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}
