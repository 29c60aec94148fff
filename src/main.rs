//! Netpolgen CLI entry point.
//!
//! Reads a service connectivity export and prints one Kubernetes
//! NetworkPolicy YAML document per service.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use netpolgen::config::{Config, LoadedConfig};
use netpolgen::emit;
use netpolgen::logging;
use netpolgen::model::load_document;
use netpolgen::policy::NetworkPolicy;
use netpolgen::translate::{translate, PortMode};

/// Netpolgen — translate service connectivity exports into Kubernetes NetworkPolicies.
#[derive(Parser)]
#[command(name = "netpolgen", version, about)]
struct Cli {
    /// Path to the JSON file containing service data.
    #[arg(short = 'f', long = "file")]
    file: PathBuf,

    /// Kubernetes namespace for the NetworkPolicies [default: default].
    #[arg(short = 'n', long)]
    namespace: Option<String>,

    /// Port interpretation: `numeric` or `passthrough`.
    #[arg(long)]
    port_mode: Option<PortMode>,

    /// Write YAML to this file instead of stdout.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Config file (default: `$NETPOLGEN_CONFIG` or `~/.netpolgen/config.toml`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Exit non-zero if any port token was dropped.
    #[arg(long)]
    strict: bool,

    /// Also write JSON logs to this directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Cli {
    /// Apply flags on top of the loaded config (flags win).
    fn apply_to(&self, config: &mut Config) {
        if let Some(namespace) = &self.namespace {
            config.namespace.clone_from(namespace);
        }
        if let Some(mode) = self.port_mode {
            config.port_mode = mode;
        }
        if self.strict {
            config.strict = true;
        }
        if let Some(dir) = &self.log_dir {
            config.logging.dir = Some(dir.clone());
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let LoadedConfig {
        mut config,
        rejected_overrides,
    } = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_to(&mut config);
    config.validate()?;

    let _logging_guard = match &config.logging.dir {
        Some(dir) => Some(logging::init_with_file(dir, &config.logging.level)?),
        None => {
            logging::init_cli(&config.logging.level);
            None
        }
    };

    for rejected in &rejected_overrides {
        warn!(
            var = rejected.var,
            value = %rejected.value,
            error = %rejected.reason,
            "ignoring invalid env override"
        );
    }

    let document = load_document(&cli.file)
        .with_context(|| format!("failed to load services from {}", cli.file.display()))?;

    let translation = translate(&document, &config.namespace, config.port_mode);
    warn_degenerate(&translation.policies);

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            emit::write_documents(&mut BufWriter::new(file), &translation.policies)?;
        }
        None => emit::write_documents(&mut std::io::stdout().lock(), &translation.policies)?,
    }

    info!(
        namespace = %config.namespace,
        port_mode = %config.port_mode,
        policies = translation.policies.len(),
        dropped_ports = translation.diagnostics.len(),
        "translation complete"
    );

    if config.strict && !translation.is_clean() {
        anyhow::bail!(
            "{} port token(s) dropped; failing because strict mode is enabled",
            translation.diagnostics.len()
        );
    }
    Ok(())
}

/// Flag policies that are valid YAML but unlikely to be what the operator wants.
fn warn_degenerate(policies: &[NetworkPolicy]) {
    let mut seen = BTreeSet::new();
    for policy in policies {
        if policy.name().is_empty() {
            warn!("service name sanitized to an empty string; policy has no valid name");
        } else if !seen.insert(policy.name()) {
            warn!(
                policy = %policy.name(),
                "duplicate policy name; later document overrides earlier on apply"
            );
        }
        if policy.is_degenerate() {
            warn!(policy = %policy.name(), "policy has no ingress or egress rules");
        }
    }
}
