//! Netpolgen — service connectivity to Kubernetes NetworkPolicy translator.
//!
//! Reads a JSON export of named services and their protocol/port entries and
//! produces one `networking.k8s.io/v1` NetworkPolicy per service. The
//! translation core in [`translate`] is pure; file I/O, YAML rendering and
//! logging live at the edges.
//!
//! See `DESIGN.md` for full architecture documentation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod emit;
pub mod logging;
pub mod model;
pub mod policy;
pub mod translate;
