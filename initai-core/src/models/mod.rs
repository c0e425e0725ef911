//! Domain models for the package server.
//!
//! # Core Concepts
//!
//! - [`PackageNode`]: One addressable download unit, `tenant/framework/scope/variant`.
//!   The variant is either [`UNIVERSAL`](crate::UNIVERSAL) or an arbitrary LLM name.
//! - [`Catalog`]: Nested read view of every visible node, rebuilt per request.
//!
//! ## Ephemeral Values
//!
//! These live for a single request and are never written to disk:
//!
//! - [`ResolvedFileSet`]: Files gathered from the one directory a node resolved to.
//! - [`Manifest`]: Generated descriptor embedded as `manifest.json` in every archive.
//! - [`PackageArchive`]: The finished zip bytes plus their attachment filename.

mod catalog;
mod manifest;
mod package;

pub use catalog::*;
pub use manifest::*;
pub use package::*;
