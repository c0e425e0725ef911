//! Core of the initai package server.
//!
//! Packages live on disk in a three-level hierarchy below a tenant
//! directory:
//!
//! ```text
//! {root}/{tenant}/
//! └── {framework}/
//!     └── {scope}/              ← universal variant (scope root)
//!         ├── manifest.json
//!         ├── init.md
//!         └── {llm}/            ← llm-specific variant
//!             ├── manifest.json
//!             └── init.md
//! ```
//!
//! [`PackageLibrary`] scans that tree into a [`Catalog`], resolves a
//! requested node to a flat file set (falling back to the universal
//! variant), and assembles the files plus a generated manifest into an
//! in-memory zip archive.

pub mod archive;
pub mod catalog;
pub mod descriptions;
pub mod error;
pub mod models;
pub mod resolver;
pub mod scanner;
pub mod store;

mod library;

pub use error::PackageError;
pub use library::PackageLibrary;
pub use models::*;
pub use store::{EntryKind, FsStore, PackageStore, StoreEntry};

/// Sentinel variant name for the scope-root package.
pub const UNIVERSAL: &str = "universal";

/// Marker file that turns a directory into a publishable variant.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Tenant served when none is configured.
pub const DEFAULT_TENANT: &str = "shared";
