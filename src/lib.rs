//! initai HTTP server: catalog listing and on-demand package archives.
//!
//! The package logic lives in [`initai_core`]; this crate wires it to
//! configuration, an axum router and the command line.

pub mod api;
pub mod config;
pub mod updates;
