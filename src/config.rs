//! Runtime configuration loaded from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result};
use initai_core::DEFAULT_TENANT;

use crate::updates::DEFAULT_SCRIPT_VERSION;

const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Debug)]
pub struct Config {
    /// Root of the package tree (from INITAI_PACKAGES_ROOT)
    pub packages_root: PathBuf,
    /// The single tenant served (from INITAI_TENANT)
    pub tenant: String,
    /// Bind address (from INITAI_HOST)
    pub host: IpAddr,
    /// Bind port (from INITAI_PORT)
    pub port: u16,
    /// Latest installer script version (from INITAI_SCRIPT_VERSION)
    pub script_version: String,
    /// Directory of hosted installer scripts and `changelog.json`
    /// (from INITAI_SCRIPTS_DIR). `None` disables script hosting.
    pub scripts_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let packages_root = match std::env::var("INITAI_PACKAGES_ROOT") {
            Ok(root) => PathBuf::from(root),
            Err(_) => default_packages_root()?,
        };

        let tenant = std::env::var("INITAI_TENANT").unwrap_or_else(|_| DEFAULT_TENANT.into());

        let host = match std::env::var("INITAI_HOST") {
            Ok(host) => host
                .parse()
                .with_context(|| format!("Invalid INITAI_HOST '{}'", host))?,
            Err(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };

        let port = match std::env::var("INITAI_PORT") {
            Ok(port) => port
                .parse()
                .with_context(|| format!("Invalid INITAI_PORT '{}'", port))?,
            Err(_) => DEFAULT_PORT,
        };

        let script_version = std::env::var("INITAI_SCRIPT_VERSION")
            .unwrap_or_else(|_| DEFAULT_SCRIPT_VERSION.into());

        let scripts_dir = match std::env::var("INITAI_SCRIPTS_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => project_dirs()?.data_dir().join("scripts"),
        };

        Ok(Self {
            packages_root,
            tenant,
            host,
            port,
            script_version,
            scripts_dir: Some(scripts_dir),
        })
    }

    /// Configuration serving `root` with every other setting at its default.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            packages_root: root.into(),
            tenant: DEFAULT_TENANT.to_string(),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            script_version: DEFAULT_SCRIPT_VERSION.to_string(),
            scripts_dir: None,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// One-line startup summary of what this process serves.
    pub fn summary(&self) -> String {
        let scripts = self
            .scripts_dir
            .as_deref()
            .map_or_else(|| "disabled".to_string(), |d| d.display().to_string());
        format!(
            "initai {} (tenant '{}', packages root {}, scripts {})",
            env!("CARGO_PKG_VERSION"),
            self.tenant,
            self.packages_root.display(),
            scripts
        )
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("dev", "initai", "initai")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
}

fn default_packages_root() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().join("packages"))
}
