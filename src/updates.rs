//! Update check for the installer scripts.
//!
//! The scripts send their own version and offer to download a newer copy
//! when the server reports one, printing the changelog entries they are
//! missing.

use std::cmp::Ordering;
use std::path::Path;

use semver::Version;
use serde::{Deserialize, Serialize};

/// Installer version shipped alongside this server.
pub const DEFAULT_SCRIPT_VERSION: &str = "2.1.0";

/// File in the scripts directory listing script releases.
pub const CHANGELOG_FILE: &str = "changelog.json";

/// One installer release as listed in `changelog.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub version: String,
    pub date: String,
    #[serde(default)]
    pub changes: Vec<String>,
}

/// Response body of `/api/check-updates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCheck {
    pub update_available: bool,
    pub current_version: String,
    pub client_version: Option<String>,
    pub script: Option<String>,
    /// Releases newer than the client, in changelog order.
    #[serde(default)]
    pub changelog: Vec<ChangelogEntry>,
}

/// Compare two version strings.
///
/// Valid semver (with an optional leading `v`) compares by semver rules, so
/// `2.1.0-beta` < `2.1.0`. Anything else is read leniently as dotted
/// numbers: missing components count as zero and so does any component
/// that is not a number, e.g. `1.2` == `1.2.0` and `v2` > `1.9.9`.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    parse_version(a).cmp(&parse_version(b))
}

fn parse_version(version: &str) -> Version {
    let version = version.trim();
    let version = version.strip_prefix('v').unwrap_or(version);
    if let Ok(parsed) = Version::parse(version) {
        return parsed;
    }

    let mut parts = version
        .split('.')
        .map(|part| part.trim().parse::<u64>().unwrap_or(0));
    Version::new(
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
    )
}

/// Read `changelog.json` from `scripts_dir`.
///
/// A missing file is an empty changelog; a malformed one is logged and
/// treated the same, the update check itself must not fail.
pub async fn load_changelog(scripts_dir: &Path) -> Vec<ChangelogEntry> {
    let path = scripts_dir.join(CHANGELOG_FILE);
    let content = match tokio::fs::read(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    serde_json::from_slice(&content).unwrap_or_else(|e| {
        tracing::warn!("Ignoring malformed {}: {}", path.display(), e);
        Vec::new()
    })
}

/// Check `client_version` against `current_version`.
///
/// A client that does not report its version is always offered the update
/// and receives the whole changelog.
pub fn check_for_update(
    current_version: &str,
    client_version: Option<String>,
    script: Option<String>,
    changelog: Vec<ChangelogEntry>,
) -> UpdateCheck {
    let is_newer = |version: &str| match client_version.as_deref() {
        Some(client) => compare_versions(version, client) == Ordering::Greater,
        None => true,
    };

    let update_available = is_newer(current_version);
    let changelog = changelog
        .into_iter()
        .filter(|entry| is_newer(&entry.version))
        .collect();

    UpdateCheck {
        update_available,
        current_version: current_version.to_string(),
        client_version,
        script,
        changelog,
    }
}
