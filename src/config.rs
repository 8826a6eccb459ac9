//! Configuration inputs for an install run
//!
//! The installers take no command-line flags; everything is configured through
//! environment variables so they stay usable in unattended/scripted contexts.
//! All variables are read exactly once at startup and the resulting `Config`
//! is immutable for the duration of the run.

use std::env;
use std::path::PathBuf;

/// Default git remote for the Ferret sources
pub const DEFAULT_REPO: &str = "https://github.com/ferret-lang/ferret.git";

/// Default pinned ref the build flow tracks
pub const DEFAULT_REF: &str = "stable";

/// Default latest-release metadata endpoint
pub const DEFAULT_RELEASES_URL: &str =
    "https://api.github.com/repos/ferret-lang/ferret/releases/latest";

/// Environment-variable configuration, captured once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// `FERRET_REPO`: source remote URL (build flow)
    pub repo_url: String,
    /// `FERRET_REF`: pinned branch/tag (build flow)
    pub git_ref: String,
    /// `FERRET_SRC_DIR`: local clone path (build flow)
    pub src_dir: Option<PathBuf>,
    /// `FERRET_INSTALL_DIR`: destination override; when set it also disables
    /// the privilege-based default destination
    pub install_dir: Option<PathBuf>,
    /// `CC`: compiler handed through to the build entrypoint
    pub cc: Option<String>,
    /// `FERRET_RELEASES_URL`: release metadata endpoint (binary flow)
    pub releases_url: String,
}

impl Config {
    /// Capture configuration from the process environment
    pub fn from_env() -> Self {
        Self {
            repo_url: env::var("FERRET_REPO").unwrap_or_else(|_| DEFAULT_REPO.to_string()),
            git_ref: env::var("FERRET_REF").unwrap_or_else(|_| DEFAULT_REF.to_string()),
            src_dir: env::var_os("FERRET_SRC_DIR").map(PathBuf::from),
            install_dir: env::var_os("FERRET_INSTALL_DIR").map(PathBuf::from),
            cc: env::var("CC").ok(),
            releases_url: env::var("FERRET_RELEASES_URL")
                .unwrap_or_else(|_| DEFAULT_RELEASES_URL.to_string()),
        }
    }

    /// Local clone path for the build flow: `FERRET_SRC_DIR` or a per-user
    /// cache location under the home directory.
    pub fn source_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.src_dir {
            return dir.clone();
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cache")
            .join("ferret")
            .join("src")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo_url: DEFAULT_REPO.to_string(),
            git_ref: DEFAULT_REF.to_string(),
            src_dir: None,
            install_dir: None,
            cc: None,
            releases_url: DEFAULT_RELEASES_URL.to_string(),
        }
    }
}
