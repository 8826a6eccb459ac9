//! Ephemeral staging workspace
//!
//! Every run stages its downloads and extraction inside a private temporary
//! directory that must not survive the process: it is removed on drop for the
//! success and error paths, an interrupt handler covers Ctrl-C, and a startup
//! sweep collects anything a previous force-killed run left behind.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use tempfile::TempDir;

use crate::error::Result;

/// Prefix for workspace directory names under the temp base
const WORKSPACE_PREFIX: &str = "ferret-install-";

/// Workspace of the currently running install, for the interrupt handler
static ACTIVE_WORKSPACE: Mutex<Option<PathBuf>> = Mutex::new(None);

/// The interrupt handler may only be registered once per process
static HANDLER_INSTALLED: OnceLock<()> = OnceLock::new();

/// Returns a directory path suitable for creating temporary directories.
/// Never returns a relative path, so workspaces are never created under the
/// current working directory (avoids repo/tmp when TMPDIR=tmp and cwd is a repo).
pub fn temp_dir_base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        t
    } else {
        PathBuf::from("/tmp")
    }
}

/// Scoped staging directory owned exclusively by one run
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create the workspace and arm interrupt cleanup
    pub fn create() -> Result<Self> {
        let base = temp_dir_base();
        sweep_orphans(&base);

        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(&base)?;

        if let Ok(mut active) = ACTIVE_WORKSPACE.lock() {
            *active = Some(dir.path().to_path_buf());
        }
        install_interrupt_handler();

        Ok(Self { dir })
    }

    /// Path of the staging directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if let Ok(mut active) = ACTIVE_WORKSPACE.lock() {
            *active = None;
        }
        // TempDir removes the directory itself
    }
}

/// On SIGINT/SIGTERM remove the active workspace before terminating. Without
/// this, the default signal disposition would kill the process before any
/// Drop runs.
fn install_interrupt_handler() {
    HANDLER_INSTALLED.get_or_init(|| {
        let result = ctrlc::set_handler(|| {
            if let Ok(active) = ACTIVE_WORKSPACE.lock() {
                if let Some(ref path) = *active {
                    let _ = fs::remove_dir_all(path);
                }
            }
            std::process::exit(130);
        });
        if result.is_err() {
            crate::ui::warn("could not install interrupt handler; workspace cleanup on Ctrl-C is not guaranteed");
        }
    });
}

/// Remove workspace directories a previous force-killed run left behind.
/// Concurrent installer runs are out of contract, so anything matching the
/// prefix is fair game; removal errors (e.g. another user's dir) are ignored.
fn sweep_orphans(base: &Path) {
    let Ok(entries) = fs::read_dir(base) else {
        return;
    };
    for entry in entries.flatten() {
        let name = entry.file_name();
        let is_orphan = name
            .to_str()
            .is_some_and(|n| n.starts_with(WORKSPACE_PREFIX));
        if is_orphan && entry.path().is_dir() {
            let _ = fs::remove_dir_all(entry.path());
        }
    }
}
