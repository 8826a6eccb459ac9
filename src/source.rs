//! Source tree acquisition and build invocation (build flow)
//!
//! This module handles:
//! - Obtaining or updating the pinned Ferret source tree (clone-or-reset)
//! - Clearing stale build outputs so every build starts from a clean tree
//! - Invoking the build entrypoint with the destination configured
//!
//! The build entrypoint itself is opaque: it is the source tree's own
//! `make install`, which compiles the toolchain and places artifacts under
//! the destination. This installer only prepares its environment.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use crate::config::Config;
use crate::environment::InstallTarget;
use crate::error::{FerretError, Result};
use crate::git;
use crate::ui;

/// Build-output directories cleared before every build. Re-running the
/// installer must never let a previous version's artifacts leak into the
/// next build, so the debug/keep variants are cleared too.
const STALE_OUTPUT_DIRS: &[&str] = &["bin", "lib", "gen", "gen.dbg"];

/// The pinned source tree for one build-flow run
#[derive(Debug)]
pub struct SourceTree {
    pub path: PathBuf,
    pub repo_url: String,
    pub git_ref: String,
}

impl SourceTree {
    /// Obtain or update the source tree at `path`.
    ///
    /// An existing clone is fetched and hard-reset to `origin/<ref>`; a fetch
    /// failure only warns (the last fetched state still builds) but a reset
    /// failure is fatal. A missing clone is created fresh and shallow; any
    /// failure there is fatal.
    pub fn acquire(config: &Config, path: PathBuf) -> Result<Self> {
        let tree = Self {
            path,
            repo_url: config.repo_url.clone(),
            git_ref: config.git_ref.clone(),
        };

        if tree.path.join(".git").exists() {
            ui::info(&format!(
                "Updating {} to '{}'",
                tree.path.display(),
                tree.git_ref
            ));
            let repo = git::open(&tree.path)?;
            if let Err(e) = git::fetch_pinned(&repo, &tree.git_ref) {
                ui::warn(&format!("fetch failed, building last fetched state: {e}"));
            }
            git::reset_hard(&repo, &tree.git_ref)?;
        } else {
            ui::info(&format!(
                "Cloning {} (ref '{}') into {}",
                tree.repo_url,
                tree.git_ref,
                tree.path.display()
            ));
            if let Some(parent) = tree.path.parent() {
                fs::create_dir_all(parent)?;
            }
            git::clone_pinned(&tree.repo_url, &tree.git_ref, &tree.path)?;
        }

        Ok(tree)
    }

    /// Remove stale build outputs from a previous run.
    ///
    /// Safe to call on a fresh clone (the directories just do not exist yet).
    pub fn clean_stale_outputs(&self) -> Result<()> {
        for dir in STALE_OUTPUT_DIRS {
            let path = self.path.join(dir);
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            }
        }
        Ok(())
    }

    /// Run the build entrypoint; a non-zero exit is fatal.
    pub fn build(&self, target: &InstallTarget, cc: Option<&str>) -> Result<()> {
        ui::info(&format!(
            "Building Ferret into {}",
            target.destination.display()
        ));
        run_entrypoint(&mut self.build_entrypoint(target, cc))
    }

    /// The build entrypoint command, with the destination and compiler
    /// selection passed on the child's environment only. The installer's own
    /// environment is never mutated.
    fn build_entrypoint(&self, target: &InstallTarget, cc: Option<&str>) -> Command {
        let mut cmd = Command::new("make");
        cmd.arg("install")
            .current_dir(&self.path)
            .env("FERRET_INSTALL_DIR", &target.destination);
        if let Some(cc) = cc {
            cmd.env("CC", cc);
        }
        cmd
    }
}

/// Run a build command with inherited stdio so compiler output reaches the user
fn run_entrypoint(cmd: &mut Command) -> Result<()> {
    let status = cmd.status().map_err(|e| FerretError::BuildFailure {
        status: format!("could not start build: {e}"),
    })?;
    if !status.success() {
        return Err(FerretError::BuildFailure {
            status: status.to_string(),
        });
    }
    Ok(())
}
