//! Install flow orchestration
//!
//! The two installers differ only in how they produce an artifact (build the
//! pinned sources vs. fetch a prebuilt release); the commit and PATH-advice
//! tail is shared. That split is modeled as a strategy trait with one
//! implementation per flow.
//!
//! Execution is strictly sequential: each stage's postconditions are the next
//! stage's preconditions, and nothing runs concurrently within one run.

use std::path::Path;

use crate::advice;
use crate::config::Config;
use crate::deps;
use crate::environment::{self, EnvironmentClass, InstallTarget};
use crate::error::Result;
use crate::install::{self, InstalledArtifact};
use crate::release::{self, DownloadedAsset};
use crate::source::SourceTree;
use crate::ui;
use crate::workspace::Workspace;

/// What a strategy hands to the shared commit step
#[derive(Debug)]
pub enum Acquired {
    /// The build entrypoint already placed artifacts under the destination
    BuiltTree,
    /// A downloaded archive staged in the workspace
    Archive(DownloadedAsset),
}

/// One installer variant: a supported environment class plus a way to
/// produce an artifact.
pub trait InstallFlow {
    /// The only environment class this variant runs on
    fn environment_class(&self) -> EnvironmentClass;

    /// Provision external tools (package-manager step)
    fn ensure_dependencies(&self) -> Result<()>;

    /// Produce the artifact to commit. `workspace_dir` outlives this call;
    /// staged files remain valid until the commit step has finished.
    fn acquire(
        &self,
        config: &Config,
        target: &InstallTarget,
        workspace_dir: &Path,
    ) -> Result<Acquired>;
}

/// Build-from-source variant (Arch Linux)
pub struct SourceBuildFlow;

impl InstallFlow for SourceBuildFlow {
    fn environment_class(&self) -> EnvironmentClass {
        EnvironmentClass::ArchLinux
    }

    fn ensure_dependencies(&self) -> Result<()> {
        deps::ensure_build_dependencies()
    }

    fn acquire(
        &self,
        config: &Config,
        target: &InstallTarget,
        _workspace_dir: &Path,
    ) -> Result<Acquired> {
        // The clone path was resolved into the target at detect() time
        let source_dir = target
            .source_dir
            .clone()
            .unwrap_or_else(|| config.source_dir());
        let tree = SourceTree::acquire(config, source_dir)?;
        tree.clean_stale_outputs()?;
        tree.build(target, config.cc.as_deref())?;
        Ok(Acquired::BuiltTree)
    }
}

/// Prebuilt-release variant (Termux)
pub struct ReleaseFetchFlow;

impl InstallFlow for ReleaseFetchFlow {
    fn environment_class(&self) -> EnvironmentClass {
        EnvironmentClass::Termux
    }

    fn ensure_dependencies(&self) -> Result<()> {
        deps::ensure_fetch_dependencies()
    }

    fn acquire(
        &self,
        config: &Config,
        target: &InstallTarget,
        workspace_dir: &Path,
    ) -> Result<Acquired> {
        let asset =
            release::resolve_and_download(&config.releases_url, target.architecture, workspace_dir)?;
        Ok(Acquired::Archive(asset))
    }
}

/// Shared commit step
fn commit(acquired: Acquired, target: &InstallTarget) -> Result<InstalledArtifact> {
    match acquired {
        Acquired::BuiltTree => install::verify_built(target),
        Acquired::Archive(asset) => install::commit_archive(&asset, target),
    }
}

/// Run one complete install: detect, provision, acquire, commit, advise.
///
/// The workspace lives for the whole run and is removed on every exit path.
pub fn run(flow: &dyn InstallFlow) -> Result<()> {
    let config = Config::from_env();
    let target = environment::detect(flow.environment_class(), &config)?;

    ui::info(&format!(
        "Installing Ferret for {} ({}) into {}",
        target.class,
        target.architecture,
        target.destination.display()
    ));

    flow.ensure_dependencies()?;

    let workspace = Workspace::create()?;
    let acquired = flow.acquire(&config, &target, workspace.path())?;
    commit(acquired, &target)?;

    advice::advise(&target);
    Ok(())
}
