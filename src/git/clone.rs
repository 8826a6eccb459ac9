//! Repository cloning

use std::path::Path;

use git2::{FetchOptions, Repository, build::RepoBuilder};

use crate::error::{FerretError, Result};

/// Clone `url` at the pinned `git_ref` into `target`.
///
/// The clone is shallow (depth=1) and restricted to the pinned branch; the
/// build flow never needs history and the savings on a compiler source tree
/// are substantial. Any failure here is fatal, there is no recovery path.
pub fn clone_pinned(url: &str, git_ref: &str, target: &Path) -> Result<Repository> {
    let mut fetch_options = FetchOptions::new();
    // Shallow clones are only supported for remote URLs
    let is_local = url.starts_with("file://") || Path::new(url).is_absolute();
    if !is_local {
        fetch_options.depth(1);
    }
    fetch_options.download_tags(git2::AutotagOption::All);

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options);
    builder.branch(git_ref);

    builder
        .clone(url, target)
        .map_err(|e| FerretError::GitCloneFailed {
            url: url.to_string(),
            reason: e.message().to_string(),
        })
}
