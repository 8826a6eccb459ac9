//! Updating an existing clone to the pinned ref
//!
//! The source tree is treated as disposable: local edits are never merged or
//! preserved, the working tree is forced back to exactly `origin/<ref>`.

use std::path::Path;

use git2::{AutotagOption, FetchOptions, Repository};

use crate::error::{FerretError, Result};

/// Fetch the pinned ref (shallow, tags included) from origin.
///
/// Callers treat a failure here as tolerable: a network hiccup should not
/// block a rebuild from the last fetched state, so this returns the error for
/// the caller to downgrade to a warning.
pub fn fetch_pinned(repo: &Repository, git_ref: &str) -> Result<()> {
    let mut remote = repo.find_remote("origin")?;

    let mut fetch_options = FetchOptions::new();
    fetch_options.depth(1);
    fetch_options.download_tags(AutotagOption::All);

    let refspec = format!("+refs/heads/{git_ref}:refs/remotes/origin/{git_ref}");
    remote.fetch(&[refspec.as_str()], Some(&mut fetch_options), None)?;
    Ok(())
}

/// Hard-reset the working tree to `origin/<ref>` (or a tag of that name).
///
/// Equivalent to `git reset --hard`; failure here is fatal since the tree
/// state would otherwise be unknown.
pub fn reset_hard(repo: &Repository, git_ref: &str) -> Result<()> {
    let object = repo
        .revparse_single(&format!("origin/{git_ref}"))
        .or_else(|_| repo.revparse_single(git_ref))
        .map_err(|e| FerretError::GitResetFailed {
            git_ref: git_ref.to_string(),
            reason: e.message().to_string(),
        })?;

    // `git reset --hard` semantics: tracked files are forced back, untracked
    // files (e.g. build outputs) are left alone for the explicit cleanup pass
    let mut checkout = git2::build::CheckoutBuilder::new();
    checkout.force();

    repo.reset(&object, git2::ResetType::Hard, Some(&mut checkout))
        .map_err(|e| FerretError::GitResetFailed {
            git_ref: git_ref.to_string(),
            reason: e.message().to_string(),
        })
}

/// Open the clone at `path`
pub fn open(path: &Path) -> Result<Repository> {
    Repository::open(path).map_err(|e| FerretError::GitOperationFailed {
        message: format!("failed to open repository at {}: {}", path.display(), e.message()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo_with_commit(path: &Path, file: &str, content: &str, message: &str) -> Repository {
        let repo = Repository::init(path).unwrap();
        commit_file(&repo, file, content, message);
        repo
    }

    fn commit_file(repo: &Repository, file: &str, content: &str, message: &str) {
        let workdir = repo.workdir().unwrap();
        std::fs::write(workdir.join(file), content).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(file)).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = git2::Signature::now("test", "test@example.com").unwrap();
        let parent = repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<_> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap();
    }

    #[test]
    fn test_reset_hard_discards_local_edits() {
        let temp = TempDir::new().unwrap();
        let repo = repo_with_commit(temp.path(), "main.fr", "fn main() {}\n", "initial");
        let branch = repo.head().unwrap().shorthand().unwrap().to_string();

        // Dirty the working tree
        std::fs::write(temp.path().join("main.fr"), "garbage").unwrap();

        reset_hard(&repo, &branch).unwrap();
        let restored = std::fs::read_to_string(temp.path().join("main.fr")).unwrap();
        assert_eq!(restored, "fn main() {}\n");
    }

    #[test]
    fn test_reset_hard_unknown_ref_is_fatal() {
        let temp = TempDir::new().unwrap();
        let repo = repo_with_commit(temp.path(), "main.fr", "fn main() {}\n", "initial");

        let err = reset_hard(&repo, "no-such-ref").unwrap_err();
        assert!(matches!(err, FerretError::GitResetFailed { .. }));
    }

    #[test]
    fn test_fetch_pinned_without_origin_fails() {
        let temp = TempDir::new().unwrap();
        let repo = repo_with_commit(temp.path(), "main.fr", "fn main() {}\n", "initial");

        // No "origin" remote configured
        assert!(fetch_pinned(&repo, "stable").is_err());
    }

    #[test]
    fn test_open_missing_path_fails() {
        let temp = TempDir::new().unwrap();
        assert!(open(&temp.path().join("absent")).is_err());
    }
}
