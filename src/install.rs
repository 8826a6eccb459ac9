//! Committing artifacts into the destination tree
//!
//! Handles archive extraction for the binary flow and the final placement of
//! the `ferret` binary and its runtime libraries. Extraction always completes
//! fully inside the workspace before anything is copied out, and the binary
//! becomes visible in `<destination>/bin` only as the last step (after its
//! permission bits are set and after the runtime libraries are in place), so
//! a concurrent reader can never observe a binary without its libs.

use std::fs::{self, File};
use std::io::BufReader;
use std::os::unix::fs::PermissionsExt;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;

use crate::environment::InstallTarget;
use crate::error::{FerretError, Result};
use crate::release::DownloadedAsset;
use crate::ui;

/// The final committed output of a successful run
#[derive(Debug)]
pub struct InstalledArtifact {
    pub binary_path: PathBuf,
    /// `None` for libs-free releases
    pub libs_dir: Option<PathBuf>,
}

/// Extract a tar.gz archive into `dest_dir`
fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    fs::create_dir_all(dest_dir)?;

    let file = File::open(archive_path)?;
    let decoder = GzDecoder::new(BufReader::new(file));
    let mut archive = tar::Archive::new(decoder);
    archive.set_preserve_permissions(true);

    for entry in archive.entries()? {
        let mut entry = entry?;
        let entry_path: PathBuf = entry.path()?.components().collect();

        // Reject traversal in hostile archives: `dest.join("../x")` would
        // land outside the extraction dir, so `..` and absolute members are
        // refused outright rather than joined and compared
        let escapes = entry_path.is_absolute()
            || entry_path
                .components()
                .any(|c| matches!(c, Component::ParentDir));
        if escapes {
            return Err(FerretError::InstallStepFailed {
                message: format!("unsafe path in archive: {}", entry_path.display()),
            });
        }

        let absolute = dest_dir.join(&entry_path);
        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent)?;
        }
        entry.unpack(&absolute)?;
    }
    Ok(())
}

/// Locate the extracted `ferret` binary.
///
/// Valid release layouts, probed in order: `bin/ferret`, then a bare
/// top-level `ferret`. Archives that wrap everything in a single versioned
/// top-level directory get the same two probes inside that directory.
/// Returns the binary path and the layout root (where `libs/` would live).
fn locate_binary(extract_dir: &Path) -> Option<(PathBuf, PathBuf)> {
    for root in layout_roots(extract_dir) {
        for candidate in [root.join("bin").join("ferret"), root.join("ferret")] {
            if candidate.is_file() {
                return Some((candidate, root));
            }
        }
    }
    None
}

/// The extraction dir itself, plus its sole subdirectory when the archive
/// has a single top-level wrapper directory.
fn layout_roots(extract_dir: &Path) -> Vec<PathBuf> {
    let mut roots = vec![extract_dir.to_path_buf()];
    let entries: Vec<_> = fs::read_dir(extract_dir)
        .map(|rd| rd.flatten().map(|e| e.path()).collect())
        .unwrap_or_default();
    if let [only] = entries.as_slice() {
        if only.is_dir() {
            roots.push(only.clone());
        }
    }
    roots
}

/// Copy a directory tree (used for `libs/` placement)
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Commit a downloaded release archive into the destination tree.
///
/// Order matters: extract fully, set the executable bit on the staged binary,
/// place the runtime libraries, then rename the binary into place last.
pub fn commit_archive(
    asset: &DownloadedAsset,
    target: &InstallTarget,
) -> Result<InstalledArtifact> {
    let workspace_dir = asset
        .archive_path
        .parent()
        .ok_or_else(|| FerretError::InstallStepFailed {
            message: "downloaded archive has no parent directory".to_string(),
        })?;
    let extract_dir = workspace_dir.join("extract");

    ui::info(&format!("Extracting {}", asset.name));
    extract_tar_gz(&asset.archive_path, &extract_dir)?;

    let Some((staged_binary, layout_root)) = locate_binary(&extract_dir) else {
        return Err(FerretError::InstallFailure {
            expected_path: extract_dir.join("bin").join("ferret").display().to_string(),
        });
    };

    // Executable bit is set while the binary is still staged in the workspace
    fs::set_permissions(&staged_binary, fs::Permissions::from_mode(0o755))?;

    // Runtime libraries go in before the binary becomes visible
    let staged_libs = layout_root.join("libs");
    let libs_dir = if staged_libs.is_dir() {
        let dest_libs = target.lib_dir();
        copy_dir_recursive(&staged_libs, &dest_libs)?;
        Some(dest_libs)
    } else {
        None
    };

    let bin_dir = target.bin_dir();
    fs::create_dir_all(&bin_dir)?;
    let binary_path = target.binary_path();
    let pending = bin_dir.join(".ferret.new");
    fs::copy(&staged_binary, &pending)?;
    fs::rename(&pending, &binary_path)?;

    ui::success(&format!("Installed {}", binary_path.display()));
    Ok(InstalledArtifact {
        binary_path,
        libs_dir,
    })
}

/// Build-flow commit: the build entrypoint places artifacts itself, so the
/// committer's job reduces to verifying the binary actually landed.
pub fn verify_built(target: &InstallTarget) -> Result<InstalledArtifact> {
    let binary_path = target.binary_path();
    if !binary_path.is_file() {
        return Err(FerretError::InstallFailure {
            expected_path: binary_path.display().to_string(),
        });
    }

    let libs = target.lib_dir();
    let libs_dir = libs.is_dir().then_some(libs);

    ui::success(&format!("Installed {}", binary_path.display()));
    Ok(InstalledArtifact {
        binary_path,
        libs_dir,
    })
}
