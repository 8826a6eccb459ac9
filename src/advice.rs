//! Final PATH guidance
//!
//! Purely informational tail of every successful run: either the destination's
//! `bin` directory is already searched by the user's shell, or we print the
//! exact line to append to a shell profile. Never fails.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::environment::{EnvironmentClass, InstallTarget};
use crate::ui;

/// Outcome of the PATH check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// `<destination>/bin` is already searched
    ReadyToUse { bin_dir: String },
    /// The user must extend PATH themselves; `line` is ready to paste
    AppendToProfile { bin_dir: String, line: String },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::ReadyToUse { bin_dir } => {
                write!(f, "ferret is ready to use ({bin_dir} is on your PATH)")
            }
            Advisory::AppendToProfile { bin_dir, line } => {
                write!(
                    f,
                    "{bin_dir} is not on your PATH. Append this line to your shell profile:\n  {line}"
                )
            }
        }
    }
}

/// Check PATH and report guidance for `target`
pub fn advise(target: &InstallTarget) -> Advisory {
    // Termux's own prefix is searched by every Termux shell even when the
    // inherited PATH of this process does not list it.
    let implicit = matches!(target.class, EnvironmentClass::Termux)
        .then(|| env::var_os("PREFIX").map(|p| PathBuf::from(p).join("bin")))
        .flatten();

    let advisory = advise_from(
        &target.bin_dir(),
        &env::var("PATH").unwrap_or_default(),
        implicit.as_deref(),
        dirs::home_dir().as_deref(),
    );

    match &advisory {
        Advisory::ReadyToUse { .. } => ui::success(&advisory.to_string()),
        Advisory::AppendToProfile { .. } => ui::info(&advisory.to_string()),
    }
    advisory
}

/// Pure form of the check, parameterized for tests
fn advise_from(
    bin_dir: &Path,
    path_var: &str,
    implicit: Option<&Path>,
    home: Option<&Path>,
) -> Advisory {
    let display = tilde_abbreviate(bin_dir, home);

    let searched = implicit == Some(bin_dir)
        || path_var
            .split(':')
            .filter(|entry| !entry.is_empty())
            .any(|entry| tilde_expand(entry, home) == bin_dir);

    if searched {
        Advisory::ReadyToUse { bin_dir: display }
    } else {
        Advisory::AppendToProfile {
            line: format!("export PATH=\"{display}:$PATH\""),
            bin_dir: display,
        }
    }
}

/// `/home/user/.local/bin` -> `~/.local/bin` when under the home directory
fn tilde_abbreviate(path: &Path, home: Option<&Path>) -> String {
    if let Some(home) = home {
        if let Ok(rest) = path.strip_prefix(home) {
            return format!("~/{}", rest.display());
        }
    }
    path.display().to_string()
}

/// `~/.local/bin` in a PATH entry -> the expanded home path
fn tilde_expand(entry: &str, home: Option<&Path>) -> PathBuf {
    if let (Some(home), Some(rest)) = (home, entry.strip_prefix("~/")) {
        home.join(rest)
    } else {
        PathBuf::from(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_on_path_is_ready() {
        let advisory = advise_from(
            Path::new("/usr/local/bin"),
            "/usr/bin:/usr/local/bin:/bin",
            None,
            None,
        );
        assert!(matches!(advisory, Advisory::ReadyToUse { .. }));
    }

    #[test]
    fn test_home_local_not_on_path_emits_exact_export_line() {
        let advisory = advise_from(
            Path::new("/home/user/.local/bin"),
            "/usr/bin:/bin",
            None,
            Some(Path::new("/home/user")),
        );
        let Advisory::AppendToProfile { line, .. } = &advisory else {
            panic!("expected AppendToProfile, got {advisory:?}");
        };
        assert_eq!(line, "export PATH=\"~/.local/bin:$PATH\"");
        assert!(
            advisory
                .to_string()
                .contains("export PATH=\"~/.local/bin:$PATH\"")
        );
    }

    #[test]
    fn test_tilde_entry_in_path_matches_expanded_destination() {
        let advisory = advise_from(
            Path::new("/home/user/.local/bin"),
            "~/.local/bin:/usr/bin",
            None,
            Some(Path::new("/home/user")),
        );
        assert!(matches!(advisory, Advisory::ReadyToUse { .. }));
    }

    #[test]
    fn test_termux_prefix_is_implicitly_searched() {
        let prefix_bin = Path::new("/data/data/com.termux/files/usr/bin");
        let advisory = advise_from(prefix_bin, "/system/bin", Some(prefix_bin), None);
        assert!(matches!(advisory, Advisory::ReadyToUse { .. }));
    }

    #[test]
    fn test_empty_path_entries_are_ignored() {
        let advisory = advise_from(Path::new("/opt/ferret/bin"), "::", None, None);
        assert!(matches!(advisory, Advisory::AppendToProfile { .. }));
    }

    #[test]
    fn test_outside_home_is_not_abbreviated() {
        let advisory = advise_from(
            Path::new("/opt/ferret/bin"),
            "/usr/bin",
            None,
            Some(Path::new("/home/user")),
        );
        let Advisory::AppendToProfile { line, .. } = advisory else {
            panic!("expected AppendToProfile");
        };
        assert_eq!(line, "export PATH=\"/opt/ferret/bin:$PATH\"");
    }
}
