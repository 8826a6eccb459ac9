//! Error types for the Ferret installers
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//! Every variant corresponds to one fatal outcome of an install run; dependency
//! installation trouble on an unprivileged host is deliberately NOT an error
//! here, it is downgraded to a warning by the resolver (see `deps`).

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for installer operations
#[derive(Error, Diagnostic, Debug)]
pub enum FerretError {
    // Environment errors
    #[error("Unsupported environment: this installer targets {expected} only")]
    #[diagnostic(
        code(ferret::env::unsupported),
        help("Run this installer on {expected}, or see https://ferret-lang.org/install for other platforms")
    )]
    UnsupportedEnvironment { expected: String },

    #[error("Unsupported architecture: {reported}")]
    #[diagnostic(
        code(ferret::env::unsupported_arch),
        help("Ferret ships for x86_64 and aarch64 hosts only")
    )]
    UnsupportedArchitecture { reported: String },

    // Dependency errors (fatal cases only; the unprivileged path warns instead)
    #[error("Failed to install required packages: {packages}")]
    #[diagnostic(
        code(ferret::deps::install_failed),
        help("Install them manually: {remedy}")
    )]
    DependencyInstallFailed { packages: String, remedy: String },

    // Git errors
    #[error("Failed to clone {url}: {reason}")]
    #[diagnostic(
        code(ferret::git::clone_failed),
        help("Check network access and that the repository URL is correct")
    )]
    GitCloneFailed { url: String, reason: String },

    #[error("Failed to reset source tree to '{git_ref}': {reason}")]
    #[diagnostic(code(ferret::git::reset_failed))]
    GitResetFailed { git_ref: String, reason: String },

    #[error("Git operation failed: {message}")]
    #[diagnostic(code(ferret::git::operation_failed))]
    GitOperationFailed { message: String },

    // Build errors
    #[error("Build failed with exit status {status}")]
    #[diagnostic(
        code(ferret::build::failed),
        help("Inspect the build output above; re-run after fixing the reported problem")
    )]
    BuildFailure { status: String },

    // Release errors
    #[error("No release asset published for architecture '{architecture}'")]
    #[diagnostic(
        code(ferret::release::not_found),
        help("See https://github.com/ferret-lang/ferret/releases for available downloads")
    )]
    ReleaseNotFound { architecture: String },

    #[error("Failed to download {url}: {reason}")]
    #[diagnostic(
        code(ferret::release::download_failed),
        help("Check network access and re-run the installer")
    )]
    DownloadFailure { url: String, reason: String },

    // Install errors
    #[error("Install failed: expected binary not found at {expected_path}")]
    #[diagnostic(code(ferret::install::binary_missing))]
    InstallFailure { expected_path: String },

    #[error("Install failed: {message}")]
    #[diagnostic(code(ferret::install::failed))]
    InstallStepFailed { message: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(ferret::io::error))]
    IoError { message: String },
}

impl From<std::io::Error> for FerretError {
    fn from(err: std::io::Error) -> Self {
        FerretError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<git2::Error> for FerretError {
    fn from(err: git2::Error) -> Self {
        FerretError::GitOperationFailed {
            message: err.message().to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, FerretError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_environment_names_expected_class() {
        let err = FerretError::UnsupportedEnvironment {
            expected: "Arch Linux".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported environment: this installer targets Arch Linux only"
        );
    }

    #[test]
    fn test_unsupported_architecture_reports_value() {
        let err = FerretError::UnsupportedArchitecture {
            reported: "mips64".to_string(),
        };
        assert!(err.to_string().contains("mips64"));
    }

    #[test]
    fn test_error_code() {
        let err = FerretError::ReleaseNotFound {
            architecture: "arm64".to_string(),
        };
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("ferret::release::not_found".to_string())
        );
    }

    #[test]
    fn test_release_not_found_points_at_releases_page() {
        let err = FerretError::ReleaseNotFound {
            architecture: "arm64".to_string(),
        };
        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("releases"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FerretError = io_err.into();
        assert!(matches!(err, FerretError::IoError { .. }));
    }

    #[test]
    fn test_git_error_conversion() {
        let git_err = git2::Error::from_str("git error");
        let err: FerretError = git_err.into();
        assert!(matches!(err, FerretError::GitOperationFailed { .. }));
    }

    #[test]
    fn test_install_failure_names_expected_path() {
        let err = FerretError::InstallFailure {
            expected_path: "/usr/local/bin/ferret".to_string(),
        };
        assert!(err.to_string().contains("/usr/local/bin/ferret"));
    }
}
