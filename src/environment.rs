//! Host environment detection
//!
//! This module handles:
//! - Gating each installer variant to its supported environment class
//! - Mapping the host machine type to a release architecture
//! - Resolving the install destination (override > privilege default > class default)
//!
//! Environment gating is a hard precondition, not a heuristic: running the Arch
//! installer on anything without `/etc/arch-release` fails immediately, as does
//! running the Termux installer outside Termux.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::Config;
use crate::error::{FerretError, Result};

/// Marker file present on Arch Linux hosts
const ARCH_RELEASE_MARKER: &str = "/etc/arch-release";

/// Host environment class an installer variant can target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentClass {
    ArchLinux,
    Termux,
    Generic,
}

impl EnvironmentClass {
    /// Human-readable name used in gate-failure messages
    pub fn display_name(self) -> &'static str {
        match self {
            EnvironmentClass::ArchLinux => "Arch Linux",
            EnvironmentClass::Termux => "Termux",
            EnvironmentClass::Generic => "a generic Linux host",
        }
    }

    /// Classify the current host
    pub fn detect() -> Self {
        Self::classify(
            Path::new(ARCH_RELEASE_MARKER).exists(),
            env::var_os("TERMUX_VERSION").is_some(),
        )
    }

    /// Pure classification from the two host markers
    pub fn classify(arch_marker: bool, termux_env: bool) -> Self {
        // TERMUX_VERSION is only ever set inside the Termux sandbox; check it
        // first so a proot'd Arch rootfs inside Termux still counts as Termux.
        if termux_env {
            EnvironmentClass::Termux
        } else if arch_marker {
            EnvironmentClass::ArchLinux
        } else {
            EnvironmentClass::Generic
        }
    }
}

impl fmt::Display for EnvironmentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Release architecture of the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    Amd64,
    Arm64,
}

impl Architecture {
    /// Map a machine-type string (as reported by `uname -m`) to an architecture
    pub fn from_machine(machine: &str) -> Result<Self> {
        match machine.trim() {
            "x86_64" => Ok(Architecture::Amd64),
            "aarch64" | "arm64" => Ok(Architecture::Arm64),
            other => Err(FerretError::UnsupportedArchitecture {
                reported: other.to_string(),
            }),
        }
    }

    /// Detect the architecture of the current host
    pub fn detect() -> Result<Self> {
        Self::from_machine(&machine_name())
    }

    /// Token used in release asset names (`linux-amd64`, `linux-arm64`)
    pub fn asset_token(self) -> &'static str {
        match self {
            Architecture::Amd64 => "amd64",
            Architecture::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.asset_token())
    }
}

/// Report the host machine type, preferring `uname -m` (what the user would
/// see themselves) over the compile-time constant.
fn machine_name() -> String {
    Command::new("uname")
        .arg("-m")
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| env::consts::ARCH.to_string())
}

/// Whether the process runs with root privileges
pub fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

/// Everything one install run needs to know about its target, resolved once
/// at startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct InstallTarget {
    /// Install prefix; binaries land in `<destination>/bin`
    pub destination: PathBuf,
    /// Local source tree (build flow only)
    pub source_dir: Option<PathBuf>,
    pub class: EnvironmentClass,
    pub architecture: Architecture,
}

impl InstallTarget {
    /// `<destination>/bin`
    pub fn bin_dir(&self) -> PathBuf {
        self.destination.join("bin")
    }

    /// `<destination>/lib/ferret`
    pub fn lib_dir(&self) -> PathBuf {
        self.destination.join("lib").join("ferret")
    }

    /// `<destination>/bin/ferret`
    pub fn binary_path(&self) -> PathBuf {
        self.bin_dir().join("ferret")
    }
}

/// Probe the host and build the [`InstallTarget`] for one run.
///
/// `required` is the environment class this installer variant was written for;
/// any other detected class is a fatal precondition failure.
pub fn detect(required: EnvironmentClass, config: &Config) -> Result<InstallTarget> {
    let class = EnvironmentClass::detect();
    if class != required {
        return Err(FerretError::UnsupportedEnvironment {
            expected: required.display_name().to_string(),
        });
    }

    let architecture = Architecture::detect()?;
    let destination = resolve_destination(class, config, is_root());
    let source_dir = matches!(class, EnvironmentClass::ArchLinux).then(|| config.source_dir());

    Ok(InstallTarget {
        destination,
        source_dir,
        class,
        architecture,
    })
}

/// Destination precedence: explicit `FERRET_INSTALL_DIR` > privilege-based
/// default (root installs system-wide) > environment-class default.
fn resolve_destination(class: EnvironmentClass, config: &Config, elevated: bool) -> PathBuf {
    if let Some(ref dir) = config.install_dir {
        return dir.clone();
    }
    match class {
        // Termux has no root and its own prefix is the only sensible default
        EnvironmentClass::Termux => env::var_os("PREFIX")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/data/data/com.termux/files/usr")),
        EnvironmentClass::ArchLinux | EnvironmentClass::Generic => {
            if elevated {
                PathBuf::from("/usr/local")
            } else {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".local")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_architecture_mapping_exact() {
        assert_eq!(
            Architecture::from_machine("x86_64").unwrap(),
            Architecture::Amd64
        );
        assert_eq!(
            Architecture::from_machine("aarch64").unwrap(),
            Architecture::Arm64
        );
        assert_eq!(
            Architecture::from_machine("arm64").unwrap(),
            Architecture::Arm64
        );
    }

    #[test]
    fn test_architecture_rejects_everything_else() {
        for machine in ["i686", "armv7l", "riscv64", "mips", ""] {
            let err = Architecture::from_machine(machine).unwrap_err();
            assert!(matches!(err, FerretError::UnsupportedArchitecture { .. }));
        }
    }

    #[test]
    fn test_architecture_reports_offending_value() {
        let err = Architecture::from_machine("riscv64").unwrap_err();
        assert!(err.to_string().contains("riscv64"));
    }

    #[test]
    fn test_architecture_trims_uname_output() {
        assert_eq!(
            Architecture::from_machine("x86_64\n").unwrap(),
            Architecture::Amd64
        );
    }

    #[test]
    fn test_classify_termux_wins_over_arch_marker() {
        assert_eq!(
            EnvironmentClass::classify(true, true),
            EnvironmentClass::Termux
        );
    }

    #[test]
    fn test_classify_plain_hosts() {
        assert_eq!(
            EnvironmentClass::classify(true, false),
            EnvironmentClass::ArchLinux
        );
        assert_eq!(
            EnvironmentClass::classify(false, false),
            EnvironmentClass::Generic
        );
    }

    #[test]
    #[serial]
    fn test_destination_explicit_override_beats_privilege() {
        let config = Config {
            install_dir: Some(PathBuf::from("/opt/ferret")),
            ..Config::default()
        };
        // Override applies regardless of elevation
        assert_eq!(
            resolve_destination(EnvironmentClass::ArchLinux, &config, true),
            PathBuf::from("/opt/ferret")
        );
        assert_eq!(
            resolve_destination(EnvironmentClass::ArchLinux, &config, false),
            PathBuf::from("/opt/ferret")
        );
    }

    #[test]
    #[serial]
    fn test_destination_privilege_defaults() {
        let config = Config::default();
        assert_eq!(
            resolve_destination(EnvironmentClass::ArchLinux, &config, true),
            PathBuf::from("/usr/local")
        );
        let unprivileged = resolve_destination(EnvironmentClass::ArchLinux, &config, false);
        assert!(unprivileged.ends_with(".local"));
    }

    #[test]
    #[serial]
    fn test_destination_termux_prefix() {
        let config = Config::default();
        unsafe { env::set_var("PREFIX", "/data/data/com.termux/files/usr") };
        assert_eq!(
            resolve_destination(EnvironmentClass::Termux, &config, false),
            PathBuf::from("/data/data/com.termux/files/usr")
        );
        unsafe { env::remove_var("PREFIX") };
    }

    #[test]
    fn test_install_target_paths() {
        let target = InstallTarget {
            destination: PathBuf::from("/usr/local"),
            source_dir: None,
            class: EnvironmentClass::ArchLinux,
            architecture: Architecture::Amd64,
        };
        assert_eq!(target.binary_path(), PathBuf::from("/usr/local/bin/ferret"));
        assert_eq!(target.lib_dir(), PathBuf::from("/usr/local/lib/ferret"));
    }
}
