//! External tool provisioning
//!
//! This module handles:
//! - Probing which required tools are already on PATH
//! - Installing the missing ones through the host package manager
//!
//! Policy by privilege, build flow: running as root installs directly and a
//! failure is fatal (a root shell that cannot pacman is a broken host). An
//! unprivileged run attempts escalation via sudo; when that fails the run
//! continues with a warning and the manual command, since the tools may well
//! be present already and escalation cannot be guaranteed everywhere.
//!
//! The binary flow's much smaller set is fatal either way: without a build
//! fallback there is nothing to continue with.

use std::process::Command;

use crate::environment::is_root;
use crate::error::{FerretError, Result};
use crate::ui;

/// (package, probe binary) pairs the build flow needs: version control,
/// C toolchain, linker/archiver, and the Go toolchain that bootstraps the
/// Ferret compiler.
const ARCH_BUILD_DEPS: &[(&str, &str)] = &[
    ("git", "git"),
    ("make", "make"),
    ("clang", "clang"),
    ("binutils", "ar"),
    ("go", "go"),
];

/// (package, probe binary) pairs the binary flow needs
const TERMUX_FETCH_DEPS: &[(&str, &str)] = &[("curl", "curl"), ("tar", "tar")];

/// Packages from `deps` whose probe binary is not on PATH
fn missing(deps: &'static [(&'static str, &'static str)]) -> Vec<&'static str> {
    deps.iter()
        .filter(|(_, probe)| which::which(probe).is_err())
        .map(|(package, _)| *package)
        .collect()
}

/// `pacman -S --needed --noconfirm <packages>`, behind sudo when unprivileged
fn pacman_install(packages: &[&str], elevated: bool) -> Command {
    let mut cmd = if elevated {
        Command::new("pacman")
    } else {
        let mut sudo = Command::new("sudo");
        sudo.arg("pacman");
        sudo
    };
    cmd.args(["-S", "--needed", "--noconfirm"]).args(packages);
    cmd
}

/// `pkg install -y <packages>` (Termux's wrapper, no escalation needed)
fn pkg_install(packages: &[&str]) -> Command {
    let mut cmd = Command::new("pkg");
    cmd.args(["install", "-y"]).args(packages);
    cmd
}

fn run_installer(cmd: &mut Command) -> bool {
    cmd.status().map(|s| s.success()).unwrap_or(false)
}

/// Fatal-vs-warning decision for the build flow's install step
fn apply_build_policy(
    elevated: bool,
    succeeded: bool,
    packages: &[&str],
    remedy: &str,
) -> Result<()> {
    if succeeded {
        return Ok(());
    }
    if elevated {
        return Err(FerretError::DependencyInstallFailed {
            packages: packages.join(", "),
            remedy: remedy.to_string(),
        });
    }
    ui::warn(&format!(
        "could not install {}; continuing in case they are already usable. To install manually: {remedy}",
        packages.join(", ")
    ));
    Ok(())
}

/// Ensure the build flow's toolchain is present (Arch Linux / pacman)
pub fn ensure_build_dependencies() -> Result<()> {
    let missing = missing(ARCH_BUILD_DEPS);
    if missing.is_empty() {
        ui::info("All build dependencies already present");
        return Ok(());
    }

    ui::info(&format!("Installing build dependencies: {}", missing.join(", ")));
    let elevated = is_root();
    let succeeded = run_installer(&mut pacman_install(&missing, elevated));
    let remedy = format!("sudo pacman -S --needed {}", missing.join(" "));
    apply_build_policy(elevated, succeeded, &missing, &remedy)
}

/// Ensure the binary flow's transfer/archive tools are present (Termux / pkg).
/// Failure is fatal: there is no build fallback on this path.
pub fn ensure_fetch_dependencies() -> Result<()> {
    let missing = missing(TERMUX_FETCH_DEPS);
    if missing.is_empty() {
        ui::info("All dependencies already present");
        return Ok(());
    }

    ui::info(&format!("Installing dependencies: {}", missing.join(", ")));
    if !run_installer(&mut pkg_install(&missing)) {
        return Err(FerretError::DependencyInstallFailed {
            packages: missing.join(", "),
            remedy: format!("pkg install {}", missing.join(" ")),
        });
    }
    Ok(())
}
