//! Ferret toolchain installer
//!
//! Two installer variants share this crate, one per supported environment
//! class:
//! - `ferret-install` builds the toolchain from the pinned sources (Arch Linux)
//! - `ferret-get` fetches a prebuilt release archive (Termux)
//!
//! Both are non-interactive and idempotent, configured entirely through
//! environment variables (`FERRET_REPO`, `FERRET_REF`, `FERRET_SRC_DIR`,
//! `FERRET_INSTALL_DIR`, `CC`), and suitable for unattended execution.

pub mod advice;
pub mod config;
pub mod deps;
pub mod environment;
pub mod error;
pub mod flow;
pub mod git;
pub mod install;
pub mod release;
pub mod source;
pub mod ui;
pub mod workspace;

pub use error::{FerretError, Result};
pub use flow::{InstallFlow, ReleaseFetchFlow, SourceBuildFlow};
