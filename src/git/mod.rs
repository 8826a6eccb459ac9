//! Git operations for the build-from-source flow
//!
//! This module handles:
//! - Shallow cloning of the pinned Ferret ref
//! - Updating an existing clone (fetch + hard reset, never merge)

mod clone;
mod update;

pub use clone::clone_pinned;
pub use update::{fetch_pinned, open, reset_hard};
