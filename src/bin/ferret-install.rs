//! Build-from-source installer for Arch Linux hosts
//!
//! Takes no flags; see the crate docs for the recognized environment
//! variables. Refuses to run outside Arch Linux.

use miette::Diagnostic;

use ferret_install::{SourceBuildFlow, flow, ui};

fn main() {
    if let Err(e) = flow::run(&SourceBuildFlow) {
        ui::error(&e.to_string());
        if let Some(help) = e.help() {
            eprintln!("  help: {help}");
        }
        std::process::exit(1);
    }
}
