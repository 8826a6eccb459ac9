//! Prebuilt-release installer for Termux hosts
//!
//! Takes no flags; see the crate docs for the recognized environment
//! variables. Refuses to run outside Termux.

use miette::Diagnostic;

use ferret_install::{ReleaseFetchFlow, flow, ui};

fn main() {
    if let Err(e) = flow::run(&ReleaseFetchFlow) {
        ui::error(&e.to_string());
        if let Some(help) = e.help() {
            eprintln!("  help: {help}");
        }
        std::process::exit(1);
    }
}
