//! Status output for installer runs
//!
//! The installers are non-interactive; all user feedback is plain status lines.
//! Informational output goes to stdout, warnings and errors to stderr so that
//! scripted callers can separate the two streams.

use console::Style;

/// Print a step/progress line
pub fn info(message: &str) {
    println!("{} {}", Style::new().cyan().apply_to("::"), message);
}

/// Print a success line
pub fn success(message: &str) {
    println!("{} {}", Style::new().green().bold().apply_to("ok"), message);
}

/// Print a non-fatal warning
pub fn warn(message: &str) {
    eprintln!(
        "{} {}",
        Style::new().yellow().bold().apply_to("warning:"),
        message
    );
}

/// Print a fatal error (the caller still decides the exit code)
pub fn error(message: &str) {
    eprintln!(
        "{} {}",
        Style::new().red().bold().apply_to("error:"),
        message
    );
}
