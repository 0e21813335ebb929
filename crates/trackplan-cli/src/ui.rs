//! Terminal output primitives for the trackplan CLI.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use trackplan_compiler::Version;

/// Symbols used in summaries.
pub mod symbols {
    pub const TRIANGLE: &str = "\u{25B8}"; // ▸
    pub const DOT: &str = "\u{00B7}"; // ·
    pub const ARROW: &str = "\u{2192}"; // →
    pub const CHECK: &str = "\u{2713}"; // ✓
}

/// Creates a spinner with a message.
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Prints a success header.
pub fn done(message: &str) {
    println!("{} {}", style(symbols::CHECK).green().bold(), style(message).bold());
}

/// One summary line for a generation target.
pub fn target_line(output: &str, previous: Option<Version>, version: Version, changed: bool) {
    let status = match (previous, changed) {
        (None, _) => style("new".to_string()).cyan(),
        (Some(prior), true) => style(format!("{prior} {} {version}", symbols::ARROW)).yellow(),
        (Some(_), false) => style(format!("unchanged at {version}")).dim(),
    };
    println!(
        "    {} {} {} {}",
        style(symbols::TRIANGLE).cyan(),
        output,
        symbols::DOT,
        status
    );
}

/// One summary line for a key/value detail.
pub fn detail(label: &str, value: &str) {
    println!("    {} {}", style(format!("{label}:")).dim(), value);
}
