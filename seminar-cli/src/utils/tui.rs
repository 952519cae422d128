use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use crate::CliDesk;

pub fn create_spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["-", "\\", "|", "/"])
            .template("{msg} {spinner}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// Print the desk's pending banner message, if any, to stderr.
pub fn show_notice(desk: &CliDesk) {
    if let Some(message) = desk.notifier().take() {
        eprintln!("{}", message.yellow());
    }
}
