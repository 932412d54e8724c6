// Terminal feedback while the upload is in flight. Everything here draws to
// stderr so stdout only ever carries the report.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Start a spinner with `message`. indicatif hides it when stderr is not a
/// terminal, so piping the output stays clean.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner} {msg} ({elapsed})")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Run `f` while a spinner is shown, clearing it afterwards.
pub fn with_spinner<T>(message: &str, f: impl FnOnce() -> T) -> T {
    let spinner = spinner(message);
    let result = f();
    spinner.finish_and_clear();
    result
}
