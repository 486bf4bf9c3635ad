// ============================================================================
// vertimark-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL OUTPUT: UI Components and Styling
//
// Section headers, key/value status lines and success/error lines for the
// CLI. Everything is emitted through `log::info!`/`log::error!` so the same
// lines reach the console and the run log; styling comes from the console
// crate and is dropped when NO_COLOR is set or stderr is not a terminal.
//
// KEY COMPONENTS:
// - styling: Symbols and formatting constants
// - print_section / print_subsection / print_status: structure and data
// - print_success / print_warning / print_error: outcome lines

use console::style;
use log::{error, info, warn};

/// Styling constants for terminal output
pub mod styling {
    pub const SUCCESS_SYMBOL: &str = "✓";
    pub const WARNING_SYMBOL: &str = "!";
    pub const ERROR_SYMBOL: &str = "✗";

    pub const SECTION_PREFIX: &str = "===== ";
    pub const SECTION_SUFFIX: &str = " =====";

    pub const STATUS_INDENT: &str = "  ";
    pub const SUB_ITEM_INDENT: &str = "    ";

    /// Width the status labels are padded to.
    pub const LABEL_WIDTH: usize = 14;
}

/// Turns styling off when NO_COLOR is set or stderr is not a terminal.
pub fn init_colors() {
    let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    if no_color || !console::Term::stderr().features().colors_supported() {
        console::set_colors_enabled_stderr(false);
        console::set_colors_enabled(false);
    }
}

/// Prints a section header preceded by a blank line.
pub fn print_section(title: &str) {
    let header = format!(
        "{}{}{}",
        styling::SECTION_PREFIX,
        title.to_uppercase(),
        styling::SECTION_SUFFIX
    );
    info!("");
    info!("{}", style(header).cyan().bold());
}

/// Prints a subsection title, typically a filename.
pub fn print_subsection(title: &str) {
    info!("");
    info!("{}{}", styling::STATUS_INDENT, style(title).bold());
}

/// Prints an aligned `label: value` line; `highlight` emphasizes the value.
pub fn print_status(label: &str, value: &str, highlight: bool) {
    let label = format!("{label}:");
    let value = if highlight {
        style(value).green().bold().to_string()
    } else {
        value.to_string()
    };
    info!(
        "{}{:<width$} {}",
        styling::SUB_ITEM_INDENT,
        label,
        value,
        width = styling::LABEL_WIDTH
    );
}

pub fn print_success(message: &str) {
    info!(
        "{}{} {}",
        styling::STATUS_INDENT,
        style(styling::SUCCESS_SYMBOL).green().bold(),
        style(message).bold()
    );
}

pub fn print_warning(message: &str) {
    warn!(
        "{}{} {}",
        styling::STATUS_INDENT,
        style(styling::WARNING_SYMBOL).yellow().bold(),
        style(message).yellow()
    );
}

/// Prints an error title with its detail and an optional hint.
pub fn print_error(title: &str, message: &str, suggestion: Option<&str>) {
    error!(
        "{}{} {}",
        styling::STATUS_INDENT,
        style(styling::ERROR_SYMBOL).red().bold(),
        style(title).red().bold()
    );
    for line in message.lines() {
        error!("{}{}", styling::SUB_ITEM_INDENT, line);
    }
    if let Some(hint) = suggestion {
        error!("{}Hint: {}", styling::SUB_ITEM_INDENT, style(hint).dim());
    }
}
