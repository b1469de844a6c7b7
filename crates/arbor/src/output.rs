//! Colored terminal output utilities.

use console::{Style, Term};

/// Terminal output formatter.
///
/// Messages go to stderr; results go to stdout.
pub(crate) struct Output {
    term: Term,
    stdout: Term,
    red: Style,
    yellow: Style,
    cyan_bold: Style,
    dim: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            stdout: Term::stdout(),
            red: Style::new().red(),
            yellow: Style::new().yellow(),
            cyan_bold: Style::new().cyan().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print one search result: score, highlighted title, dimmed URL.
    pub(crate) fn result(&self, probability: f64, title: &str, url: &str) {
        let _ = self.stdout.write_line(&format!(
            "{probability:>8.3}  {}  {}",
            self.cyan_bold.apply_to(title),
            self.dim.apply_to(url)
        ));
    }
}
