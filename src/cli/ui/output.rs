use console::style;

/// Console output plus GitHub Actions workflow commands
pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// `::warning::` annotation on the workflow run
    pub fn annotate_warning(&self, message: &str) {
        println!("::warning::{}", escape_annotation(message));
    }

    /// `::error::` annotation on the workflow run
    pub fn annotate_error(&self, message: &str) {
        println!("::error::{}", escape_annotation(message));
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

/// Workflow commands end at a newline, so these must be percent-encoded
pub fn escape_annotation(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
