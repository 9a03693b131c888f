//! CLI presenter for output formatting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::evidence::Evidence;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config show)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Countdown message while a session runs
    pub fn format_countdown(&self, kind: &str, elapsed_secs: u64, total_secs: u64) -> String {
        let remaining = total_secs.saturating_sub(elapsed_secs);
        format!("Recording {kind}... {remaining}s remaining")
    }

    /// Print one evidence listing row
    pub fn evidence_row(&self, evidence: &Evidence) {
        let size = format_size(evidence.size_bytes);
        println!(
            "{}  {}  {:>8}  {:>6}  {}",
            evidence.id.cyan(),
            evidence.created_at.format("%Y-%m-%d %H:%M:%S"),
            evidence.kind.as_str(),
            size,
            format!("{}s", evidence.duration_secs).as_str().dimmed(),
        );
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    if bytes >= MIB {
        format!("{:.1}MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1}KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes}B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_are_humanized() {
        assert_eq!(format_size(512), "512B");
        assert_eq!(format_size(2048), "2.0KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0MiB");
    }

    #[test]
    fn countdown_counts_down() {
        let presenter = Presenter::new();
        assert_eq!(
            presenter.format_countdown("audio", 10, 60),
            "Recording audio... 50s remaining"
        );
        assert_eq!(
            presenter.format_countdown("panic", 70, 60),
            "Recording panic... 0s remaining"
        );
    }
}
