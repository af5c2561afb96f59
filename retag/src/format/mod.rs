use owo_colors::OwoColorize;
use std::io::IsTerminal;

/// When to color output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Color when writing to a terminal and NO_COLOR is unset
    #[default]
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

impl From<&str> for ColorChoice {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "always" => ColorChoice::Always,
            "never" => ColorChoice::Never,
            _ => ColorChoice::Auto,
        }
    }
}

impl ColorChoice {
    /// Resolves `Auto` against the environment.
    pub fn should_color(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                std::env::var_os("NO_COLOR").is_none()
                    && (std::io::stdout().is_terminal() || std::io::stderr().is_terminal())
            }
        }
    }
}

/// Trait for output formatting that can be TTY-aware or plain text
pub trait OutputFormatter: Send + Sync {
    /// Renders a success line
    fn success_line(&self, message: &str) -> String;

    /// Renders an error line
    fn error_line(&self, message: &str) -> String;

    /// Print a success message to stdout
    fn success(&self, message: &str) {
        println!("{}", self.success_line(message));
    }

    /// Print an error message to stderr
    fn error(&self, message: &str) {
        eprintln!("{}", self.error_line(message));
    }
}

/// TTY-aware formatter with colors
pub struct TtyFormatter;

impl OutputFormatter for TtyFormatter {
    fn success_line(&self, message: &str) -> String {
        format!("{} {}", "✓".green().bold(), message)
    }

    fn error_line(&self, message: &str) -> String {
        format!("{} {}", "retag:".red().bold(), message)
    }
}

/// Plain text formatter for non-TTY output (piped, scripted)
pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn success_line(&self, message: &str) -> String {
        message.to_string()
    }

    fn error_line(&self, message: &str) -> String {
        format!("retag: {}", message)
    }
}

/// Create the appropriate formatter for the color choice
pub fn create_formatter(color: ColorChoice) -> Box<dyn OutputFormatter> {
    if color.should_color() {
        Box::new(TtyFormatter)
    } else {
        Box::new(PlainFormatter)
    }
}
