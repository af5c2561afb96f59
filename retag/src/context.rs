//! Application context that holds resolved runtime settings
//!
//! Built once from the CLI flags and passed read-only to the rest of the
//! binary.

use crate::format::ColorChoice;

/// Verbosity level for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum VerbosityLevel {
    /// Warnings and errors only
    #[default]
    Normal,
    /// Operation progress (-v)
    Verbose,
    /// Request level detail (-vv)
    VeryVerbose,
    /// Everything, including the auth chain (-vvv)
    Trace,
}

impl VerbosityLevel {
    /// Maps the number of `-v` flags to a level
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => VerbosityLevel::Normal,
            1 => VerbosityLevel::Verbose,
            2 => VerbosityLevel::VeryVerbose,
            _ => VerbosityLevel::Trace,
        }
    }

    /// Default tracing filter directive for this level
    pub fn filter_directive(self) -> &'static str {
        match self {
            VerbosityLevel::Normal => "warn",
            VerbosityLevel::Verbose => "warn,libretag=info,retag=info",
            VerbosityLevel::VeryVerbose => "warn,libretag=debug,retag=debug",
            VerbosityLevel::Trace => "libretag=trace,retag=trace,info",
        }
    }
}

/// Application context with resolved runtime state
#[derive(Debug, Clone, Copy)]
pub struct AppContext {
    /// Resolved color choice
    pub color: ColorChoice,
    /// Requested verbosity
    pub verbosity: VerbosityLevel,
}

impl AppContext {
    /// Build context from CLI flags
    pub fn build(color: ColorChoice, verbosity: VerbosityLevel) -> Self {
        Self { color, verbosity }
    }

    /// Installs the stderr tracing subscriber. `RUST_LOG` overrides the level.
    pub fn init_tracing(&self) {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(self.verbosity.filter_directive()));

        // A second init (tests) is harmless; keep the first subscriber.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(self.color.should_color())
            .with_target(false)
            .try_init();
    }
}
