//! Global CLI options shared across all commands
//!
//! Precedence for every option is: CLI flag > environment variable > config
//! file > default. This struct captures the CLI/env layer; config file values
//! are applied in `CommandContext`.

use crate::cli::{Cli, OutputFormat};

/// Global CLI options passed to all command handlers.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Output format override; the config preference applies when unset
    pub format: Option<OutputFormat>,

    /// Custom config file path (defaults to ~/.sponsorsclub/config.yaml)
    pub config: Option<String>,

    /// Custom session file path (defaults to ~/.sponsorsclub/session.yaml)
    pub session: Option<String>,

    /// Backend base URL override
    pub api_base_url: Option<String>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            session: cli.session.clone(),
            api_base_url: cli.api_base_url.clone(),
        }
    }

    /// Resolve the output format against a configured preference.
    pub fn format_or(&self, preference: Option<&str>) -> OutputFormat {
        use clap::ValueEnum;

        self.format
            .or_else(|| preference.and_then(|p| OutputFormat::from_str(p, true).ok()))
            .unwrap_or_default()
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    /// Get session path override as `Option<&str>`.
    pub fn session_ref(&self) -> Option<&str> {
        self.session.as_deref()
    }

    /// Get API base URL override as `Option<&str>`.
    pub fn api_base_url_ref(&self) -> Option<&str> {
        self.api_base_url.as_deref()
    }
}
