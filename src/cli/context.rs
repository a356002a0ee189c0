//! Command execution context
//!
//! Provides a unified context for command execution, eliminating boilerplate
//! for config loading, session storage, and client initialization.

use std::sync::Arc;

use log::debug;

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::client::SponsorsClubClient;
use crate::config::Config;
use crate::error::Result;
use crate::session::{FileSessionStore, TerminalNavigator};

/// Context for command execution containing the client and runtime options.
pub struct CommandContext {
    /// API client bound to the on-disk session (Arc-wrapped for concurrent requests)
    pub client: Arc<SponsorsClubClient>,
    /// Output format preference
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// Loads the config (or defaults), opens the session file and builds the
    /// client. No request is made and no session is required here; protected
    /// commands fail with `Unauthenticated` on their first call instead.
    ///
    /// # Errors
    /// Returns error if config cannot be loaded or the client cannot be built.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Config::load_at(opts.config_ref())?;
        let session_path = config.session_path(opts.session_ref())?;
        let base_url = config.api_base_url(opts.api_base_url_ref());

        debug!(
            "Using API {} with session file {}",
            base_url,
            session_path.display()
        );

        let client = SponsorsClubClient::builder()
            .base_url(base_url)
            .login_location(config.login_location())
            .timeout(config.timeout())
            .session_store(Arc::new(FileSessionStore::new(session_path)))
            .navigator(Arc::new(TerminalNavigator))
            .build()?;

        let format = opts.format_or(config.preferences.format.as_deref());

        Ok(Self {
            client: Arc::new(client),
            format,
        })
    }
}
