//! Status command implementation

use chrono::Utc;
use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::config::Config;
use crate::error::Result;
use crate::output::formatters::{format_datetime_local, format_expiry};
use crate::session::{DecodedIdentity, FileSessionStore, SessionStore};

/// Run the status command to display configuration and session status.
///
/// Purely local: no request is sent, so an expired access token is reported
/// as such rather than refreshed.
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "SponsorsClub Status".bold());

    let config_path = Config::resolve_path(opts.config_ref())?;
    let config = match Config::load_at(opts.config_ref()) {
        Ok(config) => {
            if config_path.exists() {
                println!("Config file: {}", config_path.display().to_string().cyan());
            } else {
                println!(
                    "Config file: {} {}",
                    config_path.display().to_string().cyan(),
                    "(not created, using defaults)".dimmed()
                );
            }
            config
        }
        Err(err) => {
            eprintln!(
                "{} Configuration could not be loaded from {}",
                "✗".red(),
                config_path.display()
            );
            return Err(err);
        }
    };

    println!(
        "API:         {}",
        config.api_base_url(opts.api_base_url_ref()).cyan()
    );

    let session_path = config.session_path(opts.session_ref())?;
    println!("Session:     {}", session_path.display().to_string().cyan());
    println!();

    let store = FileSessionStore::new(session_path);
    let slots = match store.slots() {
        Ok(slots) => slots,
        Err(err) => {
            println!("{} Session file unreadable: {}", "✗".red(), err);
            println!("  → Run 'sponsorsclub logout' to reset it");
            println!();
            return Ok(());
        }
    };

    let Some(session) = slots.session() else {
        println!("{} Not signed in", "✗".red());
        if slots.access_token.is_some() {
            println!("  {}", "(access token present without a refresh token)".dimmed());
        }
        println!("  → Run 'sponsorsclub login' to sign in");
        println!();
        return Ok(());
    };

    match DecodedIdentity::from_token(&session.access_token) {
        Ok(identity) => {
            let who = identity
                .email
                .clone()
                .or_else(|| identity.username.clone())
                .unwrap_or_else(|| format!("user {}", identity.subject));
            println!("{} Signed in as {}", "✓".green(), who.bold());

            match identity.expires_at() {
                Some(at) if identity.is_expired() => println!(
                    "{} Access token {} (refreshed on next command)",
                    "⚠".yellow(),
                    format_expiry(at, Utc::now())
                ),
                Some(at) => println!(
                    "{} Access token {} ({})",
                    "✓".green(),
                    format_expiry(at, Utc::now()),
                    format_datetime_local(at).dimmed()
                ),
                None => println!("{} Access token has no usable expiry", "○".dimmed()),
            }
        }
        Err(_) => {
            println!("{} Signed in", "✓".green());
            println!("{} Access token is opaque, expiry unknown", "○".dimmed());
        }
    }

    println!("{} Refresh token stored", "✓".green());
    println!();

    Ok(())
}
