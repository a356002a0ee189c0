//! Account command implementations

use colored::Colorize;
use dialoguer::Confirm;
use log::debug;
use serde_json::{Map, Value};

use crate::cli::args::GlobalOptions;
use crate::cli::auth::print_ack;
use crate::cli::{CommandContext, OutputFormat};
use crate::client::AccountApi;
use crate::client::models::{Preferences, User};
use crate::error::{Error, Result};
use crate::models::UserDisplay;
use crate::output::{Formattable, json, table};

/// Parse a `key=value` profile assignment.
///
/// Values that are valid JSON (numbers, booleans, arrays, objects, null) are
/// kept as JSON; anything else is sent as a string.
pub fn parse_assignment(raw: &str) -> std::result::Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in '{}'", raw));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Render a user according to the output format
fn print_user(format: OutputFormat, user: &User) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", json::format_json(user)?),
        OutputFormat::Table => vec![UserDisplay::from(user)].print(format)?,
        OutputFormat::Pretty => {
            let display = UserDisplay::from(user);
            println!("{}", display.name.bold());
            println!();
            println!("{}", table::format_fields(&display.fields()));
        }
    }
    Ok(())
}

/// Run the me command
pub async fn me(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let user = ctx.client.me().await?;
    print_user(ctx.format, &user)
}

/// Merge assignments over a full profile for a PUT
fn merged_profile(user: &User, fields: Vec<(String, Value)>) -> Result<Value> {
    let mut full = serde_json::to_value(user)?;
    if let Value::Object(ref mut map) = full {
        map.remove("id");
        for (key, value) in fields {
            map.insert(key, value);
        }
    }
    Ok(full)
}

/// Run the profile update command
pub async fn update_profile(
    opts: &GlobalOptions,
    fields: Vec<(String, Value)>,
    replace: bool,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let user = if replace {
        let current = ctx.client.me().await?;
        let full = merged_profile(&current, fields)?;
        debug!("Replacing profile of user {}", current.id);
        ctx.client.replace_user(&current.id, &full).await?
    } else {
        let patch: Map<String, Value> = fields.into_iter().collect();
        ctx.client.update_profile(&patch).await?
    };

    if ctx.format == OutputFormat::Pretty {
        println!("{} Profile updated", "✓".green());
        println!();
    }
    print_user(ctx.format, &user)
}

/// Run the preferences set command
pub async fn set_preferences(opts: &GlobalOptions, preferences: Preferences) -> Result<()> {
    if preferences.is_empty() {
        return Err(Error::Validation(
            "Nothing to update: pass --language, --currency or --timezone".to_string(),
        ));
    }

    let ctx = CommandContext::new(opts)?;
    let stored = ctx.client.update_preferences(&preferences).await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", json::format_json(&stored)?),
        OutputFormat::Pretty | OutputFormat::Table => {
            println!("{} Preferences saved", "✓".green());
            let fields: Vec<(&str, &str)> = [
                ("Language", stored.language.as_deref()),
                ("Currency", stored.currency.as_deref()),
                ("Timezone", stored.timezone.as_deref()),
            ]
            .into_iter()
            .filter_map(|(label, value)| value.map(|v| (label, v)))
            .collect();
            println!("{}", table::format_fields(&fields));
        }
    }

    Ok(())
}

/// Run the account delete command
pub async fn delete_account(opts: &GlobalOptions, yes: bool) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    if !yes {
        eprintln!(
            "{} Delete this account and erase its personal data? This cannot be undone.",
            "⚠".yellow()
        );
        eprintln!();

        let confirm = Confirm::new()
            .with_prompt("Confirm deletion?")
            .default(false)
            .interact()?;

        if !confirm {
            eprintln!("Cancelled.");
            return Ok(());
        }
    }

    let ack = ctx.client.erase_account().await?;
    print_ack(ctx.format, &ack, "Account deleted")
}
