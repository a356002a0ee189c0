//! Authentication command implementations

use colored::Colorize;
use dialoguer::{Input, Password, theme::ColorfulTheme};
use serde_json::json;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat, RegisterArgs};
use crate::client::AuthApi;
use crate::client::models::{Acknowledgement, RegisterRequest, check_password_strength};
use crate::error::{Error, Result};
use crate::output::json;
use crate::output::formatters::format_expiry;
use crate::session::DecodedIdentity;

/// Prompt for a value unless it was given on the command line
fn value_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .interact_text()?),
    }
}

fn password_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Password::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .interact()?),
    }
}

/// New passwords are typed twice and checked before anything is sent.
fn new_password_or_prompt(value: Option<String>) -> Result<String> {
    let password = match value {
        Some(v) => v,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("New password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };
    check_password_strength(&password).map_err(|msg| Error::Validation(msg.to_string()))?;
    Ok(password)
}

/// Print an acknowledgement, falling back to `done` when the backend sent no message
pub fn print_ack(format: OutputFormat, ack: &Acknowledgement, done: &str) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", json::format_json(ack)?),
        OutputFormat::Pretty | OutputFormat::Table => {
            println!("{} {}", "✓".green(), ack.message.as_deref().unwrap_or(done));
        }
    }
    Ok(())
}

/// Run the login command
pub async fn login(
    opts: &GlobalOptions,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let email = value_or_prompt(email, "Email")?;
    let password = password_or_prompt(password, "Password")?;

    AuthApi::login(ctx.client.as_ref(), email.trim(), &password).await?;

    match ctx.format {
        OutputFormat::Json => {
            println!(
                "{}",
                json::format_json(&json!({ "signed_in": true, "email": email.trim() }))?
            );
        }
        OutputFormat::Pretty | OutputFormat::Table => {
            println!("{} Signed in as {}", "✓".green(), email.trim().bold());
        }
    }

    Ok(())
}

/// Run the logout command
pub fn logout(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    ctx.client.logout()
}

/// Run the register command
pub async fn register(opts: &GlobalOptions, args: RegisterArgs) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let password = new_password_or_prompt(args.password)?;
    let request = RegisterRequest {
        email: args.email.trim().to_string(),
        password,
        first_name: args.first_name,
        last_name: args.last_name,
        phone_country_code: args.phone_country_code,
        phone_number: args.phone_number,
    };

    let user = ctx.client.register(&request).await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", json::format_json(&user)?),
        OutputFormat::Pretty | OutputFormat::Table => {
            println!("{} Account created for {}", "✓".green(), user.email.bold());
            println!("  → Check your inbox for the verification link, then run 'sponsorsclub verify-email <TOKEN>'");
        }
    }

    Ok(())
}

/// Run the verify-email command
pub async fn verify_email(opts: &GlobalOptions, token: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let ack = ctx.client.verify_email(token.trim()).await?;
    print_ack(ctx.format, &ack, "Email verified")
}

/// Run the password reset command
pub async fn request_password_reset(opts: &GlobalOptions, email: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let ack = ctx.client.request_password_reset(email.trim()).await?;
    print_ack(ctx.format, &ack, "If the account exists, a reset email is on its way")
}

/// Run the password confirm command
pub async fn confirm_password_reset(
    opts: &GlobalOptions,
    token: &str,
    password: Option<String>,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let password = new_password_or_prompt(password)?;
    let ack = ctx
        .client
        .confirm_password_reset(token.trim(), &password)
        .await?;
    print_ack(ctx.format, &ack, "Password updated, you can now sign in")
}

/// Run the password change command
pub async fn change_password(
    opts: &GlobalOptions,
    old: Option<String>,
    new: Option<String>,
) -> Result<()> {
    use crate::client::AccountApi;

    let ctx = CommandContext::new(opts)?;
    let old = password_or_prompt(old, "Current password")?;
    let new = new_password_or_prompt(new)?;

    let ack = ctx.client.change_password(&old, &new, Some(&new)).await?;
    print_ack(ctx.format, &ack, "Password changed")
}

/// Run the refresh command
pub async fn refresh(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let token = ctx.client.refresh().await?;

    let expiry = DecodedIdentity::from_token(&token)
        .ok()
        .and_then(|identity| identity.expires_at());

    match ctx.format {
        OutputFormat::Json => {
            let expires_at = expiry.map(|dt| dt.to_rfc3339());
            println!(
                "{}",
                json::format_json(&json!({ "refreshed": true, "expires_at": expires_at }))?
            );
        }
        OutputFormat::Pretty | OutputFormat::Table => match expiry {
            Some(at) => println!(
                "{} Access token refreshed ({})",
                "✓".green(),
                format_expiry(at, chrono::Utc::now())
            ),
            None => println!("{} Access token refreshed", "✓".green()),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weak_new_password_is_a_validation_error() {
        let err = new_password_or_prompt(Some("short".to_string())).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.as_api().is_none());
    }

    #[test]
    fn test_strong_new_password_is_returned() {
        let password = new_password_or_prompt(Some("Strong@Pass1".to_string())).unwrap();
        assert_eq!(password, "Strong@Pass1");
    }
}
