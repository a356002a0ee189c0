//! Athlete directory and follow command implementations

use colored::Colorize;
use futures::future::try_join_all;
use log::debug;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat, PaginationArgs};
use crate::client::models::{Athlete, ResourceId};
use crate::client::{AthleteApi, Page};
use crate::error::{Error, Result};
use crate::models::{AthleteDisplay, FollowDisplay};
use crate::output::{Formattable, json, table};

/// Run the athletes list command
pub async fn list(opts: &GlobalOptions, pagination: &PaginationArgs) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let mut params = pagination.to_params();

    debug!(
        "Fetching athletes (limit {}, offset {})",
        params.limit, params.offset
    );

    let mut page: Page<Athlete> = ctx.client.list_athletes(params).await?;
    let mut athletes = std::mem::take(&mut page.results);

    while pagination.all && page.has_more() && !athletes.is_empty() {
        params = params.next();
        page = ctx.client.list_athletes(params).await?;
        if page.results.is_empty() {
            break;
        }
        athletes.append(&mut page.results);
    }

    debug!("Fetched {} athletes", athletes.len());

    let next_offset = (!pagination.all && page.has_more()).then(|| params.next().offset);
    let display: Vec<AthleteDisplay> = athletes.into_iter().map(AthleteDisplay::from).collect();

    match ctx.format {
        OutputFormat::Json => println!("{}", json::format_json_page(&display, next_offset)?),
        OutputFormat::Pretty | OutputFormat::Table => {
            display.print(ctx.format)?;
            if let Some(offset) = next_offset {
                eprintln!(
                    "{}",
                    format!("More athletes available: --offset {} or --all", offset).dimmed()
                );
            }
        }
    }

    Ok(())
}

/// Run the athletes show command
pub async fn show(opts: &GlobalOptions, athlete: &str) -> Result<()> {
    let id = athlete.trim();
    if id.is_empty() {
        return Err(Error::Validation("athlete ID must not be empty".to_string()));
    }

    let ctx = CommandContext::new(opts)?;
    let athlete = ctx
        .client
        .athlete(id)
        .await?
        .ok_or_else(|| Error::Other(format!("No athlete found for '{}'", id)))?;

    match ctx.format {
        OutputFormat::Json => println!("{}", json::format_json(&athlete)?),
        OutputFormat::Table => vec![AthleteDisplay::from(athlete)].print(ctx.format)?,
        OutputFormat::Pretty => {
            let display = AthleteDisplay::from(athlete);
            println!("{}", display.name.bold());
            println!();
            println!("{}", table::format_fields(&display.fields()));
        }
    }

    Ok(())
}

/// Run the athletes followed command
pub async fn followed(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let athletes = ctx.client.followed_athletes().await?;

    let display: Vec<AthleteDisplay> = athletes.into_iter().map(AthleteDisplay::from).collect();
    display.print(ctx.format)
}

/// Run the follow command
///
/// Requests for several athletes are issued concurrently; a single failure
/// fails the command.
pub async fn follow(opts: &GlobalOptions, athletes: &[String]) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let ids: Vec<ResourceId> = athletes.iter().map(|a| ResourceId::from(a.trim())).collect();

    let follows = try_join_all(ids.iter().map(|id| ctx.client.follow(id))).await?;

    match ctx.format {
        OutputFormat::Pretty => {
            for follow in &follows {
                println!("{} Following {}", "✓".green(), follow.athlete.to_string().bold());
            }
        }
        OutputFormat::Table | OutputFormat::Json => {
            let display: Vec<FollowDisplay> = follows.into_iter().map(FollowDisplay::from).collect();
            display.print(ctx.format)?;
        }
    }

    Ok(())
}

/// Run the unfollow command
pub async fn unfollow(opts: &GlobalOptions, athletes: &[String]) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let ids: Vec<ResourceId> = athletes.iter().map(|a| ResourceId::from(a.trim())).collect();

    try_join_all(ids.iter().map(|id| ctx.client.unfollow(id))).await?;

    match ctx.format {
        OutputFormat::Json => {
            let unfollowed: Vec<&str> = ids.iter().map(ResourceId::as_str).collect();
            println!(
                "{}",
                json::format_json(&serde_json::json!({ "unfollowed": unfollowed }))?
            );
        }
        OutputFormat::Pretty | OutputFormat::Table => {
            for id in &ids {
                println!("{} Unfollowed {}", "✓".green(), id.as_str().bold());
            }
        }
    }

    Ok(())
}
