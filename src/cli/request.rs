//! Raw API request command
//!
//! Sends an arbitrary request through the same session handling as every
//! other command. Ctrl-C aborts the request in flight.

use futures::future::AbortHandle;
use log::debug;
use reqwest::Method;
use serde_json::Value;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::error::{Error, Result};
use crate::output::json;

fn parse_method(raw: &str) -> Result<Method> {
    Method::from_bytes(raw.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| Error::Other(format!("Invalid HTTP method: {}", raw)))
}

/// Paths are relative to the base URL; a missing leading slash is added.
fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Run the api command
pub async fn run(
    opts: &GlobalOptions,
    method: &str,
    path: &str,
    data: Option<Value>,
    public: bool,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let method = parse_method(method)?;
    let path = normalize_path(path);

    let value = if public {
        ctx.client
            .public_call(method, &path, data.as_ref(), false)
            .await?
    } else {
        let (handle, registration) = AbortHandle::new_pair();
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("Interrupted, aborting request");
                handle.abort();
            }
        });

        let result = ctx
            .client
            .call_abortable(method, &path, data.as_ref(), registration)
            .await;
        watcher.abort();
        result?
    };

    match ctx.format {
        OutputFormat::Json => println!("{}", json::format_json(&value)?),
        OutputFormat::Pretty | OutputFormat::Table => {
            if !value.is_null() {
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method() {
        assert_eq!(parse_method("get").unwrap(), Method::GET);
        assert_eq!(parse_method(" PATCH ").unwrap(), Method::PATCH);
        assert!(parse_method("NOT A METHOD").is_err());
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("api/auth/me/"), "/api/auth/me/");
        assert_eq!(normalize_path("/api/auth/me/"), "/api/auth/me/");
    }
}
