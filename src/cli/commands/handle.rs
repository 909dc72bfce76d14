//! Handle command implementation.
//!
//! Reads one request event as JSON and prints the response event. Only the
//! response goes to stdout so the output can be piped.

use crate::cli::{HandleArgs, RuntimeConfig};
use crate::error::{ErrorExt, Result};
use crate::handler::{self, RequestEvent};
use tokio::io::AsyncReadExt;

/// Execute handle command; exit code 0 for a 2xx response, 1 otherwise.
pub(super) async fn execute_handle(args: &HandleArgs, config: &RuntimeConfig) -> Result<i32> {
    let raw = match &args.input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .fs_context("reading request event", path)?,
        None => {
            let mut raw = String::new();
            tokio::io::stdin().read_to_string(&mut raw).await?;
            raw
        }
    };

    let event: RequestEvent = serde_json::from_str(&raw)?;
    log::debug!("Handling {} request", event.method());

    let assembler = config.assembler().clone();
    let response =
        tokio::task::spawn_blocking(move || handler::handle(&assembler, &event)).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(if (200..300).contains(&response.status_code) {
        0
    } else {
        1
    })
}
