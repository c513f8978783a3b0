//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Collects the form from `--input` and `--field`
//! 2. Calls the matching [`crate::api::Reporter`] handler
//! 3. Prints the response body and maps non-2xx to an error
//!
//! # Async Commands
//!
//! `report` performs network or process I/O. It builds a tokio runtime and
//! blocks on the handler.

mod completion;
mod fields;
mod preview;
mod report;

pub use completion::completion;
pub use fields::fields;
pub use preview::preview;
pub use report::report;

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context as _, Result};
use serde_json::{Map, Value};

use crate::api::{ApiResponse, Reporter};
use crate::cli::args::{Command, FormArgs};
use crate::cli::Context;
use crate::core::config::Config;
use crate::ui::output;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Report { form, open } => report::report(ctx, &form, open),
        Command::Preview { form } => preview::preview(ctx, &form),
        Command::Fields => fields::fields(ctx),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Load configuration and build the handlers.
///
/// A missing or invalid configuration is answered like the api would: a
/// 500 with the message as body.
fn load_reporter(ctx: &Context) -> Result<Reporter> {
    let loaded = Config::load(ctx.config.as_deref()).and_then(Reporter::from_config);
    loaded.map_err(|err| {
        output::body(&ApiResponse::error(500, err.to_string()).body_text());
        anyhow::Error::new(err).context("request failed with status 500")
    })
}

/// Print the response body; fail for non-2xx statuses.
fn finish(response: &ApiResponse) -> Result<()> {
    output::body(&response.body_text());
    tracing::debug!(status = response.status, "response");

    if !response.is_success() {
        bail!("request failed with status {}", response.status);
    }
    Ok(())
}

/// Build the JSON form from `--input` and `--field` arguments.
///
/// Fields given with `--field` override keys read from the input.
fn form_body(form: &FormArgs) -> Result<Value> {
    let mut object = match &form.input {
        Some(path) => read_input(path)?,
        None => Map::new(),
    };

    for pair in &form.fields {
        let (key, value) = parse_field(pair)?;
        object.insert(key.to_string(), Value::String(value.to_string()));
    }

    Ok(Value::Object(object))
}

/// Split `key=value`. The value may itself contain `=`.
fn parse_field(pair: &str) -> Result<(&str, &str)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => bail!("invalid field '{}': expected KEY=VALUE", pair),
    }
}

/// Read a JSON object from a file, or stdin for `-`.
fn read_input(path: &Path) -> Result<Map<String, Value>> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read form from stdin")?;
        text
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read form from {}", path.display()))?
    };

    if text.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_str(&text)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?
    {
        Value::Object(object) => Ok(object),
        _ => bail!("{} must contain a JSON object", path.display()),
    }
}
