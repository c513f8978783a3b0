//! report command - Submit a report to the configured destination
//!
//! # Example
//!
//! ```bash
//! reporter report -f title="Crash on save" -f description="It crashes"
//! reporter report --input form.json --open
//! ```

use anyhow::{Context as _, Result};

use super::{finish, form_body, load_reporter};
use crate::cli::args::FormArgs;
use crate::cli::Context;
use crate::ui::output;

/// Submit the form and print the JSON response.
pub fn report(ctx: &Context, form: &FormArgs, open: bool) -> Result<()> {
    let body = form_body(form)?;
    let reporter = load_reporter(ctx)?;

    let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
    let response = rt.block_on(reporter.report(&body));

    finish(&response)?;

    let issue = response
        .body
        .as_ref()
        .and_then(|b| Some((b.get("issueId")?.as_u64()?, b.get("issueUrl")?.as_str()?)));

    match issue {
        Some((id, url)) => {
            output::success(
                format!(
                    "Your problem has been reported successfully and is handled under case #{}: {}",
                    id, url
                ),
                ctx.verbosity,
            );
            if open {
                if let Err(e) = open::that(url) {
                    tracing::warn!(error = %e, url, "failed to open browser");
                }
            }
        }
        None => {
            output::success("Your problem has been reported successfully.", ctx.verbosity);
            if open {
                tracing::warn!("nothing to open: the destination did not create an issue");
            }
        }
    }

    Ok(())
}
