//! fields command - Print the form field definitions

use anyhow::Result;

use super::{finish, load_reporter};
use crate::cli::Context;

/// Print the configured field blueprint as JSON.
pub fn fields(ctx: &Context) -> Result<()> {
    let reporter = load_reporter(ctx)?;
    finish(&reporter.fields())
}
