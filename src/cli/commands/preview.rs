//! preview command - Render the report body without sending it

use anyhow::Result;

use super::{finish, form_body, load_reporter};
use crate::cli::args::FormArgs;
use crate::cli::Context;

/// Render the template against the form and print it.
///
/// Prints nothing (and succeeds) when the form has no description.
pub fn preview(ctx: &Context, form: &FormArgs) -> Result<()> {
    let body = form_body(form)?;
    let reporter = load_reporter(ctx)?;
    finish(&reporter.preview(&body))
}
