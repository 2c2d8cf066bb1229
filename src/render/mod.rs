//! Output rendering for human and robot modes.

pub mod error;
pub mod human;
pub mod robot;

use serde::Serialize;

use crate::cli::args::OutputFormat;
use crate::error::Result;

/// Print `data` to stdout: the human rendering, or the JSON envelope.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn emit<T: Serialize>(
    command: &str,
    data: T,
    format: OutputFormat,
    pretty: bool,
    human: impl FnOnce(&T) -> String,
) -> Result<()> {
    match format {
        OutputFormat::Human => println!("{}", human(&data)),
        OutputFormat::Json => println!(
            "{}",
            robot::render_envelope(command, data, Vec::new(), pretty)?
        ),
    }
    Ok(())
}
