//! Version command implementation.

use std::io::Write;

use crate::error::CliError;

/// Version of this build.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prints `cbctl <version>`.
///
/// # Errors
///
/// Returns error if the output cannot be written.
pub fn execute<W: Write>(out: &mut W) -> Result<(), CliError> {
    writeln!(out, "cbctl {VERSION}")?;
    Ok(())
}
