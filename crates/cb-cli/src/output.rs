//! Output formatting for CLI commands.
//!
//! Backend responses are relayed as-is: JSON bodies are pretty-printed or
//! converted to YAML, anything else is written verbatim.

use std::io::Write;

use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter for YAML and JSON.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Write a serializable value.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + ?Sized,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)?;
                writeln!(writer)?;
            }
            Format::Yaml => {
                writer.write_all(serde_yaml::to_string(value)?.as_bytes())?;
            }
        }
        Ok(())
    }

    /// Write a raw response body.
    ///
    /// Bodies that are not JSON are written unchanged.
    pub fn write_body<W: Write>(&self, writer: &mut W, body: &[u8]) -> Result<(), CliError> {
        match serde_json::from_slice::<serde_json::Value>(body) {
            Ok(value) => self.write(writer, &value),
            Err(_) => {
                writer.write_all(body)?;
                Ok(())
            }
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Yaml)
    }
}
