//! Request bodies read from `-f FILENAME`.

use std::io::Read;

use tracing::debug;

use crate::config::is_http_url;
use crate::error::CliError;

/// Where a manifest comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource<'a> {
    /// Standard input (`-`).
    Stdin,
    /// An http(s) URL.
    Url(&'a str),
    /// A local file.
    File(&'a str),
}

impl<'a> ManifestSource<'a> {
    /// Classify a `-f` argument.
    #[must_use]
    pub fn parse(filename: &'a str) -> Self {
        if filename == "-" {
            Self::Stdin
        } else if is_http_url(filename) {
            Self::Url(filename)
        } else {
            Self::File(filename)
        }
    }
}

/// Read a YAML or JSON manifest and return it as JSON.
pub async fn read_manifest(filename: &str) -> Result<serde_json::Value, CliError> {
    let source = ManifestSource::parse(filename);
    debug!(?source, "reading manifest");

    let text = match source {
        ManifestSource::Stdin => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
        ManifestSource::Url(url) => reqwest::get(url).await?.text().await?,
        ManifestSource::File(path) => std::fs::read_to_string(path).map_err(|e| {
            CliError::InvalidArgument(format!("failed to read manifest '{path}': {e}"))
        })?,
    };

    parse_manifest(&text)
        .map_err(|e| CliError::InvalidArgument(format!("invalid manifest '{filename}': {e}")))
}

/// Parse YAML (or JSON, which is valid YAML) into a JSON value.
pub fn parse_manifest(text: &str) -> Result<serde_json::Value, serde_yaml::Error> {
    serde_yaml::from_str(text)
}
