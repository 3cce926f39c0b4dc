//! Clean command implementation.
//!
//! `clean mcir` removes every MCIS of a namespace and then each kind of
//! multi-cloud infrastructure resource, in dependency order.

use std::io::Write;

use tracing::debug;

use crate::cli::CleanTarget;
use crate::client::Backend;
use crate::error::CliError;
use crate::output::OutputFormat;
use crate::session::Session;

/// Paths under `/ns/{ns}` deleted by `clean mcir`, in order.
pub const MCIR_PATHS: &[&str] = &[
    "/mcis",
    "/resources/vNet",
    "/resources/securityGroup",
    "/resources/sshKey",
    "/resources/image",
    "/resources/spec",
];

/// Handler for the clean command.
pub struct CleanCommand<'a> {
    session: &'a Session,
}

impl<'a> CleanCommand<'a> {
    /// Creates a new clean command handler.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Executes the clean command.
    ///
    /// # Errors
    ///
    /// Returns error if the namespace is missing or a request fails. Stops
    /// at the first failed request.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        target: CleanTarget,
    ) -> Result<(), CliError> {
        match target {
            CleanTarget::Mcir => {
                let namespace = self.session.namespace()?;
                let client = self.session.client(Backend::Tumblebug)?;
                for suffix in MCIR_PATHS {
                    let path = format!("/ns/{namespace}{suffix}");
                    debug!(%path, "cleaning");
                    let body = client.delete(&path).await?;
                    format.write_body(out, &body)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Format;
    use crate::config::ConfigFile;
    use tempfile::TempDir;

    #[test]
    fn mcis_is_removed_first() {
        assert_eq!(MCIR_PATHS[0], "/mcis");
        assert_eq!(MCIR_PATHS.len(), 6);
    }

    #[tokio::test]
    async fn clean_requires_namespace() {
        let dir = TempDir::new().expect("tempdir");
        let session = Session::new(
            ConfigFile::load(dir.path().join("config")).expect("load"),
            None,
        );
        let mut out = Vec::new();
        let err = CleanCommand::new(&session)
            .execute(&mut out, &OutputFormat::new(Format::Yaml), CleanTarget::Mcir)
            .await
            .expect_err("namespace required");
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }
}
