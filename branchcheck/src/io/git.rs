//! Git adapter for remote branch listing.
//!
//! The remote is never spoken to directly: we shell out to
//! `git ls-remote --heads` scoped to exactly the references we care about.

use std::process::{Command, Output, Stdio};

use tracing::{debug, instrument, warn};

use super::remote_access::RemoteAccess;
use crate::error::RemoteError;

/// Lists which of the requested branch references exist on a repository.
///
/// Implementations return the raw `<sha>\t<refname>` listing; parsing lives in
/// [`crate::core::refs`].
pub trait RefLister {
    fn list_heads(&self, repository: &str, refs: &[String]) -> Result<String, RemoteError>;
}

/// [`RefLister`] backed by the `git` executable.
#[derive(Debug)]
pub struct GitRemote<'a> {
    access: &'a RemoteAccess,
    program: String,
}

impl<'a> GitRemote<'a> {
    pub fn new(access: &'a RemoteAccess) -> Self {
        Self {
            access,
            program: "git".to_string(),
        }
    }

    /// Use a different git executable (absolute path or name on `PATH`).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn run(&self, args: &[&str]) -> Result<Output, RemoteError> {
        Command::new(&self.program)
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .output()
            .map_err(RemoteError::Spawn)
    }
}

impl RefLister for GitRemote<'_> {
    #[instrument(skip_all, fields(repository = %repository, refs = refs.len()))]
    fn list_heads(&self, repository: &str, refs: &[String]) -> Result<String, RemoteError> {
        let redacted = self.access.redacted_url(repository);
        let url = self.access.authenticated_url(repository)?;

        let mut args: Vec<&str> = vec!["ls-remote", "--heads", url.as_str()];
        args.extend(refs.iter().map(String::as_str));

        debug!(url = %redacted, "listing remote heads");
        let output = self.run(&args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = self.access.scrub(stderr.trim(), &url);
            warn!(url = %redacted, status = %output.status, "git ls-remote failed");
            return Err(RemoteError::Failed {
                url: redacted,
                status: output.status.to_string(),
                stderr,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
