//! Authenticated addressing of remote repositories.
//!
//! The credential lives in a [`SecretString`] and is only exposed while
//! building the URL handed to `git`. Everything that ends up in logs or error
//! messages goes through [`RemoteAccess::redacted_url`] or
//! [`RemoteAccess::scrub`].

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::RemoteError;

const REDACTED: &str = "***";

/// Base location and credentials shared by every repository on one remote.
#[derive(Debug)]
pub struct RemoteAccess {
    scheme: &'static str,
    /// Host and path prefix without scheme or trailing slash.
    base: String,
    username: String,
    token: SecretString,
}

impl RemoteAccess {
    /// Parse `base` (`host/path`, optionally prefixed with `http://` or
    /// `https://`) and attach credentials.
    pub fn new(
        base: &str,
        username: impl Into<String>,
        token: SecretString,
    ) -> Result<Self, String> {
        let base = base.trim();
        let (scheme, rest) = if let Some(rest) = base.strip_prefix("https://") {
            ("https", rest)
        } else if let Some(rest) = base.strip_prefix("http://") {
            ("http", rest)
        } else if base.contains("://") {
            return Err(format!("unsupported scheme in remote base '{base}'"));
        } else {
            ("https", base)
        };
        let rest = rest.trim_end_matches('/');
        if rest.is_empty() {
            return Err("remote base must name a host".to_string());
        }
        if rest.contains('@') {
            return Err("remote base must not embed credentials".to_string());
        }
        Ok(Self {
            scheme,
            base: rest.to_string(),
            username: username.into(),
            token,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// URL for `repository` without credentials.
    pub fn plain_url(&self, repository: &str) -> String {
        format!(
            "{}://{}/{}",
            self.scheme,
            self.base,
            repository.trim_start_matches('/')
        )
    }

    /// URL for `repository` showing the user but never the credential.
    pub fn redacted_url(&self, repository: &str) -> String {
        format!(
            "{}://{}@{}/{}",
            self.scheme,
            self.username,
            self.base,
            repository.trim_start_matches('/')
        )
    }

    /// URL for `repository` with user and credential in the authority.
    ///
    /// Userinfo is percent-encoded, so credentials containing `@` or `:`
    /// survive. Only pass the result to the child process.
    pub fn authenticated_url(&self, repository: &str) -> Result<Url, RemoteError> {
        let plain = self.plain_url(repository);
        let invalid = || RemoteError::InvalidUrl {
            url: self.redacted_url(repository),
        };
        let mut url = Url::parse(&plain).map_err(|_| invalid())?;
        url.set_username(&self.username).map_err(|_| invalid())?;
        url.set_password(Some(self.token.expose_secret()))
            .map_err(|_| invalid())?;
        Ok(url)
    }

    /// Remove every occurrence of the credential (raw and as encoded in
    /// `url`) from `text`.
    pub fn scrub(&self, text: &str, url: &Url) -> String {
        let mut out = text.to_string();
        let raw = self.token.expose_secret();
        if !raw.is_empty() {
            out = out.replace(raw, REDACTED);
        }
        if let Some(encoded) = url.password()
            && !encoded.is_empty()
        {
            out = out.replace(encoded, REDACTED);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn access(base: &str, token: &str) -> RemoteAccess {
        RemoteAccess::new(base, "alice", SecretString::from(token.to_string())).expect("access")
    }

    #[test]
    fn joins_base_and_repository_with_one_slash() {
        let a = access("git.example.com/scm/", "t");
        assert_eq!(a.plain_url("/team/app"), "https://git.example.com/scm/team/app");
        assert_eq!(a.plain_url("team/app"), "https://git.example.com/scm/team/app");
    }

    #[test]
    fn keeps_explicit_http_scheme() {
        let a = access("http://localhost:8080/git", "t");
        assert_eq!(a.plain_url("repo"), "http://localhost:8080/git/repo");
    }

    #[test]
    fn rejects_other_schemes_and_embedded_credentials() {
        let token = || SecretString::from("t".to_string());
        assert!(RemoteAccess::new("ssh://git.example.com", "alice", token()).is_err());
        assert!(RemoteAccess::new("bob:pw@git.example.com", "alice", token()).is_err());
        assert!(RemoteAccess::new("  /", "alice", token()).is_err());
    }

    #[test]
    fn authenticated_url_encodes_userinfo() {
        let a = access("git.example.com", "p@ss:word");
        let url = a.authenticated_url("repo").expect("url");
        assert_eq!(url.username(), "alice");
        assert_eq!(url.password(), Some("p%40ss%3Aword"));
        assert_eq!(url.host_str(), Some("git.example.com"));
        assert_eq!(url.path(), "/repo");
    }

    #[test]
    fn redacted_forms_hide_the_credential() {
        let a = access("git.example.com", "s3cr3t@x");
        let url = a.authenticated_url("repo").expect("url");
        assert_eq!(a.redacted_url("repo"), "https://alice@git.example.com/repo");
        assert!(!format!("{a:?}").contains("s3cr3t"));

        let stderr = format!("fatal: could not read from {url} (token s3cr3t@x)");
        let scrubbed = a.scrub(&stderr, &url);
        assert!(!scrubbed.contains("s3cr3t"));
        assert!(scrubbed.contains("***"));
    }
}
