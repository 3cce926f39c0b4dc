//! REST client for the MCKS, Spider and Tumblebug backends.
//!
//! Response bodies are returned raw; status codes are logged but never
//! interpreted, the body is what the user sees.
//!
//! # Example
//!
//! ```rust,no_run
//! use cb_cli::client::RestClient;
//!
//! # async fn example() -> Result<(), cb_cli::CliError> {
//! let client = RestClient::new("http://localhost:1024/spider")?;
//! let body = client.get("/driver").await?;
//! println!("{}", String::from_utf8_lossy(&body));
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::{Urls, is_http_url};
use crate::error::CliError;

/// Default request timeout.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Basic-auth credentials Tumblebug expects.
const TUMBLEBUG_USER: &str = "default";
const TUMBLEBUG_PASSWORD: &str = "default";

/// The backend services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Kubernetes cluster service.
    Mcks,
    /// Cloud driver broker.
    Spider,
    /// Namespace and MCIS orchestrator.
    Tumblebug,
}

impl Backend {
    /// Root URL of this backend in a context.
    #[must_use]
    pub fn root_url(self, urls: &Urls) -> &str {
        match self {
            Self::Mcks => &urls.mcks,
            Self::Spider => &urls.spider,
            Self::Tumblebug => &urls.tumblebug,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mcks => "MCKS",
            Self::Spider => "Spider",
            Self::Tumblebug => "Tumblebug",
        }
    }
}

/// HTTP client bound to one backend root URL.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    root_url: String,
    basic_auth: Option<(String, String)>,
}

impl RestClient {
    /// Client for `root_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not http(s) or the client cannot be
    /// built.
    pub fn new(root_url: &str) -> Result<Self, CliError> {
        Self::with_timeout(root_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Client with a custom timeout.
    pub fn with_timeout(root_url: &str, timeout: Duration) -> Result<Self, CliError> {
        if !is_http_url(root_url) {
            return Err(CliError::Config(format!(
                "invalid endpoint URL: {root_url} (must start with http:// or https://)"
            )));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            root_url: root_url.trim_end_matches('/').to_string(),
            basic_auth: None,
        })
    }

    /// Client for a backend of a context. Tumblebug gets its basic auth.
    pub fn for_backend(backend: Backend, urls: &Urls) -> Result<Self, CliError> {
        let client = Self::new(backend.root_url(urls)).map_err(|e| match e {
            CliError::Config(msg) => CliError::Config(format!("{}: {msg}", backend.name())),
            other => other,
        })?;
        Ok(match backend {
            Backend::Tumblebug => client.with_basic_auth(TUMBLEBUG_USER, TUMBLEBUG_PASSWORD),
            Backend::Mcks | Backend::Spider => client,
        })
    }

    /// Send basic-auth credentials with every request.
    #[must_use]
    pub fn with_basic_auth(mut self, user: &str, password: &str) -> Self {
        self.basic_auth = Some((user.to_string(), password.to_string()));
        self
    }

    /// Full URL for a path under the root.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.root_url)
    }

    /// GET `path`.
    pub async fn get(&self, path: &str) -> Result<Vec<u8>, CliError> {
        self.send(Method::GET, path, None).await
    }

    /// GET `path` with a JSON body.
    pub async fn get_with_body(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<Vec<u8>, CliError> {
        self.send(Method::GET, path, Some(body)).await
    }

    /// POST a JSON body to `path`.
    pub async fn post(&self, path: &str, body: &serde_json::Value) -> Result<Vec<u8>, CliError> {
        self.send(Method::POST, path, Some(body)).await
    }

    /// DELETE `path`.
    pub async fn delete(&self, path: &str) -> Result<Vec<u8>, CliError> {
        self.send(Method::DELETE, path, None).await
    }

    /// GET `path` and decode the JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CliError> {
        let body = self.get(path).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let request = self.http.request(method, url);
        match &self.basic_auth {
            Some((user, password)) => request.basic_auth(user, Some(password)),
            None => request,
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Vec<u8>, CliError> {
        let url = self.url(path);
        let mut request = self.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        debug!(%method, %url, status = %response.status(), "backend response");
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_url() {
        let err = RestClient::new("ws://localhost:1024/spider").expect_err("invalid");
        assert!(err.to_string().contains("must start with http://"));
    }

    #[test]
    fn url_joins_root_and_path() {
        let client = RestClient::new("http://localhost:1024/spider/").expect("client");
        assert_eq!(client.url("/driver"), "http://localhost:1024/spider/driver");
    }

    #[test]
    fn backend_root_urls() {
        let urls = Urls::default();
        assert_eq!(Backend::Mcks.root_url(&urls), "http://localhost:1470/mcks");
        assert_eq!(Backend::Spider.root_url(&urls), "http://localhost:1024/spider");
        assert_eq!(
            Backend::Tumblebug.root_url(&urls),
            "http://localhost:1323/tumblebug"
        );
    }

    #[test]
    fn tumblebug_client_uses_basic_auth() {
        let urls = Urls::default();
        let client = RestClient::for_backend(Backend::Tumblebug, &urls).expect("client");
        assert_eq!(
            client.basic_auth,
            Some(("default".to_string(), "default".to_string()))
        );
        let spider = RestClient::for_backend(Backend::Spider, &urls).expect("client");
        assert!(spider.basic_auth.is_none());
    }

    #[test]
    fn invalid_backend_url_names_backend() {
        let urls = Urls {
            mcks: "localhost:1470".into(),
            ..Urls::default()
        };
        let err = RestClient::for_backend(Backend::Mcks, &urls).expect_err("invalid");
        assert!(err.to_string().contains("MCKS"));
    }

    #[tokio::test]
    async fn unreachable_backend_is_http_error() {
        let client = RestClient::with_timeout("http://127.0.0.1:1", Duration::from_secs(2))
            .expect("client");
        let err = client.get("/ns").await.expect_err("connection refused");
        assert!(matches!(err, CliError::Http(_)));
    }
}
