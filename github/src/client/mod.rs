use async_trait::async_trait;
use log::{debug, trace};
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Client as ReqwestClient,
};
use serde_json::Value;
use std::{fmt, sync::Arc, time::Duration};

mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod pagination;
mod repos;

pub use error::{Error, GithubClientError, Result};
pub use pagination::{Links, Pages};
pub use repos::{Affiliation, ListReposOptions, RepoSort, RepositoryClient};
pub use reqwest::StatusCode;

// Constants
const DEFAULT_BASE_URL: &str = "https://api.github.com/";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const HEADER_LINK: &str = "Link";
const HEADER_API_VERSION: &str = "X-GitHub-Api-Version";

// https://docs.github.com/en/rest/overview/media-types
const MEDIA_TYPE_JSON: &str = "application/vnd.github+json";

// https://docs.github.com/en/rest/overview/api-versions
const DEFAULT_API_VERSION: &str = "2022-11-28";

/// Page size requested by every paginated listing.
pub const PER_PAGE: usize = 100;

/// Query string parameters in the order they are sent.
pub type Query = Vec<(String, String)>;

/// One page of a list endpoint: the decoded JSON array plus the relations
/// advertised in the `Link` header.
#[derive(Clone, Debug, Default)]
pub struct Page {
    pub items: Vec<Value>,
    pub links: Links,
}

/// The HTTP seam of the client. Every request the client issues is a GET
/// against a list endpoint that answers with a JSON array.
#[async_trait]
pub trait Transport: fmt::Debug + Send + Sync {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<Page>;
}

#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    user_agent: Option<String>,
    github_api_token: Option<String>,
    api_version: Option<String>,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
            github_api_token: None,
            api_version: None,
            timeout: None,
            transport: None,
        }
    }

    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn github_api_token<S: Into<String>>(mut self, github_api_token: S) -> Self {
        self.github_api_token = Some(github_api_token.into());
        self
    }

    pub fn api_version<S: Into<String>>(mut self, api_version: S) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replace the reqwest backed transport, e.g. with a scripted one in tests.
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn build(self) -> Result<Client> {
        let mut base_url = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let user_agent = self.user_agent.unwrap_or_else(|| USER_AGENT.to_owned());
                let api_version = self
                    .api_version
                    .unwrap_or_else(|| DEFAULT_API_VERSION.to_owned());

                let mut headers = HeaderMap::new();
                headers.insert(header::ACCEPT, HeaderValue::from_static(MEDIA_TYPE_JSON));
                headers.insert(
                    HEADER_API_VERSION,
                    HeaderValue::from_str(&api_version).map_err(|e| e.to_string())?,
                );

                if let Some(token) = &self.github_api_token {
                    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                        .map_err(|e| e.to_string())?;
                    value.set_sensitive(true);
                    headers.insert(header::AUTHORIZATION, value);
                }

                let client = ReqwestClient::builder()
                    .user_agent(&user_agent)
                    .default_headers(headers)
                    .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
                    .build()?;

                Arc::new(HttpTransport { client })
            }
        };

        Ok(Client {
            base_url,
            transport,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    /// Base URL to use for API requests. Defaults to the public GitHub API,
    /// but can be overridden for use with GitHub Enterprise. Always
    /// terminated with a trailing slash.
    base_url: String,

    /// Transport used to make http requests
    transport: Arc<dyn Transport>,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_page(&self, path: &str, query: &[(String, String)]) -> Result<Page> {
        let url = self.url(path);
        trace!("GET {} {:?}", url, query);
        self.transport.get(&url, query).await
    }

    /// Lazily walk every page of a list endpoint, see [`Pages`].
    pub fn paginate<'a, T>(&'a self, path: String, query: Query) -> Pages<'a, T>
    where
        T: serde::de::DeserializeOwned + Send + 'a,
    {
        pagination::paginate(self, path, query)
    }

    pub fn repos(&self) -> RepositoryClient<'_> {
        RepositoryClient::new(self)
    }
}

/// `Transport` backed by a reqwest client carrying the auth, accept and
/// api-version headers.
#[derive(Debug)]
pub struct HttpTransport {
    client: ReqwestClient,
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<Page> {
        let response = self.client.get(url).query(query).send().await?;
        debug!("Github Response: {} {}", response.status(), response.url());

        let status = response.status();
        if !status.is_success() {
            let payload = response.text().await?;
            let error = serde_json::from_str(&payload).unwrap_or_else(|_| GithubClientError {
                message: Some(payload),
                documentation_url: None,
            });
            return Err(Error::GithubClientError(status, error));
        }

        let links = Links::from_headers(response.headers());
        let payload = response.text().await?;
        trace!("Github Payload: {}", payload);

        let items = serde_json::from_str(&payload)?;
        Ok(Page { items, links })
    }
}

#[cfg(test)]
mod test {
    use super::{mock::ScriptedTransport, Client};

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = Client::builder()
            .base_url("https://github.example.com/api/v3")
            .transport(ScriptedTransport::new())
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "https://github.example.com/api/v3/");
        assert_eq!(
            client.url("user/repos"),
            "https://github.example.com/api/v3/user/repos"
        );
    }

    #[test]
    fn rejects_token_with_newline() {
        let result = Client::builder().github_api_token("abc\ndef").build();
        assert!(result.is_err());
    }
}
