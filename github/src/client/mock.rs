//! In-memory `Transport` that answers from a script instead of the network.

use crate::client::{Error, GithubClientError, Links, Page, Query, Result, Transport};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

#[derive(Clone, Debug)]
enum Reply {
    Page(Page),
    Status(StatusCode),
}

/// Replies are keyed by full URL and `page` query parameter (1 when absent).
/// Unscripted requests answer with an empty page.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: HashMap<(String, usize), Reply>,
    requests: Arc<Mutex<Vec<(String, Query)>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` at `page` with `items` and the given `Link` header value
    pub fn page(mut self, url: &str, page: usize, items: Vec<Value>, link: &str) -> Self {
        let reply = Reply::Page(Page {
            items,
            links: Links::parse(link),
        });
        self.replies.insert((url.to_owned(), page), reply);
        self
    }

    /// Answer `url` at `page` with an error status
    pub fn fail(mut self, url: &str, page: usize, status: StatusCode) -> Self {
        self.replies
            .insert((url.to_owned(), page), Reply::Status(status));
        self
    }

    /// Shared log of every request issued, in order
    pub fn requests(&self) -> Arc<Mutex<Vec<(String, Query)>>> {
        self.requests.clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<Page> {
        self.requests
            .lock()
            .map_err(|_| Error::from("request log poisoned"))?
            .push((url.to_owned(), query.to_vec()));

        let page = query
            .iter()
            .find(|(k, _)| k == "page")
            .and_then(|(_, v)| v.parse().ok())
            .unwrap_or(1);

        match self.replies.get(&(url.to_owned(), page)) {
            Some(Reply::Page(page)) => Ok(page.clone()),
            Some(Reply::Status(status)) => Err(Error::GithubClientError(
                *status,
                GithubClientError {
                    message: Some("scripted failure".to_owned()),
                    documentation_url: None,
                },
            )),
            None => Ok(Page::default()),
        }
    }
}
