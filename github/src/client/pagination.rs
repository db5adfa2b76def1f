use crate::client::{Client, Query, Result, HEADER_LINK, PER_PAGE};
use futures::stream::{self, BoxStream, StreamExt};
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use url::Url;

/// Lazy, forward-only stream over every item of a paginated list endpoint.
///
/// Pages are requested one at a time with `page` counting up from 1 and
/// `per_page` fixed at [`PER_PAGE`]. The stream ends on the first empty page
/// or on the first page whose `Link` header carries no `next` relation.
/// Calling [`Client::paginate`] again starts over from page 1.
pub type Pages<'a, T> = BoxStream<'a, Result<T>>;

/// The `relation -> URL` pairs of a `Link` response header
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Links(BTreeMap<String, String>);

impl Links {
    /// Parse a header value of the form `<url>; rel="next", <url>; rel="last"`.
    /// Entries without a `;` are skipped.
    pub fn parse(value: &str) -> Self {
        let mut links = BTreeMap::new();

        for part in value.split(',') {
            let section = part.trim();
            let (url, rel) = match section.split_once(';') {
                Some(split) => split,
                None => continue,
            };

            let url = url.trim();
            let url = url.strip_prefix('<').unwrap_or(url);
            let url = url.strip_suffix('>').unwrap_or(url);
            let rel = rel.trim().replace("rel=\"", "").replace('"', "");

            links.insert(rel, url.to_owned());
        }

        Self(links)
    }

    pub(super) fn from_headers(headers: &reqwest::header::HeaderMap) -> Self {
        headers
            .get(HEADER_LINK)
            .and_then(|h| h.to_str().ok())
            .map(Self::parse)
            .unwrap_or_default()
    }

    pub fn get(&self, rel: &str) -> Option<&str> {
        self.0.get(rel).map(String::as_str)
    }

    pub fn next(&self) -> Option<&str> {
        self.get("next")
    }

    /// The `page` query parameter of the URL behind `rel`, if it has one
    pub fn page(&self, rel: &str) -> Option<usize> {
        let url = Url::parse(self.get(rel)?).ok()?;
        let page = url
            .query_pairs()
            .find_map(|(k, v)| if k == "page" { Some(v) } else { None })?;
        page.parse().ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(rel, url)| (rel.as_str(), url.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

struct Cursor<'a> {
    client: &'a Client,
    path: String,
    query: Query,
    page: usize,
    buffered: std::vec::IntoIter<Value>,
    exhausted: bool,
}

impl<'a> Cursor<'a> {
    async fn advance<T: DeserializeOwned>(mut self) -> Result<Option<(T, Self)>> {
        loop {
            if let Some(item) = self.buffered.next() {
                let item = serde_json::from_value(item)?;
                return Ok(Some((item, self)));
            }

            if self.exhausted {
                return Ok(None);
            }

            let query = page_query(&self.query, self.page);
            let page = self.client.get_page(&self.path, &query).await?;
            debug!(
                "{} page {}/{}: {} items",
                self.path,
                self.page,
                page.links
                    .page("last")
                    .map_or_else(|| "?".to_owned(), |last| last.to_string()),
                page.items.len(),
            );

            if page.items.is_empty() {
                return Ok(None);
            }

            self.exhausted = page.links.next().is_none();
            self.page += 1;
            self.buffered = page.items.into_iter();
        }
    }
}

pub(super) fn paginate<'a, T>(client: &'a Client, path: String, query: Query) -> Pages<'a, T>
where
    T: DeserializeOwned + Send + 'a,
{
    let cursor = Cursor {
        client,
        path,
        query,
        page: 1,
        buffered: Vec::new().into_iter(),
        exhausted: false,
    };

    stream::try_unfold(cursor, Cursor::advance).boxed()
}

// Caller supplied parameters first; `per_page` and `page` are always ours.
fn page_query(base: &[(String, String)], page: usize) -> Query {
    let mut query: Query = base
        .iter()
        .filter(|(k, _)| k != "page" && k != "per_page")
        .cloned()
        .collect();
    query.push(("per_page".to_owned(), PER_PAGE.to_string()));
    query.push(("page".to_owned(), page.to_string()));
    query
}
