use crate::NodeId;
use serde::Deserialize;

/// A repository as returned by the repository listing endpoints. Only the
/// fields the deployment walk needs are decoded.
#[derive(Clone, Debug, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub node_id: Option<NodeId>,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    pub html_url: Option<String>,
    pub description: Option<String>,
    pub homepage: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

impl Repository {
    /// The repository's page on the web, falling back to a URL built from
    /// `web_base` (e.g. `https://github.com/`) when the API left it out.
    pub fn web_url(&self, web_base: &str) -> String {
        match self.html_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url.to_owned(),
            _ => format!("{}/{}", web_base.trim_end_matches('/'), self.full_name),
        }
    }
}
