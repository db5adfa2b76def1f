use crate::{reduce::ReductionPolicy, Error, Result};
use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::Path, path::PathBuf, time::Duration};

/// Settings for one dashboard run. Every section of the TOML file is
/// optional; the defaults reproduce the stock dashboard.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub collect: CollectConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub status_emoji: StatusEmoji,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct GithubConfig {
    /// REST API root, overridable for GitHub Enterprise
    pub api_url: String,
    /// Web root used to build repository links the API left out
    pub web_url: String,
    /// Environment variable holding the token, checked first
    pub token_env: String,
    /// Environment variable checked when `token_env` is unset or empty
    pub fallback_token_env: String,
    pub user_agent: String,
    pub api_version: String,
    pub timeout_secs: u64,
}

impl GithubConfig {
    /// Read the API token from the process environment.
    pub fn token(&self) -> Result<String> {
        self.token_from(|name| std::env::var(name).ok())
    }

    /// Resolve the token through `lookup`, primary variable first. Empty
    /// values count as unset.
    pub fn token_from<F>(&self, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        [&self.token_env, &self.fallback_token_env]
            .iter()
            .filter_map(|name| lookup(name.as_str()))
            .find(|token| !token.is_empty())
            .ok_or_else(|| Error::MissingToken {
                primary: self.token_env.clone(),
                fallback: self.fallback_token_env.clone(),
            })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com/".to_owned(),
            web_url: "https://github.com/".to_owned(),
            token_env: "DASHBOARD_GH_TOKEN".to_owned(),
            fallback_token_env: "GITHUB_TOKEN".to_owned(),
            user_agent: "deployment-dashboard-updater".to_owned(),
            api_version: "2022-11-28".to_owned(),
            timeout_secs: 30,
        }
    }
}

/// How the latest status of a deployment is looked up
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusLookup {
    /// One `per_page=1` request per deployment
    Latest,
    /// Page through the whole status history and take its first entry
    FullHistory,
}

impl Default for StatusLookup {
    fn default() -> Self {
        StatusLookup::Latest
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct CollectConfig {
    /// Only look at the first N (newest) deployments of each repository.
    /// Rows for an environment whose latest deployment falls outside the
    /// window will be stale.
    pub deployment_cap: Option<usize>,
    pub status_lookup: StatusLookup,
    pub reduction: ReductionPolicy,
    /// Resolve a separate details URL and tag both URLs with where they
    /// came from
    pub track_url_provenance: bool,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            deployment_cap: None,
            status_lookup: StatusLookup::default(),
            reduction: ReductionPolicy::default(),
            track_url_provenance: true,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct OutputConfig {
    pub json: PathBuf,
    pub markdown: PathBuf,
    pub html: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json: PathBuf::from("deployments_data.json"),
            markdown: PathBuf::from("DEPLOYMENTS.md"),
            html: PathBuf::from("docs/index.html"),
        }
    }
}

const UNKNOWN_EMOJI: &str = "❓";

/// Status token to emoji lookup used by both renderers. Entries from the
/// config file are merged over the built-in table.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusEmoji(BTreeMap<String, String>);

impl StatusEmoji {
    pub fn get(&self, status: &str) -> &str {
        self.0
            .get(status)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_EMOJI)
    }
}

impl Default for StatusEmoji {
    fn default() -> Self {
        let table = [
            ("success", "✅"),
            ("failure", "❌"),
            ("error", "⚠️"),
            ("in_progress", "🔄"),
            ("pending", "⏳"),
            ("queued", "📋"),
            ("waiting", "⌛"),
            ("inactive", "⏸️"),
        ];

        Self(
            table
                .iter()
                .map(|(status, emoji)| ((*status).to_owned(), (*emoji).to_owned()))
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for StatusEmoji {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let overrides = BTreeMap::<String, String>::deserialize(deserializer)?;
        let mut emoji = Self::default();
        emoji.0.extend(overrides);
        Ok(emoji)
    }
}
