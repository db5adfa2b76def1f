use github::{Deployment, DeploymentStatus, Repository};
use serde::Serialize;

/// Placeholder for an environment or ref the API did not report
pub const NOT_AVAILABLE: &str = "N/A";

/// Status token for a deployment that has no status yet
pub const UNKNOWN_STATUS: &str = "unknown";

const SHORT_SHA_LEN: usize = 7;

/// Where a resolved URL came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlSource {
    /// The deployment, its payload, or its latest status
    Deployment,
    /// The repository homepage fallback
    Repository,
}

/// A URL together with its provenance
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedUrl {
    pub url: String,
    pub source: UrlSource,
}

impl ResolvedUrl {
    /// First non-blank candidate, or `fallback` tagged as the repository
    fn first_of<'a, I>(candidates: I, fallback: &str) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        match candidates
            .into_iter()
            .flatten()
            .find(|url| !url.trim().is_empty())
        {
            Some(url) => Self {
                url: url.to_owned(),
                source: UrlSource::Deployment,
            },
            None => Self {
                url: fallback.to_owned(),
                source: UrlSource::Repository,
            },
        }
    }
}

/// Where the deployment can be reached: the status' `environment_url`, then
/// its `target_url`, then the payload's `web_url`/`url`, then `repo_url`.
pub fn resolve_dashboard_url(
    deployment: &Deployment,
    status: Option<&DeploymentStatus>,
    repo_url: &str,
) -> ResolvedUrl {
    ResolvedUrl::first_of(
        vec![
            status.and_then(|s| s.environment_url.as_deref()),
            status.and_then(|s| s.target_url.as_deref()),
            deployment.payload_url(),
        ],
        repo_url,
    )
}

/// Where to read about the deployment: the status' `log_url`, then its
/// `target_url`, then `repo_url`.
pub fn resolve_details_url(status: Option<&DeploymentStatus>, repo_url: &str) -> ResolvedUrl {
    ResolvedUrl::first_of(
        vec![
            status.and_then(|s| s.log_url.as_deref()),
            status.and_then(|s| s.target_url.as_deref()),
        ],
        repo_url,
    )
}

/// At most the first seven characters of `sha`
pub fn short_sha(sha: Option<&str>) -> String {
    sha.unwrap_or_default().chars().take(SHORT_SHA_LEN).collect()
}

fn or_not_available(value: Option<&str>) -> String {
    match value {
        Some(value) if !value.is_empty() => value.to_owned(),
        _ => NOT_AVAILABLE.to_owned(),
    }
}

/// One reportable deployment, as written to the JSON artifact
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeploymentRow {
    pub repo: String,
    pub full_repo: String,
    pub repo_url: String,
    pub environment: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub sha: String,
    pub created_at: String,
    pub status: String,
    pub status_description: String,
    pub dashboard_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard_source: Option<UrlSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details_source: Option<UrlSource>,
}

impl DeploymentRow {
    /// Normalize a deployment and its latest status into a row. With
    /// `track_url_provenance` off only the dashboard URL is kept.
    pub fn new(
        repo: &Repository,
        repo_url: &str,
        deployment: &Deployment,
        status: Option<&DeploymentStatus>,
        track_url_provenance: bool,
    ) -> Self {
        let dashboard = resolve_dashboard_url(deployment, status, repo_url);
        let (dashboard_source, details_url, details_source) = if track_url_provenance {
            let details = resolve_details_url(status, repo_url);
            (
                Some(dashboard.source),
                Some(details.url),
                Some(details.source),
            )
        } else {
            (None, None, None)
        };

        Self {
            repo: repo.name.clone(),
            full_repo: repo.full_name.clone(),
            repo_url: repo_url.to_owned(),
            environment: or_not_available(deployment.environment.as_deref()),
            git_ref: or_not_available(deployment.git_ref.as_deref()),
            sha: short_sha(deployment.sha.as_deref()),
            created_at: deployment.created_at.clone().unwrap_or_default(),
            status: status
                .and_then(|s| s.state.as_ref())
                .map(|state| state.as_str())
                .filter(|state| !state.trim().is_empty())
                .unwrap_or(UNKNOWN_STATUS)
                .to_owned(),
            status_description: status
                .and_then(|s| s.description.clone())
                .unwrap_or_default(),
            dashboard_url: dashboard.url,
            dashboard_source,
            details_url,
            details_source,
        }
    }

    /// Case-insensitive `(repository, environment)` identity
    pub fn key(&self) -> (String, String) {
        (self.full_repo.to_lowercase(), self.environment.to_lowercase())
    }
}

#[cfg(test)]
mod test {
    use super::{
        resolve_dashboard_url, resolve_details_url, short_sha, DeploymentRow, UrlSource,
    };
    use github::{Deployment, DeploymentStatus, Repository};
    use serde_json::json;

    const REPO_URL: &str = "https://github.com/acme/api";

    fn repo() -> Repository {
        serde_json::from_value(json!({
            "id": 1,
            "name": "api",
            "full_name": "acme/api",
            "html_url": REPO_URL,
        }))
        .unwrap()
    }

    fn deployment(value: serde_json::Value) -> Deployment {
        serde_json::from_value(value).unwrap()
    }

    fn status(value: serde_json::Value) -> DeploymentStatus {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn dashboard_url_precedence() {
        let dep = deployment(json!({"id": 1, "payload": {"web_url": "https://payload.example"}}));

        let all = status(json!({
            "id": 1,
            "environment_url": "https://env.example",
            "target_url": "https://target.example",
        }));
        let resolved = resolve_dashboard_url(&dep, Some(&all), REPO_URL);
        assert_eq!(resolved.url, "https://env.example");
        assert_eq!(resolved.source, UrlSource::Deployment);

        let blank_env = status(json!({
            "id": 1,
            "environment_url": "  ",
            "target_url": "https://target.example",
        }));
        let resolved = resolve_dashboard_url(&dep, Some(&blank_env), REPO_URL);
        assert_eq!(resolved.url, "https://target.example");

        let resolved = resolve_dashboard_url(&dep, None, REPO_URL);
        assert_eq!(resolved.url, "https://payload.example");
        assert_eq!(resolved.source, UrlSource::Deployment);

        let bare = deployment(json!({"id": 2, "payload": {"url": ""}}));
        let resolved = resolve_dashboard_url(&bare, Some(&status(json!({"id": 1}))), REPO_URL);
        assert_eq!(resolved.url, REPO_URL);
        assert_eq!(resolved.source, UrlSource::Repository);
    }

    #[test]
    fn details_url_falls_back_independently() {
        let with_log = status(json!({
            "id": 1,
            "environment_url": "https://env.example",
            "log_url": "https://ci.example/run/1",
        }));
        let resolved = resolve_details_url(Some(&with_log), REPO_URL);
        assert_eq!(resolved.url, "https://ci.example/run/1");
        assert_eq!(resolved.source, UrlSource::Deployment);

        let env_only = status(json!({"id": 1, "environment_url": "https://env.example"}));
        let resolved = resolve_details_url(Some(&env_only), REPO_URL);
        assert_eq!(resolved.url, REPO_URL);
        assert_eq!(resolved.source, UrlSource::Repository);
    }

    #[test]
    fn short_shas() {
        assert_eq!(
            short_sha(Some("a84d88e7554fc1fa21bcbc4efae3c782a70d2b9d")),
            "a84d88e"
        );
        assert_eq!(short_sha(Some("abc")), "abc");
        assert_eq!(short_sha(None), "");
    }

    #[test]
    fn normalizes_missing_fields() {
        let row = DeploymentRow::new(&repo(), REPO_URL, &deployment(json!({"id": 1})), None, true);

        assert_eq!(row.environment, "N/A");
        assert_eq!(row.git_ref, "N/A");
        assert_eq!(row.sha, "");
        assert_eq!(row.created_at, "");
        assert_eq!(row.status, "unknown");
        assert_eq!(row.status_description, "");
        assert_eq!(row.dashboard_url, REPO_URL);
        assert_eq!(row.dashboard_source, Some(UrlSource::Repository));
        assert_eq!(row.details_url.as_deref(), Some(REPO_URL));
    }

    #[test]
    fn blank_state_is_unknown() {
        let deployment = deployment(json!({"id": 1, "environment": "production"}));
        for state in &["", "  "] {
            let status = status(json!({"id": 1, "state": state}));
            let row = DeploymentRow::new(&repo(), REPO_URL, &deployment, Some(&status), true);
            assert_eq!(row.status, "unknown");
        }

        let status = status(json!({"id": 1, "state": null}));
        let row = DeploymentRow::new(&repo(), REPO_URL, &deployment, Some(&status), true);
        assert_eq!(row.status, "unknown");
    }

    #[test]
    fn provenance_fields_omitted_when_untracked() {
        let row = DeploymentRow::new(
            &repo(),
            REPO_URL,
            &deployment(json!({"id": 1, "environment": "production"})),
            Some(&status(json!({"id": 1, "state": "success", "target_url": "https://t.example"}))),
            false,
        );

        assert_eq!(row.dashboard_url, "https://t.example");
        let value = serde_json::to_value(&row).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("dashboard_source"));
        assert!(!object.contains_key("details_url"));
        assert_eq!(object["ref"], "N/A");
        assert_eq!(object["status"], "success");
    }

    #[test]
    fn key_is_case_insensitive() {
        let a = DeploymentRow::new(
            &repo(),
            REPO_URL,
            &deployment(json!({"id": 1, "environment": "Production"})),
            None,
            true,
        );
        let mut b = a.clone();
        b.full_repo = "ACME/Api".to_owned();
        b.environment = "production".to_owned();
        assert_eq!(a.key(), b.key());
    }
}
