use crate::NodeId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A deployment of a repository.
///
/// Most fields are optional: GitHub omits or nulls several of them for
/// deployments created by third party integrations, and consumers are
/// expected to substitute their own defaults.
///
/// GitHub API docs: https://docs.github.com/en/rest/deployments/deployments
#[derive(Clone, Debug, Deserialize)]
pub struct Deployment {
    pub id: u64,
    pub node_id: Option<NodeId>,
    pub sha: Option<String>,
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    pub task: Option<String>,
    /// Free form payload attached at creation; usually an object, but the API
    /// allows any JSON value including a bare string.
    #[serde(default)]
    pub payload: Value,
    pub environment: Option<String>,
    pub description: Option<String>,
    /// ISO-8601 timestamp, kept verbatim
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub statuses_url: Option<String>,
}

impl Deployment {
    /// First non-blank `web_url` or `url` string of an object payload
    pub fn payload_url(&self) -> Option<&str> {
        let payload = self.payload.as_object()?;
        ["web_url", "url"]
            .iter()
            .filter_map(|key| payload.get(*key).and_then(Value::as_str))
            .find(|url| !url.trim().is_empty())
    }
}

/// A single state change of a deployment.
///
/// GitHub API docs: https://docs.github.com/en/rest/deployments/statuses
#[derive(Clone, Debug, Deserialize)]
pub struct DeploymentStatus {
    pub id: u64,
    pub node_id: Option<NodeId>,
    pub state: Option<DeploymentState>,
    pub description: Option<String>,
    pub environment: Option<String>,
    pub target_url: Option<String>,
    pub log_url: Option<String>,
    pub environment_url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// State of a deployment status. States GitHub adds in the future are kept
/// verbatim in `Other`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum DeploymentState {
    Error,
    Failure,
    Inactive,
    InProgress,
    Queued,
    Pending,
    Success,
    Waiting,
    Other(String),
}

impl DeploymentState {
    pub fn as_str(&self) -> &str {
        match self {
            DeploymentState::Error => "error",
            DeploymentState::Failure => "failure",
            DeploymentState::Inactive => "inactive",
            DeploymentState::InProgress => "in_progress",
            DeploymentState::Queued => "queued",
            DeploymentState::Pending => "pending",
            DeploymentState::Success => "success",
            DeploymentState::Waiting => "waiting",
            DeploymentState::Other(state) => state,
        }
    }
}

impl From<String> for DeploymentState {
    fn from(state: String) -> Self {
        match state.as_str() {
            "error" => DeploymentState::Error,
            "failure" => DeploymentState::Failure,
            "inactive" => DeploymentState::Inactive,
            "in_progress" => DeploymentState::InProgress,
            "queued" => DeploymentState::Queued,
            "pending" => DeploymentState::Pending,
            "success" => DeploymentState::Success,
            "waiting" => DeploymentState::Waiting,
            _ => DeploymentState::Other(state),
        }
    }
}

impl From<DeploymentState> for String {
    fn from(state: DeploymentState) -> Self {
        match state {
            DeploymentState::Other(state) => state,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
