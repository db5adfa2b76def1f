use super::RepositoryClient;
use crate::{
    client::{Pages, Result},
    Deployment, DeploymentStatus,
};

// Implementation for the deployment endpoints
// https://docs.github.com/en/rest/deployments
impl<'a> RepositoryClient<'a> {
    /// List deployments, newest first
    ///
    /// GitHub API docs: https://docs.github.com/en/rest/deployments/deployments#list-deployments
    pub fn list_deployments(&self, full_name: &str) -> Pages<'a, Deployment> {
        let path = format!("repos/{}/deployments", full_name);
        self.inner.paginate(path, Vec::new())
    }

    /// List every status of a deployment, newest first
    ///
    /// GitHub API docs: https://docs.github.com/en/rest/deployments/statuses#list-deployment-statuses
    pub fn list_deployment_statuses(
        &self,
        full_name: &str,
        deployment_id: u64,
    ) -> Pages<'a, DeploymentStatus> {
        let path = format!("repos/{}/deployments/{}/statuses", full_name, deployment_id);
        self.inner.paginate(path, Vec::new())
    }

    /// Fetch only the most recent status of a deployment with a single
    /// `per_page=1` request.
    pub async fn latest_deployment_status(
        &self,
        full_name: &str,
        deployment_id: u64,
    ) -> Result<Option<DeploymentStatus>> {
        let path = format!("repos/{}/deployments/{}/statuses", full_name, deployment_id);
        let query = vec![
            ("per_page".to_owned(), "1".to_owned()),
            ("page".to_owned(), "1".to_owned()),
        ];

        let page = self.inner.get_page(&path, &query).await?;
        match page.items.into_iter().next() {
            Some(status) => Ok(Some(serde_json::from_value(status)?)),
            None => Ok(None),
        }
    }
}
