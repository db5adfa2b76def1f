use crate::{
    config::{CollectConfig, StatusLookup},
    row::DeploymentRow,
    Result,
};
use futures::{StreamExt, TryStreamExt};
use github::{
    client::{Affiliation, ListReposOptions, RepoSort},
    Client, Deployment, DeploymentStatus, Repository,
};
use log::{debug, info};

/// Walks every repository visible to the client's token and turns each
/// deployment into a [`DeploymentRow`]. Requests are issued strictly one
/// after another.
pub struct Collector<'a> {
    client: &'a Client,
    config: &'a CollectConfig,
    web_url: &'a str,
}

impl<'a> Collector<'a> {
    /// `web_url` is the root used for repository links when the API omits
    /// `html_url`.
    pub fn new(client: &'a Client, config: &'a CollectConfig, web_url: &'a str) -> Self {
        Self {
            client,
            config,
            web_url,
        }
    }

    /// One row per deployment, unreduced, repositories in full-name order
    pub async fn collect(&self) -> Result<Vec<DeploymentRow>> {
        let options = ListReposOptions {
            affiliation: vec![
                Affiliation::Owner,
                Affiliation::OrganizationMember,
                Affiliation::Collaborator,
            ],
            sort: Some(RepoSort::FullName),
        };

        let repos: Vec<Repository> = self
            .client
            .repos()
            .list_for_authenticated_user(&options)
            .try_collect()
            .await?;
        info!("found {} repositories", repos.len());

        let mut rows = Vec::new();
        for repo in &repos {
            let before = rows.len();
            self.collect_repo(repo, &mut rows).await?;
            debug!("{}: {} deployments", repo.full_name, rows.len() - before);
        }

        Ok(rows)
    }

    async fn collect_repo(&self, repo: &Repository, rows: &mut Vec<DeploymentRow>) -> Result<()> {
        let repo_url = repo.web_url(self.web_url);
        let repos = self.client.repos();

        let deployments = repos.list_deployments(&repo.full_name);
        let mut deployments = match self.config.deployment_cap {
            Some(cap) => deployments.take(cap).boxed(),
            None => deployments,
        };

        while let Some(deployment) = deployments.try_next().await? {
            let status = self.latest_status(repo, &deployment).await?;
            rows.push(DeploymentRow::new(
                repo,
                &repo_url,
                &deployment,
                status.as_ref(),
                self.config.track_url_provenance,
            ));
        }

        Ok(())
    }

    async fn latest_status(
        &self,
        repo: &Repository,
        deployment: &Deployment,
    ) -> Result<Option<DeploymentStatus>> {
        let repos = self.client.repos();
        let status = match self.config.status_lookup {
            StatusLookup::Latest => {
                repos
                    .latest_deployment_status(&repo.full_name, deployment.id)
                    .await?
            }
            StatusLookup::FullHistory => {
                let statuses: Vec<DeploymentStatus> = repos
                    .list_deployment_statuses(&repo.full_name, deployment.id)
                    .try_collect()
                    .await?;
                statuses.into_iter().next()
            }
        };
        Ok(status)
    }
}
