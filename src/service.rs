use crate::{
    collector::Collector,
    render::{self, RenderOptions},
    row::DeploymentRow,
    writer, Config, Result,
};
use chrono::Utc;
use github::Client;
use log::info;

/// Reduced rows plus the three rendered artifacts
#[derive(Debug)]
pub struct Report {
    pub rows: Vec<DeploymentRow>,
    pub json: String,
    pub markdown: String,
    pub html: String,
}

impl Report {
    /// Collect, reduce and render. Nothing is written.
    pub async fn generate(client: &Client, config: &Config, generated_at: &str) -> Result<Self> {
        let rows = Collector::new(client, &config.collect, &config.github.web_url)
            .collect()
            .await?;
        let collected = rows.len();

        let rows = config.collect.reduction.apply(rows);
        info!(
            "{} deployments reduced to {} rows ({:?})",
            collected,
            rows.len(),
            config.collect.reduction
        );

        let options = RenderOptions {
            status_emoji: config.status_emoji.clone(),
            track_url_provenance: config.collect.track_url_provenance,
        };

        Ok(Self {
            json: writer::to_json(&rows)?,
            markdown: render::markdown::render(&rows, generated_at, &options)?,
            html: render::html::render(&rows, generated_at, &options)?,
            rows,
        })
    }
}

/// Run one dashboard update against the GitHub API and write the artifacts.
/// Returns the number of rows written.
pub async fn run_update(config: &Config, token: &str) -> Result<usize> {
    let client = Client::builder()
        .base_url(config.github.api_url.as_str())
        .user_agent(config.github.user_agent.as_str())
        .api_version(config.github.api_version.as_str())
        .timeout(config.github.timeout())
        .github_api_token(token)
        .build()?;

    let generated_at = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let report = Report::generate(&client, config, &generated_at).await?;
    writer::write_report(&config.output, &report)?;

    Ok(report.rows.len())
}
