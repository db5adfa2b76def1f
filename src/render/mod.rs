//! Markdown and HTML reports over a reduced row set.
//!
//! Both documents are Liquid templates compiled into the binary and fed the
//! same per-row view, so the two always list the same rows in the same order.

use crate::{
    config::StatusEmoji,
    row::{DeploymentRow, UrlSource, NOT_AVAILABLE},
    Result,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;

pub mod html;
pub mod markdown;

/// Everything the renderers need besides the rows themselves
#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    pub status_emoji: StatusEmoji,
    /// Render a second link column for the details URL and label both links
    /// by where they came from
    pub track_url_provenance: bool,
}

/// Format an ISO-8601 timestamp as `YYYY-MM-DD HH:MM UTC`.
///
/// Empty input gives `N/A`. A timestamp without an offset is read as UTC and
/// a bare date as midnight UTC.
/// Anything unparseable is returned unchanged.
pub fn format_timestamp(value: &str) -> String {
    if value.is_empty() {
        return NOT_AVAILABLE.to_owned();
    }

    let parsed = DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| value.parse::<NaiveDateTime>().ok())
        .or_else(|| {
            value
                .parse::<NaiveDate>()
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        });

    match parsed {
        Some(naive) => Utc
            .from_utc_datetime(&naive)
            .format("%Y-%m-%d %H:%M UTC")
            .to_string(),
        None => value.to_owned(),
    }
}

#[derive(Debug, Serialize)]
struct LinkView {
    url: String,
    /// Markdown link text
    label: &'static str,
    /// HTML call to action
    action: &'static str,
}

#[derive(Debug, Serialize)]
struct RowView {
    full_repo: String,
    repo_url: String,
    environment: String,
    status: String,
    status_class: String,
    emoji: String,
    git_ref: String,
    sha: String,
    created: String,
    description: Option<String>,
    dashboard: Option<LinkView>,
    details: Option<LinkView>,
}

impl RowView {
    fn new(row: &DeploymentRow, options: &RenderOptions) -> Self {
        let dashboard = non_empty(&row.dashboard_url).map(|url| {
            let (label, action) = if !options.track_url_provenance {
                ("link", "Open link")
            } else {
                match row.dashboard_source {
                    Some(UrlSource::Deployment) => ("deployment", "Open deployment"),
                    Some(UrlSource::Repository) => ("repository", "Open repository"),
                    None => ("link", "Open link"),
                }
            };
            LinkView { url, label, action }
        });

        let details = if options.track_url_provenance {
            row.details_url.as_deref().and_then(non_empty).map(|url| {
                let (label, action) = match row.details_source {
                    Some(UrlSource::Deployment) => ("logs", "View logs"),
                    _ => ("repository", "View repository"),
                };
                LinkView { url, label, action }
            })
        } else {
            None
        };

        Self {
            full_repo: row.full_repo.clone(),
            repo_url: row.repo_url.clone(),
            environment: row.environment.clone(),
            status: row.status.clone(),
            status_class: row.status.replace('_', "-"),
            emoji: options.status_emoji.get(&row.status).to_owned(),
            git_ref: row.git_ref.clone(),
            sha: non_empty(&row.sha).unwrap_or_else(|| NOT_AVAILABLE.to_owned()),
            created: format_timestamp(&row.created_at),
            description: non_empty(&row.status_description),
            dashboard,
            details,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

fn render_template(
    template: &str,
    rows: &[DeploymentRow],
    generated_at: &str,
    options: &RenderOptions,
) -> Result<String> {
    let views = rows
        .iter()
        .map(|row| RowView::new(row, options))
        .collect::<Vec<_>>();
    let has_rows = !views.is_empty();
    let provenance = options.track_url_provenance;

    let globals = liquid::object!({
        "generated_at": generated_at,
        "has_rows": has_rows,
        "provenance": provenance,
        "rows": views,
    });

    let template = liquid::ParserBuilder::with_stdlib()
        .build()?
        .parse(template)?;
    Ok(template.render(&globals)?)
}

#[cfg(test)]
pub(crate) mod test {
    use super::format_timestamp;
    use crate::row::{DeploymentRow, UrlSource};

    pub(crate) fn row(full_repo: &str, environment: &str, status: &str) -> DeploymentRow {
        DeploymentRow {
            repo: full_repo.split('/').last().unwrap_or(full_repo).to_owned(),
            full_repo: full_repo.to_owned(),
            repo_url: format!("https://github.com/{}", full_repo),
            environment: environment.to_owned(),
            git_ref: "main".to_owned(),
            sha: "abcdef1".to_owned(),
            created_at: "2024-01-01T00:00:00Z".to_owned(),
            status: status.to_owned(),
            status_description: String::new(),
            dashboard_url: "https://api.acme.dev".to_owned(),
            dashboard_source: Some(UrlSource::Deployment),
            details_url: Some(format!("https://github.com/{}", full_repo)),
            details_source: Some(UrlSource::Repository),
        }
    }

    #[test]
    fn timestamps() {
        assert_eq!(format_timestamp("2024-01-01T00:00:00Z"), "2024-01-01 00:00 UTC");
        assert_eq!(
            format_timestamp("2024-01-01T05:30:59+05:30"),
            "2024-01-01 00:00 UTC"
        );
        assert_eq!(
            format_timestamp("2023-12-31T22:15:00.123-03:00"),
            "2024-01-01 01:15 UTC"
        );
        assert_eq!(format_timestamp("2024-06-01T12:30:00"), "2024-06-01 12:30 UTC");
        assert_eq!(format_timestamp("2024-01-01"), "2024-01-01 00:00 UTC");
        assert_eq!(format_timestamp(""), "N/A");
        assert_eq!(format_timestamp("yesterday-ish"), "yesterday-ish");
    }
}
