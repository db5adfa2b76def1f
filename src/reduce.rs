use crate::row::DeploymentRow;
use serde::Deserialize;
use std::collections::HashMap;

/// Status tokens that mean a deployment is still under way
pub const ACTIVE_STATES: &[&str] = &["in_progress", "queued", "pending", "waiting"];

/// How the per-deployment rows are boiled down before rendering
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReductionPolicy {
    /// One row per case-insensitive (repository, environment): the one with
    /// the greatest `created_at`, the later row winning ties.
    KeepLatestPerKey,
    /// Every row whose status is in [`ACTIVE_STATES`], no deduplication.
    FilterActiveOnly,
}

impl Default for ReductionPolicy {
    fn default() -> Self {
        ReductionPolicy::KeepLatestPerKey
    }
}

impl ReductionPolicy {
    /// Apply the policy, then [`sort_rows`].
    pub fn apply(self, rows: Vec<DeploymentRow>) -> Vec<DeploymentRow> {
        let mut rows = match self {
            ReductionPolicy::KeepLatestPerKey => keep_latest_per_key(rows),
            ReductionPolicy::FilterActiveOnly => filter_active(rows),
        };
        sort_rows(&mut rows);
        rows
    }
}

fn keep_latest_per_key(rows: Vec<DeploymentRow>) -> Vec<DeploymentRow> {
    let mut latest: HashMap<(String, String), DeploymentRow> = HashMap::new();

    for row in rows {
        let key = row.key();
        match latest.get(&key) {
            Some(previous) if row.created_at < previous.created_at => {}
            _ => {
                latest.insert(key, row);
            }
        }
    }

    latest.into_iter().map(|(_, row)| row).collect()
}

fn filter_active(rows: Vec<DeploymentRow>) -> Vec<DeploymentRow> {
    rows.into_iter()
        .filter(|row| ACTIVE_STATES.contains(&row.status.as_str()))
        .collect()
}

/// Order by lowercased repository, lowercased environment, then `created_at`
pub fn sort_rows(rows: &mut [DeploymentRow]) {
    rows.sort_by_cached_key(|row| {
        let (repo, environment) = row.key();
        (repo, environment, row.created_at.clone())
    });
}

#[cfg(test)]
mod test {
    use super::ReductionPolicy;
    use crate::row::DeploymentRow;

    fn row(full_repo: &str, environment: &str, created_at: &str, status: &str) -> DeploymentRow {
        DeploymentRow {
            repo: full_repo.split('/').last().unwrap_or(full_repo).to_owned(),
            full_repo: full_repo.to_owned(),
            repo_url: format!("https://github.com/{}", full_repo),
            environment: environment.to_owned(),
            git_ref: "main".to_owned(),
            sha: "abcdef1".to_owned(),
            created_at: created_at.to_owned(),
            status: status.to_owned(),
            status_description: String::new(),
            dashboard_url: format!("https://github.com/{}", full_repo),
            dashboard_source: None,
            details_url: None,
            details_source: None,
        }
    }

    #[test]
    fn keeps_latest_per_key() {
        let rows = vec![
            row("acme/api", "production", "2024-01-02T00:00:00Z", "success"),
            row("ACME/api", "Production", "2024-03-01T00:00:00Z", "failure"),
            row("acme/api", "production", "2024-02-01T00:00:00Z", "success"),
            row("acme/api", "staging", "2024-01-01T00:00:00Z", "success"),
        ];

        let reduced = ReductionPolicy::KeepLatestPerKey.apply(rows);

        assert_eq!(reduced.len(), 2);
        assert_eq!(reduced[0].full_repo, "ACME/api");
        assert_eq!(reduced[0].created_at, "2024-03-01T00:00:00Z");
        assert_eq!(reduced[1].environment, "staging");
    }

    #[test]
    fn ties_keep_last_seen() {
        let mut first = row("acme/api", "production", "2024-01-01T00:00:00Z", "success");
        first.sha = "1111111".to_owned();
        let mut second = first.clone();
        second.sha = "2222222".to_owned();

        let reduced = ReductionPolicy::KeepLatestPerKey.apply(vec![first, second]);

        assert_eq!(reduced.len(), 1);
        assert_eq!(reduced[0].sha, "2222222");
    }

    #[test]
    fn empty_created_at_loses() {
        let rows = vec![
            row("acme/api", "production", "2024-01-01T00:00:00Z", "success"),
            row("acme/api", "production", "", "unknown"),
        ];

        let reduced = ReductionPolicy::KeepLatestPerKey.apply(rows);
        assert_eq!(reduced[0].status, "success");
    }

    #[test]
    fn filters_active_without_dedup() {
        let rows = vec![
            row("acme/api", "production", "2024-01-01T00:00:00Z", "in_progress"),
            row("acme/api", "production", "2024-01-02T00:00:00Z", "queued"),
            row("acme/api", "production", "2024-01-03T00:00:00Z", "success"),
            row("acme/web", "preview", "2024-01-01T00:00:00Z", "waiting"),
            row("acme/web", "preview", "2024-01-01T00:00:00Z", "pending"),
            row("acme/web", "staging", "2024-01-01T00:00:00Z", "inactive"),
        ];

        let reduced = ReductionPolicy::FilterActiveOnly.apply(rows);

        let statuses: Vec<_> = reduced.iter().map(|r| r.status.as_str()).collect();
        assert_eq!(statuses, vec!["in_progress", "queued", "waiting", "pending"]);
    }

    #[test]
    fn output_is_sorted() {
        let rows = vec![
            row("zeta/app", "prod", "2024-01-01T00:00:00Z", "success"),
            row("Acme/web", "staging", "2024-01-01T00:00:00Z", "success"),
            row("acme/api", "Preview", "2024-01-01T00:00:00Z", "success"),
            row("acme/api", "production", "2023-01-01T00:00:00Z", "success"),
        ];

        for policy in &[ReductionPolicy::KeepLatestPerKey, ReductionPolicy::FilterActiveOnly] {
            let mut input = rows.clone();
            if *policy == ReductionPolicy::FilterActiveOnly {
                input.iter_mut().for_each(|r| r.status = "pending".to_owned());
            }

            let reduced = policy.apply(input);
            let keys: Vec<_> = reduced
                .iter()
                .map(|r| {
                    (
                        r.full_repo.to_lowercase(),
                        r.environment.to_lowercase(),
                        r.created_at.clone(),
                    )
                })
                .collect();
            let mut sorted = keys.clone();
            sorted.sort();
            assert_eq!(keys, sorted);
            assert_eq!(reduced[0].environment, "Preview");
            assert_eq!(reduced[3].full_repo, "zeta/app");
        }
    }
}
