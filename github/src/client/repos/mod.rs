use crate::{
    client::{Client, Pages, Query},
    Repository,
};

mod deployments;

/// `RepositoryClient` handles communication with the Repository related methods of the GitHub API.
///
/// GitHub API docs: https://docs.github.com/en/rest/repos
pub struct RepositoryClient<'a> {
    inner: &'a Client,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Affiliation {
    /// Repositories owned by the authenticated user
    Owner,
    /// Repositories the user has been added to as a collaborator
    Collaborator,
    /// Repositories the user can access through organization membership
    OrganizationMember,
}

impl Affiliation {
    fn as_str(self) -> &'static str {
        match self {
            Affiliation::Owner => "owner",
            Affiliation::Collaborator => "collaborator",
            Affiliation::OrganizationMember => "organization_member",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepoSort {
    Created,
    Updated,
    Pushed,
    FullName,
}

impl RepoSort {
    fn as_str(self) -> &'static str {
        match self {
            RepoSort::Created => "created",
            RepoSort::Updated => "updated",
            RepoSort::Pushed => "pushed",
            RepoSort::FullName => "full_name",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ListReposOptions {
    /// Comma separated on the wire. Empty leaves the GitHub default
    /// (all three affiliations).
    pub affiliation: Vec<Affiliation>,

    /// What to sort results by. Default: full_name
    pub sort: Option<RepoSort>,
}

impl ListReposOptions {
    fn to_query(&self) -> Query {
        let mut query = Query::new();
        if !self.affiliation.is_empty() {
            let affiliation = self
                .affiliation
                .iter()
                .map(|a| a.as_str())
                .collect::<Vec<_>>()
                .join(",");
            query.push(("affiliation".to_owned(), affiliation));
        }
        if let Some(sort) = self.sort {
            query.push(("sort".to_owned(), sort.as_str().to_owned()));
        }
        query
    }
}

impl<'a> RepositoryClient<'a> {
    pub(super) fn new(client: &'a Client) -> Self {
        Self { inner: client }
    }

    /// List repositories for the authenticated user
    ///
    /// GitHub API docs: https://docs.github.com/en/rest/repos/repos#list-repositories-for-the-authenticated-user
    pub fn list_for_authenticated_user(
        &self,
        options: &ListReposOptions,
    ) -> Pages<'a, Repository> {
        self.inner
            .paginate("user/repos".to_owned(), options.to_query())
    }
}

#[cfg(test)]
mod test {
    use super::{Affiliation, ListReposOptions, RepoSort};

    #[test]
    fn list_repos_query() {
        let options = ListReposOptions {
            affiliation: vec![
                Affiliation::Owner,
                Affiliation::OrganizationMember,
                Affiliation::Collaborator,
            ],
            sort: Some(RepoSort::FullName),
        };

        assert_eq!(
            options.to_query(),
            vec![
                (
                    "affiliation".to_owned(),
                    "owner,organization_member,collaborator".to_owned()
                ),
                ("sort".to_owned(), "full_name".to_owned()),
            ]
        );
        assert!(ListReposOptions::default().to_query().is_empty());
    }
}
