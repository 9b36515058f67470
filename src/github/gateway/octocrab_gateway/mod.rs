//! Octocrab implementation of the repository and issue gateways.

use async_trait::async_trait;
use octocrab::Octocrab;
use url::Url;

use crate::github::error::DigestError;
use crate::github::locator::{
    OrganizationName, PersonalAccessToken, TeamId, issues_path, repository_path,
};
use crate::github::models::{ApiIssue, ApiRepository, Issue, Repository};

use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error_with_rate_limit;
use super::paging::{PER_PAGE, collect_all_pages};
use super::{IssueGateway, RepositoryGateway};

/// Octocrab-backed gateway for team repositories and their issues.
pub struct OctocrabGateway {
    client: Octocrab,
}

impl OctocrabGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token and API base URL.
    ///
    /// # Errors
    ///
    /// Returns `DigestError::InvalidConfiguration` when the base URI cannot
    /// be used, or `DigestError::RemoteUnavailable` when Octocrab fails to
    /// construct a client.
    pub fn for_token(token: &PersonalAccessToken, api_base: &Url) -> Result<Self, DigestError> {
        let octocrab = build_octocrab_client(token, api_base)?;
        Ok(Self::new(octocrab))
    }
}

#[async_trait]
impl RepositoryGateway for OctocrabGateway {
    async fn list_team_repositories(
        &self,
        organization: &OrganizationName,
        team: &TeamId,
    ) -> Result<Vec<Repository>, DigestError> {
        let route = team.repositories_path(organization);
        let query = [("per_page", PER_PAGE)];
        let repositories: Vec<ApiRepository> =
            collect_all_pages(&self.client, "team repositories", &route, &query)
                .await
                .map_err(|error| match error {
                    DigestError::NotFound { .. } => DigestError::NotFound {
                        message: format!(
                            "team {team} not found in {org}",
                            org = organization.as_str()
                        ),
                    },
                    other => other,
                })?;

        Ok(repositories
            .into_iter()
            .map(|api| {
                let mut repository = Repository::from(api);
                if repository.organization.is_empty() {
                    organization.as_str().clone_into(&mut repository.organization);
                }
                repository
            })
            .collect())
    }

    async fn repository(
        &self,
        organization: &OrganizationName,
        name: &str,
    ) -> Result<Repository, DigestError> {
        let route = repository_path(organization, name);
        match self
            .client
            .get::<ApiRepository, _, _>(route, None::<&()>)
            .await
        {
            Ok(api) => Ok(api.into()),
            Err(error) => {
                Err(map_octocrab_error_with_rate_limit(&self.client, "repository", &error).await)
            }
        }
    }
}

#[async_trait]
impl IssueGateway for OctocrabGateway {
    async fn list_issues(&self, repository: &Repository) -> Result<Vec<Issue>, DigestError> {
        let route = issues_path(repository.id);
        let query = [("state", "open"), ("per_page", PER_PAGE)];
        let operation = format!("issues for {}", repository.name);
        let issues: Vec<ApiIssue> =
            collect_all_pages(&self.client, &operation, &route, &query).await?;

        Ok(issues.into_iter().map(Issue::from).collect())
    }
}
