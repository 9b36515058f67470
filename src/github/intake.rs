//! High-level intake facades wrapping the gateways with retry handling.

use std::sync::Arc;

use super::error::DigestError;
use super::gateway::{IssueGateway, RepositoryGateway};
use super::locator::{OrganizationName, TeamId};
use super::models::{Issue, Repository};
use super::rate_limit::{RetryPolicy, with_retry};

/// Lists the repositories owned by a team.
pub struct TeamRepositoryLister<'client, Gateway>
where
    Gateway: RepositoryGateway,
{
    client: &'client Gateway,
    retry: RetryPolicy,
}

impl<'client, Gateway> TeamRepositoryLister<'client, Gateway>
where
    Gateway: RepositoryGateway,
{
    /// Create a new lister using the provided gateway.
    #[must_use]
    pub const fn new(client: &'client Gateway, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// List every repository of the team.
    ///
    /// # Errors
    ///
    /// Returns `DigestError::NotFound` when the team does not exist,
    /// `DigestError::RateLimited` once retries are exhausted, and
    /// `DigestError::RemoteUnavailable` for transport failures.
    pub async fn list(
        &self,
        organization: &OrganizationName,
        team: &TeamId,
    ) -> Result<Vec<Repository>, DigestError> {
        let repositories = with_retry(&self.retry, "list team repositories", || {
            self.client.list_team_repositories(organization, team)
        })
        .await?;
        tracing::debug!(
            team = %team,
            count = repositories.len(),
            "listed team repositories"
        );
        Ok(repositories)
    }

    /// Look up a single repository of the organization.
    ///
    /// # Errors
    ///
    /// Returns `DigestError::NotFound` when the repository does not exist,
    /// otherwise the same failures as [`Self::list`].
    pub async fn find(
        &self,
        organization: &OrganizationName,
        name: &str,
    ) -> Result<Repository, DigestError> {
        with_retry(&self.retry, "repository lookup", || {
            self.client.repository(organization, name)
        })
        .await
    }
}

/// Fetches the complete open issue list of one repository.
///
/// The fetcher is cheap to clone so that every concurrent unit can own one.
pub struct RepoIssueFetcher<Gateway>
where
    Gateway: IssueGateway + ?Sized,
{
    client: Arc<Gateway>,
    retry: RetryPolicy,
}

impl<Gateway> Clone for RepoIssueFetcher<Gateway>
where
    Gateway: IssueGateway + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            retry: self.retry,
        }
    }
}

impl<Gateway> RepoIssueFetcher<Gateway>
where
    Gateway: IssueGateway + ?Sized,
{
    /// Create a new fetcher using the shared gateway.
    #[must_use]
    pub const fn new(client: Arc<Gateway>, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Fetch every open issue of the repository. Plain issues are kept.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures after rate-limit retries are exhausted.
    pub async fn fetch(&self, repository: &Repository) -> Result<Vec<Issue>, DigestError> {
        with_retry(&self.retry, "list issues", || {
            self.client.list_issues(repository)
        })
        .await
    }
}
