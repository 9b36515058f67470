//! In-memory gateway answering from canned data, for tests.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::github::error::DigestError;
use crate::github::locator::{OrganizationName, TeamId};
use crate::github::models::{Issue, Repository};

use super::{IssueGateway, RepositoryGateway};

/// Gateway serving a fixed team listing and per-repository issues.
///
/// Repositories without registered issues answer with
/// `DigestError::NotFound`.
#[derive(Debug, Clone)]
pub struct InMemoryGateway {
    team: Result<Vec<Repository>, DigestError>,
    issues: HashMap<u64, Result<Vec<Issue>, DigestError>>,
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self {
            team: Ok(Vec::new()),
            issues: HashMap::new(),
        }
    }
}

impl InMemoryGateway {
    /// Creates a gateway whose team owns no repositories.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a repository to the team with the given open issues.
    #[must_use]
    pub fn with_repository(mut self, repository: Repository, issues: Vec<Issue>) -> Self {
        self.issues.insert(repository.id, Ok(issues));
        if let Ok(team) = &mut self.team {
            team.push(repository);
        }
        self
    }

    /// Adds a repository to the team whose issue listing fails.
    #[must_use]
    pub fn with_failing_repository(mut self, repository: Repository, error: DigestError) -> Self {
        self.issues.insert(repository.id, Err(error));
        if let Ok(team) = &mut self.team {
            team.push(repository);
        }
        self
    }

    /// Makes the team listing itself fail.
    #[must_use]
    pub fn with_team_error(mut self, error: DigestError) -> Self {
        self.team = Err(error);
        self
    }
}

#[async_trait]
impl RepositoryGateway for InMemoryGateway {
    async fn list_team_repositories(
        &self,
        _organization: &OrganizationName,
        _team: &TeamId,
    ) -> Result<Vec<Repository>, DigestError> {
        self.team.clone()
    }

    async fn repository(
        &self,
        organization: &OrganizationName,
        name: &str,
    ) -> Result<Repository, DigestError> {
        self.team
            .as_ref()
            .ok()
            .and_then(|team| team.iter().find(|repository| repository.name == name))
            .cloned()
            .ok_or_else(|| DigestError::NotFound {
                message: format!("repository {}/{name} not found", organization.as_str()),
            })
    }
}

#[async_trait]
impl IssueGateway for InMemoryGateway {
    async fn list_issues(&self, repository: &Repository) -> Result<Vec<Issue>, DigestError> {
        self.issues.get(&repository.id).cloned().unwrap_or_else(|| {
            Err(DigestError::NotFound {
                message: format!("repository {} not found", repository.name),
            })
        })
    }
}
