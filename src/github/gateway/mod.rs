//! Gateways for listing team repositories and their issues through Octocrab.
//!
//! This module provides trait-based gateways for communicating with the GitHub
//! API. The trait-based design enables mocking in tests while the Octocrab
//! implementation handles real HTTP requests and pagination.

mod client;
mod error_mapping;
#[cfg(any(test, feature = "test-support"))]
mod in_memory;
mod octocrab_gateway;
mod paging;

#[cfg(any(test, feature = "test-support"))]
pub use in_memory::InMemoryGateway;
pub use octocrab_gateway::OctocrabGateway;

use async_trait::async_trait;

use crate::github::error::DigestError;
use crate::github::locator::{OrganizationName, TeamId};
use crate::github::models::{Issue, Repository};

/// Gateway for repository-level lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryGateway: Send + Sync {
    /// List every repository the team can access, following pagination to
    /// completion.
    async fn list_team_repositories(
        &self,
        organization: &OrganizationName,
        team: &TeamId,
    ) -> Result<Vec<Repository>, DigestError>;

    /// Look up a single repository in the organization.
    async fn repository(
        &self,
        organization: &OrganizationName,
        name: &str,
    ) -> Result<Repository, DigestError>;
}

/// Gateway for issue listing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueGateway: Send + Sync {
    /// List every open issue of the repository, pull requests included,
    /// following pagination to completion.
    async fn list_issues(&self, repository: &Repository) -> Result<Vec<Issue>, DigestError>;
}
