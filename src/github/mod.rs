//! GitHub team repository and issue intake.
//!
//! This module wraps Octocrab to list the repositories of a team and the open
//! issues of each repository, following pagination to completion. Errors are
//! mapped into [`DigestError`] variants so that callers can classify failures
//! without exposing Octocrab internals.

pub mod error;
pub mod gateway;
pub mod intake;
pub mod locator;
pub mod models;
pub mod rate_limit;

pub use error::{DigestError, ErrorKind};
pub use gateway::{IssueGateway, OctocrabGateway, RepositoryGateway};
pub use intake::{RepoIssueFetcher, TeamRepositoryLister};
pub use locator::{OrganizationName, PersonalAccessToken, TeamId, resolve_api_base};
pub use models::{Issue, PullRequestMarker, Repository, RepositoryRef};
pub use rate_limit::{RateLimitInfo, RetryPolicy};

#[cfg(test)]
pub use gateway::{MockIssueGateway, MockRepositoryGateway};
