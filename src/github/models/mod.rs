//! Data models for team repositories and their open issues.
//!
//! This module contains domain models for repository and issue data returned
//! by the GitHub API. Types prefixed with `Api` are internal deserialisation
//! targets that convert into public domain types.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::error::DigestError;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Repository owned by the team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Numeric repository identifier.
    pub id: u64,
    /// Repository name without the owner.
    pub name: String,
    /// Owning organization login.
    pub organization: String,
    /// Web URL of the repository.
    pub html_url: String,
}

impl Repository {
    /// Display back-reference stamped onto issues fetched from this
    /// repository.
    #[must_use]
    pub fn reference(&self) -> RepositoryRef {
        RepositoryRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Display-only reference from an issue to its owning repository.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RepositoryRef {
    /// Numeric repository identifier.
    pub id: u64,
    /// Repository name.
    pub name: String,
}

/// Marker present on issues that are pull requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestMarker {
    /// Web URL of the pull request.
    pub html_url: String,
}

/// Open issue as returned by the issues listing.
///
/// Timestamps are kept as received so that one garbled value only affects
/// the line that displays it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Issue {
    /// Issue number, unique within its repository.
    pub number: u64,
    /// Title of the issue.
    pub title: Option<String>,
    /// Author login if present.
    pub author: Option<String>,
    /// Creation timestamp (ISO 8601 format).
    pub created_at: Option<String>,
    /// Last update timestamp (ISO 8601 format).
    pub updated_at: Option<String>,
    /// Present when the issue is a pull request.
    pub pull_request: Option<PullRequestMarker>,
    /// Owning repository, stamped during aggregation.
    pub repository: Option<RepositoryRef>,
}

impl Issue {
    /// Returns true when the issue carries a pull request marker.
    #[must_use]
    pub const fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// Stamps the owning repository onto the issue.
    #[must_use]
    pub fn with_repository(mut self, repository: RepositoryRef) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Parsed last-update time.
    ///
    /// # Errors
    ///
    /// Returns `DigestError::MalformedRecord` when the timestamp is missing
    /// or is not RFC 3339.
    pub fn updated_at_time(&self) -> Result<DateTime<Utc>, DigestError> {
        parse_timestamp(self.updated_at.as_deref())
    }

    /// Parsed creation time.
    ///
    /// # Errors
    ///
    /// Returns `DigestError::MalformedRecord` when the timestamp is missing
    /// or is not RFC 3339.
    pub fn created_at_time(&self) -> Result<DateTime<Utc>, DigestError> {
        parse_timestamp(self.created_at.as_deref())
    }

    /// Pull request web URL, empty for plain issues.
    #[must_use]
    pub fn pull_request_url(&self) -> &str {
        self.pull_request
            .as_ref()
            .map_or("", |marker| marker.html_url.as_str())
    }
}

/// Parses an RFC 3339 timestamp into UTC.
///
/// # Errors
///
/// Returns `DigestError::MalformedRecord` when the value is absent or cannot
/// be parsed.
pub fn parse_timestamp(value: Option<&str>) -> Result<DateTime<Utc>, DigestError> {
    let raw = value.ok_or_else(|| DigestError::MalformedRecord {
        message: "timestamp is missing".to_owned(),
    })?;
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|error| DigestError::MalformedRecord {
            message: format!("invalid timestamp {raw:?}: {error}"),
        })
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiUser {
    pub(super) login: Option<String>,
}

/// API response type for team and single repository lookups.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRepository {
    pub(super) id: u64,
    pub(super) name: String,
    pub(super) html_url: Option<String>,
    pub(super) owner: Option<ApiUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequestLink {
    pub(super) html_url: Option<String>,
}

/// API response type for issue listing.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiIssue {
    pub(super) number: u64,
    pub(super) title: Option<String>,
    pub(super) user: Option<ApiUser>,
    pub(super) html_url: Option<String>,
    pub(super) created_at: Option<String>,
    pub(super) updated_at: Option<String>,
    pub(super) pull_request: Option<ApiPullRequestLink>,
}

impl From<ApiRepository> for Repository {
    fn from(value: ApiRepository) -> Self {
        Self {
            id: value.id,
            name: value.name,
            organization: value
                .owner
                .and_then(|owner| owner.login)
                .unwrap_or_default(),
            html_url: value.html_url.unwrap_or_default(),
        }
    }
}

impl From<ApiIssue> for Issue {
    fn from(value: ApiIssue) -> Self {
        let issue_url = value.html_url;
        let pull_request = value.pull_request.map(|link| PullRequestMarker {
            html_url: link.html_url.or(issue_url).unwrap_or_default(),
        });

        Self {
            number: value.number,
            title: value.title,
            author: value.user.and_then(|user| user.login),
            created_at: value.created_at,
            updated_at: value.updated_at,
            pull_request,
            repository: None,
        }
    }
}
