//! Test helpers for constructing `Repository` and `Issue` fixtures.
//!
//! # Examples
//!
//! ```
//! use prdigest::github::models::test_support::{plain_issue, pull_request, repository};
//!
//! let repo = repository(1, "api");
//! let pr = pull_request(7, "2025-01-02T00:00:00Z");
//! let issue = plain_issue(8);
//!
//! assert_eq!(repo.organization, "octo");
//! assert!(pr.is_pull_request());
//! assert!(!issue.is_pull_request());
//! ```

use super::{Issue, PullRequestMarker, Repository};

/// Organization used by every fixture repository.
pub const FIXTURE_ORGANIZATION: &str = "octo";

/// Constructs a repository in the fixture organization.
#[must_use]
pub fn repository(id: u64, name: &str) -> Repository {
    Repository {
        id,
        name: name.to_owned(),
        organization: FIXTURE_ORGANIZATION.to_owned(),
        html_url: format!("https://github.com/{FIXTURE_ORGANIZATION}/{name}"),
    }
}

/// Constructs an open pull request updated at `updated_at`.
///
/// The title is "PR {number}", the author "alice", and the creation time
/// equals the update time.
#[must_use]
pub fn pull_request(number: u64, updated_at: &str) -> Issue {
    Issue {
        number,
        title: Some(format!("PR {number}")),
        author: Some("alice".to_owned()),
        created_at: Some(updated_at.to_owned()),
        updated_at: Some(updated_at.to_owned()),
        pull_request: Some(PullRequestMarker {
            html_url: format!("https://github.com/{FIXTURE_ORGANIZATION}/pull/{number}"),
        }),
        repository: None,
    }
}

/// Constructs an open issue without a pull request marker.
#[must_use]
pub fn plain_issue(number: u64) -> Issue {
    Issue {
        number,
        title: Some(format!("Issue {number}")),
        author: Some("bob".to_owned()),
        created_at: Some("2025-01-01T00:00:00Z".to_owned()),
        updated_at: Some("2025-01-01T00:00:00Z".to_owned()),
        ..Default::default()
    }
}
