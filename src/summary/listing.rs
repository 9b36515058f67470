//! Per-repository listings: one repository, or every team repository
//! grouped under its own header.

use chrono::{DateTime, Utc};

use crate::aggregate::{FetchReport, PerRepositoryOutcome};
use crate::github::models::{Issue, Repository};

use super::age::relative_age_or_unknown;

/// Separator placed between repository blocks in the grouped listing.
pub const BLOCK_SEPARATOR: &str = "\n- - - - - - - - - -\n";

/// Renders `#{number} {title} - ({author} - {age})`, aged from creation.
#[must_use]
pub fn pull_request_entry(issue: &Issue, now: DateTime<Utc>) -> String {
    format!(
        "#{number} {title} - ({author} - {age})",
        number = issue.number,
        title = issue.title.as_deref().unwrap_or_default(),
        author = issue.author.as_deref().unwrap_or("unknown author"),
        age = relative_age_or_unknown(issue.created_at.as_deref(), now),
    )
}

fn block(header: String, pull_requests: &[Issue], now: DateTime<Utc>) -> String {
    std::iter::once(header)
        .chain(
            pull_requests
                .iter()
                .map(|issue| pull_request_entry(issue, now)),
        )
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lists the open pull requests of a single repository under an
/// `{organization}/{name} - {url}` header.
///
/// Returns `No pull requests found for {name}` when there are none.
#[must_use]
pub fn repository_listing(
    repository: &Repository,
    pull_requests: &[Issue],
    now: DateTime<Utc>,
) -> String {
    if pull_requests.is_empty() {
        return format!("No pull requests found for {}", repository.name);
    }
    let header = format!(
        "{}/{} - {}",
        repository.organization, repository.name, repository.html_url
    );
    block(header, pull_requests, now)
}

/// Lists every fetched repository that has open pull requests, one block
/// per repository, in the order the repositories were listed.
///
/// Repositories without pull requests and repositories that failed are
/// left out.
#[must_use]
pub fn grouped_listing(report: &FetchReport, now: DateTime<Utc>) -> String {
    report
        .outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            PerRepositoryOutcome::Fetched {
                repository,
                pull_requests,
            } if !pull_requests.is_empty() => Some(block(
                format!("{} - {}", repository.name, repository.html_url),
                pull_requests,
                now,
            )),
            PerRepositoryOutcome::Fetched { .. } | PerRepositoryOutcome::Failed { .. } => None,
        })
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}
