//! Merged pull request collection and per-repository outcomes.

use std::collections::{BTreeMap, BTreeSet};

use crate::github::error::{DigestError, ErrorKind};
use crate::github::models::{Issue, Repository};

/// Key identifying a pull request across repositories: repository id, then
/// issue number.
pub type PullRequestKey = (u64, u64);

/// Deduplicated set of pull requests gathered from every repository.
///
/// Every entry carries a pull request marker and its owning repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationResult {
    entries: BTreeMap<PullRequestKey, Issue>,
}

impl AggregationResult {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a pull request, returning `true` when it was added.
    ///
    /// Issues without a pull request marker or without an owning repository
    /// are rejected, as is a second entry for an existing key.
    pub fn insert(&mut self, issue: Issue) -> bool {
        if !issue.is_pull_request() {
            return false;
        }
        let Some(repository_id) = issue.repository.as_ref().map(|repository| repository.id) else {
            return false;
        };
        let key = (repository_id, issue.number);
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, issue);
        true
    }

    /// Number of pull requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no pull request was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the pull requests in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.entries.values()
    }

    /// The set of keys present.
    #[must_use]
    pub fn keys(&self) -> BTreeSet<PullRequestKey> {
        self.entries.keys().copied().collect()
    }

    /// Consumes the collection, yielding the pull requests in key order.
    #[must_use]
    pub fn into_issues(self) -> Vec<Issue> {
        self.entries.into_values().collect()
    }
}

impl FromIterator<Issue> for AggregationResult {
    fn from_iter<I: IntoIterator<Item = Issue>>(iter: I) -> Self {
        let mut result = Self::new();
        for issue in iter {
            result.insert(issue);
        }
        result
    }
}

/// Result of fetching one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PerRepositoryOutcome {
    /// Issues were fetched; holds the pull requests only.
    Fetched {
        /// Repository that was fetched.
        repository: Repository,
        /// Pull requests found in the repository.
        pull_requests: Vec<Issue>,
    },
    /// The repository could not be fetched.
    Failed {
        /// Repository that failed.
        repository: Repository,
        /// Why it failed.
        error: DigestError,
    },
}

impl PerRepositoryOutcome {
    /// Repository this outcome belongs to.
    #[must_use]
    pub const fn repository(&self) -> &Repository {
        match self {
            Self::Fetched { repository, .. } | Self::Failed { repository, .. } => repository,
        }
    }

    /// Failure classification, if the fetch failed.
    #[must_use]
    pub const fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Fetched { .. } => None,
            Self::Failed { error, .. } => Some(error.kind()),
        }
    }

    /// Number of pull requests fetched; zero for failures.
    #[must_use]
    pub fn pull_request_count(&self) -> usize {
        match self {
            Self::Fetched { pull_requests, .. } => pull_requests.len(),
            Self::Failed { .. } => 0,
        }
    }
}

/// Everything a `fetch_all` call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    /// Merged, deduplicated pull requests.
    pub result: AggregationResult,
    /// One outcome per input repository, in input order.
    pub outcomes: Vec<PerRepositoryOutcome>,
}

impl FetchReport {
    /// Builds the report, merging fetched pull requests single-threaded.
    #[must_use]
    pub fn from_outcomes(outcomes: Vec<PerRepositoryOutcome>) -> Self {
        let result = outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                PerRepositoryOutcome::Fetched { pull_requests, .. } => Some(pull_requests),
                PerRepositoryOutcome::Failed { .. } => None,
            })
            .flatten()
            .cloned()
            .collect();
        Self { result, outcomes }
    }

    /// Outcomes of repositories that could not be fetched.
    pub fn failures(&self) -> impl Iterator<Item = &PerRepositoryOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.error_kind().is_some())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{AggregationResult, FetchReport, PerRepositoryOutcome};
    use crate::github::error::{DigestError, ErrorKind};
    use crate::github::models::test_support::{plain_issue, pull_request, repository};

    #[rstest]
    fn insert_rejects_plain_issues() {
        let mut result = AggregationResult::new();
        let issue = plain_issue(1).with_repository(repository(1, "api").reference());

        assert!(!result.insert(issue));
        assert!(result.is_empty());
    }

    #[rstest]
    fn insert_rejects_unstamped_pull_requests() {
        let mut result = AggregationResult::new();

        assert!(!result.insert(pull_request(1, "2025-01-01T00:00:00Z")));
        assert!(result.is_empty());
    }

    #[rstest]
    fn insert_keeps_first_entry_per_key() {
        let api = repository(1, "api").reference();
        let web = repository(2, "web").reference();
        let mut result = AggregationResult::new();

        assert!(result.insert(pull_request(5, "2025-01-01T00:00:00Z").with_repository(api.clone())));
        assert!(!result.insert(pull_request(5, "2025-02-01T00:00:00Z").with_repository(api)));
        assert!(result.insert(pull_request(5, "2025-01-01T00:00:00Z").with_repository(web)));

        assert_eq!(result.len(), 2);
        assert_eq!(result.keys().into_iter().collect::<Vec<_>>(), [(1, 5), (2, 5)]);
        let first = result.iter().next().expect("entry should exist");
        assert_eq!(first.updated_at.as_deref(), Some("2025-01-01T00:00:00Z"));
    }

    #[rstest]
    fn report_merges_only_fetched_outcomes() {
        let api = repository(1, "api");
        let infra = repository(3, "infra");
        let outcomes = vec![
            PerRepositoryOutcome::Fetched {
                pull_requests: vec![
                    pull_request(1, "2025-01-01T00:00:00Z").with_repository(api.reference()),
                ],
                repository: api,
            },
            PerRepositoryOutcome::Failed {
                repository: infra,
                error: DigestError::RemoteUnavailable {
                    message: "boom".to_owned(),
                },
            },
        ];

        let report = FetchReport::from_outcomes(outcomes);

        assert_eq!(report.result.len(), 1);
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(
            failures.first().and_then(|outcome| outcome.error_kind()),
            Some(ErrorKind::RemoteUnavailable)
        );
    }
}
