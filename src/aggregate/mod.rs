//! Concurrent fan-out of issue fetches across a team's repositories.
//!
//! One Tokio task is spawned per repository; a semaphore bounds how many are
//! fetching at once. Each task filters its own issues down to pull requests
//! and returns them, so no collection is shared between tasks. Once every
//! task has finished, the outcomes are merged on the calling task into an
//! [`AggregationResult`]. Tasks live only as long as the call that spawned
//! them: dropping the future aborts whatever is still running.

mod result;

pub use result::{AggregationResult, FetchReport, PerRepositoryOutcome, PullRequestKey};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::{AbortHandle, JoinHandle};

use crate::github::error::DigestError;
use crate::github::gateway::IssueGateway;
use crate::github::intake::RepoIssueFetcher;
use crate::github::models::{Issue, Repository};
use crate::github::rate_limit::RetryPolicy;

/// Default number of repositories fetched at once.
pub const DEFAULT_CONCURRENCY: usize = 8;

type UnitHandle = JoinHandle<Result<Vec<Issue>, DigestError>>;

/// Spawned fetches in input order, aborted when dropped.
struct Units(Vec<(Repository, UnitHandle)>);

impl Units {
    fn abort_handles(&self) -> Vec<AbortHandle> {
        self.0
            .iter()
            .map(|(_, handle)| handle.abort_handle())
            .collect()
    }
}

impl Drop for Units {
    fn drop(&mut self) {
        for (_, handle) in &self.0 {
            handle.abort();
        }
    }
}

/// Fetches pull requests from many repositories concurrently.
pub struct ConcurrentAggregator<Gateway>
where
    Gateway: IssueGateway + ?Sized + 'static,
{
    fetcher: RepoIssueFetcher<Gateway>,
    concurrency: usize,
    unit_timeout: Option<Duration>,
}

impl<Gateway> ConcurrentAggregator<Gateway>
where
    Gateway: IssueGateway + ?Sized + 'static,
{
    /// Creates an aggregator over the shared gateway.
    #[must_use]
    pub const fn new(gateway: Arc<Gateway>, retry: RetryPolicy) -> Self {
        Self {
            fetcher: RepoIssueFetcher::new(gateway, retry),
            concurrency: DEFAULT_CONCURRENCY,
            unit_timeout: None,
        }
    }

    /// Sets the number of repositories fetched at once. Zero is treated as
    /// one.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Bounds how long a single repository may take before it is reported
    /// as failed.
    #[must_use]
    pub const fn with_unit_timeout(mut self, unit_timeout: Option<Duration>) -> Self {
        self.unit_timeout = unit_timeout;
        self
    }

    /// Fetches every repository and merges their pull requests.
    ///
    /// A repository that fails becomes a [`PerRepositoryOutcome::Failed`]
    /// entry; its siblings are unaffected. Outcomes follow input order.
    pub async fn fetch_all(&self, repositories: Vec<Repository>) -> FetchReport {
        let units = self.spawn_units(repositories);
        collect_outcomes(units).await
    }

    /// Like [`Self::fetch_all`], but gives up when `cancel` completes first.
    ///
    /// # Errors
    ///
    /// Returns `DigestError::Cancelled` when `cancel` resolves before every
    /// repository finished. All units still in flight are aborted.
    pub async fn fetch_all_until<Cancel>(
        &self,
        repositories: Vec<Repository>,
        cancel: Cancel,
    ) -> Result<FetchReport, DigestError>
    where
        Cancel: Future<Output = ()>,
    {
        let total = repositories.len();
        let units = self.spawn_units(repositories);
        let aborts = units.abort_handles();
        // Counted before the select drops the units, which aborts them.
        let cancelled = async {
            cancel.await;
            aborts.iter().filter(|abort| !abort.is_finished()).count()
        };

        tokio::select! {
            report = collect_outcomes(units) => Ok(report),
            in_flight = cancelled => {
                tracing::warn!(total, in_flight, "aggregation cancelled");
                Err(DigestError::Cancelled {
                    message: format!("{in_flight} of {total} repositories were still being fetched"),
                })
            }
        }
    }

    /// Like [`Self::fetch_all`], bounded by an overall deadline.
    ///
    /// # Errors
    ///
    /// Returns `DigestError::Cancelled` when the deadline passes first.
    pub async fn fetch_all_with_timeout(
        &self,
        repositories: Vec<Repository>,
        timeout: Duration,
    ) -> Result<FetchReport, DigestError> {
        self.fetch_all_until(repositories, tokio::time::sleep(timeout))
            .await
    }

    fn spawn_units(&self, repositories: Vec<Repository>) -> Units {
        let gate = Arc::new(Semaphore::new(self.concurrency));
        tracing::info!(
            repositories = repositories.len(),
            concurrency = self.concurrency,
            "fetching open pull requests"
        );

        let units = repositories
            .into_iter()
            .map(|repository| {
                let fetcher = self.fetcher.clone();
                let permits = Arc::clone(&gate);
                let unit_timeout = self.unit_timeout;
                let target = repository.clone();
                let handle = tokio::spawn(async move {
                    let _permit =
                        permits
                            .acquire_owned()
                            .await
                            .map_err(|error| DigestError::Cancelled {
                                message: format!("concurrency gate closed: {error}"),
                            })?;
                    fetch_unit(&fetcher, &target, unit_timeout).await
                });
                (repository, handle)
            })
            .collect();
        Units(units)
    }
}

async fn fetch_unit<Gateway>(
    fetcher: &RepoIssueFetcher<Gateway>,
    repository: &Repository,
    unit_timeout: Option<Duration>,
) -> Result<Vec<Issue>, DigestError>
where
    Gateway: IssueGateway + ?Sized,
{
    let fetch = fetcher.fetch(repository);
    let issues = match unit_timeout {
        Some(limit) => tokio::time::timeout(limit, fetch).await.map_err(|_| {
            DigestError::RemoteUnavailable {
                message: format!(
                    "fetching {name} timed out after {limit:?}",
                    name = repository.name
                ),
            }
        })??,
        None => fetch.await?,
    };

    let reference = repository.reference();
    let pull_requests: Vec<Issue> = issues
        .into_iter()
        .filter(Issue::is_pull_request)
        .map(|issue| issue.with_repository(reference.clone()))
        .collect();
    tracing::debug!(
        repository = %repository.name,
        pull_requests = pull_requests.len(),
        "fetched repository"
    );
    Ok(pull_requests)
}

async fn collect_outcomes(mut units: Units) -> FetchReport {
    let mut outcomes = Vec::with_capacity(units.0.len());
    for (target, handle) in &mut units.0 {
        let repository = target.clone();
        let outcome = match handle.await {
            Ok(Ok(pull_requests)) => PerRepositoryOutcome::Fetched {
                repository,
                pull_requests,
            },
            Ok(Err(error)) => {
                tracing::warn!(repository = %repository.name, %error, "skipping repository");
                PerRepositoryOutcome::Failed { repository, error }
            }
            Err(join_error) => {
                tracing::warn!(repository = %repository.name, %join_error, "fetch task did not complete");
                PerRepositoryOutcome::Failed {
                    error: DigestError::RemoteUnavailable {
                        message: format!("fetch task for {} ended abnormally: {join_error}", repository.name),
                    },
                    repository,
                }
            }
        };
        outcomes.push(outcome);
    }
    FetchReport::from_outcomes(outcomes)
}
