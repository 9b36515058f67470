//! Team digest orchestration.
//!
//! Wires the team lister, the concurrent aggregator, the summary formatter
//! and the persisted summary source into the three digest modes: the
//! flat team summary, the grouped team listing and the single repository
//! listing.

mod settings;

pub use settings::{AggregatorSettings, DigestOptions};

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::aggregate::{ConcurrentAggregator, FetchReport};
use crate::github::error::DigestError;
use crate::github::gateway::{IssueGateway, RepositoryGateway};
use crate::github::intake::{RepoIssueFetcher, TeamRepositoryLister};
use crate::github::models::{Issue, Repository};
use crate::store::{NoPersistedSummaries, PersistedSummarySource};
use crate::summary::{
    SummaryFormatter, compose_message, grouped_listing, repository_listing, skipped_trailer,
};

/// Produces digest messages for one team.
pub struct TeamDigest<Gateway>
where
    Gateway: RepositoryGateway + IssueGateway + 'static,
{
    gateway: Arc<Gateway>,
    settings: AggregatorSettings,
    options: DigestOptions,
    formatter: SummaryFormatter,
    summaries: Arc<dyn PersistedSummarySource>,
}

impl<Gateway> TeamDigest<Gateway>
where
    Gateway: RepositoryGateway + IssueGateway + 'static,
{
    /// Creates a digest with the default formatter and no persisted
    /// summaries.
    #[must_use]
    pub fn new(gateway: Arc<Gateway>, settings: AggregatorSettings, options: DigestOptions) -> Self {
        Self {
            gateway,
            settings,
            options,
            formatter: SummaryFormatter::new(),
            summaries: Arc::new(NoPersistedSummaries),
        }
    }

    /// Replaces the line formatter.
    #[must_use]
    pub fn with_formatter(mut self, formatter: SummaryFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Replaces the source of persisted summary lines.
    #[must_use]
    pub fn with_summaries(mut self, summaries: Box<dyn PersistedSummarySource>) -> Self {
        self.summaries = Arc::from(summaries);
        self
    }

    /// Lists the team's repositories and fetches their pull requests.
    ///
    /// # Errors
    ///
    /// Fails only when the team or its repository list cannot be
    /// established, or when the overall deadline passes.
    pub async fn fetch(&self) -> Result<FetchReport, DigestError> {
        let repositories = self.team_repositories().await?;
        self.fetch_repositories(repositories).await
    }

    /// Flat summary: one line per pull request, oldest update first,
    /// followed by persisted merge request lines.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch`].
    pub async fn summary(&self, now: DateTime<Utc>) -> Result<String, DigestError> {
        let report = self.fetch().await?;
        let lines = self.formatter.render(report.result.clone(), now);
        let persisted = self.persisted_lines().await;
        Ok(compose_message(
            self.settings.organization().as_str(),
            &lines,
            &persisted,
            &report.outcomes,
        ))
    }

    /// Grouped listing: one block per repository that has open pull
    /// requests, followed by the repositories that were skipped.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch`].
    pub async fn grouped(&self, now: DateTime<Utc>) -> Result<String, DigestError> {
        let team = self.settings.require_team()?;
        let repositories = self.team_repositories().await?;
        if repositories.is_empty() {
            return Ok(format!("No repos found for team {team}"));
        }

        let report = self.fetch_repositories(repositories).await?;
        let listing = grouped_listing(&report, now);
        Ok(match (listing.is_empty(), skipped_trailer(&report.outcomes)) {
            (true, None) => format!("No pull requests found for team {team}"),
            (true, Some(trailer)) => trailer,
            (false, None) => listing,
            (false, Some(trailer)) => format!("{listing}\n\n{trailer}"),
        })
    }

    /// Listing of a single repository in the organization.
    ///
    /// # Errors
    ///
    /// Returns failures other than a missing repository, which is reported
    /// in the message instead.
    pub async fn repository(&self, name: &str, now: DateTime<Utc>) -> Result<String, DigestError> {
        let lister = TeamRepositoryLister::new(self.gateway.as_ref(), self.options.retry);
        let repository = match lister.find(self.settings.organization(), name).await {
            Ok(repository) => repository,
            Err(DigestError::NotFound { .. }) => return Ok(format!("Can't find {name}")),
            Err(error) => return Err(error),
        };

        let pull_requests = self.repository_pull_requests(&repository).await?;
        Ok(repository_listing(&repository, &pull_requests, now))
    }

    async fn team_repositories(&self) -> Result<Vec<Repository>, DigestError> {
        let lister = TeamRepositoryLister::new(self.gateway.as_ref(), self.options.retry);
        lister
            .list(self.settings.organization(), self.settings.require_team()?)
            .await
    }

    async fn fetch_repositories(
        &self,
        repositories: Vec<Repository>,
    ) -> Result<FetchReport, DigestError> {
        let aggregator = ConcurrentAggregator::new(Arc::clone(&self.gateway), self.options.retry)
            .with_concurrency(self.options.concurrency)
            .with_unit_timeout(self.options.unit_timeout);

        let report = match self.options.overall_timeout {
            Some(timeout) => {
                aggregator
                    .fetch_all_with_timeout(repositories, timeout)
                    .await?
            }
            None => aggregator.fetch_all(repositories).await,
        };
        tracing::info!(
            pull_requests = report.result.len(),
            failed = report.failures().count(),
            "aggregation finished"
        );
        Ok(report)
    }

    async fn repository_pull_requests(
        &self,
        repository: &Repository,
    ) -> Result<Vec<Issue>, DigestError> {
        let fetcher = RepoIssueFetcher::new(Arc::clone(&self.gateway), self.options.retry);
        let issues = fetcher.fetch(repository).await?;
        Ok(issues.into_iter().filter(Issue::is_pull_request).collect())
    }

    async fn persisted_lines(&self) -> Vec<String> {
        let summaries = Arc::clone(&self.summaries);
        match tokio::task::spawn_blocking(move || summaries.list_persisted_summary_lines()).await {
            Ok(Ok(lines)) => lines,
            Ok(Err(error)) => {
                tracing::warn!(%error, "skipping persisted merge request summaries");
                Vec::new()
            }
            Err(join_error) => {
                tracing::warn!(%join_error, "persisted summary read did not complete");
                Vec::new()
            }
        }
    }
}
