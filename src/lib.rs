//! prdigest library crate producing open pull request digests for a GitHub
//! team.
//!
//! The library wraps Octocrab to list every repository a team can access,
//! fetches each repository's open issues concurrently, keeps the pull
//! requests, and renders them as a digest message ordered by last update.
//! A repository that fails is reported in the message rather than failing
//! the run.

pub mod aggregate;
pub mod config;
pub mod digest;
pub mod github;
pub mod store;
pub mod summary;

pub use aggregate::{AggregationResult, ConcurrentAggregator, FetchReport, PerRepositoryOutcome};
pub use config::{OperationMode, PrDigestConfig};
pub use digest::{AggregatorSettings, DigestOptions, TeamDigest};
pub use github::{
    DigestError, ErrorKind, Issue, IssueGateway, OctocrabGateway, OrganizationName,
    PersonalAccessToken, Repository, RepositoryGateway, RetryPolicy, TeamId,
};
pub use store::{JsonSummaryStore, PersistedSummarySource};
pub use summary::SummaryFormatter;
