//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.prdigest.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `PRDIGEST_ORGANIZATION`, `PRDIGEST_TOKEN`,
//!    or legacy `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--organization`/`-o`, `--team`/`-T` and
//!    friends
//!
//! # Configuration File
//!
//! ```toml
//! organization = "octo"
//! token = "ghp_example"
//! team = "platform"
//! api_base = "https://api.github.com"
//! concurrency = 8
//! merge_requests_path = "state/summaries.json"
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::aggregate::DEFAULT_CONCURRENCY;
use crate::digest::{AggregatorSettings, DigestOptions};
use crate::github::error::DigestError;
use crate::github::rate_limit::RetryPolicy;
use crate::store::{JsonSummaryStore, NoPersistedSummaries, PersistedSummarySource};
use crate::summary::SummaryFormatter;

/// Operation mode determined by CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Flat summary of every open pull request across the team.
    TeamSummary,
    /// Pull requests grouped under their repository.
    GroupedTeamListing,
    /// Pull requests of one named repository.
    RepositoryListing,
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `PRDIGEST_ORGANIZATION` or `--organization`: GitHub organization
/// - `PRDIGEST_TOKEN`, `GITHUB_TOKEN`, or `--token`: Authentication token
/// - `PRDIGEST_TEAM` or `--team`: Team id or slug
/// - `PRDIGEST_API_BASE` or `--api-base`: API base URL
/// - `PRDIGEST_REPO` or `--repo`: Single repository to list
///
/// # Example
///
/// ```no_run
/// use prdigest::PrDigestConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = PrDigestConfig::load().expect("failed to load configuration");
/// let settings = config.aggregator_settings().expect("settings required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PRDIGEST",
    discovery(
        dotfile_name = ".prdigest.toml",
        config_file_name = "prdigest.toml",
        app_name = "prdigest"
    )
)]
pub struct PrDigestConfig {
    /// GitHub organization owning the team.
    ///
    /// Can be provided via:
    /// - CLI: `--organization <ORG>` or `-o <ORG>`
    /// - Environment: `PRDIGEST_ORGANIZATION`
    /// - Config file: `organization = "..."`
    #[ortho_config(cli_short = 'o')]
    pub organization: Option<String>,

    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `PRDIGEST_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Team whose repositories are scanned: a numeric id or a slug.
    ///
    /// Can be provided via:
    /// - CLI: `--team <TEAM>` or `-T <TEAM>`
    /// - Environment: `PRDIGEST_TEAM`
    /// - Config file: `team = "..."`
    #[ortho_config(cli_short = 'T')]
    pub team: Option<String>,

    /// GitHub API base, or a GitHub Enterprise host from which the
    /// `/api/v3` base is derived.
    ///
    /// Defaults to `https://api.github.com`.
    #[ortho_config()]
    pub api_base: String,

    /// Lists a single repository of the organization instead of the team.
    ///
    /// Can be provided via:
    /// - CLI: `--repo <REPO>` or `-r <REPO>`
    /// - Environment: `PRDIGEST_REPO`
    /// - Config file: `repo = "..."`
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Groups pull requests under their repository instead of producing
    /// the flat summary.
    ///
    /// Can be provided via:
    /// - CLI: `--grouped` / `-g`
    /// - Config file: `grouped = true`
    ///
    /// Note: Environment variable `PRDIGEST_GROUPED` is not supported
    /// because `ortho_config` does not load boolean values from the environment.
    #[ortho_config(cli_short = 'g')]
    pub grouped: bool,

    /// Repositories fetched at once. Defaults to 8; zero is treated as one.
    #[ortho_config(cli_short = 'c')]
    pub concurrency: usize,

    /// Deadline for fetching a single repository, in seconds.
    ///
    /// Unset means no per-repository deadline.
    #[ortho_config()]
    pub unit_timeout_seconds: Option<u64>,

    /// Deadline for the whole fetch phase, in seconds.
    ///
    /// Unset means no overall deadline.
    #[ortho_config()]
    pub timeout_seconds: Option<u64>,

    /// Retries after a rate-limited call. Defaults to 3.
    #[ortho_config()]
    pub max_retries: u32,

    /// First backoff delay in milliseconds, doubled after every retry.
    /// Defaults to one second.
    #[ortho_config()]
    pub retry_base_delay_ms: u64,

    /// Minijinja template for summary lines.
    ///
    /// Variables: `repository`, `author`, `title`, `url`, `age`, `number`.
    #[ortho_config()]
    pub line_template: Option<String>,

    /// JSON file holding persisted merge request summary lines.
    #[ortho_config()]
    pub merge_requests_path: Option<String>,
}

const DEFAULT_API_BASE: &str = "https://api.github.com";
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1_000;

impl Default for PrDigestConfig {
    fn default() -> Self {
        Self {
            organization: None,
            token: None,
            team: None,
            api_base: DEFAULT_API_BASE.to_owned(),
            repo: None,
            grouped: false,
            concurrency: DEFAULT_CONCURRENCY,
            unit_timeout_seconds: None,
            timeout_seconds: None,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
            line_template: None,
            merge_requests_path: None,
        }
    }
}

impl PrDigestConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::InvalidConfiguration`] when no token source
    /// provides a value.
    pub fn resolve_token(&self) -> Result<String, DigestError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or_else(|| DigestError::InvalidConfiguration {
                message: "token is required (use --token, PRDIGEST_TOKEN or GITHUB_TOKEN)"
                    .to_owned(),
            })
    }

    /// Determines the operation mode based on provided configuration.
    ///
    /// Returns `RepositoryListing` when a repository is named,
    /// `GroupedTeamListing` when grouping is requested, or `TeamSummary`
    /// otherwise.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        if self.repo.is_some() {
            OperationMode::RepositoryListing
        } else if self.grouped {
            OperationMode::GroupedTeamListing
        } else {
            OperationMode::TeamSummary
        }
    }

    /// Returns the repository name for `RepositoryListing` mode.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::InvalidConfiguration`] when no repository is
    /// configured.
    pub fn require_repo(&self) -> Result<&str, DigestError> {
        self.repo
            .as_deref()
            .ok_or_else(|| DigestError::InvalidConfiguration {
                message: "repository name is required (use --repo or -r)".to_owned(),
            })
    }

    /// Validates the organization, token, team and API base.
    ///
    /// The team is only required for the team modes; listing a single
    /// repository ignores it.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::InvalidConfiguration`] naming the first
    /// missing field.
    pub fn aggregator_settings(&self) -> Result<AggregatorSettings, DigestError> {
        let token = self.resolve_token().ok();
        match self.operation_mode() {
            OperationMode::RepositoryListing => AggregatorSettings::for_repository(
                self.organization.as_deref(),
                token.as_deref(),
                Some(self.api_base.as_str()),
            ),
            OperationMode::TeamSummary | OperationMode::GroupedTeamListing => {
                AggregatorSettings::new(
                    self.organization.as_deref(),
                    token.as_deref(),
                    self.team.as_deref(),
                    Some(self.api_base.as_str()),
                )
            }
        }
    }

    /// Fetch tuning derived from the retry, concurrency and timeout fields.
    #[must_use]
    pub fn digest_options(&self) -> DigestOptions {
        DigestOptions {
            retry: RetryPolicy::new(
                self.max_retries,
                Duration::from_millis(self.retry_base_delay_ms),
            ),
            concurrency: self.concurrency.max(1),
            unit_timeout: self.unit_timeout_seconds.map(Duration::from_secs),
            overall_timeout: self.timeout_seconds.map(Duration::from_secs),
        }
    }

    /// Builds the summary line formatter, honouring `line_template`.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::InvalidConfiguration`] when the template does
    /// not compile.
    pub fn summary_formatter(&self) -> Result<SummaryFormatter, DigestError> {
        self.line_template
            .as_deref()
            .map_or_else(|| Ok(SummaryFormatter::new()), SummaryFormatter::with_template)
    }

    /// Source of persisted merge request lines.
    #[must_use]
    pub fn summary_source(&self) -> Box<dyn PersistedSummarySource> {
        match self.merge_requests_path.as_deref() {
            Some(path) => Box::new(JsonSummaryStore::new(path)),
            None => Box::new(NoPersistedSummaries),
        }
    }
}

#[cfg(test)]
mod tests;
