//! Validated inputs for a team digest run.

use std::time::Duration;

use url::Url;

use crate::aggregate::DEFAULT_CONCURRENCY;
use crate::github::error::DigestError;
use crate::github::locator::{OrganizationName, PersonalAccessToken, TeamId, resolve_api_base};
use crate::github::rate_limit::RetryPolicy;

/// Who to ask, and about which team.
///
/// Every field is validated on construction so that a run never starts with
/// a blank organization, token, team or API base. Single repository
/// listings are built without a team through [`Self::for_repository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorSettings {
    organization: OrganizationName,
    token: PersonalAccessToken,
    team: Option<TeamId>,
    api_base: Url,
}

impl AggregatorSettings {
    /// Validates and builds the settings.
    ///
    /// # Errors
    ///
    /// Returns `DigestError::InvalidConfiguration` naming the first absent
    /// or blank field, or when the team or API base cannot be parsed.
    pub fn new(
        organization: Option<&str>,
        token: Option<&str>,
        team: Option<&str>,
        api_base: Option<&str>,
    ) -> Result<Self, DigestError> {
        Ok(Self {
            organization: OrganizationName::new(require("organization", organization)?)?,
            token: PersonalAccessToken::new(require("token", token)?)?,
            team: Some(TeamId::parse(require("team", team)?)?),
            api_base: resolve_api_base(require("api_base", api_base)?)?,
        })
    }

    /// Validates and builds settings for listing one repository, where no
    /// team is involved.
    ///
    /// # Errors
    ///
    /// Returns `DigestError::InvalidConfiguration` naming the first absent
    /// or blank field, or when the API base cannot be parsed.
    pub fn for_repository(
        organization: Option<&str>,
        token: Option<&str>,
        api_base: Option<&str>,
    ) -> Result<Self, DigestError> {
        Ok(Self {
            organization: OrganizationName::new(require("organization", organization)?)?,
            token: PersonalAccessToken::new(require("token", token)?)?,
            team: None,
            api_base: resolve_api_base(require("api_base", api_base)?)?,
        })
    }

    /// Organization owning the team.
    #[must_use]
    pub const fn organization(&self) -> &OrganizationName {
        &self.organization
    }

    /// Token used to authenticate.
    #[must_use]
    pub const fn token(&self) -> &PersonalAccessToken {
        &self.token
    }

    /// Team whose repositories are scanned, absent for single repository
    /// settings.
    #[must_use]
    pub const fn team(&self) -> Option<&TeamId> {
        self.team.as_ref()
    }

    /// Team whose repositories are scanned.
    ///
    /// # Errors
    ///
    /// Returns `DigestError::InvalidConfiguration` when the settings were
    /// built without a team.
    pub fn require_team(&self) -> Result<&TeamId, DigestError> {
        self.team().ok_or_else(|| DigestError::InvalidConfiguration {
            message: "team is required".to_owned(),
        })
    }

    /// Resolved API base URL.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }
}

fn require<'value>(field: &str, value: Option<&'value str>) -> Result<&'value str, DigestError> {
    match value {
        Some(present) if !present.trim().is_empty() => Ok(present),
        _ => Err(DigestError::InvalidConfiguration {
            message: format!("{field} is required"),
        }),
    }
}

/// Tuning knobs for the fetch phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestOptions {
    /// Backoff applied to rate-limited calls.
    pub retry: RetryPolicy,
    /// Repositories fetched at once.
    pub concurrency: usize,
    /// Deadline for each repository.
    pub unit_timeout: Option<Duration>,
    /// Deadline for the whole fetch phase.
    pub overall_timeout: Option<Duration>,
}

impl Default for DigestOptions {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            concurrency: DEFAULT_CONCURRENCY,
            unit_timeout: None,
            overall_timeout: None,
        }
    }
}
