//! Identity wrappers and API paths for team-wide pull request listing.

use url::Url;

use super::error::DigestError;

const GITHUB_API_BASE: &str = "https://api.github.com";

/// Organization login wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationName(String);

impl OrganizationName {
    /// Validates that the organization is non-blank.
    ///
    /// # Errors
    ///
    /// Returns `DigestError::InvalidConfiguration` when the value is blank.
    pub fn new(value: &str) -> Result<Self, DigestError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DigestError::InvalidConfiguration {
                message: "organization is required".to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the organization login.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Team reference, either the numeric id or the slug within the organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamId {
    /// Numeric team id, addressed through the legacy `/teams/{id}` routes.
    Numeric(u64),
    /// Team slug, addressed through `/orgs/{org}/teams/{slug}`.
    Slug(String),
}

impl TeamId {
    /// Parses a team reference: all-digit values are numeric ids, anything
    /// else is treated as a slug.
    ///
    /// # Errors
    ///
    /// Returns `DigestError::InvalidConfiguration` when the value is blank or
    /// the numeric id is zero.
    pub fn parse(value: &str) -> Result<Self, DigestError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DigestError::InvalidConfiguration {
                message: "team id is required".to_owned(),
            });
        }

        if trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
            return match trimmed.parse::<u64>() {
                Ok(0) | Err(_) => Err(DigestError::InvalidConfiguration {
                    message: format!("team id must be a positive integer, got {trimmed}"),
                }),
                Ok(id) => Ok(Self::Numeric(id)),
            };
        }

        Ok(Self::Slug(trimmed.to_owned()))
    }

    pub(crate) fn repositories_path(&self, organization: &OrganizationName) -> String {
        match self {
            Self::Numeric(id) => format!("/teams/{id}/repos"),
            Self::Slug(slug) => format!("/orgs/{}/teams/{slug}/repos", organization.as_str()),
        }
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Slug(slug) => f.write_str(slug),
        }
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `DigestError::InvalidConfiguration` when the supplied string
    /// is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, DigestError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DigestError::InvalidConfiguration {
                message: "personal access token is required".to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl std::fmt::Debug for PersonalAccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PersonalAccessToken(***)")
    }
}

/// Resolves the API base URL for a configured value.
///
/// Accepts either an API URL (`https://api.github.com`,
/// `https://ghe.example.com/api/v3`) or a web host URL. `github.com` maps to
/// the public API; any other host without a path maps to `{host}/api/v3`.
///
/// # Errors
///
/// Returns `DigestError::InvalidConfiguration` when the URL cannot be parsed
/// or has no host.
pub fn resolve_api_base(input: &str) -> Result<Url, DigestError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return parse_url(GITHUB_API_BASE);
    }

    let parsed = parse_url(trimmed)?;
    let host = parsed
        .host_str()
        .ok_or_else(|| DigestError::InvalidConfiguration {
            message: format!("API base must include a host: {trimmed}"),
        })?;

    if host.eq_ignore_ascii_case("github.com") {
        return parse_url(GITHUB_API_BASE);
    }

    if parsed.path() != "/" {
        return Ok(parsed);
    }

    let authority = if host.contains(':') {
        format!("[{host}]")
    } else {
        host.to_owned()
    };
    let mut api_url = parse_url(&format!("{}://{authority}", parsed.scheme()))?;
    api_url
        .set_port(parsed.port())
        .map_err(|()| DigestError::InvalidConfiguration {
            message: "invalid port".to_owned(),
        })?;
    api_url.set_path("api/v3");
    Ok(api_url)
}

fn parse_url(value: &str) -> Result<Url, DigestError> {
    Url::parse(value).map_err(|error| DigestError::InvalidConfiguration {
        message: format!("invalid API base {value}: {error}"),
    })
}

pub(crate) fn repository_path(organization: &OrganizationName, name: &str) -> String {
    format!("/repos/{}/{name}", organization.as_str())
}

pub(crate) fn issues_path(repository_id: u64) -> String {
    format!("/repositories/{repository_id}/issues")
}
