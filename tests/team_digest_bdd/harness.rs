//! Mock server wiring and digest execution for the team digest BDD tests.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use prdigest::{
    AggregatorSettings, DigestError, DigestOptions, OctocrabGateway, RetryPolicy, TeamDigest,
};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::runtime::scenario_runtime;
use super::state::DigestState;

/// Instant every scenario renders ages against.
pub(crate) const SCENARIO_NOW: &str = "2025-01-01T03:00:00Z";

const RATE_LIMIT_RESET_AT: u64 = 1_700_000_000;

/// How a repository answers its issue listing.
#[derive(Debug, Clone)]
pub(crate) enum IssueResponse {
    Issues(Vec<Value>),
    Status(u16),
    RateLimited,
}

/// A team repository served by the mock GitHub API.
#[derive(Debug, Clone)]
pub(crate) struct RepositoryFixture {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) response: IssueResponse,
}

impl RepositoryFixture {
    pub(crate) const fn new(id: u64, name: String) -> Self {
        Self {
            id,
            name,
            response: IssueResponse::Issues(Vec::new()),
        }
    }

    pub(crate) fn push_issue(&mut self, issue: Value) {
        if let IssueResponse::Issues(issues) = &mut self.response {
            issues.push(issue);
        }
    }

    fn to_json(&self, organization: &str) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "html_url": format!("https://github.com/{organization}/{}", self.name),
            "owner": { "login": organization }
        })
    }
}

/// Digest mode exercised by a `When` step.
#[derive(Debug, Clone)]
pub(crate) enum DigestMode {
    Summary,
    Grouped,
    Repository(String),
}

pub(crate) fn pull_request_json(number: u64, updated_at: &str) -> Value {
    json!({
        "number": number,
        "title": format!("Change {number}"),
        "user": { "login": "alice" },
        "html_url": format!("https://github.com/octo/pulls/{number}"),
        "created_at": updated_at,
        "updated_at": updated_at,
        "pull_request": { "html_url": format!("https://github.com/octo/pulls/{number}") }
    })
}

pub(crate) fn issue_json(number: u64) -> Value {
    json!({
        "number": number,
        "title": format!("Bug {number}"),
        "user": { "login": "bob" },
        "html_url": format!("https://github.com/octo/issues/{number}"),
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z"
    })
}

fn issue_response(response: &IssueResponse) -> ResponseTemplate {
    match response {
        IssueResponse::Issues(issues) => ResponseTemplate::new(200).set_body_json(issues),
        IssueResponse::Status(status) => ResponseTemplate::new(*status)
            .set_body_json(json!({ "message": format!("status {status}") })),
        IssueResponse::RateLimited => ResponseTemplate::new(403)
            .set_body_json(json!({
                "message": "API rate limit exceeded for user",
                "documentation_url": "https://docs.github.com/rest/rate-limit"
            }))
            .insert_header("X-RateLimit-Remaining", "0")
            .insert_header("X-RateLimit-Reset", RATE_LIMIT_RESET_AT.to_string()),
    }
}

fn rate_limit_body() -> Value {
    let core = json!({
        "limit": 5000,
        "used": 5000,
        "remaining": 0,
        "reset": RATE_LIMIT_RESET_AT
    });
    json!({
        "resources": { "core": core, "search": core },
        "rate": core
    })
}

async fn mount_team(server: &MockServer, state: &DigestState, organization: &str, team: &str) {
    let repositories = state.repositories.get().unwrap_or_default();
    let team_route = format!("/api/v3/teams/{team}/repos");

    let team_response = if state.team_missing.get().unwrap_or(false) {
        ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" }))
    } else {
        let listing: Vec<Value> = repositories
            .iter()
            .map(|repository| repository.to_json(organization))
            .collect();
        ResponseTemplate::new(200).set_body_json(listing)
    };
    Mock::given(method("GET"))
        .and(path(team_route))
        .respond_with(team_response)
        .mount(server)
        .await;

    for repository in &repositories {
        Mock::given(method("GET"))
            .and(path(format!("/api/v3/repositories/{}/issues", repository.id)))
            .respond_with(issue_response(&repository.response))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!(
                "/api/v3/repos/{organization}/{}",
                repository.name
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(repository.to_json(organization)))
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v3/repos/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .with_priority(10)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/rate_limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rate_limit_body()))
        .mount(server)
        .await;
}

/// Mounts the scenario's fixtures and runs the requested digest mode.
pub(crate) fn run_digest(state: &DigestState, mode: &DigestMode) -> Result<String, DigestError> {
    let runtime = scenario_runtime(&state.runtime, &state.server);
    let server_uri = state
        .server
        .with_ref(MockServer::uri)
        .unwrap_or_else(|| panic!("mock server not initialised"));
    let organization = state
        .organization
        .get()
        .unwrap_or_else(|| panic!("organization not set"));
    let team = state.team.get().unwrap_or_else(|| panic!("team not set"));
    let now: DateTime<Utc> = SCENARIO_NOW
        .parse()
        .unwrap_or_else(|error| panic!("invalid scenario instant: {error}"));

    state
        .server
        .with_ref(|server| runtime.block_on(mount_team(server, state, &organization, &team)))
        .unwrap_or_else(|| panic!("mock server not initialised"));

    let settings = AggregatorSettings::new(
        Some(organization.as_str()),
        Some("valid-token"),
        Some(team.as_str()),
        Some(server_uri.as_str()),
    )?;
    let _runtime_context = runtime.enter();
    let gateway = OctocrabGateway::for_token(settings.token(), settings.api_base())?;
    let options = DigestOptions {
        retry: RetryPolicy::none(),
        ..DigestOptions::default()
    };
    let digest = TeamDigest::new(Arc::new(gateway), settings, options);

    runtime.block_on(async {
        match mode {
            DigestMode::Summary => digest.summary(now).await,
            DigestMode::Grouped => digest.grouped(now).await,
            DigestMode::Repository(name) => digest.repository(name, now).await,
        }
    })
}
