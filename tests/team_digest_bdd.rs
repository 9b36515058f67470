//! Behavioural tests for the team pull request digest.

#[path = "team_digest_bdd/mod.rs"]
mod team_digest_bdd_support;

use prdigest::ErrorKind;
use prdigest::summary::BLOCK_SEPARATOR;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use team_digest_bdd_support::{
    DigestMode, DigestState, IssueResponse, RepositoryFixture, issue_json, pull_request_json,
    run_digest,
};

#[fixture]
fn digest_state() -> DigestState {
    DigestState::default()
}

#[given("a GitHub team {team} in organization {organization}")]
fn remember_team(digest_state: &DigestState, team: String, organization: String) {
    digest_state.team.set(team);
    digest_state.organization.set(organization);
}

#[given("the team owns repository {name} with id {id:u64}")]
fn register_repository(digest_state: &DigestState, name: String, id: u64) {
    digest_state
        .repositories
        .get_or_insert_with(Vec::new)
        .push(RepositoryFixture::new(id, name));
}

#[given("the team does not exist")]
fn mark_team_missing(digest_state: &DigestState) {
    digest_state.team_missing.set(true);
}

#[given("repository {name} has open pull request {number:u64} updated at {timestamp}")]
fn add_pull_request(digest_state: &DigestState, name: String, number: u64, timestamp: String) {
    digest_state.update_repository(&name, |repository| {
        repository.push_issue(pull_request_json(number, &timestamp));
    });
}

#[given("repository {name} has open issue {number:u64}")]
fn add_issue(digest_state: &DigestState, name: String, number: u64) {
    digest_state.update_repository(&name, |repository| {
        repository.push_issue(issue_json(number));
    });
}

#[given("repository {name} fails with status {status:u16}")]
fn fail_repository(digest_state: &DigestState, name: String, status: u16) {
    digest_state.update_repository(&name, |repository| {
        repository.response = IssueResponse::Status(status);
    });
}

#[given("repository {name} is rate limited")]
fn rate_limit_repository(digest_state: &DigestState, name: String) {
    digest_state.update_repository(&name, |repository| {
        repository.response = IssueResponse::RateLimited;
    });
}

fn record_outcome(digest_state: &DigestState, mode: &DigestMode) {
    match run_digest(digest_state, mode) {
        Ok(output) => {
            let _had_previous_error = digest_state.error.take().is_some();
            digest_state.output.set(output);
        }
        Err(error) => {
            let _had_previous_output = digest_state.output.take().is_some();
            digest_state.error.set(error);
        }
    }
}

#[when("the team summary is requested")]
fn request_summary(digest_state: &DigestState) {
    record_outcome(digest_state, &DigestMode::Summary);
}

#[when("the grouped listing is requested")]
fn request_grouped(digest_state: &DigestState) {
    record_outcome(digest_state, &DigestMode::Grouped);
}

#[when("repository {name} is listed")]
fn request_repository(digest_state: &DigestState, name: String) {
    record_outcome(digest_state, &DigestMode::Repository(name));
}

fn digest_output(digest_state: &DigestState) -> String {
    let error = digest_state.error.get();
    digest_state
        .output
        .get()
        .unwrap_or_else(|| panic!("digest output missing, error: {error:?}"))
}

#[then("the digest reports {count:u64} open pull requests for {organization}")]
fn assert_header(digest_state: &DigestState, count: u64, organization: String) {
    let output = digest_output(digest_state);
    let header = format!("I found {count} open pull requests for {organization}\n");

    assert!(
        output.starts_with(&header),
        "expected digest to start with `{header}`, got `{output}`"
    );
}

#[then("summary entry {position:usize} belongs to repository {name}")]
fn assert_summary_entry(digest_state: &DigestState, position: usize, name: String) {
    let output = digest_output(digest_state);
    let (_, body) = output
        .split_once('\n')
        .unwrap_or_else(|| panic!("digest has no body: `{output}`"));
    let entry = body
        .split("\n\n")
        .nth(position - 1)
        .unwrap_or_else(|| panic!("digest has no entry {position}: `{output}`"));

    assert!(
        entry.starts_with(&format!("{name}\t")),
        "expected entry {position} to belong to {name}, got `{entry}`"
    );
}

#[then("the digest lists {name} as skipped")]
fn assert_skipped(digest_state: &DigestState, name: String) {
    let output = digest_output(digest_state);
    let trailer = output
        .lines()
        .find(|line| line.starts_with("Skipped repositories: "))
        .unwrap_or_else(|| panic!("digest has no skipped trailer: `{output}`"));

    assert!(
        trailer.contains(&format!("{name} (")),
        "expected {name} in `{trailer}`"
    );
}

#[then("the digest fails because the team was not found")]
fn assert_team_not_found(digest_state: &DigestState) {
    let error = digest_state
        .error
        .get()
        .unwrap_or_else(|| panic!("expected the digest to fail"));

    assert_eq!(error.kind(), ErrorKind::NotFound, "unexpected error {error:?}");
}

#[then("the grouped digest has {count:usize} repository blocks")]
fn assert_block_count(digest_state: &DigestState, count: usize) {
    let output = digest_output(digest_state);

    assert_eq!(
        output.split(BLOCK_SEPARATOR).count(),
        count,
        "unexpected blocks in `{output}`"
    );
}

#[then("grouped block {position:usize} is headed by repository {name}")]
fn assert_block_header(digest_state: &DigestState, position: usize, name: String) {
    let output = digest_output(digest_state);
    let block = output
        .split(BLOCK_SEPARATOR)
        .nth(position - 1)
        .unwrap_or_else(|| panic!("digest has no block {position}: `{output}`"));

    assert!(
        block.starts_with(&format!("{name} - ")),
        "expected block {position} to be headed by {name}, got `{block}`"
    );
}

#[then("the digest is headed by {full_name}")]
fn assert_repository_header(digest_state: &DigestState, full_name: String) {
    let output = digest_output(digest_state);

    assert!(
        output.starts_with(&format!("{full_name} - ")),
        "expected listing headed by {full_name}, got `{output}`"
    );
}

#[then("the digest reports that repository {name} cannot be found")]
fn assert_repository_missing(digest_state: &DigestState, name: String) {
    assert_eq!(digest_output(digest_state), format!("Can't find {name}"));
}

#[scenario(path = "tests/features/team_digest.feature", index = 0)]
fn summarise_team(digest_state: DigestState) {
    let _ = digest_state;
}

#[scenario(path = "tests/features/team_digest.feature", index = 1)]
fn skip_failing_repository(digest_state: DigestState) {
    let _ = digest_state;
}

#[scenario(path = "tests/features/team_digest.feature", index = 2)]
fn skip_rate_limited_repository(digest_state: DigestState) {
    let _ = digest_state;
}

#[scenario(path = "tests/features/team_digest.feature", index = 3)]
fn unknown_team_fails(digest_state: DigestState) {
    let _ = digest_state;
}

#[scenario(path = "tests/features/team_digest.feature", index = 4)]
fn group_by_repository(digest_state: DigestState) {
    let _ = digest_state;
}

#[scenario(path = "tests/features/team_digest.feature", index = 5)]
fn list_single_repository(digest_state: DigestState) {
    let _ = digest_state;
}

#[scenario(path = "tests/features/team_digest.feature", index = 6)]
fn list_missing_repository(digest_state: DigestState) {
    let _ = digest_state;
}
