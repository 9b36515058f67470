//! Support modules for the team digest BDD tests.

pub(crate) mod harness;
pub(crate) mod runtime;
pub(crate) mod state;

pub(crate) use harness::{
    DigestMode, IssueResponse, RepositoryFixture, issue_json, pull_request_json, run_digest,
};
pub(crate) use state::DigestState;
