//! Ordered, templated rendering of the merged pull request collection.
//!
//! # Available Variables
//!
//! - `repository`: owning repository name
//! - `author`: author login
//! - `title`: pull request title
//! - `url`: pull request web URL
//! - `age`: relative age of the last update, or `unknown`
//! - `number`: issue number

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use minijinja::{Environment, UndefinedBehavior, context};

use crate::aggregate::AggregationResult;
use crate::github::error::DigestError;
use crate::github::models::Issue;

use super::age::relative_age_or_unknown;

/// Line layout used when no template is configured.
pub const DEFAULT_LINE_TEMPLATE: &str =
    "{{ repository }}\t{{ author }}\t{{ title }} {{ url }} ({{ age }})";

const UNKNOWN_REPOSITORY: &str = "unknown repository";
const UNKNOWN_AUTHOR: &str = "unknown author";

/// Renders pull requests as display lines ordered by last update.
pub struct SummaryFormatter {
    environment: Environment<'static>,
    template: String,
}

impl SummaryFormatter {
    /// Creates a formatter using [`DEFAULT_LINE_TEMPLATE`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            environment: line_environment(),
            template: DEFAULT_LINE_TEMPLATE.to_owned(),
        }
    }

    /// Creates a formatter with a custom line template.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::InvalidConfiguration`] if the template has
    /// syntax errors or references undefined variables.
    pub fn with_template(template: impl Into<String>) -> Result<Self, DigestError> {
        let formatter = Self {
            environment: line_environment(),
            template: template.into(),
        };
        formatter
            .environment
            .render_str(&formatter.template, sample_context())
            .map_err(|error| DigestError::InvalidConfiguration {
                message: format!("invalid line template: {error}"),
            })?;
        Ok(formatter)
    }

    /// Sorts the pull requests by last update, oldest first, and renders
    /// one line each.
    ///
    /// Ties are broken by repository name, then issue number. Entries with
    /// an unusable update timestamp sort last and render an `unknown` age.
    #[must_use]
    pub fn render(&self, result: AggregationResult, now: DateTime<Utc>) -> Vec<String> {
        let mut keyed: Vec<(Option<DateTime<Utc>>, Issue)> = result
            .into_issues()
            .into_iter()
            .map(|issue| (issue.updated_at_time().ok(), issue))
            .collect();
        keyed.sort_by(|(left_time, left), (right_time, right)| {
            compare_update_times(*left_time, *right_time)
                .then_with(|| repository_name(left).cmp(repository_name(right)))
                .then_with(|| left.number.cmp(&right.number))
        });

        keyed
            .iter()
            .map(|(_, issue)| self.render_line(issue, now))
            .collect()
    }

    /// Renders a single pull request line.
    #[must_use]
    pub fn render_line(&self, issue: &Issue, now: DateTime<Utc>) -> String {
        let repository = repository_name(issue);
        let author = issue.author.as_deref().unwrap_or(UNKNOWN_AUTHOR);
        let title = issue.title.as_deref().unwrap_or_default();
        let url = issue.pull_request_url();
        let age = relative_age_or_unknown(issue.updated_at.as_deref(), now);

        let ctx = context! {
            repository => repository,
            author => author,
            title => title,
            url => url,
            age => age,
            number => issue.number,
        };
        self.environment
            .render_str(&self.template, ctx)
            .unwrap_or_else(|error| {
                tracing::warn!(%error, number = issue.number, "line template failed, using default layout");
                format!("{repository}\t{author}\t{title} {url} ({age})")
            })
    }
}

impl Default for SummaryFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn line_environment() -> Environment<'static> {
    let mut environment = Environment::new();
    environment.set_auto_escape_callback(|_| minijinja::AutoEscape::None);
    environment.set_undefined_behavior(UndefinedBehavior::Strict);
    environment
}

fn sample_context() -> minijinja::Value {
    context! {
        repository => "repository",
        author => "author",
        title => "title",
        url => "https://example.invalid/pull/1",
        age => "1 minute ago",
        number => 1,
    }
}

fn repository_name(issue: &Issue) -> &str {
    issue
        .repository
        .as_ref()
        .map_or(UNKNOWN_REPOSITORY, |repository| repository.name.as_str())
}

fn compare_update_times(left: Option<DateTime<Utc>>, right: Option<DateTime<Utc>>) -> Ordering {
    match (left, right) {
        (Some(left_time), Some(right_time)) => left_time.cmp(&right_time),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
