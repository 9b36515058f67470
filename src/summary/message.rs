//! Final digest message composition.

use crate::aggregate::PerRepositoryOutcome;

/// Joins pull request lines and persisted merge request lines under a
/// count header, appending a trailer naming any skipped repositories.
///
/// ```
/// use prdigest::summary::compose_message;
///
/// let message = compose_message("octo", &["api\talice\tFix".to_owned()], &[], &[]);
/// assert_eq!(message, "I found 1 open pull requests for octo\napi\talice\tFix");
/// ```
#[must_use]
pub fn compose_message(
    organization: &str,
    pull_request_lines: &[String],
    persisted_lines: &[String],
    outcomes: &[PerRepositoryOutcome],
) -> String {
    let entries: Vec<&str> = pull_request_lines
        .iter()
        .chain(persisted_lines)
        .map(String::as_str)
        .collect();
    let mut message = format!(
        "I found {count} open pull requests for {organization}\n{body}",
        count = entries.len(),
        body = entries.join("\n\n"),
    );

    if let Some(trailer) = skipped_trailer(outcomes) {
        message.push_str("\n\n");
        message.push_str(&trailer);
    }
    message
}

/// Names the repositories that failed, with the kind of failure, as
/// `Skipped repositories: web (remote unavailable), ...`.
///
/// Returns `None` when every repository was fetched.
#[must_use]
pub fn skipped_trailer(outcomes: &[PerRepositoryOutcome]) -> Option<String> {
    let skipped: Vec<String> = outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            PerRepositoryOutcome::Failed { repository, error } => {
                Some(format!("{} ({})", repository.name, error.kind().label()))
            }
            PerRepositoryOutcome::Fetched { .. } => None,
        })
        .collect();
    if skipped.is_empty() {
        return None;
    }
    Some(format!("Skipped repositories: {}", skipped.join(", ")))
}
