//! Rendering of aggregated pull requests into display text.

mod age;
mod formatter;
mod listing;
mod message;

pub use age::{UNKNOWN_AGE, relative_age, relative_age_or_unknown};
pub use formatter::{DEFAULT_LINE_TEMPLATE, SummaryFormatter};
pub use listing::{BLOCK_SEPARATOR, grouped_listing, pull_request_entry, repository_listing};
pub use message::{compose_message, skipped_trailer};
