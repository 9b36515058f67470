//! Pagination helper shared by the listing calls.

use octocrab::{Octocrab, Page};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::github::error::DigestError;

use super::error_mapping::map_octocrab_error_with_rate_limit;

/// Items requested per page; the GitHub maximum.
pub(super) const PER_PAGE: &str = "100";

/// Fetches the first page at `route` and follows `next` links until GitHub
/// reports no further page.
///
/// A failure on any page fails the whole call; no partial list is returned.
pub(super) async fn collect_all_pages<T, Q>(
    client: &Octocrab,
    operation: &str,
    route: &str,
    query: &Q,
) -> Result<Vec<T>, DigestError>
where
    T: DeserializeOwned + Send,
    Q: Serialize + ?Sized + Sync,
{
    let first: Page<T> = match client.get(route, Some(query)).await {
        Ok(page) => page,
        Err(error) => {
            return Err(map_octocrab_error_with_rate_limit(client, operation, &error).await);
        }
    };

    match client.all_pages(first).await {
        Ok(items) => Ok(items),
        Err(error) => Err(map_octocrab_error_with_rate_limit(client, operation, &error).await),
    }
}
