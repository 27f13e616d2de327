//! C7: read path over the store, filtered to a caller's authorised tags.

use crate::{error::ServiceResult, store::SignatureStore, types::StoredRecord};

/// All stored records whose `tag` is a member of `authorised_tags`. No
/// pagination, no filtering by network/pubkey/age — entry arrays come back
/// intact.
pub async fn records_for_tags(
    store: &SignatureStore,
    authorised_tags: &[String],
) -> ServiceResult<Vec<StoredRecord>> {
    store.find_by_tags(authorised_tags).await
}
