//! C4: the grouped-document store, keyed by `(pubkey, tag, network)`.
//!
//! Backed by a real MongoDB collection — the data model in the design is
//! MongoDB's document/array-push model almost verbatim, down to the
//! `$setOnInsert` trick used to make the `unknown -> active` transition
//! one-directional.

use {
    crate::{
        error::{ServiceError, ServiceResult},
        types::{DecodedSignature, Entry, Network, Status, StoredRecord},
    },
    bson::doc,
    futures::stream::TryStreamExt,
    mongodb::options::UpdateOptions,
    serde::Deserialize,
};

pub const DATABASE_NAME: &str = "validatorMonitoring";
pub const COLLECTION_NAME: &str = "signatures";

/// Thin handle over the `signatures` collection.
///
/// `mongodb::Collection` is internally a cheap, `Clone`-able handle over a
/// pooled connection, so this type is cheap to clone and share across warp
/// filters and the background scheduler tasks.
#[derive(Clone)]
pub struct SignatureStore {
    collection: mongodb::Collection<StoredRecord>,
}

/// Projection used by the reconciler: only the key fields of records still in
/// `unknown` status, never their (possibly large) `entries` array.
#[derive(Debug, Clone, Deserialize)]
pub struct UnknownRecordKey {
    pub pubkey: String,
    pub tag: String,
    pub network: Network,
}

impl SignatureStore {
    pub fn new(client: &mongodb::Client) -> Self {
        let collection = client
            .database(DATABASE_NAME)
            .collection(COLLECTION_NAME);
        Self { collection }
    }

    #[cfg(test)]
    pub(crate) fn from_collection(collection: mongodb::Collection<StoredRecord>) -> Self {
        Self { collection }
    }

    /// Append `item` under `(pubkey, tag, network)`, with `status` as resolved
    /// by C2/C5. Fails with `DocumentFull` if the existing record is already
    /// at `max_entries`; never called with `Status::Inactive`.
    pub async fn append(
        &self,
        item: &DecodedSignature,
        network: Network,
        status: Status,
        max_entries: u32,
    ) -> ServiceResult<()> {
        let filter = doc! {
            "pubkey": &item.pubkey,
            "tag": &item.tag,
            "network": network.as_str(),
        };

        if let Some(existing) = self.collection.find_one(filter.clone()).await? {
            if existing.entries.len() as u32 >= max_entries {
                return Err(ServiceError::DocumentFull(item.pubkey.clone()));
            }
        }

        let entry = Entry {
            payload: item.payload.clone(),
            signature: item.signature.clone(),
            decoded_payload: item.decoded_payload.clone(),
        };
        let entry_bson = bson::to_bson(&entry)
            .map_err(|e| ServiceError::StoreError(format!("entry serialisation failed: {e}")))?;

        let mut update = doc! {
            "$push": { "entries": entry_bson },
        };
        match status {
            // Unconditional overwrite: matches the spec's one allowed in-place mutation.
            Status::Active => {
                update.insert("$set", doc! { "status": "active" });
            }
            // Only takes effect on insert, so an existing `active` record is never
            // demoted by a later `unknown` observation.
            Status::Unknown => {
                update.insert("$setOnInsert", doc! { "status": "unknown" });
            }
            Status::Inactive => {
                return Err(ServiceError::StoreError(
                    "refusing to persist a record with status=inactive".to_string(),
                ));
            }
        }

        self.collection
            .update_one(filter, update)
            .with_options(UpdateOptions::builder().upsert(true).build())
            .await?;

        Ok(())
    }

    /// All records still in `unknown` status, projected to their key fields only.
    pub async fn unknown_record_keys(&self) -> ServiceResult<Vec<UnknownRecordKey>> {
        let projected = self
            .collection
            .clone_with_type::<UnknownRecordKey>()
            .find(doc! { "status": "unknown" })
            .projection(doc! { "pubkey": 1, "tag": 1, "network": 1, "_id": 0 })
            .await?;

        Ok(projected.try_collect().await?)
    }

    /// Promote a still-`unknown` record to `active`. No-op if the record has
    /// already moved on (e.g. a concurrent ingest beat the reconciler to it).
    pub async fn promote_to_active(
        &self,
        pubkey: &str,
        tag: &str,
        network: Network,
    ) -> ServiceResult<()> {
        let filter = doc! {
            "pubkey": pubkey,
            "tag": tag,
            "network": network.as_str(),
            "status": "unknown",
        };
        self.collection
            .update_one(filter, doc! { "$set": { "status": "active" } })
            .await?;
        Ok(())
    }

    /// Delete a record observed `inactive`, but only while it is still
    /// `unknown` — the compound filter that prevents clobbering a concurrent
    /// write that has already seen the validator active.
    pub async fn delete_if_still_unknown(
        &self,
        pubkey: &str,
        tag: &str,
        network: Network,
    ) -> ServiceResult<()> {
        let filter = doc! {
            "pubkey": pubkey,
            "tag": tag,
            "network": network.as_str(),
            "status": "unknown",
        };
        self.collection.delete_one(filter).await?;
        Ok(())
    }

    /// All records whose `tag` is a member of `tags`, in full (entries included).
    pub async fn find_by_tags(&self, tags: &[String]) -> ServiceResult<Vec<StoredRecord>> {
        let cursor = self
            .collection
            .find(doc! { "tag": { "$in": tags } })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Remove every entry whose `decodedPayload.timestamp` (milliseconds) is
    /// strictly older than `cutoff_ms`. Operates across every document in one
    /// `$pull`, not a per-document delete; documents that become empty stay.
    ///
    /// `timestamp` is stored as a decimal string, so the comparison needs
    /// `$toLong` to cast it before ordering against `cutoff_ms`; casting only
    /// works inside `$expr`. Requires MongoDB 4.0+ (the minimum version with
    /// aggregation-expression support in this query position).
    pub async fn evict_entries_older_than(&self, cutoff_ms: i64) -> ServiceResult<u64> {
        let pull = doc! {
            "$pull": {
                "entries": {
                    "$expr": {
                        "$lt": [
                            { "$toLong": "$decodedPayload.timestamp" },
                            cutoff_ms,
                        ]
                    }
                }
            }
        };
        let result = self.collection.update_many(doc! {}, pull).await?;
        Ok(result.modified_count)
    }
}
