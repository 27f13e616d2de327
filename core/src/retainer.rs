//! C9: periodic eviction of entries older than 30 days.
//!
//! Entry-level, not document-level: a document that empties out stays, and is
//! only ever removed by the reconciler (if still `unknown`) or refilled by a
//! new append. As with the reconciler, a failure here is logged and left for
//! the next daily tick, never surfaced to the caller.

use {crate::store::SignatureStore, chrono::DateTime, chrono::Duration, chrono::Utc};

const MAX_ENTRY_AGE: Duration = Duration::days(30);

/// The millisecond cutoff below which an entry's `decodedPayload.timestamp`
/// is evicted, as of `now`.
fn cutoff_millis(now: DateTime<Utc>) -> i64 {
    (now - MAX_ENTRY_AGE).timestamp_millis()
}

/// Run one retention pass, evicting every entry older than 30 days across
/// every stored record.
pub async fn run_once(store: &SignatureStore, now: DateTime<Utc>) -> u64 {
    let cutoff = cutoff_millis(now);
    match store.evict_entries_older_than(cutoff).await {
        Ok(modified) => {
            log::info!("retainer tick: evicted stale entries from {modified} document(s)");
            modified
        }
        Err(err) => {
            log::warn!("retainer tick failed, will retry next cycle: {err}");
            0
        }
    }
}
