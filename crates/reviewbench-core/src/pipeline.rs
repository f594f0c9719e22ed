//! The load sequence shared by both loaders: wait, read, reset, load, verify.

use std::path::Path;

use crate::dataset;
use crate::error::Result;
use crate::readiness::{wait_until_ready, RetryPolicy};
use crate::traits::ReviewStore;
use crate::types::StoreFootprint;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub store: &'static str,
    pub read: usize,
    pub accepted: u64,
    pub rejected: u64,
    /// Count read back from the store after the refresh/commit.
    pub stored: u64,
    pub footprint: StoreFootprint,
}

impl LoadReport {
    /// True when every record in the file is in the store.
    pub fn is_complete(&self) -> bool {
        self.rejected == 0 && self.stored == self.read as u64
    }
}

/// Run the full load of `path` into `store`.
///
/// The input file is read and validated before the destructive reset, so a
/// missing or malformed file leaves the store untouched.
pub async fn load_into<S: ReviewStore + ?Sized>(store: &S, path: &Path, policy: RetryPolicy) -> Result<LoadReport> {
    wait_until_ready(store.name(), policy, || store.ping()).await?;

    let reviews = dataset::read_reviews(path)?;
    tracing::info!(store = store.name(), records = reviews.len(), path = %path.display(), "dataset read");

    store.reset().await?;
    let summary = store.load(&reviews).await?;
    if summary.rejected > 0 {
        tracing::warn!(store = store.name(), rejected = summary.rejected, "some records were rejected");
    }
    let stored = store.count().await?;
    let footprint = store.footprint().await?;
    tracing::info!(store = store.name(), stored, bytes = footprint.bytes, "load complete");

    Ok(LoadReport {
        store: store.name(),
        read: reviews.len(),
        accepted: summary.accepted,
        rejected: summary.rejected,
        stored,
        footprint,
    })
}
