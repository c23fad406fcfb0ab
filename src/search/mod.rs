pub mod anchors;
pub mod enrich;
pub mod pipeline;
pub mod ranking;
pub mod requirements;
pub mod usecase;

pub use anchors::{AnchorConfig, AnchorResolver};
pub use pipeline::{evaluate_listings_pipeline, ListingAspectScores, PipelineOutcome, ScoredListing};
pub use requirements::{derive_search_criteria, RequirementsRetryPolicy};
pub use usecase::{CriteriaSearchOutcome, MessageSearchOutcome, SearchListingsUseCase};

use anyhow::{anyhow, Result};
use std::future::Future;
use std::time::Duration;

/// Await an external call, failing it once `timeout` elapses
pub(crate) async fn call_with_timeout<T, F>(
    timeout: Option<Duration>,
    label: &str,
    call: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| anyhow!("{} timed out after {:?}", label, limit))?,
        None => call.await,
    }
}
