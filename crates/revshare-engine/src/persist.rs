//! Status-gated persistence of allocation results.
//!
//! Writes go through the [`PayoutStore`] collaborator as a single batch per
//! run, and only for an optimal solve. A non-optimal run must leave
//! previously persisted values untouched.

use tracing::{info, warn};

use revshare_core::error::StoreError;
use revshare_core::model::SolveStatus;
use revshare_core::traits::PayoutStore;
use revshare_core::types::{PoolOutcome, TierSplitOutcome};

/// Persist a pool run's payout proportions.
pub fn commit_pool(outcome: &PoolOutcome, store: &dyn PayoutStore) -> Result<(), StoreError> {
    if outcome.status != SolveStatus::Optimal {
        warn!(status = ?outcome.status, "skipping pool persistence");
        return Err(StoreError::NonOptimalStatus);
    }
    let batch: Vec<_> = outcome
        .payouts
        .iter()
        .map(|p| (p.id.clone(), p.proportion))
        .collect();
    store.write_pool_proportions(&batch)?;
    info!(entries = batch.len(), "persisted pool proportions");
    Ok(())
}

/// Persist one video's tier-split fractions.
pub fn commit_tier(outcome: &TierSplitOutcome, store: &dyn PayoutStore) -> Result<(), StoreError> {
    if outcome.status != SolveStatus::Optimal {
        warn!(id = %outcome.id, status = ?outcome.status, "skipping tier persistence");
        return Err(StoreError::NonOptimalStatus);
    }
    store.write_tier_fractions(&outcome.id, outcome.normal_fraction, outcome.premium_fraction)?;
    info!(id = %outcome.id, "persisted tier fractions");
    Ok(())
}
