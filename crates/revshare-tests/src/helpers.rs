//! Shared fixtures and an in-memory payout store.

use std::collections::HashMap;

use parking_lot::Mutex;

use revshare_core::config::PoolConfig;
use revshare_core::error::StoreError;
use revshare_core::traits::PayoutStore;
use revshare_core::types::{EngagementSignals, Video, VideoId};

/// In-memory [`PayoutStore`] recording every committed batch.
#[derive(Default)]
pub struct MemoryStore {
    proportions: Mutex<HashMap<VideoId, f64>>,
    fractions: Mutex<HashMap<VideoId, (f64, f64)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn proportion(&self, id: &VideoId) -> Option<f64> {
        self.proportions.lock().get(id).copied()
    }

    pub fn fractions(&self, id: &VideoId) -> Option<(f64, f64)> {
        self.fractions.lock().get(id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.proportions.lock().is_empty() && self.fractions.lock().is_empty()
    }
}

impl PayoutStore for MemoryStore {
    fn write_pool_proportions(&self, batch: &[(VideoId, f64)]) -> Result<(), StoreError> {
        let mut map = self.proportions.lock();
        for (id, p) in batch {
            map.insert(id.clone(), *p);
        }
        Ok(())
    }

    fn write_tier_fractions(
        &self,
        id: &VideoId,
        normal_fraction: f64,
        premium_fraction: f64,
    ) -> Result<(), StoreError> {
        self.fractions
            .lock()
            .insert(id.clone(), (normal_fraction, premium_fraction));
        Ok(())
    }
}

/// A video whose quality score equals `quality` exactly: with sum-to-one
/// exponents, uniform signals at level q produce Q = q.
pub fn video_with_quality(id: &str, views: u64, quality: f64) -> Video {
    Video::new(id, views, EngagementSignals::uniform(quality, true))
}

/// The three-video pool snapshot used by the acceptance scenarios:
/// one viral low-quality video and two smaller high-quality ones.
pub fn scenario_pool() -> Vec<Video> {
    vec![
        video_with_quality("viral", 1_000_000, 0.2),
        video_with_quality("solid", 100_000, 0.9),
        video_with_quality("gem", 50_000, 0.95),
    ]
}

/// Pool configuration matching the acceptance scenarios: P = 300 000 with
/// the default weights (λ_fair = 0.6, λ_eff = 0.4, α = 0.7).
pub fn scenario_pool_config() -> PoolConfig {
    PoolConfig {
        budget: 300_000.0,
        ..PoolConfig::default()
    }
}
