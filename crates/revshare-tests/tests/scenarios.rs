//! Acceptance scenarios for the pool and tier-split formulations.

use revshare_core::config::TierSplitConfig;
use revshare_core::error::AllocationError;
use revshare_core::model::SolveStatus;
use revshare_core::types::TierSplitRequest;
use revshare_engine::{persist, PoolAllocator, TierSplitOptimizer};
use revshare_simplex::SimplexBackend;
use revshare_tests::helpers::*;

const TOL: f64 = 1e-6;

/// Scenario A: fairness tilts the pool toward quality while efficiency
/// preserves a non-trivial slice for the viral video, and the budget is
/// distributed exactly.
#[test]
fn pool_fairness_vs_efficiency_balance() {
    let allocator = PoolAllocator::new(scenario_pool_config()).unwrap();
    let videos = scenario_pool();
    let outcome = allocator.allocate(&videos, &SimplexBackend::new()).unwrap();
    assert_eq!(outcome.status, SolveStatus::Optimal);

    let total = outcome.total_payout();
    assert!(
        (total - 300_000.0).abs() <= 300_000.0 * 1e-6,
        "budget not fully distributed: {total}"
    );

    let total_views: u64 = videos.iter().map(|v| v.views).sum();
    let gem = outcome.payout_for(&"gem".into()).unwrap();
    let gem_view_share = 50_000.0 / total_views as f64;
    assert!(
        gem.proportion > 2.0 * gem_view_share,
        "fairness term should lift the high-quality video well beyond its \
         {gem_view_share:.4} view share, got {:.4}",
        gem.proportion
    );

    let viral = outcome.payout_for(&"viral".into()).unwrap();
    assert!(
        viral.proportion > 0.25,
        "efficiency term should preserve a floor share for the viral video, got {:.4}",
        viral.proportion
    );

    for payout in &outcome.payouts {
        assert!(payout.payout >= -TOL);
        assert!(payout.proportion >= -TOL && payout.proportion <= 1.0 + TOL);
    }
}

/// Scenario B: floors summing past the budget must fail as infeasible with
/// no persisted write.
#[test]
fn pool_floors_above_budget_infeasible_and_unpersisted() {
    let allocator = PoolAllocator::new(scenario_pool_config()).unwrap();
    let videos: Vec<_> = scenario_pool()
        .into_iter()
        .map(|v| v.with_floor(200_000.0))
        .collect();
    let store = MemoryStore::new();

    let err = allocator.allocate(&videos, &SimplexBackend::new()).unwrap_err();
    match err {
        AllocationError::Infeasible(reason) => {
            assert!(reason.contains("budget below floor sum"), "{reason}");
        }
        other => panic!("expected Infeasible, got {other:?}"),
    }
    assert!(store.is_empty(), "no partial results may be persisted");
}

/// Scenario C: the tier split honors the premium gap and the platform
/// revenue floor.
#[test]
fn tier_split_gap_and_revenue_floor() {
    let optimizer = TierSplitOptimizer::new(TierSplitConfig::default()).unwrap();
    let request = TierSplitRequest::new("v1", 1200.0, 600.0, 0.7);
    let out = optimizer.optimize(&request, &SimplexBackend::new()).unwrap();

    assert_eq!(out.status, SolveStatus::Optimal);
    assert!(
        out.premium_fraction >= out.normal_fraction + 0.05 - TOL,
        "premium must out-pay normal by at least 0.05, gap {}",
        out.premium_gap()
    );
    assert!(out.premium_gap() <= 0.35 + TOL);
    assert!(
        out.retained_revenue >= 180.0 - TOL,
        "platform retains at least 10% of 1800, got {}",
        out.retained_revenue
    );
    assert!((out.creator_payout + out.retained_revenue - 1800.0).abs() < 1e-9);
}

/// A full pool run ends in a persisted batch of proportions.
#[test]
fn pool_run_persists_proportions_end_to_end() {
    let allocator = PoolAllocator::new(scenario_pool_config()).unwrap();
    let outcome = allocator
        .allocate(&scenario_pool(), &SimplexBackend::new())
        .unwrap();
    let store = MemoryStore::new();
    persist::commit_pool(&outcome, &store).unwrap();

    let sum: f64 = ["viral", "solid", "gem"]
        .iter()
        .map(|id| store.proportion(&(*id).into()).unwrap())
        .sum();
    assert!((sum - 1.0).abs() < 1e-6);
}

/// A full tier run ends with the fraction pair written once.
#[test]
fn tier_run_persists_fractions_end_to_end() {
    let optimizer = TierSplitOptimizer::new(TierSplitConfig::default()).unwrap();
    let out = optimizer
        .optimize(
            &TierSplitRequest::new("v1", 1200.0, 600.0, 0.7),
            &SimplexBackend::new(),
        )
        .unwrap();
    let store = MemoryStore::new();
    persist::commit_tier(&out, &store).unwrap();
    assert_eq!(
        store.fractions(&"v1".into()),
        Some((out.normal_fraction, out.premium_fraction))
    );
}
