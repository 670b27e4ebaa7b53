//! Comparison Engine Integration Tests
//!
//! Drives `ComparisonService` end to end against an in-memory catalog, plus a
//! load of the sample CSV catalog shipped in `data/`.

use approx::assert_relative_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::path::PathBuf;
use std::sync::Arc;
use vehicle_compare::scorer::aggregate_score;
use vehicle_compare::{
    CompareError, ComparisonRequest, ComparisonService, CriteriaRegistry, Criterion,
    SnapshotProvider, VariantCatalog, VariantSnapshot,
};

fn service_over(snapshots: Vec<VariantSnapshot>) -> ComparisonService {
    ComparisonService::new(
        CriteriaRegistry::standard(),
        Arc::new(VariantCatalog::from_snapshots(snapshots)),
    )
}

fn scenario_service() -> ComparisonService {
    service_over(vec![
        VariantSnapshot::new(1, "A")
            .with_price(30000.0)
            .with_range(400.0)
            .with_power(200.0)
            .with_acceleration(6.0),
        VariantSnapshot::new(2, "B")
            .with_price(35000.0)
            .with_range(450.0)
            .with_power(250.0)
            .with_acceleration(5.0),
    ])
}

/// Random catalog drawing from few distinct values so that ties occur
fn random_catalog(rng: &mut StdRng, n: i64) -> Vec<VariantSnapshot> {
    const PRICES: [f64; 3] = [30000.0, 35000.0, 40000.0];
    const RANGES: [f64; 3] = [350.0, 420.0, 500.0];
    (1..=n)
        .map(|id| {
            VariantSnapshot::new(id, format!("Variant {}", id))
                .with_price(PRICES[rng.gen_range(0..PRICES.len())])
                .with_range(RANGES[rng.gen_range(0..RANGES.len())])
                .with_power(rng.gen_range(100.0..400.0))
                .with_acceleration(rng.gen_range(3.0..9.0))
                .with_top_speed(rng.gen_range(140.0..260.0))
                .with_battery(rng.gen_range(40.0..110.0))
                .with_charging_time(rng.gen_range(0.4..1.2))
                .with_in_stock(rng.gen_bool(0.5))
        })
        .collect()
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn test_two_variant_default_scenario() {
    let result = scenario_service().compare(&ComparisonRequest::new(vec![1, 2])).unwrap();

    let a = result.row(1).unwrap();
    let b = result.row(2).unwrap();

    for (criterion, expected_a, expected_b) in [
        (Criterion::Price, 1.0, 0.0),
        (Criterion::Range, 0.0, 1.0),
        (Criterion::Power, 0.0, 1.0),
        (Criterion::Acceleration, 0.0, 1.0),
    ] {
        assert_eq!(a.score(criterion), Some(expected_a), "A {:?}", criterion);
        assert_eq!(b.score(criterion), Some(expected_b), "B {:?}", criterion);
    }

    assert_relative_eq!(a.aggregate_score, 0.25, epsilon = 1e-12);
    assert_relative_eq!(b.aggregate_score, 0.75, epsilon = 1e-12);
    assert_eq!((b.rank, a.rank), (1, 2));
    assert_eq!(result.best_value_id, 2);
    assert_eq!(result.winner(Criterion::Price), Some(1));
    assert_eq!(result.winner(Criterion::Range), Some(2));
    assert_eq!(result.winner(Criterion::Power), Some(2));
    assert_eq!(result.winner(Criterion::Acceleration), Some(2));
}

#[test]
fn test_quick_and_two_way_agree_with_full_defaults() {
    let service = scenario_service();
    let full = service.compare(&ComparisonRequest::new(vec![1, 2])).unwrap();
    let quick = service.quick_compare(&[1, 2]).unwrap();
    let pair = service.compare_two(2, 1).unwrap();

    assert_eq!(full, quick);
    assert_eq!(quick.ranked_ids(), pair.ranked_ids());
    assert_eq!(pair.best_value_id, 2);
}

#[test]
fn test_partially_missing_request_proceeds() {
    let result = scenario_service().quick_compare(&[1, 2, 3]).unwrap();
    let mut ids = result.ranked_ids();
    ids.sort();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn test_single_resolvable_identifier_is_rejected() {
    let err = scenario_service().quick_compare(&[1, 40, 41]).unwrap_err();
    assert!(matches!(err, CompareError::InsufficientVariants { resolved: 1, .. }));
    assert!(err.is_client_error());

    let err = scenario_service().quick_compare(&[40, 41]).unwrap_err();
    assert!(matches!(err, CompareError::AllVariantsUnresolved { .. }));
}

#[test]
fn test_six_identifiers_rejected() {
    let err = scenario_service()
        .compare(&ComparisonRequest::new(vec![1, 2, 3, 4, 5, 6]))
        .unwrap_err();
    assert!(matches!(err, CompareError::TooManyVehicles { max: 5, actual: 6 }));
    assert!(err.to_string().contains('5'));
}

#[test]
fn test_identical_variants_rank_by_identifier() {
    let twin = |id| {
        VariantSnapshot::new(id, "Twin")
            .with_price(39900.0)
            .with_range(480.0)
            .with_power(280.0)
            .with_acceleration(4.8)
    };
    let service = service_over(vec![twin(12), twin(4), twin(30)]);

    let result = service.quick_compare(&[30, 12, 4]).unwrap();
    assert_eq!(result.ranked_ids(), vec![4, 12, 30]);
    assert_eq!(result.best_value_id, 4);
    for row in &result.rows {
        for score in &row.scores {
            assert_eq!(score.normalized_score, 1.0);
        }
    }
}

// =========================================================================
// Properties over random catalogs
// =========================================================================

#[test]
fn test_ranks_are_dense_and_scores_bounded() {
    let mut rng = StdRng::seed_from_u64(7);
    let all_criteria: Vec<&str> = CriteriaRegistry::standard().all().iter().map(|d| d.name).collect();

    for _ in 0..200 {
        let catalog = random_catalog(&mut rng, 8);
        let service = service_over(catalog);

        let k = rng.gen_range(2..=5);
        let ids: Vec<i64> = (0..k).map(|_| rng.gen_range(1..=10)).collect();
        let request = ComparisonRequest::new(ids.clone()).with_criteria(all_criteria.clone());

        let result = match service.compare(&request) {
            Ok(result) => result,
            // Duplicates or ids 9/10 can leave fewer than two variants
            Err(CompareError::TooFewVehicles { .. })
            | Err(CompareError::InsufficientVariants { .. })
            | Err(CompareError::AllVariantsUnresolved { .. }) => continue,
            Err(e) => panic!("unexpected error: {}", e),
        };

        let mut ranks: Vec<usize> = result.rows.iter().map(|r| r.rank).collect();
        ranks.sort();
        assert_eq!(ranks, (1..=result.rows.len()).collect::<Vec<_>>());

        for pair in result.rows.windows(2) {
            let (hi, lo) = (&pair[0], &pair[1]);
            assert!(hi.aggregate_score >= lo.aggregate_score);
            if hi.aggregate_score == lo.aggregate_score {
                assert!(hi.variant.id < lo.variant.id);
            }
        }

        for (i, criterion) in result.criteria.iter().enumerate() {
            let scores: Vec<f64> = result.rows.iter().map(|r| r.scores[i].normalized_score).collect();
            assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));

            let raws: Vec<Option<f64>> = result.rows.iter().map(|r| r.scores[i].raw_value).collect();
            if raws.windows(2).all(|w| w[0] == w[1]) {
                assert!(scores.iter().all(|&s| s == 1.0), "tie on {:?}", criterion.criterion);
            }
        }

        assert_eq!(result.best_value_id, result.rows[0].variant.id);
    }
}

#[test]
fn test_aggregate_is_monotonic_in_each_score() {
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..500 {
        let n = rng.gen_range(1..=8);
        let scores: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..=1.0)).collect();
        let weights: Vec<f64> = (0..n).map(|_| rng.gen_range(0.1..5.0)).collect();
        let base = aggregate_score(&scores, &weights);
        assert!((0.0..=1.0).contains(&base));

        let i = rng.gen_range(0..n);
        let mut raised = scores.clone();
        raised[i] = rng.gen_range(scores[i]..=1.0);
        assert!(aggregate_score(&raised, &weights) >= base - 1e-12);
    }
}

// =========================================================================
// Catalog loading
// =========================================================================

fn sample_catalog_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/variants.csv")
}

#[test]
fn test_sample_csv_catalog_loads() {
    let catalog = VariantCatalog::load(&sample_catalog_path()).unwrap();
    assert_eq!(catalog.len(), 8);

    let city = catalog.get(8).unwrap();
    assert_eq!(city.name, "City One");
    assert_eq!(city.charging_time_h, None);
    assert_eq!(city.model_name.as_deref(), Some("City"));

    let available: Vec<i64> = catalog.list_available().unwrap().iter().map(|v| v.id).collect();
    assert_eq!(available, vec![1, 2, 4, 5, 6, 8]);
}

#[test]
fn test_sample_catalog_comparison() {
    let catalog = VariantCatalog::load(&sample_catalog_path()).unwrap();
    let service = ComparisonService::new(CriteriaRegistry::standard(), Arc::new(catalog));

    let request = ComparisonRequest::new(vec![4, 8, 1]).with_criteria(["price", "charging_time"]);
    let result = service.compare(&request).unwrap();

    // City One is cheapest but has no charging time on record
    let city = result.row(8).unwrap();
    assert_eq!(city.score(Criterion::Price), Some(1.0));
    assert_eq!(city.score(Criterion::ChargingTime), Some(0.0));
    assert_eq!(result.winner(Criterion::ChargingTime), Some(4));
}
