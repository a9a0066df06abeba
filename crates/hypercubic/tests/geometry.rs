//! Geometric properties of hypercubes.

use approx::assert_abs_diff_eq;
use proptest::prelude::*;

use hypercubic::testing::uniform_dataset;
use hypercubic::{BoundaryKind, Direction, Expansion, HyperCube, Interval, OutputKind, Point};

// =============================================================================
// Generators
// =============================================================================

/// Bounds on a 1/1000 lattice, at least one step wide.
fn arb_bounds() -> impl Strategy<Value = (f64, f64)> {
    (0u32..1000, 1u32..500).prop_map(|(lo, w)| (lo as f64 / 1000.0, (lo + w) as f64 / 1000.0))
}

fn arb_cube() -> impl Strategy<Value = HyperCube> {
    (arb_bounds(), arb_bounds()).prop_map(|(x, y)| HyperCube::constant([("x", x), ("y", y)], 0.0))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn overlap_is_symmetric(a in arb_cube(), b in arb_cube()) {
        prop_assert_eq!(a.overlap(&b).unwrap(), b.overlap(&a).unwrap());
    }

    #[test]
    fn cube_never_overlaps_itself(a in arb_cube()) {
        prop_assert!(!a.overlap(&a).unwrap());
        // A distinct instance with the same bounds does overlap.
        prop_assert!(a.overlap(&a.clone()).unwrap());
    }

    #[test]
    fn merge_along_dimension_is_the_union(
        lo in 0u32..300,
        w1 in 1u32..300,
        w2 in 1u32..300,
        y in arb_bounds(),
    ) {
        let (lo, mid, hi) = (lo as f64 / 1000.0, (lo + w1) as f64 / 1000.0, (lo + w1 + w2) as f64 / 1000.0);
        let a = HyperCube::constant([("x", (lo, mid)), ("y", y)], 1.0);
        let b = HyperCube::constant([("x", (mid, hi)), ("y", y)], 2.0);

        prop_assert_eq!(a.is_adjacent(&b).unwrap(), Some("x".to_string()));
        let merged = a.merge_along_dimension(&b, "x").unwrap();
        let x = merged.get("x").unwrap();
        prop_assert!((x.lower() - lo).abs() < 1e-9 && (x.upper() - hi).abs() < 1e-9);
        prop_assert_eq!(merged.get("y").unwrap(), a.get("y").unwrap());
    }

    #[test]
    fn surrounding_cube_counts_every_row(seed in any::<u64>(), rows in 1usize..60) {
        let ds = uniform_dataset(rows, 3, seed);
        let cube = HyperCube::create_surrounding_cube(&ds, OutputKind::Constant, BoundaryKind::HalfOpen).unwrap();
        prop_assert_eq!(cube.count(&ds).unwrap(), ds.n_samples());
        for (col, name) in ds.feature_names().iter().enumerate() {
            let (min, max) = ds.column_bounds(col).unwrap();
            let bounds = cube.get(name).unwrap();
            prop_assert!((bounds.lower() - (min - 2e-6)).abs() <= 1e-6);
            prop_assert!((bounds.upper() - (max + 2e-6)).abs() <= 1e-6);
        }
    }

    #[test]
    fn clamped_expansion_never_crosses_the_neighbour(amount in 0.0f64..2.0) {
        let neighbour = HyperCube::constant([("x", (0.7, 0.8)), ("y", (0.75, 0.85))], 0.0);
        let mut cube = HyperCube::constant([("x", (0.2, 0.6)), ("y", (0.7, 0.9))], 0.0);
        let expansion = Expansion::by_amount(&cube, "x", Direction::Positive, amount).unwrap();
        cube.expand(&expansion, std::slice::from_ref(&neighbour)).unwrap();

        let x = cube.get("x").unwrap();
        prop_assert!(x.upper() <= 0.7 + 1e-9);
        prop_assert!(x.upper() >= 0.6 - 1e-9);
        prop_assert!(!cube.overlap(&neighbour).unwrap());
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn half_open_and_closed_disagree_only_on_the_upper_face() {
    let half_open = HyperCube::constant([("x", (0.0, 1.0)), ("y", (0.0, 1.0))], 0.0);
    let closed = half_open.clone().with_boundary(BoundaryKind::Closed);

    let upper = Point::new(["x", "y"], [1.0, 0.5]);
    let lower = Point::new(["x", "y"], [0.0, 0.5]);
    assert!(!half_open.contains(&upper).unwrap());
    assert!(closed.contains(&upper).unwrap());
    assert!(half_open.contains(&lower).unwrap());
    assert!(closed.contains(&lower).unwrap());
}

#[test]
fn expansion_away_from_the_neighbour_keeps_the_facing_bound() {
    let neighbour = HyperCube::constant([("x", (0.7, 0.8)), ("y", (0.75, 0.85))], 0.0);
    let mut cube = HyperCube::constant([("x", (0.2, 0.6)), ("y", (0.7, 0.9))], 0.0);

    let expansion = Expansion::by_amount(&cube, "x", Direction::Negative, 0.1).unwrap();
    cube.expand(&expansion, std::slice::from_ref(&neighbour)).unwrap();
    assert_abs_diff_eq!(cube.get("x").unwrap(), Interval::new(0.1, 0.6), epsilon = 1e-9);

    let expansion = Expansion::by_amount(&cube, "x", Direction::Positive, 0.3).unwrap();
    cube.expand(&expansion, std::slice::from_ref(&neighbour)).unwrap();
    assert_abs_diff_eq!(cube.get("x").unwrap(), Interval::new(0.1, 0.7), epsilon = 1e-9);
}

#[test]
fn missing_feature_is_reported() {
    let cube = HyperCube::constant([("x", (0.0, 1.0))], 0.0);
    let point = Point::new(["y"], [0.5]);
    let err = cube.contains(&point).unwrap_err();
    assert_eq!(err.to_string(), "feature 'x' not found");
}
