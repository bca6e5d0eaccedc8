use dtin::{DtConfig, DuplicateHandling, InterpolationMethod, Location, DT};

/// S1 -- square with centre, duplicate policy.
#[test]
fn square_with_centre_duplicate_policy() {
    let mut dt = DT::new();
    dt.insert(&[
        [0.0, 0.0, 1.0],
        [10.0, 0.0, 2.0],
        [10.0, 10.0, 3.0],
        [0.0, 10.0, 4.0],
        [5.0, 5.0, 10.0],
    ])
    .unwrap();
    assert_eq!(dt.number_of_vertices(), 5);
    assert_eq!(dt.number_of_triangles(), 4);
    assert_eq!(dt.convex_hull().len(), 4);

    // exact-coordinate re-insertion snaps to the existing vertex; under the
    // default `First` policy its elevation does not change.
    let resnap = dt.insert_one_pt([5.0, 5.0, 11.0]).unwrap();
    assert_eq!(resnap, (5, false, false));
    assert_eq!(dt.get_point(5).unwrap()[2], 10.0);

    dt.config_mut().on_duplicate = DuplicateHandling::Highest;
    let resnap2 = dt.insert_one_pt([5.0, 5.0, 11.0]).unwrap();
    assert_eq!(resnap2, (5, false, true));
    assert_eq!(dt.get_point(5).unwrap()[2], 11.0);
}

/// S2 -- snap tolerance.
#[test]
fn snap_tolerance() {
    let mut dt = DT::with_config(DtConfig {
        snap_tolerance: 0.1,
        ..DtConfig::default()
    });
    dt.insert(&[
        [0.0, 0.0, 1.0],
        [10.0, 0.0, 2.0],
        [10.0, 10.0, 3.0],
        [0.0, 10.0, 4.0],
        [5.0, 5.0, 10.0],
    ])
    .unwrap();

    let (within, inserted, z_updated) = dt.insert_one_pt([10.09, 0.0, 20.0]).unwrap();
    assert_eq!((within, inserted, z_updated), (2, false, false));

    let (outside, inserted, _) = dt.insert_one_pt([10.11, 0.0, 20.0]).unwrap();
    assert_ne!(outside, 2);
    assert!(inserted);
    assert_eq!(dt.number_of_vertices(), 6);
}

/// S3 -- collinear bootstrap, then remove back to bootstrap.
#[test]
fn collinear_bootstrap_then_remove() {
    let mut dt = DT::new();
    dt.insert(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]).unwrap();
    assert_eq!(dt.number_of_vertices(), 3);
    assert_eq!(dt.number_of_triangles(), 0);

    let (apex, inserted, _) = dt.insert_one_pt([2.0, 1.0, 0.0]).unwrap();
    assert!(inserted);
    assert_eq!(dt.number_of_vertices(), 4);
    assert_eq!(dt.number_of_triangles(), 2);

    dt.remove(apex).unwrap();
    assert_eq!(dt.number_of_vertices(), 3);
    assert_eq!(dt.number_of_triangles(), 0);
}

/// S4 -- interpolation over the square of four corner elevations, queried at
/// the centre `(5,5)`.
///
/// `(5,5)` sits exactly on the diagonal edge `(1,3)` chosen by this
/// insertion order's bootstrap triangulation, with barycentric weights
/// `(0.5, 0.5, 0.0)` on that triangle's corners -- so TIN-linear must give
/// the plain average of the two diagonal endpoints' elevations, `2.0`, not
/// `3.0` as if the query were attributed wholesale to the third corner. Since
/// all four corners of this axis-aligned square are concyclic, Laplace and
/// Sibson both see all four corners as natural neighbours regardless of
/// which diagonal the bootstrap picked, giving the symmetric `2.5`.
#[test]
fn interpolation_over_square() {
    let mut dt = DT::new();
    dt.insert(&[
        [0.0, 0.0, 1.0],
        [10.0, 0.0, 2.0],
        [10.0, 10.0, 3.0],
        [0.0, 10.0, 4.0],
    ])
    .unwrap();

    let tin = dt.interpolate(5.0, 5.0, InterpolationMethod::TinLinear).unwrap();
    assert!((tin - 2.0).abs() < 1e-9, "expected 2.0, got {}", tin);

    let laplace = dt.interpolate(5.0, 5.0, InterpolationMethod::Laplace).unwrap();
    assert!((laplace - 2.5).abs() < 1e-9, "expected 2.5, got {}", laplace);

    let nni = dt.interpolate(5.0, 5.0, InterpolationMethod::Sibson).unwrap();
    assert!((nni - 2.5).abs() < 1e-9, "expected 2.5, got {}", nni);
}

/// A query strictly inside one triangle (off the diagonal), hand-checkable
/// against its barycentric weights.
#[test]
fn interpolation_strictly_inside_one_triangle() {
    let mut dt = DT::new();
    dt.insert(&[
        [0.0, 0.0, 1.0],
        [10.0, 0.0, 2.0],
        [10.0, 10.0, 3.0],
        [0.0, 10.0, 4.0],
    ])
    .unwrap();

    // (7,3) lies in the triangle (0,0)-(10,0)-(10,10) with barycentric
    // weights (0.3, 0.4, 0.3) against z = (1, 2, 3), giving exactly 2.0.
    let tin = dt.interpolate(7.0, 3.0, InterpolationMethod::TinLinear).unwrap();
    assert!((tin - 2.0).abs() < 1e-9);

    let laplace = dt.interpolate(7.0, 3.0, InterpolationMethod::Laplace).unwrap();
    assert!((laplace - 2.0).abs() < 0.05);

    let nni = dt.interpolate(7.0, 3.0, InterpolationMethod::Sibson).unwrap();
    assert!((nni - 2.0).abs() < 0.05);
}

/// Any interpolation method returns a vertex's own elevation exactly when
/// queried at that vertex's location.
#[test]
fn interpolation_is_exact_at_vertices() {
    let mut dt = DT::new();
    let ids = dt
        .insert(&[
            [0.0, 0.0, 1.0],
            [10.0, 0.0, 2.0],
            [10.0, 10.0, 3.0],
            [0.0, 10.0, 4.0],
        ])
        .unwrap();

    for &(v, ..) in &ids {
        let (x, y, z) = {
            let p = dt.get_point(v).unwrap();
            (p[0], p[1], p[2])
        };
        for method in [
            InterpolationMethod::NearestNeighbour,
            InterpolationMethod::TinLinear,
            InterpolationMethod::Laplace,
            InterpolationMethod::Sibson,
        ] {
            let got = dt.interpolate(x, y, method).unwrap();
            assert!((got - z).abs() < 1e-9, "method {:?} at vertex {} expected {} got {}", method, v, z, got);
        }
    }
}

/// S5 -- inverse distance weighting with a finite radius.
#[test]
fn idw_radius() {
    let mut dt = DT::new();
    dt.insert(&[
        [0.0, 0.0, 1.0],
        [10.0, 0.0, 2.0],
        [10.0, 10.0, 3.0],
        [0.0, 10.0, 4.0],
    ])
    .unwrap();

    let near_corner = dt
        .interpolate(9.0, 9.0, InterpolationMethod::Idw { radius: 3.0, power: 2.0 })
        .unwrap();
    assert!((near_corner - 3.0).abs() < 1e-9);

    let centre = dt
        .interpolate(5.0, 5.0, InterpolationMethod::Idw { radius: 3.0, power: 2.0 })
        .unwrap();
    assert!(centre.is_nan());
}

/// S6 -- removing hull vertices one at a time collapses the mesh correctly.
#[test]
fn remove_hull_vertices() {
    let mut dt = DT::new();
    dt.insert(&[
        [0.0, 0.0, 12.5],
        [1.0, 0.0, 7.65],
        [1.0, 1.0, 33.0],
        [0.0, 1.0, 21.0],
    ])
    .unwrap();
    assert_eq!(dt.number_of_vertices(), 4);
    assert_eq!(dt.number_of_triangles(), 2);

    dt.remove(3).unwrap();
    assert_eq!(dt.number_of_vertices(), 3);
    assert_eq!(dt.number_of_triangles(), 1);

    dt.remove(2).unwrap();
    assert_eq!(dt.number_of_vertices(), 2);
    assert_eq!(dt.number_of_triangles(), 0);
}

#[test]
fn locate_outside_hull_extends_it() {
    let mut dt = DT::new();
    dt.insert(&[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [0.0, 10.0, 0.0]]).unwrap();
    assert!(matches!(dt.locate(100.0, 100.0), Location::Outside(_)));

    dt.insert_one_pt([20.0, 20.0, 5.0]).unwrap();
    assert_eq!(dt.convex_hull().len(), 4);
}

/// `InsertStrategy::BBox` inserts four padded sentinel corners ahead of the
/// caller's points and keeps them.
#[test]
fn bbox_strategy_prepends_sentinel_corners() {
    use dtin::InsertStrategy;

    let mut dt = DT::new();
    let results = dt
        .insert_with_strategy(
            &[[0.0, 0.0, 1.0], [10.0, 0.0, 2.0], [10.0, 10.0, 3.0], [0.0, 10.0, 4.0]],
            InsertStrategy::BBox,
        )
        .unwrap();
    assert_eq!(results.len(), 4);
    assert_eq!(results[0].0, 5);
    assert_eq!(dt.number_of_vertices(), 8);
    assert!(dt.is_inside_convex_hull(5.0, 5.0));
}
