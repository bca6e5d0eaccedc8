use dtin::DT;

/// Euler relation for a triangulated point set: `|T| = 2n - h - 2`, where
/// `h` is the number of hull vertices, for any set of >= 3 non-collinear
/// points inserted without duplicates.
#[test]
fn euler_relation_holds_for_random_like_point_sets() {
    let grids: Vec<Vec<[f64; 3]>> = vec![
        // a 4x4 grid, deliberately irregular so no two rows/cols coincide
        (0..4)
            .flat_map(|i| (0..4).map(move |j| [i as f64 * 1.7, j as f64 * 2.3, (i * 4 + j) as f64]))
            .collect(),
        vec![
            [0.0, 0.0, 0.0],
            [5.0, 0.0, 1.0],
            [5.0, 5.0, 2.0],
            [0.0, 5.0, 3.0],
            [2.0, 2.0, 4.0],
            [1.0, 4.0, 5.0],
            [4.0, 1.0, 6.0],
        ],
    ];

    for points in grids {
        let mut dt = DT::new();
        dt.insert(&points).unwrap();
        let n = dt.number_of_vertices();
        let h = dt.convex_hull().len();
        assert_eq!(dt.number_of_triangles(), 2 * n - h - 2);
    }
}

/// Removing the most recently inserted vertex restores the triangle count
/// that preceded its insertion (the mesh is topologically reversible for a
/// single insert/remove pair, even though triangle identities may differ).
#[test]
fn insert_then_remove_restores_triangle_count() {
    let mut dt = DT::new();
    dt.insert(&[
        [0.0, 0.0, 0.0],
        [10.0, 0.0, 1.0],
        [10.0, 10.0, 2.0],
        [0.0, 10.0, 3.0],
    ])
    .unwrap();
    let before_vertices = dt.number_of_vertices();
    let before_triangles = dt.number_of_triangles();

    let (v, ..) = dt.insert_one_pt([4.0, 6.0, 9.0]).unwrap();
    assert!(dt.number_of_triangles() > before_triangles);

    dt.remove(v).unwrap();
    assert_eq!(dt.number_of_vertices(), before_vertices);
    assert_eq!(dt.number_of_triangles(), before_triangles);
}

/// `collect_garbage` does not change the live vertex/triangle counts, and
/// previously-live vertex coordinates survive the remap (looked up by their
/// freshly remapped indices).
#[test]
fn collect_garbage_preserves_live_topology() {
    let mut dt = DT::new();
    let ids = dt
        .insert(&[
            [0.0, 0.0, 0.0],
            [10.0, 0.0, 1.0],
            [10.0, 10.0, 2.0],
            [0.0, 10.0, 3.0],
            [5.0, 5.0, 4.0],
        ])
        .unwrap();

    dt.remove(ids[4].0).unwrap();
    let n_before = dt.number_of_vertices();
    let t_before = dt.number_of_triangles();

    let mut surviving_points: Vec<[f64; 3]> = ids[..4].iter().map(|&(v, ..)| dt.get_point(v).unwrap()).collect();
    surviving_points.sort_by(|a, b| a.partial_cmp(b).unwrap());

    dt.collect_garbage();

    assert_eq!(dt.number_of_vertices(), n_before);
    assert_eq!(dt.number_of_triangles(), t_before);

    let mut points_after: Vec<[f64; 3]> = (1..=dt.number_of_vertices()).map(|v| dt.get_point(v).unwrap()).collect();
    points_after.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(surviving_points, points_after);
}

/// The infinite vertex is never part of the convex hull, and attempting to
/// read or remove it is rejected rather than panicking.
#[test]
fn infinite_vertex_is_never_exposed() {
    let mut dt = DT::new();
    dt.insert(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]).unwrap();
    assert!(!dt.convex_hull().contains(&0));
    assert!(matches!(dt.get_point(0), Err(dtin::DtError::InfiniteVertex)));
    assert!(matches!(dt.remove(0), Err(dtin::DtError::InfiniteVertex)));
}

/// A query outside the convex hull yields `NaN` by default, and a hard
/// error once `strict` is enabled.
#[test]
fn strict_mode_turns_out_of_hull_queries_into_errors() {
    let mut dt = DT::new();
    dt.insert(&[[0.0, 0.0, 1.0], [10.0, 0.0, 2.0], [0.0, 10.0, 3.0]]).unwrap();

    let lax = dt.interpolate(1000.0, 1000.0, dtin::InterpolationMethod::TinLinear).unwrap();
    assert!(lax.is_nan());

    dt.config_mut().strict = true;
    let err = dt.interpolate(1000.0, 1000.0, dtin::InterpolationMethod::TinLinear);
    assert!(err.is_err());
}
