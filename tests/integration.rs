use spline_engine::geom::{
    BezierBasis, Curve3, ParameterPolicy, Point3, Spline, SplineError, SplineOptions, Tolerance,
    curve_arc_length, tessellate_curve_uniform,
};
use spline_engine::{GeometryItem, SplineEditor, collect_geometry_items};

fn demo_spline() -> Spline {
    let mut spline = Spline::new();
    spline.set_segment_count(2);
    let shape = [
        (1, Point3::new(0.0, 1.0, 0.0)),
        (2, Point3::new(1.0, 1.0, 0.0)),
        (3, Point3::new(1.0, 0.0, 0.0)),
        (4, Point3::new(1.0, -1.0, 0.0)),
        (5, Point3::new(2.0, -1.0, 0.0)),
        (6, Point3::new(2.0, 0.0, 0.0)),
    ];
    for (index, point) in shape {
        spline.set_point(index, point).expect("index in range");
    }
    spline
}

#[test]
fn editor_starts_with_one_segment() {
    let editor = SplineEditor::new();
    assert_eq!(editor.segment_count(), 1);
    assert_eq!(editor.point_count(), 4);
    assert_eq!(
        editor.get_points(),
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0, 3.0, 0.0, 0.0]
    );
}

#[test]
fn editing_session_grows_and_shrinks() {
    let mut editor = SplineEditor::new();
    assert_eq!(editor.set_segment_count(3), 3);
    assert_eq!(editor.point_count(), 10);
    // New segments collapse onto the previous terminal point.
    assert_eq!(&editor.get_points()[27..], &[3.0, 0.0, 0.0]);

    assert!(editor.remove_segment());
    assert!(editor.remove_segment());
    assert!(editor.remove_segment());
    assert!(!editor.remove_segment());
    assert_eq!(editor.get_points(), vec![3.0, 0.0, 0.0]);
}

#[test]
fn demo_chain_is_smooth_and_hits_joints() {
    let spline = demo_spline();
    let tol = Tolerance::new(1e-12);

    assert_eq!(spline.evaluate(0.0), Ok(Point3::new(0.0, 0.0, 0.0)));
    assert_eq!(spline.evaluate(1.0), Ok(Point3::new(1.0, 0.0, 0.0)));
    assert_eq!(spline.evaluate(2.0), Ok(Point3::new(2.0, 0.0, 0.0)));
    assert!(tol.approx_eq_point3(spline.evaluate(0.5).unwrap(), Point3::new(0.5, 0.75, 0.0)));
    assert!(tol.approx_eq_point3(spline.evaluate(1.5).unwrap(), Point3::new(1.5, -0.75, 0.0)));

    assert_eq!(spline.continuity_at_joint(1, tol), Some(1));
}

#[test]
fn tessellation_and_generic_curve_sampling_agree() {
    let spline = demo_spline().with_options(SplineOptions::new().with_basis(BezierBasis::Bernstein));
    let lazy: Vec<Point3> = spline.tessellate(4).collect();
    let generic = tessellate_curve_uniform(&spline, 8);

    assert_eq!(lazy.len(), generic.len());
    let tol = Tolerance::new(1e-12);
    for (a, b) in lazy.iter().zip(&generic) {
        assert!(tol.approx_eq_point3(*a, *b));
    }

    let direct = spline.arc_length(64);
    let generic_length = curve_arc_length(&spline, 128);
    assert!((direct - generic_length).abs() < 1e-9);
    assert_eq!(spline.point_at(1.0), Point3::new(1.0, 0.0, 0.0));
}

#[test]
fn policy_controls_out_of_range_parameters() {
    let spline = demo_spline();
    assert_eq!(
        spline.evaluate(2.5),
        Err(SplineError::OutOfRangeParameter { t: 2.5, segment_count: 2 })
    );

    let clamped =
        spline.with_options(SplineOptions::new().with_parameter_policy(ParameterPolicy::Clamp));
    assert_eq!(clamped.evaluate(2.5), Ok(Point3::new(2.0, 0.0, 0.0)));
    assert_eq!(
        SplineError::OutOfRangeParameter { t: 2.5, segment_count: 2 }.to_string(),
        "parameter 2.5 is outside the spline domain [0, 2]"
    );
}

#[test]
fn geometry_export_for_demo_chain() {
    let spline = demo_spline();
    let items = collect_geometry_items(&spline, 1.0, 2);

    let anchors = items
        .iter()
        .filter(|item| matches!(item, GeometryItem::Point { .. }))
        .count();
    let lines = items
        .iter()
        .filter(|item| matches!(item, GeometryItem::Line { .. }))
        .count();
    // Three anchors plus the tracking point.
    assert_eq!(anchors, 4);
    assert_eq!(lines, 4);
    assert_eq!(
        items.last(),
        Some(&GeometryItem::Point { coordinates: [2.0, 0.0, 0.0] })
    );
}
