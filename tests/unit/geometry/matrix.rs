use super::*;

#[test]
fn identity_maps_points_unchanged() {
    let m = Matrix::identity();
    assert_eq!(m.transform_point(Point::new(12.5, -3.0)), Point::new(12.5, -3.0));
}

#[test]
fn concatenate_applies_argument_first() {
    let mut m = Matrix::scale(2.0, 2.0);
    m.concatenate(&Matrix::translation(10, 0));
    // translate first, then scale
    assert_eq!(m.transform_point(Point::new(1.0, 1.0)), Point::new(22.0, 2.0));

    let mut n = Matrix::translation(10, 0);
    n.concatenate(&Matrix::scale(2.0, 2.0));
    assert_eq!(n.transform_point(Point::new(1.0, 1.0)), Point::new(12.0, 2.0));
}

#[test]
fn set_scale_keeps_translation() {
    let mut m = Matrix::translation(5, 7);
    m.set_scale(0.5, 3.0);
    assert_eq!(m.tx, 5);
    assert_eq!(m.ty, 7);
    assert!((m.x_scale() - 0.5).abs() < 1e-4);
    assert!((m.y_scale() - 3.0).abs() < 1e-4);
}

#[test]
fn invert_round_trips() {
    let mut m = Matrix::scale(4.0, 2.0);
    m.set_translation(100.0, -40.0);
    let inv = m.invert().expect("invertible");
    let p = Point::new(3.0, 9.0);
    let back = inv.transform_point(m.transform_point(p));
    assert!((back.x - p.x).abs() < 1e-3);
    assert!((back.y - p.y).abs() < 1e-3);
}

#[test]
fn singular_matrix_has_no_inverse() {
    assert_eq!(Matrix::scale(0.0, 1.0).invert(), None);
}

#[test]
fn transform_rect_bounds_rotation() {
    let m = Matrix::from_affine(Affine::rotate(std::f64::consts::FRAC_PI_2));
    let r = m.transform_rect(Rect::new(0.0, 0.0, 10.0, 20.0));
    assert!((r.x0 + 20.0).abs() < 1e-3);
    assert!((r.x1 - 0.0).abs() < 1e-3);
    assert!((r.y1 - 10.0).abs() < 1e-3);
}

#[test]
fn serde_round_trip_keeps_fixed_fields() {
    let m = Matrix::scale(1.5, 0.25);
    let json = serde_json::to_string(&m).unwrap();
    let back: Matrix = serde_json::from_str(&json).unwrap();
    assert_eq!(back, m);
}

#[test]
fn relative_error_tracks_smallest_coefficient() {
    assert_eq!(Matrix::identity().relative_error(), 0.5 / 65536.0);
    let twips = Matrix::scale(0.05, 0.05);
    assert_eq!(twips.a, 3277);
    assert_eq!(twips.relative_error(), 0.5 / 3277.0);
    assert_eq!(Matrix::scale(0.0, 0.0).relative_error(), 0.0);
}
