use super::*;

#[test]
fn identity_is_noop() {
    let c = Rgba::new(1, 2, 3, 4);
    assert!(Cxform::identity().is_identity());
    assert_eq!(Cxform::identity().transform(c), c);
}

#[test]
fn multiplies_then_adds_with_clamping() {
    let cx = Cxform {
        ra: 128,
        rb: 10,
        gb: 300,
        bb: -300,
        ..Cxform::identity()
    };
    let out = cx.transform(Rgba::new(200, 20, 20, 255));
    assert_eq!(out, Rgba::new(110, 255, 0, 255));
}

#[test]
fn alpha_only_transform() {
    let out = Cxform::alpha(128).transform(Rgba::opaque(9, 9, 9));
    assert_eq!(out, Rgba::new(9, 9, 9, 127));
}

#[test]
fn missing_json_fields_default_to_identity() {
    let cx: Cxform = serde_json::from_str(r#"{"aa":64}"#).unwrap();
    assert_eq!(cx.ra, 256);
    assert_eq!(cx.aa, 64);
}
