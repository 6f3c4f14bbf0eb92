use super::*;
use kurbo::Shape as _;

fn frame() -> VideoFrame {
    VideoFrame::from_rgb(
        2,
        2,
        vec![
            255, 0, 0, 0, 255, 0, //
            0, 0, 255, 255, 255, 255,
        ],
    )
    .unwrap()
}

fn row(span: &VideoSpan<'_>, y: i32, len: usize) -> Vec<Rgba8Premul> {
    let mut out = vec![Rgba8Premul::transparent(); len];
    span.generate_span(0, 0, y, &mut out);
    out
}

const RED: Rgba8Premul = Rgba8Premul::new(255, 0, 0, 255);
const GREEN: Rgba8Premul = Rgba8Premul::new(0, 255, 0, 255);
const BLUE: Rgba8Premul = Rgba8Premul::new(0, 0, 255, 255);

#[test]
fn frame_is_stretched_over_bounds() {
    let f = frame();
    let bounds = Rect::new(0.0, 0.0, 4.0, 4.0);
    let id = Matrix::identity();
    let span = VideoSpan::new(&f, &id, &id, bounds, false, Quality::High).unwrap();
    assert_eq!(row(&span, 0, 4), vec![RED, RED, GREEN, GREEN]);
    assert_eq!(row(&span, 3, 1), vec![BLUE]);
}

#[test]
fn edges_clamp() {
    let f = frame();
    let id = Matrix::identity();
    let span = VideoSpan::new(&f, &id, &id, Rect::new(0.0, 0.0, 4.0, 4.0), false, Quality::High)
        .unwrap();
    assert_eq!(row(&span, 0, 6)[5], GREEN);
    assert_eq!(row(&span, 9, 1), vec![BLUE]);
}

#[test]
fn bounds_origin_maps_to_frame_origin() {
    let f = frame();
    let id = Matrix::identity();
    let span = VideoSpan::new(&f, &id, &id, Rect::new(2.0, 0.0, 6.0, 4.0), false, Quality::High)
        .unwrap();
    assert_eq!(row(&span, 0, 6)[2..], [RED, RED, GREEN, GREEN]);
}

#[test]
fn smoothing_needs_request_and_quality() {
    let f = frame();
    let id = Matrix::identity();
    let bounds = Rect::new(0.0, 0.0, 4.0, 4.0);

    let smooth = VideoSpan::new(&f, &id, &id, bounds, true, Quality::High).unwrap();
    assert_eq!(row(&smooth, 0, 2)[1], Rgba8Premul::new(191, 64, 0, 255));

    let medium = VideoSpan::new(&f, &id, &id, bounds, true, Quality::Medium).unwrap();
    assert_eq!(row(&medium, 0, 2)[1], RED);

    let unrequested = VideoSpan::new(&f, &id, &id, bounds, false, Quality::Best).unwrap();
    assert_eq!(row(&unrequested, 0, 2)[1], RED);
}

#[test]
fn degenerate_placements_are_rejected() {
    let f = frame();
    let id = Matrix::identity();
    let empty = Rect::new(0.0, 0.0, 0.0, 4.0);
    assert!(VideoSpan::new(&f, &id, &id, empty, false, Quality::High).is_none());
    let flat = Matrix::scale(0.0, 1.0);
    let bounds = Rect::new(0.0, 0.0, 4.0, 4.0);
    assert!(VideoSpan::new(&f, &id, &flat, bounds, false, Quality::High).is_none());
}

#[test]
fn outline_is_the_placed_quad() {
    let path = video_outline(
        &Matrix::identity(),
        &Matrix::translation(2, 3),
        Rect::new(0.0, 0.0, 4.0, 4.0),
    );
    let bbox = path.bounding_box();
    assert_eq!(bbox, Rect::new(2.0, 3.0, 6.0, 7.0));
}
