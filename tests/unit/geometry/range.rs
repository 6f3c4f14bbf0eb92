use super::*;

#[test]
fn clip_rect_intersection_is_inclusive() {
    let a = ClipRect::new(0, 0, 9, 9);
    let b = ClipRect::new(9, 9, 20, 20);
    assert_eq!(a.intersect(&b), Some(ClipRect::new(9, 9, 9, 9)));
    assert!(!a.intersects(&ClipRect::new(10, 0, 12, 3)));
}

#[test]
fn clip_rect_dimensions() {
    let r = ClipRect::new(2, 3, 2, 7);
    assert_eq!(r.width(), 1);
    assert_eq!(r.height(), 5);
    assert_eq!(r.to_rect(), Rect::new(2.0, 3.0, 3.0, 8.0));
}

#[test]
fn pixel_range_clipping() {
    let visible = ClipRect::new(0, 0, 99, 49);
    assert_eq!(PixelRange::Null.clip_to(&visible), None);
    assert_eq!(PixelRange::World.clip_to(&visible), Some(visible));
    assert_eq!(
        PixelRange::Finite(ClipRect::new(-10, 40, 10, 80)).clip_to(&visible),
        Some(ClipRect::new(0, 40, 10, 49))
    );
}

#[test]
fn invalidated_ranges_world_flag() {
    let mut r = InvalidatedRanges::new();
    r.add(WorldRect::new(0.0, 0.0, 20.0, 20.0));
    assert!(!r.is_world());
    r.set_world();
    assert!(r.is_world());
    assert_eq!(r.ranges().len(), 1);
}

#[test]
fn world_rect_normalises_corners() {
    let r = WorldRect::new(40.0, 40.0, 0.0, 0.0);
    assert_eq!(r.finite(), Some(Rect::new(0.0, 0.0, 40.0, 40.0)));
}

#[test]
fn clip_rect_union_spans_both() {
    let u = ClipRect::new(0, 5, 2, 6).union(&ClipRect::new(4, 1, 8, 3));
    assert_eq!(u, ClipRect::new(0, 1, 8, 6));
}

#[test]
fn subtract_leaves_disjoint_bands() {
    let r = ClipRect::new(0, 0, 9, 9);
    let parts = r.subtract(&ClipRect::new(3, 3, 5, 5));
    assert_eq!(parts.len(), 4);
    let area: u32 = parts.iter().map(|p| p.width() * p.height()).sum();
    assert_eq!(area, 100 - 9);
    assert!(parts.iter().all(|p| !p.contains(4, 4)));

    assert!(r.subtract(&ClipRect::new(-5, -5, 20, 20)).is_empty());
    assert_eq!(r.subtract(&ClipRect::new(20, 20, 30, 30)).as_slice(), &[r]);
    assert_eq!(
        r.subtract(&ClipRect::new(0, 0, 9, 4)).as_slice(),
        &[ClipRect::new(0, 5, 9, 9)]
    );
}
