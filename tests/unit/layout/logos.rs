use super::*;

fn sz(w: f64, h: f64) -> Size {
    Size::new(w, h)
}

fn params() -> LogoLayoutParams {
    LogoLayoutParams::default()
}

#[test]
fn empty_input_yields_nothing() {
    assert!(layout_logos(&[], &params()).is_empty());
}

#[test]
fn small_logos_share_one_row() {
    let out = layout_logos(&[sz(60.0, 60.0), sz(80.0, 240.0), sz(40.0, 20.0)], &params());
    assert_eq!(out.len(), 3);
    assert!(out.iter().all(|p| p.origin.y == 0.0));

    assert_eq!(out[0].size, sz(60.0, 60.0));
    assert_eq!(out[1].scale, 0.5);
    assert_eq!(out[1].size, sz(40.0, 120.0));
    assert_eq!(out[1].origin.x, 80.0);
    assert_eq!(out[2].origin.x, 80.0 + 40.0 + 20.0);
    assert_eq!(out[2].scale, 1.0);
}

#[test]
fn single_large_logo_capped_by_width_and_height() {
    let out = layout_logos(&[sz(700.0, 100.0)], &params());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].origin, Point::ZERO);
    assert_eq!(out[0].scale, 0.2);
    assert_eq!(out[0].size, sz(140.0, 20.0));

    let out = layout_logos(&[sz(100.0, 600.0)], &params());
    assert_eq!(out[0].scale, 0.2);
    assert_eq!(out[0].size.height, 120.0);
}

#[test]
fn two_logos_side_by_side() {
    let out = layout_logos(&[sz(300.0, 240.0), sz(90.0, 60.0)], &params());
    assert_eq!(out[0].size, sz(150.0, 120.0));
    assert_eq!(out[1].origin, Point::new(170.0, 0.0));
    assert_eq!(out[1].scale, 1.0);
}

#[test]
fn three_large_logos_use_two_plus_one_grid() {
    let out = layout_logos(&[sz(200.0, 170.0), sz(180.0, 85.0), sz(50.0, 170.0)], &params());
    assert_eq!(out.len(), 3);

    assert_eq!(out[0].origin, Point::ZERO);
    assert_eq!(out[0].size.height, 85.0);
    assert_eq!(out[1].origin.y, 0.0);
    assert_eq!(out[1].origin.x, out[0].size.width + 20.0);
    assert_eq!(out[1].size.height, 85.0);

    assert_eq!(out[2].origin, Point::new(0.0, 105.0));
    assert_eq!(out[2].size.height, 85.0);
}

#[test]
fn grid_never_upscales_short_logos() {
    let out = layout_logos(&[sz(200.0, 40.0), sz(90.0, 30.0), sz(120.0, 50.0)], &params());
    assert!(out.iter().all(|p| p.scale == 1.0));
    assert_eq!(out[2].origin.y, 105.0);
}

#[test]
fn more_than_three_lays_out_first_three() {
    let sizes = vec![sz(50.0, 50.0); 5];
    let out = layout_logos(&sizes, &params());
    assert_eq!(out.len(), 3);
    assert_eq!(out[2].index, 2);
    assert_eq!(out[2].origin.y, 105.0);
}

#[test]
fn scale_never_exceeds_one() {
    let cases: &[&[Size]] = &[
        &[sz(1.0, 1.0)],
        &[sz(500.0, 10.0)],
        &[sz(10.0, 500.0), sz(900.0, 3.0)],
        &[sz(81.0, 81.0), sz(5.0, 5.0), sz(400.0, 4000.0)],
    ];
    for sizes in cases {
        for p in layout_logos(sizes, &params()) {
            assert!(p.scale <= 1.0, "{sizes:?} -> {p:?}");
            assert!(p.size.width <= sizes[p.index].width);
        }
    }
}

#[test]
fn rect_at_offsets_by_block_origin() {
    let out = layout_logos(&[sz(40.0, 40.0)], &params());
    let r = out[0].rect_at(Point::new(45.0, 35.0));
    assert_eq!(r, Rect::new(45.0, 35.0, 85.0, 75.0));
}
