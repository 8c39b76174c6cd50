use super::*;

#[test]
fn cursor_advance_returns_current_then_steps() {
    let mut c = LineCursor::new(100.0, 10.0);
    assert_eq!(c.advance(), 100.0);
    assert_eq!(c.advance(), 110.0);
    c.skip(5.0);
    assert_eq!(c.y(), 125.0);
}

#[test]
fn two_name_lines_without_middle_name() {
    let plan = CertificatePlan::compute(&LayoutConfig::default(), false);
    assert_eq!(plan.header_y, 550.0);
    assert_eq!(plan.certificate_y, 618.0);
    assert_eq!(plan.certify_label_y, 693.0);
    assert_eq!(plan.name_ys.as_slice(), &[726.0, 759.0]);
    assert_eq!(plan.body_ys, [800.0, 827.0, 854.0, 881.0, 908.0, 935.0]);
    assert_eq!(plan.id_y, 980.0);
}

#[test]
fn middle_name_pushes_body_down_one_line() {
    let without = CertificatePlan::compute(&LayoutConfig::default(), false);
    let with = CertificatePlan::compute(&LayoutConfig::default(), true);
    assert_eq!(with.name_ys.as_slice(), &[726.0, 759.0, 792.0]);
    assert_eq!(with.body_ys[0], without.body_ys[0] + 33.0);
    assert_eq!(with.id_y, without.id_y + 33.0);
}

#[test]
fn layout_config_serde_fills_defaults() {
    let cfg: LayoutConfig = serde_json::from_str(r#"{"text_start_x": 60.0}"#).unwrap();
    assert_eq!(cfg.text_start_x, 60.0);
    assert_eq!(cfg.first_name_y, 726.0);
    assert_eq!(cfg.sponsor_origin, Point::new(45.0, 35.0));
}
