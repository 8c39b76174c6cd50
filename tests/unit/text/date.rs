use super::*;

#[test]
fn suffix_table() {
    for d in [1, 21, 31] {
        assert_eq!(ordinal_suffix(d), "st");
    }
    for d in [2, 22] {
        assert_eq!(ordinal_suffix(d), "nd");
    }
    for d in [3, 23] {
        assert_eq!(ordinal_suffix(d), "rd");
    }
    for d in [4, 11, 12, 13, 20, 24, 30] {
        assert_eq!(ordinal_suffix(d), "th");
    }
}

#[test]
fn iso_date_renders_full_string() {
    let d = OrdinalDate::parse("2026-12-10").unwrap();
    assert_eq!(d.day, "10");
    assert_eq!(d.suffix, "th");
    assert_eq!(d.month, "december");
    assert_eq!(d.year, "2026");
    assert_eq!(d.month_year(), " december, 2026");
    assert_eq!(d.full(), "10th december, 2026");
}

#[test]
fn accepted_formats_agree() {
    let expected = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    for raw in [
        "2026-03-01",
        "2026/03/01",
        "03/01/2026",
        "1 March 2026",
        "March 1, 2026",
        "2026-03-01T09:30:00Z",
        " 2026-03-01 ",
    ] {
        assert_eq!(parse_date(raw), Some(expected), "{raw}");
    }
    assert_eq!(OrdinalDate::parse("1 March 2026").unwrap().full(), "1st march, 2026");
}

#[test]
fn blank_and_garbage_are_none() {
    assert_eq!(OrdinalDate::parse(""), None);
    assert_eq!(OrdinalDate::parse("   "), None);
    assert_eq!(OrdinalDate::parse("next tuesday"), None);
    assert_eq!(OrdinalDate::parse("2026-13-45"), None);
}
