use super::*;

fn record(first: &str, last: &str, category: &str) -> ParticipantRecord {
    ParticipantRecord {
        first_name: first.into(),
        last_name: last.into(),
        certificate_type: category.into(),
        ..Default::default()
    }
}

#[test]
fn base36_digits() {
    assert_eq!(to_base36(0), "0");
    assert_eq!(to_base36(35), "Z");
    assert_eq!(to_base36(36), "10");
    assert_eq!(to_base36(1_767_225_600_000), "MJUOHS00");
}

#[test]
fn id_layout() {
    let now = 1_767_225_600_000;
    let id = generate_id(&record("jane", "lee", "gold"), 0, now);
    assert_eq!(id, "CERT-G0001-JL-HS00");

    let id = generate_id(&record("", "", ""), 41, now);
    assert_eq!(id, "CERT-P0042-XX-HS00");
}

#[test]
fn sequence_index_distinguishes_identical_records() {
    let r = record("Ada", "Lovelace", "silver");
    let clock = FixedClock(1_700_000_000_123);
    let a = generate_id(&r, 0, clock.now_millis());
    let b = generate_id(&r, 1, clock.now_millis());
    assert_ne!(a, b);
    assert!(a.starts_with("CERT-S0001-AL-"));
    assert!(b.starts_with("CERT-S0002-AL-"));
}

#[test]
fn short_timestamps_are_not_padded() {
    assert_eq!(generate_id(&record("a", "b", "c"), 9, 35), "CERT-C0010-AB-Z");
}

#[test]
fn system_clock_is_after_2020() {
    assert!(SystemClock.now_millis() > 1_577_836_800_000);
}
