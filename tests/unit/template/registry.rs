use super::*;

#[test]
fn lookup_is_case_insensitive() {
    let reg = TemplateRegistry::builtin();
    for key in ["gold", "GOLD", " Gold "] {
        let r = reg.resolve(key);
        assert_eq!(r.template.key, "gold");
        assert!(!r.fell_back);
    }
    assert_eq!(reg.resolve("Silver").template.rank_text, "Silver");
}

#[test]
fn unknown_category_falls_back_without_error() {
    let reg = TemplateRegistry::builtin();
    let r = reg.resolve("platinum");
    assert!(r.fell_back);
    assert_eq!(r.template.key, "participation");
    assert!(!r.template.is_winner);

    let r = reg
        .resolve_with_policy("platinum", CategoryPolicy::Fallback)
        .unwrap();
    assert_eq!(r.template.key, "participation");
}

#[test]
fn reject_policy_fails_unknown_keys_only() {
    let reg = TemplateRegistry::builtin();
    let err = reg
        .resolve_with_policy("platinum", CategoryPolicy::Reject)
        .unwrap_err();
    assert!(matches!(err, LaurelError::UnknownCategory(ref k) if k == "platinum"));
    assert!(reg.resolve_with_policy("bronze", CategoryPolicy::Reject).is_ok());
}

#[test]
fn builtin_table_values() {
    let reg = TemplateRegistry::builtin();
    let gold = reg.lookup("gold").unwrap();
    assert_eq!(gold.background_file, "gold-certificate.jpeg");
    assert_eq!(gold.accent_color, Rgba8::rgb(0xC9, 0xA2, 0x27));
    assert_eq!(
        gold.header_gradient,
        [Rgba8::rgb(0x99, 0x73, 0x00), Rgba8::rgb(0xff, 0xc0, 0x00)]
    );
    assert!(gold.is_winner);
    assert_eq!(reg.fallback().header_text, "Participation");
    assert_eq!(reg.templates().len(), 4);
}

#[test]
fn new_validates_keys_and_fallback() {
    let t = builtin_templates();
    assert!(TemplateRegistry::new(t.clone(), "nope").is_err());

    let mut dup = t.clone();
    dup.push(t[0].clone());
    assert!(TemplateRegistry::new(dup, "gold").is_err());

    let mut upper = t;
    upper[0].key = "GOLD".to_owned();
    let reg = TemplateRegistry::new(upper, "Gold").unwrap();
    assert_eq!(reg.fallback().key, "gold");
}

#[test]
fn policy_serde_names() {
    assert_eq!(
        serde_json::to_string(&CategoryPolicy::Reject).unwrap(),
        "\"reject\""
    );
    let p: CategoryPolicy = serde_json::from_str("\"fallback\"").unwrap();
    assert_eq!(p, CategoryPolicy::Fallback);
}
