use super::*;

#[test]
fn quoted_delimiter_stays_inside_field() {
    let fields = split_line(r#"Jane,"Smith, Jr.",Lee,Silver"#, ',');
    assert_eq!(fields, vec!["Jane", "Smith, Jr.", "Lee", "Silver"]);
}

#[test]
fn quotes_are_stripped_not_escaped() {
    let fields = split_line(r#"a,"say ""hi""",c"#, ',');
    assert_eq!(fields, vec!["a", "say hi", "c"]);
}

#[test]
fn fields_are_trimmed_and_empty_fields_kept() {
    assert_eq!(split_line(" a , ,c\r", ','), vec!["a", "", "c"]);
    assert_eq!(split_line("", ','), vec![""]);
}

#[test]
fn custom_delimiter() {
    assert_eq!(split_line("a;\"b;c\";d", ';'), vec!["a", "b;c", "d"]);
}

#[test]
fn mismatched_rows_are_skipped_with_line_numbers() {
    let src = "firstName,lastName,certificateType\n\
               Ada,Lovelace,gold\n\
               Broken,Row\n\
               \n\
               Alan,Turing,silver\n";
    let table = Table::parse(src, ',');
    assert_eq!(table.headers, vec!["firstName", "lastName", "certificateType"]);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].line, 2);
    assert_eq!(table.rows[1].line, 5);
    assert_eq!(table.rows[1].fields[0], "Alan");

    assert_eq!(table.diagnostics.len(), 1);
    assert_eq!(table.diagnostics[0].kind, DiagnosticKind::RowShape);
    assert_eq!(table.diagnostics[0].line, Some(3));
    assert!(table.diagnostics[0].message.contains("expected 3 fields, found 2"));
}

#[test]
fn header_only_and_empty_inputs() {
    let t = Table::parse("a,b\n", ',');
    assert_eq!(t.headers.len(), 2);
    assert!(t.rows.is_empty());

    let t = Table::parse("\n \n", ',');
    assert!(t.headers.is_empty());
    assert!(t.rows.is_empty());
}

#[test]
fn bom_and_crlf_are_tolerated() {
    let t = Table::parse("\u{feff}a,b\r\n1,2\r\n", ',');
    assert_eq!(t.headers, vec!["a", "b"]);
    assert_eq!(t.rows[0].fields, vec!["1", "2"]);
}

#[test]
fn column_lookup_is_case_insensitive() {
    let t = Table::parse("firstName,LastName\nx,y\n", ',');
    assert_eq!(t.column("firstname"), Some(0));
    assert_eq!(t.column("lastName"), Some(1));
    assert_eq!(t.column("role"), None);
}

#[test]
fn read_missing_file_is_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let err = Table::read(&dir.path().join("nope.csv"), ',').unwrap_err();
    assert!(matches!(err, LaurelError::MissingInput(_)));
}
