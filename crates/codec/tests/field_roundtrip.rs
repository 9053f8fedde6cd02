use fieldmark_codec::{
    FieldConfig, FieldConverter, MarkdownRecord, Origin, decode_field, encode_field,
    extract_payload,
};

#[test]
fn record_survives_encoding() {
    let record = MarkdownRecord::new(1_700_000_000_123, false, "**bold** and `code`\n\n    indented");
    let html = encode_field("<p><strong>bold</strong></p>", &record).expect("encode");

    let decoded = decode_field(&html).expect("decode").expect("payload present");
    assert_eq!(decoded.markdown, record.markdown);
    assert_eq!(decoded.id, record.id);
    assert_eq!(decoded, record);
}

#[test]
fn non_ascii_markdown_survives_encoding() {
    let record = MarkdownRecord::new(5, true, "ещё **один** тест ✓");
    let html = encode_field("", &record).expect("encode");
    assert!(!extract_payload(&html).is_empty());
    assert_eq!(decode_field(&html).expect("decode").expect("payload").markdown, record.markdown);
}

#[test]
fn image_with_spaces_renders_and_reverts_verbatim() {
    let converter = FieldConverter::default();
    let field = "<div>see ![cat](cat (1).jpg) here</div><div>```</div><div>[](what about it)</div><div>```</div>";

    let rendered = converter.render(field, 9, "").expect("render");
    assert!(rendered.contains("cat%20(1).jpg"));
    assert!(rendered.contains("[](what about it)"));

    let reverted = converter.revert(&rendered).expect("revert");
    assert_eq!(reverted.origin, Origin::Payload);
    assert_eq!(
        reverted.markdown,
        "see ![cat](cat (1).jpg) here\n```\n[](what about it)\n```\n"
    );
}

#[test]
fn keep_empty_lines_changes_stripped_layout() {
    let converter = FieldConverter::new(FieldConfig {
        keep_empty_lines: true,
        ..FieldConfig::default()
    });
    let reverted = converter.revert("1. one<div>2. two</div>").expect("revert");
    assert_eq!(reverted.markdown, "1. one\n\n2. two\n");
}
