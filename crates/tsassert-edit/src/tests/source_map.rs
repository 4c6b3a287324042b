use super::*;

#[test]
fn simple_source_map_has_expected_header_fields() {
    let mut generator = SourceMapGenerator::new("output.js".to_string());
    let _ = generator.add_source("input.ts".to_string());

    generator.add_simple_mapping(0, 0, 0, 0, 0);
    generator.add_simple_mapping(0, 4, 0, 0, 4);
    generator.add_simple_mapping(1, 0, 0, 1, 0);

    let map = generator.generate();

    assert_eq!(map.version, 3);
    assert_eq!(map.file, "output.js");
    assert_eq!(map.sources, vec!["input.ts"]);
    assert!(!map.mappings.is_empty());
    assert_eq!(map.mappings.matches(';').count(), 1, "two generated lines means one line separator");
}

#[test]
fn inline_source_map_is_a_data_url_comment() {
    let mut generator = SourceMapGenerator::new("output.js".to_string());
    let _ = generator.add_source("input.ts".to_string());
    generator.add_simple_mapping(0, 0, 0, 0, 0);

    let inline = generator.generate_inline();
    assert!(inline.starts_with("//# sourceMappingURL=data:application/json;base64,"));
}

#[test]
fn names_round_trip_through_generate() {
    let mut generator = SourceMapGenerator::new("output.js".to_string());
    let _ = generator.add_source("input.ts".to_string());

    let name_idx = generator.add_name("myFunction".to_string());
    generator.add_mapping(0, 0, 0, 0, 0, Some(name_idx));

    let map = generator.generate();
    assert_eq!(map.names, vec!["myFunction"]);
}

#[test]
fn source_content_is_carried_verbatim() {
    let mut generator = SourceMapGenerator::new("output.js".to_string());
    let _ = generator.add_source_with_content("input.ts".to_string(), "const x = 1;".to_string());

    let map = generator.generate();

    assert!(map.sources_content.is_some());
    assert_eq!(map.sources_content.unwrap()[0], "const x = 1;");
}

#[test]
fn omits_sources_content_when_no_source_had_content_attached() {
    let mut generator = SourceMapGenerator::new("output.js".to_string());
    let _ = generator.add_source("input.ts".to_string());
    generator.add_simple_mapping(0, 0, 0, 0, 0);

    let map = generator.generate();
    assert!(map.sources_content.is_none());
}
