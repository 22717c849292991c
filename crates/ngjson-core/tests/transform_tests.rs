use ngjson_core::{
    transform, FileContents, SourceFile, TransformError, TransformOptions,
};
use std::path::{Path, PathBuf};

fn options() -> TransformOptions {
    TransformOptions::default()
}

fn buffer_file(path: &str, base: &str, contents: &str) -> SourceFile {
    SourceFile::buffer(path, base, contents.as_bytes().to_vec())
}

fn script_text(file: &SourceFile) -> String {
    match &file.contents {
        FileContents::Buffer(bytes) => String::from_utf8(bytes.clone()).unwrap(),
        other => panic!("expected buffered contents, got {:?}", other),
    }
}

// ============================================================================
// Generated script shape
// ============================================================================

#[test]
fn test_valid_json_produces_exact_module_declaration() {
    let file = buffer_file("/app/test.json", "/app", r#"{"a": 1}"#);
    let out = transform(file, &options()).unwrap();

    let expected = "\
(function(module) {
  try {
    module = angular.module('templates');
  } catch (e) {
    module = angular.module('templates', []);
  }
  module.run(['$cacheFactory', function($cacheFactory) {
    ($cacheFactory.get('templates') || $cacheFactory('templates')).put('test.json',
      {\"a\":1});
  }]);
})();
";
    assert_eq!(script_text(&out), expected);
}

#[test]
fn test_default_module_name_is_templates() {
    let file = buffer_file("/app/a.json", "/app", "{}");
    let out = transform(file, &options()).unwrap();
    assert!(script_text(&out).contains("angular.module('templates')"));
}

#[test]
fn test_custom_module_name_substituted_everywhere() {
    let opts = TransformOptions {
        module_name: "partials".to_string(),
        ..Default::default()
    };
    let file = buffer_file("/app/a.json", "/app", "{}");
    let out = transform(file, &opts).unwrap();

    let script = script_text(&out);
    assert_eq!(script.matches("'partials'").count(), 4);
    assert!(!script.contains("templates"));
}

#[test]
fn test_content_is_reserialized_compact() {
    let file = buffer_file("/app/a.json", "/app", "{\"a\": 1, \"b\": [2, 3]}");
    let out = transform(file, &options()).unwrap();
    assert!(script_text(&out).contains(r#"{"a":1,"b":[2,3]}"#));
}

#[test]
fn test_escaped_content_round_trips() {
    let source = r#"{"name": "café", "nested": {"list": [1, 2.5, null, true]}}"#;
    let file = buffer_file("/app/a.json", "/app", source);
    let out = transform(file, &options()).unwrap();

    let script = script_text(&out);
    let embedded = script
        .lines()
        .find(|l| l.trim_start().starts_with('{'))
        .unwrap()
        .trim_start()
        .trim_end_matches(");");

    let original: serde_json::Value = serde_json::from_str(source).unwrap();
    let round_tripped: serde_json::Value = serde_json::from_str(embedded).unwrap();
    assert_eq!(original, round_tripped);
}

// ============================================================================
// Invalid JSON (designed failure path, not an error)
// ============================================================================

#[test]
fn test_invalid_json_emits_diagnostic_comment() {
    let file = buffer_file("/app/broken.json", "/app", "{not json");
    let out = transform(file, &options()).unwrap();
    assert_eq!(
        script_text(&out),
        "/* Invalid JSON syntax in \"broken.json\", skipping content. */\n"
    );
}

#[test]
fn test_invalid_json_comment_uses_derived_url() {
    let opts = TransformOptions {
        prefix: Some("static/".to_string()),
        ..Default::default()
    };
    let file = buffer_file("/app/a/b.json", "/app", "][");
    let out = transform(file, &opts).unwrap();
    assert_eq!(
        script_text(&out),
        "/* Invalid JSON syntax in \"static/a/b.json\", skipping content. */\n"
    );
}

#[test]
fn test_non_utf8_buffer_falls_into_diagnostic_branch() {
    let file = SourceFile::buffer("/app/bin.json", "/app", vec![0xff, 0xfe, 0x00]);
    let out = transform(file, &options()).unwrap();
    assert!(script_text(&out).starts_with("/* Invalid JSON syntax in"));
}

// ============================================================================
// Path handling
// ============================================================================

#[test]
fn test_extension_replaced_with_js() {
    let file = buffer_file("/app/a/b.json", "/app", "{}");
    let out = transform(file, &options()).unwrap();
    assert_eq!(out.path, PathBuf::from("/app/a/b.js"));
}

#[test]
fn test_extension_replaced_regardless_of_original() {
    for name in ["/app/x.JSON", "/app/x.txt", "/app/x.config"] {
        let file = buffer_file(name, "/app", "{}");
        let out = transform(file, &options()).unwrap();
        assert_eq!(out.path.extension(), Some("js".as_ref()), "input {}", name);
    }
}

#[test]
fn test_output_path_ignores_prefix_options() {
    // prefix/stripPrefix shape the registration URL only, never the on-disk
    // output path
    let opts = TransformOptions {
        strip_prefix: Some("a/".to_string()),
        prefix: Some("static/".to_string()),
        ..Default::default()
    };
    let file = buffer_file("/app/a/b.json", "/app", "{}");
    let out = transform(file, &opts).unwrap();
    assert_eq!(out.path, PathBuf::from("/app/a/b.js"));
    assert!(script_text(&out).contains("put('static/b.json'"));
}

// ============================================================================
// Contents classification
// ============================================================================

#[test]
fn test_streaming_contents_are_rejected() {
    let file = SourceFile {
        path: PathBuf::from("/app/a.json"),
        base: PathBuf::from("/app"),
        contents: FileContents::Stream,
    };
    let err = transform(file, &options()).unwrap_err();
    match err {
        TransformError::StreamingNotSupported { path } => {
            assert_eq!(path, Path::new("/app/a.json"));
        }
        other => panic!("expected StreamingNotSupported, got {:?}", other),
    }
}

#[test]
fn test_contentless_file_passes_through_unchanged() {
    let file = SourceFile {
        path: PathBuf::from("/app/dir"),
        base: PathBuf::from("/app"),
        contents: FileContents::Empty,
    };
    let out = transform(file, &options()).unwrap();
    assert_eq!(out.path, PathBuf::from("/app/dir"));
    assert_eq!(out.contents, FileContents::Empty);
}
