use serde_json::Value;

/// Validate `content` as JSON and re-serialize it in compact form.
///
/// Returns `None` when the content does not parse. Re-serializing (rather
/// than splicing the raw text into the generated script) guarantees the
/// embedded literal is always valid expression syntax.
pub fn escape_content(content: &str) -> Option<String> {
    let value: Value = serde_json::from_str(content).ok()?;
    serde_json::to_string(&value).ok()
}
