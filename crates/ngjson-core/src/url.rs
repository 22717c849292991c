use crate::config::TransformOptions;
use std::path::Path;

/// Derive the cache registration key (URL) for a file.
///
/// The URL is the file's path relative to the base directory
/// (`options.base` wins over the file's own base), with all separators
/// normalized to `/`. A configured `strip_prefix` is removed when it is a
/// literal leading prefix; a configured `prefix` is prepended verbatim, with
/// no separator inserted.
pub fn file_url(path: &Path, file_base: &Path, options: &TransformOptions) -> String {
    let base = options.base.as_deref().unwrap_or(file_base);
    let relative = path.strip_prefix(base).unwrap_or(path);

    // Backslash separators become forward slashes (Windows paths)
    let mut url = relative.to_string_lossy().replace('\\', "/");

    if let Some(strip) = options.strip_prefix.as_deref() {
        if let Some(rest) = url.strip_prefix(strip) {
            url = rest.to_string();
        }
    }
    if let Some(prefix) = options.prefix.as_deref() {
        url = format!("{}{}", prefix, url);
    }

    url
}
