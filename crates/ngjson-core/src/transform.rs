use std::path::PathBuf;

use tracing::debug;

use crate::config::TransformOptions;
use crate::emit::module_declaration;
use crate::errors::{Result, TransformError};
use crate::escape::escape_content;
use crate::url::file_url;

/// Contents of a source file as presented by the surrounding pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContents {
    /// Fully materialized payload
    Buffer(Vec<u8>),
    /// An open streaming channel; rejected, the whole payload is needed up
    /// front to validate it as JSON
    Stream,
    /// No contents at all (e.g. a directory placeholder)
    Empty,
}

/// A single unit of work flowing through the pipeline.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Physical location of the file
    pub path: PathBuf,
    /// Directory used to compute the file's relative URL
    pub base: PathBuf,
    pub contents: FileContents,
}

impl SourceFile {
    pub fn buffer(path: impl Into<PathBuf>, base: impl Into<PathBuf>, contents: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            base: base.into(),
            contents: FileContents::Buffer(contents),
        }
    }
}

/// Convert one JSON source file into a cache-registration script.
///
/// Buffered contents are replaced with the generated script and the path's
/// extension becomes `.js`. Content-less files pass through untouched.
/// Streaming contents yield [`TransformError::StreamingNotSupported`].
/// Invalid JSON is not an error: the generated script is a single
/// diagnostic comment.
pub fn transform(mut file: SourceFile, options: &TransformOptions) -> Result<SourceFile> {
    let contents = std::mem::replace(&mut file.contents, FileContents::Empty);

    match contents {
        FileContents::Stream => Err(TransformError::StreamingNotSupported { path: file.path }),
        FileContents::Buffer(bytes) => {
            let url = file_url(&file.path, &file.base, options);
            let text = String::from_utf8_lossy(&bytes);
            let escaped = escape_content(&text);
            if escaped.is_none() {
                debug!("Invalid JSON in {:?}, emitting diagnostic comment", file.path);
            }
            let generated = module_declaration(&url, escaped.as_deref(), &options.module_name);
            file.contents = FileContents::Buffer(generated.into_bytes());
            file.path = file.path.with_extension("js");
            Ok(file)
        }
        FileContents::Empty => Ok(file),
    }
}
