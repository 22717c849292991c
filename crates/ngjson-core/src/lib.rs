pub mod config;
pub mod emit;
pub mod errors;
pub mod escape;
pub mod transform;
pub mod url;

pub use config::{CliOverrides, ProjectConfig, TransformOptions};
pub use emit::module_declaration;
pub use errors::TransformError;
pub use escape::escape_content;
pub use transform::{transform, FileContents, SourceFile};
pub use url::file_url;
