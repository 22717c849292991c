use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Options that control URL derivation and module generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOptions {
    /// Name of the generated module and its cache (default: "templates")
    #[serde(default = "default_module_name")]
    pub module_name: String,

    /// Leading prefix removed from the derived URL, when present
    #[serde(default)]
    pub strip_prefix: Option<String>,

    /// Literal string prepended to the derived URL after stripping
    #[serde(default)]
    pub prefix: Option<String>,

    /// Override for the directory used to compute relative URLs
    #[serde(default)]
    pub base: Option<PathBuf>,
}

fn default_module_name() -> String {
    "templates".to_string()
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            module_name: default_module_name(),
            strip_prefix: None,
            prefix: None,
            base: None,
        }
    }
}

/// Main project configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Transform options
    #[serde(default)]
    pub transform_options: TransformOptions,

    /// Output directory for generated scripts
    #[serde(default)]
    pub out_dir: Option<String>,

    /// Files to include (glob patterns)
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// Files to exclude (glob patterns)
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

fn default_include() -> Vec<String> {
    vec!["**/*.json".to_string()]
}

fn default_exclude() -> Vec<String> {
    vec![
        "**/node_modules/**".to_string(),
        "**/dist/**".to_string(),
    ]
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            transform_options: TransformOptions::default(),
            out_dir: None,
            include: default_include(),
            exclude: default_exclude(),
        }
    }
}

/// Command-line overrides layered on top of a loaded config
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub module_name: Option<String>,
    pub strip_prefix: Option<String>,
    pub prefix: Option<String>,
    pub base: Option<PathBuf>,
    pub out_dir: Option<String>,
}

impl ProjectConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, crate::errors::TransformError> {
        let content = std::fs::read_to_string(path)?;
        let config: ProjectConfig = serde_yaml::from_str(&content)
            .map_err(|e| crate::errors::TransformError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Create a default configuration and write it to a file
    pub fn init_file(path: &Path) -> Result<(), crate::errors::TransformError> {
        let config = ProjectConfig::default();
        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| crate::errors::TransformError::Config(e.to_string()))?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Merge CLI overrides into this configuration
    pub fn merge(&mut self, overrides: &CliOverrides) {
        if let Some(ref name) = overrides.module_name {
            self.transform_options.module_name = name.clone();
        }
        if let Some(ref strip) = overrides.strip_prefix {
            self.transform_options.strip_prefix = Some(strip.clone());
        }
        if let Some(ref prefix) = overrides.prefix {
            self.transform_options.prefix = Some(prefix.clone());
        }
        if let Some(ref base) = overrides.base {
            self.transform_options.base = Some(base.clone());
        }
        if let Some(ref out_dir) = overrides.out_dir {
            self.out_dir = Some(out_dir.clone());
        }
    }
}
