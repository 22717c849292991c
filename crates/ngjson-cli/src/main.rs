use clap::Parser;
use ngjson_core::{transform, CliOverrides, FileContents, ProjectConfig, SourceFile};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// ngjson - converts JSON files into AngularJS modules that preload them
/// into $cacheFactory
#[derive(Parser, Debug, Clone)]
#[command(name = "ngjson")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input JSON files to convert
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Path to ngjson.yaml configuration file
    #[arg(short, long, value_name = "FILE")]
    project: Option<PathBuf>,

    /// Output directory for generated scripts
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Name of the generated module and its cache
    #[arg(long, value_name = "NAME")]
    module_name: Option<String>,

    /// Prefix stripped from the derived registration URL
    #[arg(long, value_name = "PREFIX")]
    strip_prefix: Option<String>,

    /// Prefix prepended to the derived registration URL
    #[arg(long, value_name = "PREFIX")]
    prefix: Option<String>,

    /// Base directory for relative URL computation
    #[arg(long, value_name = "DIR")]
    base: Option<PathBuf>,

    /// Watch input files for changes
    #[arg(short, long)]
    watch: bool,

    /// Initialize a new ngjson project
    #[arg(long)]
    init: bool,
}

fn main() -> anyhow::Result<()> {
    // Set RUST_LOG=debug for detailed logs, RUST_LOG=info for normal output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();

    if cli.init {
        init_project()?;
        return Ok(());
    }

    let (config, files) = load_config_and_files(&cli)?;

    if files.is_empty() {
        eprintln!("Error: No input files specified. Use --help for usage information.");
        std::process::exit(1);
    }

    info!(
        "Converting {} file(s) into module '{}'",
        files.len(),
        config.transform_options.module_name
    );
    if let Some(ref out_dir) = config.out_dir {
        info!("Output directory: {}", out_dir);
    }
    debug!("Watch mode: {}", cli.watch);

    // Create a modified CLI with resolved files and config options
    let mut resolved_cli = cli.clone();
    resolved_cli.files = files;
    resolved_cli.out_dir = config.out_dir.as_ref().map(PathBuf::from);

    if cli.watch {
        watch_mode(resolved_cli, config)?;
    } else {
        convert(&resolved_cli, &config)?;
    }

    Ok(())
}

/// Initialize a new ngjson project with a configuration file
fn init_project() -> anyhow::Result<()> {
    println!("Initializing new ngjson project...");

    let config = r#"# ngjson configuration file

transformOptions:
  moduleName: "templates"  # Module and cache name used in generated scripts
  # stripPrefix: "src/"    # Removed from the start of each registration URL
  # prefix: "static/"      # Prepended to each registration URL

outDir: "./dist"

include:
  - "src/**/*.json"

exclude:
  - "**/node_modules/**"
  - "**/dist/**"
"#;

    std::fs::write("ngjson.yaml", config)?;
    println!("Created ngjson.yaml");

    std::fs::create_dir_all("src")?;
    println!("Created src/ directory");

    let sample = "{\n  \"greeting\": \"Hello, World!\"\n}\n";
    std::fs::write("src/greeting.json", sample)?;
    println!("Created src/greeting.json");

    println!("\nProject initialized successfully!");
    println!("Run 'ngjson src/greeting.json' to convert your first file.");

    Ok(())
}

/// Load configuration from file (if specified) and resolve input files
fn load_config_and_files(cli: &Cli) -> anyhow::Result<(ProjectConfig, Vec<PathBuf>)> {
    let mut config = if let Some(ref project_path) = cli.project {
        ProjectConfig::from_file(project_path)
            .map_err(|e| anyhow::anyhow!("Failed to load config file: {}", e))?
    } else {
        // Try to find ngjson.yaml in the current directory
        let default_path = PathBuf::from("ngjson.yaml");
        if default_path.exists() {
            ProjectConfig::from_file(&default_path)
                .map_err(|e| anyhow::anyhow!("Failed to load ngjson.yaml: {}", e))?
        } else {
            ProjectConfig::default()
        }
    };

    let overrides = CliOverrides {
        module_name: cli.module_name.clone(),
        strip_prefix: cli.strip_prefix.clone(),
        prefix: cli.prefix.clone(),
        base: cli.base.clone(),
        out_dir: cli
            .out_dir
            .as_ref()
            .map(|d| d.to_string_lossy().to_string()),
    };
    config.merge(&overrides);

    let files = if !cli.files.is_empty() {
        cli.files.clone()
    } else {
        expand_globs(&config.include, &config.exclude)?
    };

    Ok((config, files))
}

/// Expand the config's include globs, dropping anything an exclude matches
fn expand_globs(include: &[String], exclude: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let exclude_patterns: Vec<glob::Pattern> = exclude
        .iter()
        .map(|p| glob::Pattern::new(p))
        .collect::<Result<_, _>>()
        .map_err(|e| anyhow::anyhow!("Invalid exclude pattern: {}", e))?;

    let mut files = Vec::new();
    for pattern in include {
        for entry in glob::glob(pattern)
            .map_err(|e| anyhow::anyhow!("Invalid include pattern '{}': {}", pattern, e))?
        {
            let path = entry?;
            if !path.is_file() {
                continue;
            }
            if exclude_patterns.iter().any(|p| p.matches_path(&path)) {
                continue;
            }
            files.push(path);
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Result of converting a single file
struct ConvertResult {
    file_path: PathBuf,
    result: Result<ConvertOutput, String>,
}

struct ConvertOutput {
    script: Vec<u8>,
    output_path: PathBuf,
}

/// Convert the input files
fn convert(cli: &Cli, config: &ProjectConfig) -> anyhow::Result<()> {
    use rayon::prelude::*;

    let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let options = &config.transform_options;

    let results: Vec<ConvertResult> = cli
        .files
        .par_iter()
        .map(|file_path| {
            debug!("Converting {:?}...", file_path);

            let bytes = match std::fs::read(file_path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    return ConvertResult {
                        file_path: file_path.clone(),
                        result: Err(format!("Failed to read file: {}", e)),
                    };
                }
            };

            let file = SourceFile::buffer(file_path.clone(), base.clone(), bytes);
            match transform(file, options) {
                Ok(out) => {
                    let output_path = determine_output_path(&out.path, cli, &base);
                    let script = match out.contents {
                        FileContents::Buffer(bytes) => bytes,
                        _ => Vec::new(),
                    };
                    ConvertResult {
                        file_path: file_path.clone(),
                        result: Ok(ConvertOutput {
                            script,
                            output_path,
                        }),
                    }
                }
                Err(e) => ConvertResult {
                    file_path: file_path.clone(),
                    result: Err(e.to_string()),
                },
            }
        })
        .collect();

    // Process results sequentially (for deterministic output and error reporting)
    let mut had_errors = false;

    for result in results {
        match result.result {
            Ok(output) => {
                if let Some(parent) = output.output_path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                std::fs::write(&output.output_path, &output.script)?;
                info!("Generated: {:?}", output.output_path);
            }
            Err(message) => {
                had_errors = true;
                eprintln!("Error converting {:?}: {}", result.file_path, message);
            }
        }
    }

    if had_errors {
        std::process::exit(1);
    }

    info!("Conversion completed successfully!");

    Ok(())
}

/// Determine the output file path for a transformed file.
///
/// Without --out-dir the generated script lands next to its input. With
/// --out-dir the file's base-relative subpath is preserved underneath it.
/// Registration URLs are derived independently; prefix options never move
/// the on-disk output.
fn determine_output_path(transformed_path: &Path, cli: &Cli, base: &Path) -> PathBuf {
    match &cli.out_dir {
        Some(out_dir) => {
            let relative = if transformed_path.is_absolute() {
                transformed_path
                    .strip_prefix(base)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| {
                        PathBuf::from(transformed_path.file_name().unwrap_or_default())
                    })
            } else {
                transformed_path.to_path_buf()
            };
            out_dir.join(relative)
        }
        None => transformed_path.to_path_buf(),
    }
}

/// Watch mode - reconvert on file changes
fn watch_mode(cli: Cli, config: ProjectConfig) -> anyhow::Result<()> {
    use notify::{
        event::{EventKind, ModifyKind},
        Event, RecursiveMode, Watcher,
    };
    use std::sync::mpsc::channel;
    use std::time::Duration;

    println!("Watching for changes... (Press Ctrl+C to stop)");

    // Initial conversion
    println!("\nInitial conversion:");
    let _ = convert(&cli, &config);

    // Create a channel to receive file system events
    let (tx, rx) = channel();

    // Create a watcher
    let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    // Watch all input files' parent directories
    for file_path in &cli.files {
        let parent = file_path.parent().filter(|p| !p.as_os_str().is_empty());
        match parent {
            Some(parent) => watcher.watch(parent, RecursiveMode::NonRecursive)?,
            None => watcher.watch(file_path, RecursiveMode::NonRecursive)?,
        }
    }

    // Handle file system events
    let mut last_convert = std::time::Instant::now();
    let debounce_duration = Duration::from_millis(100);

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => {
                let should_reconvert = matches!(
                    event.kind,
                    EventKind::Modify(ModifyKind::Data(_)) | EventKind::Create(_)
                );

                if should_reconvert {
                    // Check if any of the changed paths match our input files
                    let changed_our_files = event.paths.iter().any(|path| {
                        cli.files
                            .iter()
                            .any(|file| path.file_name() == file.file_name())
                    });

                    if changed_our_files {
                        // Debounce: only reconvert if enough time has passed
                        let now = std::time::Instant::now();
                        if now.duration_since(last_convert) >= debounce_duration {
                            println!("\n\nFile changed, reconverting...");
                            let _ = convert(&cli, &config);
                            last_convert = now;
                        }
                    }
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                continue;
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                return Err(anyhow::anyhow!("File watcher disconnected"));
            }
        }
    }
}
