//! CLI module for docsight

mod args;

pub use args::{Args, Command};

use crate::analysis::{suggest_missing, validate_module, Analyzer, ProjectMetrics, Status};
use crate::config::{Config, CONFIG_FILE, DEFAULT_PROJECT_NAME};
use crate::error::{Error, Result};
use crate::output::{self, ParseFailure, ScanOutput};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();
    init_tracing(args.verbose);

    match execute(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `RUST_LOG` applies unless `--verbose` forces debug
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("docsight=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn execute(args: Args) -> Result<ExitCode> {
    let verbose = args.verbose;

    match args.command {
        Command::Scan {
            path,
            style,
            format,
            output,
            exclude,
            config,
            suggest,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            cfg.merge_cli(output, exclude, format, style, suggest)?;
            cfg.validate()?;
            debug!(?cfg, "Effective configuration");

            let mut analyzer = Analyzer::new(&cfg)?.with_verbose(verbose);
            let analysis = analyzer.analyze(&path)?;
            info!(
                "Scanned {} files ({} failed)",
                analysis.modules.len(),
                analysis.failed_modules().count()
            );

            let suggestions = cfg
                .suggestions
                .enabled
                .then(|| suggest_missing(&analysis.modules, cfg.analysis.style));
            let scan = ScanOutput::new(&analysis, suggestions);
            let failures = ParseFailure::collect(&analysis.modules);

            let project_name = project_name(&cfg, &path);
            let rendered = output::render(&scan, &failures, cfg.output.format, &project_name)?;
            emit(cfg.output.path.as_deref(), &rendered)?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Validate {
            path,
            style,
            exclude,
            config,
            strict,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            cfg.merge_cli(None, exclude, None, style, false)?;
            cfg.validate()?;

            let mut analyzer = Analyzer::new(&cfg)?.with_verbose(verbose);
            let modules = analyzer.parse_all(&path)?;
            let style = cfg.analysis.style;

            let mut checked = 0;
            let mut needs_fix = 0;
            let mut out = String::new();

            for module in &modules {
                out.push_str(&format!("{}\n", module.path.display()));
                for error in &module.parse_errors {
                    out.push_str(&format!("  parse error: {}\n", error));
                }
                for check in validate_module(module, style) {
                    checked += 1;
                    if check.result.status == Status::NeedsFix {
                        needs_fix += 1;
                    }
                    out.push_str(&format!(
                        "  {:<10} {} (line {}): {}\n",
                        check.result.status.to_string(),
                        check.qualified_name,
                        check.line,
                        check.result.reason
                    ));
                }
            }
            out.push_str(&format!(
                "\n{} functions checked against {} style, {} need fixes\n",
                checked, style, needs_fix
            ));
            print!("{}", out);

            if strict && needs_fix > 0 {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }

        Command::Metrics {
            path,
            exclude,
            config,
            json,
            top,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            cfg.merge_cli(None, exclude, None, None, false)?;
            cfg.validate()?;

            let mut analyzer = Analyzer::new(&cfg)?.with_verbose(verbose);
            let analysis = analyzer.analyze(&path)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis.metrics)?);
            } else {
                print!("{}", format_metrics(&analysis.metrics, top));
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Version => {
            println!("docsight {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// An explicit config must load; the default file is optional
fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => Config::load(path),
        None => {
            let default_path = Path::new(CONFIG_FILE);
            if default_path.exists() {
                Ok(Config::load_or_default(default_path))
            } else {
                Ok(Config::default())
            }
        }
    }
}

/// Project name from config, or the scanned directory's name
fn project_name(cfg: &Config, path: &Path) -> String {
    if cfg.project.name != DEFAULT_PROJECT_NAME {
        return cfg.project.name.clone();
    }
    let dir = if path.is_file() { path.parent() } else { Some(path) };
    dir.and_then(|d| d.canonicalize().ok())
        .and_then(|d| d.file_name().map(|n| n.to_string_lossy().to_string()))
        .unwrap_or_else(|| "Project".to_string())
}

/// Print to stdout or write to `path`
fn emit(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)
                .map_err(|e| Error::file_access(PathBuf::from(path), &e))?;
            println!("Report written to: {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Human-readable complexity summary
fn format_metrics(metrics: &ProjectMetrics, top: usize) -> String {
    let mut md = String::new();

    md.push_str(&format!(
        "Files: {}  Functions: {}  Average complexity: {:.2}\n",
        metrics.file_count, metrics.function_count, metrics.avg_complexity
    ));

    if metrics.function_count > 0 {
        md.push_str("\nMost complex functions:\n");
        md.push_str(&format!("  {:<11}{:<9}{}\n", "COMPLEXITY", "NESTING", "FUNCTION"));
        for ranked in metrics.top(top) {
            md.push_str(&format!(
                "  {:<11}{:<9}{}:{} {}\n",
                ranked.metrics.complexity,
                ranked.metrics.max_nesting,
                ranked.path,
                ranked.metrics.line,
                ranked.metrics.qualified_name
            ));
        }
    }

    let measured: Vec<_> = metrics
        .files
        .iter()
        .filter(|f| f.maintainability_index.is_some())
        .collect();
    if !measured.is_empty() {
        md.push_str("\nPer file:\n");
        for file in measured {
            md.push_str(&format!(
                "  {}  avg {:.2}  max {}  MI {:.1}\n",
                file.path,
                file.avg_complexity,
                file.max_complexity,
                file.maintainability_index.unwrap_or_default()
            ));
        }
    }

    md
}
