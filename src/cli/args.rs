//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Measure and improve docstring coverage in Python codebases
#[derive(Parser, Debug)]
#[command(name = "docsight")]
#[command(about = "Measure and improve docstring coverage in Python codebases")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output (debug logging and progress)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report docstring coverage for a file or directory
    Scan {
        /// File or directory to scan
        path: PathBuf,

        /// Expected docstring style (google, numpy, rest)
        #[arg(long)]
        style: Option<String>,

        /// Output format (text, json, markdown)
        #[arg(long)]
        format: Option<String>,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Glob patterns to exclude (can be repeated)
        #[arg(long)]
        exclude: Vec<String>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Include boilerplate docstring suggestions
        #[arg(long)]
        suggest: bool,
    },

    /// Check each function's docstring against a style
    Validate {
        /// File or directory to validate
        path: PathBuf,

        /// Expected docstring style (google, numpy, rest)
        #[arg(long)]
        style: Option<String>,

        /// Glob patterns to exclude (can be repeated)
        #[arg(long)]
        exclude: Vec<String>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Exit with failure if any function needs a fix
        #[arg(long)]
        strict: bool,
    },

    /// Report complexity metrics
    Metrics {
        /// File or directory to measure
        path: PathBuf,

        /// Glob patterns to exclude (can be repeated)
        #[arg(long)]
        exclude: Vec<String>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Number of most complex functions to list
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Show version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_defaults() {
        let args = Args::try_parse_from(["docsight", "scan", "./src"]).unwrap();
        assert!(!args.verbose);
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
                assert_eq!(path, PathBuf::from("./src"));
                assert_eq!(style, None);
                assert_eq!(format, None);
                assert_eq!(output, None);
                assert!(exclude.is_empty());
                assert_eq!(config, None);
                assert!(!suggest);
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn test_scan_with_options() {
        let args = Args::try_parse_from([
            "docsight", "scan", "./project",
            "--style", "numpy",
            "--format", "json",
            "--output", "coverage.json",
            "--exclude", "tests/**",
            "--exclude", "docs/**",
            "--config", "custom.toml",
            "--suggest",
            "--verbose",
        ])
        .unwrap();

        assert!(args.verbose);
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
                assert_eq!(path, PathBuf::from("./project"));
                assert_eq!(style.as_deref(), Some("numpy"));
                assert_eq!(format.as_deref(), Some("json"));
                assert_eq!(output, Some(PathBuf::from("coverage.json")));
                assert_eq!(exclude, vec!["tests/**".to_string(), "docs/**".to_string()]);
                assert_eq!(config, Some(PathBuf::from("custom.toml")));
                assert!(suggest);
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn test_validate_strict() {
        let args =
            Args::try_parse_from(["docsight", "validate", "pkg", "--style", "rest", "--strict"])
                .unwrap();
        match args.command {
            Command::Validate { path, style, strict, .. } => {
                assert_eq!(path, PathBuf::from("pkg"));
                assert_eq!(style.as_deref(), Some("rest"));
                assert!(strict);
            }
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_metrics_defaults() {
        let args = Args::try_parse_from(["docsight", "metrics", "pkg"]).unwrap();
        match args.command {
            Command::Metrics { json, top, .. } => {
                assert!(!json);
                assert_eq!(top, 10);
            }
            _ => panic!("Expected Metrics command"),
        }
    }

    #[test]
    fn test_global_verbose_before_subcommand() {
        let args = Args::try_parse_from(["docsight", "-v", "metrics", "pkg", "--json"]).unwrap();
        assert!(args.verbose);
    }

    #[test]
    fn test_version_command() {
        let args = Args::try_parse_from(["docsight", "version"]).unwrap();
        assert!(matches!(args.command, Command::Version));
    }

    #[test]
    fn test_missing_path_is_rejected() {
        assert!(Args::try_parse_from(["docsight", "scan"]).is_err());
    }
}
