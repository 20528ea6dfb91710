use crate::analysis::DocStyle;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default config file name looked up in the working directory
pub const CONFIG_FILE: &str = "docsight.toml";

/// Project name used when the config does not set one
pub const DEFAULT_PROJECT_NAME: &str = "Untitled Project";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
    pub suggestions: SuggestionConfig,
}

/// Project metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Report title
    pub name: String,
}

/// Analysis settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Glob patterns matched against root-relative paths, on top of the
    /// built-in dependency directory list
    pub exclude: Vec<String>,
    /// Expected docstring style
    pub style: DocStyle,
}

/// Output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Write the report here instead of stdout
    pub path: Option<PathBuf>,
}

/// Suggestion settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    pub enabled: bool,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

impl OutputFormat {
    /// Parse a format name; unknown names yield `None`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "text" | "txt" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "markdown" | "md" => Some(OutputFormat::Markdown),
            _ => None,
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROJECT_NAME.to_string(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file or return defaults
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(
        &mut self,
        output: Option<PathBuf>,
        exclude: Vec<String>,
        format: Option<String>,
        style: Option<String>,
        suggest: bool,
    ) -> Result<()> {
        if let Some(out) = output {
            self.output.path = Some(out);
        }

        if !exclude.is_empty() {
            self.analysis.exclude.extend(exclude);
        }

        if let Some(fmt) = format {
            self.output.format = OutputFormat::from_name(&fmt).ok_or_else(|| {
                Error::config_validation(format!("unknown output format '{}'", fmt))
            })?;
        }

        if let Some(s) = style {
            self.analysis.style = DocStyle::from_name(&s);
        }

        if suggest {
            self.suggestions.enabled = true;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.project.name.trim().is_empty() {
            return Err(Error::config_validation("project name cannot be empty"));
        }

        for pattern in &self.analysis.exclude {
            glob::Pattern::new(pattern).map_err(|e| {
                Error::config_validation(format!("invalid exclude pattern '{}': {}", pattern, e))
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.project.name, DEFAULT_PROJECT_NAME);
        assert!(config.analysis.exclude.is_empty());
        assert_eq!(config.analysis.style, DocStyle::Google);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(!config.suggestions.enabled);
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[project]
name = "Payments"

[analysis]
exclude = ["migrations/**"]
style = "NumPy"

[output]
format = "json"
path = "coverage.json"

[suggestions]
enabled = true
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.project.name, "Payments");
        assert_eq!(config.analysis.exclude, vec!["migrations/**"]);
        assert_eq!(config.analysis.style, DocStyle::Numpy);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.path, Some(PathBuf::from("coverage.json")));
        assert!(config.suggestions.enabled);
    }

    #[test]
    fn test_unknown_style_falls_back() {
        let analysis: AnalysisConfig = toml::from_str(r#"style = "epytext""#).unwrap();
        assert_eq!(analysis.style, DocStyle::Google);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/docsight.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_on_bad_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[project\nname = ").unwrap();
        let config = Config::load_or_default(file.path());
        assert_eq!(config.project.name, DEFAULT_PROJECT_NAME);
    }

    #[test]
    fn test_validation_empty_name() {
        let mut config = Config::default();
        config.project.name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_bad_glob() {
        let mut config = Config::default();
        config.analysis.exclude = vec!["src/[".to_string()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("invalid exclude pattern"));
    }

    #[test]
    fn test_merge_cli_output() {
        let mut config = Config::default();
        config
            .merge_cli(Some(PathBuf::from("report.md")), vec![], None, None, false)
            .unwrap();
        assert_eq!(config.output.path, Some(PathBuf::from("report.md")));
    }

    #[test]
    fn test_merge_cli_exclude() {
        let mut config = Config::default();
        config.analysis.exclude.push("build/**".to_string());
        config
            .merge_cli(None, vec!["tests/**".to_string()], None, None, false)
            .unwrap();
        assert_eq!(config.analysis.exclude, vec!["build/**", "tests/**"]);
    }

    #[test]
    fn test_merge_cli_format() {
        let mut config = Config::default();
        config
            .merge_cli(None, vec![], Some("md".to_string()), None, false)
            .unwrap();
        assert_eq!(config.output.format, OutputFormat::Markdown);

        let result = config.merge_cli(None, vec![], Some("html".to_string()), None, false);
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_cli_style_and_suggest() {
        let mut config = Config::default();
        config
            .merge_cli(None, vec![], None, Some("REST".to_string()), true)
            .unwrap();
        assert_eq!(config.analysis.style, DocStyle::Rest);
        assert!(config.suggestions.enabled);
    }

    #[test]
    fn test_output_format_parsing() {
        let output: OutputConfig = toml::from_str(r#"format = "markdown""#).unwrap();
        assert_eq!(output.format, OutputFormat::Markdown);
        assert_eq!(OutputFormat::from_name("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_name("yaml"), None);
    }
}
