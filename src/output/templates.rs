// Template engine for generating Markdown reports

use crate::error::Result;
use crate::output::{ParseFailure, ScanOutput};
use std::collections::HashMap;
use tera::{Context, Tera, Value};

/// Template engine wrapping Tera with custom filters and templates
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Create a new template engine with embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![(
            "report.md",
            include_str!("../../templates/report.md.tera"),
        )])?;

        register_filters(&mut tera);
        Ok(Self { tera })
    }

    /// Create a template engine from a custom directory. The directory must
    /// provide a `report.md` template.
    pub fn from_dir(template_dir: &str) -> Result<Self> {
        let pattern = format!("{}/**/*.tera", template_dir);
        let mut tera = Tera::new(&pattern)?;
        register_filters(&mut tera);
        Ok(Self { tera })
    }

    /// Render the coverage report as Markdown
    pub fn render_report(
        &self,
        output: &ScanOutput,
        failures: &[ParseFailure],
        project_name: &str,
    ) -> Result<String> {
        let report = &output.coverage_report;
        let mut context = Context::new();
        context.insert("project_name", project_name);
        context.insert("summary", &report.summary);
        context.insert("per_file", &report.per_file);
        context.insert("issues", &report.issues);
        context.insert("failures", failures);
        context.insert("suggestions", &output.docstring_suggestions);

        Ok(self.tera.render("report.md", &context)?)
    }

    /// Render a custom template with context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

fn register_filters(tera: &mut Tera) {
    tera.register_filter("pluralize", pluralize);
    tera.register_filter("percent", percent);
}

/// Pluralize a word based on count
fn pluralize(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let count = value.as_u64().unwrap_or(0);
    let singular = args
        .get("singular")
        .and_then(|v| v.as_str())
        .unwrap_or("item");
    let default_plural = format!("{}s", singular);
    let plural = args
        .get("plural")
        .and_then(|v| v.as_str())
        .unwrap_or(&default_plural);

    if count == 1 {
        Ok(Value::String(format!("{} {}", count, singular)))
    } else {
        Ok(Value::String(format!("{} {}", count, plural)))
    }
}

/// Format a coverage percentage with two decimals
fn percent(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let pct = value
        .as_f64()
        .ok_or_else(|| tera::Error::msg("percent filter expects a number"))?;
    Ok(Value::String(format!("{:.2}%", pct)))
}
