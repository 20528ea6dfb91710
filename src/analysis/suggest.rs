// Docstring suggestions for undocumented entities
//
// Suggestions are deterministic boilerplate in the selected style. External
// content generators plug in through `ContentGenerator` and are only invoked
// for a function a caller explicitly selects.

use crate::analysis::validate::DocStyle;
use crate::error::Result;
use crate::parser::{ClassRecord, FunctionRecord, ModuleRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

const ANY: &str = "Any";
const RETURN_DESCRIPTION: &str = "Description of return value.";

/// Suggested docstrings for one module, keyed by entity name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSuggestions {
    pub module: Option<String>,
    pub classes: BTreeMap<String, String>,
    pub functions: BTreeMap<String, String>,
    /// Keyed by `Class.method`
    pub methods: BTreeMap<String, String>,
}

impl ModuleSuggestions {
    pub fn is_empty(&self) -> bool {
        self.module.is_none()
            && self.classes.is_empty()
            && self.functions.is_empty()
            && self.methods.is_empty()
    }
}

/// Suggestions for every module missing documentation somewhere, keyed by path
pub type SuggestionSet = BTreeMap<String, ModuleSuggestions>;

/// Build boilerplate suggestions for every undocumented entity
pub fn suggest_missing(modules: &[ModuleRecord], style: DocStyle) -> SuggestionSet {
    let mut set = SuggestionSet::new();

    for module in modules.iter().filter(|m| !m.is_failed()) {
        let mut suggestions = ModuleSuggestions::default();

        if !module.has_docstring {
            suggestions.module = Some(module_boilerplate(module));
        }
        for class in &module.classes {
            if !class.has_docstring {
                suggestions
                    .classes
                    .insert(class.name.clone(), class_boilerplate(class));
            }
            for method in class.methods.iter().filter(|m| !m.has_docstring) {
                suggestions
                    .methods
                    .insert(method.qualified_name(), function_boilerplate(method, style));
            }
        }
        for func in module.functions.iter().filter(|f| !f.has_docstring) {
            suggestions
                .functions
                .insert(func.name.clone(), function_boilerplate(func, style));
        }

        if !suggestions.is_empty() {
            set.insert(module.path.display().to_string(), suggestions);
        }
    }

    set
}

pub fn module_boilerplate(module: &ModuleRecord) -> String {
    format!("{} module.", module.module_name)
}

pub fn class_boilerplate(class: &ClassRecord) -> String {
    format!("{} class.", class.name)
}

/// Boilerplate docstring body for a function, without surrounding quotes
pub fn function_boilerplate(func: &FunctionRecord, style: DocStyle) -> String {
    let kind = if func.is_method { "method" } else { "function" };
    let summary = format!("{} {}.", func.name, kind);
    let returns = func.return_type.as_deref().unwrap_or(ANY);

    let mut lines = vec![summary, String::new()];
    match style {
        DocStyle::Google => {
            if !func.parameters.is_empty() {
                lines.push("Args:".to_string());
                for p in &func.parameters {
                    lines.push(format!("    {p} ({ANY}): Description of {p}."));
                }
                lines.push(String::new());
            }
            lines.push("Returns:".to_string());
            lines.push(format!("    {returns}: {RETURN_DESCRIPTION}"));
        }
        DocStyle::Numpy => {
            if !func.parameters.is_empty() {
                lines.push("Parameters".to_string());
                lines.push("----------".to_string());
                for p in &func.parameters {
                    lines.push(format!("{p} : {ANY}"));
                    lines.push(format!("    Description of {p}."));
                }
                lines.push(String::new());
            }
            lines.push("Returns".to_string());
            lines.push("-------".to_string());
            lines.push(returns.to_string());
            lines.push(format!("    {RETURN_DESCRIPTION}"));
        }
        DocStyle::Rest => {
            for p in &func.parameters {
                lines.push(format!(":param {p}: Description of {p}."));
                lines.push(format!(":type {p}: {ANY}"));
            }
            lines.push(format!(":returns: {RETURN_DESCRIPTION}"));
            lines.push(format!(":rtype: {returns}"));
        }
    }

    lines.join("\n")
}

/// Source of docstring text for a selected function
pub trait ContentGenerator {
    fn generate(&mut self, func: &FunctionRecord, style: DocStyle) -> Result<String>;
}

/// Generator producing the deterministic boilerplate
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateGenerator;

impl ContentGenerator for TemplateGenerator {
    fn generate(&mut self, func: &FunctionRecord, style: DocStyle) -> Result<String> {
        Ok(function_boilerplate(func, style))
    }
}

/// Ask `generator` for one function's docstring, falling back to boilerplate
pub fn suggest_function(
    generator: &mut dyn ContentGenerator,
    func: &FunctionRecord,
    style: DocStyle,
) -> String {
    match generator.generate(func, style) {
        Ok(text) => text,
        Err(e) => {
            warn!(function = %func.qualified_name(), "Content generation failed: {}", e);
            function_boilerplate(func, style)
        }
    }
}
