// Processor that implements TemplateParser trait for JSON templates
use crate::ast::JsonTemplateFile;
use crate::compiler::Compiler;
use crate::error::JsonTemplateError;
use platen_layout::Report;
use platen_template_core::{TemplateError, TemplateParser};

/// JSON template parser
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl JsonParser {
    /// Builds a report from an already parsed JSON document.
    pub fn parse_value(&self, value: serde_json::Value) -> Result<Report, JsonTemplateError> {
        let template_file: JsonTemplateFile = serde_json::from_value(value)?;
        Compiler::compile(template_file)
    }
}

impl TemplateParser for JsonParser {
    fn parse(&self, template_source: &str) -> Result<Report, TemplateError> {
        let template_file: JsonTemplateFile = serde_json::from_str(template_source)
            .map_err(|e| TemplateError::ParseError(format!("JSON parse error: {}", e)))?;
        Compiler::compile(template_file).map_err(|e: JsonTemplateError| -> TemplateError { e.into() })
    }
}
