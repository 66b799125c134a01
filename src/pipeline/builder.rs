// src/pipeline/builder.rs
use super::orchestrator::ReportPipeline;
use super::{FunctionSpec, SharedProcessor};
use crate::error::PipelineError;
use platen_fill::{FillConfig, LineContext, PatternFunction};
use platen_jpath::JPathFunction;
use platen_json_template::JsonParser;
use platen_layout::Report;
use platen_template_core::{TemplateFlags, TemplateParser};
use regex::Captures;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// A builder for creating a [`ReportPipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    report: Option<Report>,
    config: FillConfig,
    functions: Vec<FunctionSpec>,
    script_functions: Vec<(String, JPathFunction)>,
    variables: Vec<(String, Value)>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Configures the pipeline by loading a template from a file.
    /// The template format is inferred from the file extension.
    pub fn with_template_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, PipelineError> {
        let path_ref = path.as_ref();
        let extension = path_ref.extension().and_then(|s| s.to_str()).unwrap_or("");
        let template_source = fs::read_to_string(path_ref).map_err(|e| {
            PipelineError::Io(io::Error::new(
                e.kind(),
                format!("Failed to read template from '{}': {}", path_ref.display(), e),
            ))
        })?;

        let parser = self.get_parser_for_extension(extension)?;
        self.report = Some(parser.parse(&template_source)?);
        Ok(self)
    }

    /// Configures the pipeline with a template from a string.
    /// The `extension` argument selects the parser ("json").
    pub fn with_template_source(mut self, source: &str, extension: &str) -> Result<Self, PipelineError> {
        let parser = self.get_parser_for_extension(extension)?;
        self.report = Some(parser.parse(source)?);
        Ok(self)
    }

    /// Configures the pipeline with a programmatically built report.
    pub fn with_report(mut self, report: Report) -> Self {
        self.report = Some(report);
        self
    }

    pub fn with_config(mut self, config: FillConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers a `%{...}` function run after the built-ins. The pattern is
    /// checked here so a bad pattern fails before any fill.
    pub fn with_function<F>(mut self, name: &str, pattern: &str, processor: F) -> Result<Self, PipelineError>
    where
        F: Fn(&Captures, &LineContext) -> String + Send + Sync + 'static,
    {
        PatternFunction::new(name, pattern, |captures: &Captures, _: &LineContext| captures[0].to_string())?;
        let processor: SharedProcessor = Arc::new(processor);
        self.functions.push(FunctionSpec { name: name.to_string(), pattern: pattern.to_string(), processor });
        Ok(self)
    }

    /// Registers a function callable from `{{...}}` script placeholders.
    pub fn with_script_function(mut self, name: &str, function: JPathFunction) -> Self {
        self.script_functions.push((name.to_string(), function));
        self
    }

    /// Adds a variable visible to every script placeholder.
    pub fn with_script_variable(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.variables.push((name.to_string(), value.into()));
        self
    }

    /// Consumes the builder and creates the [`ReportPipeline`].
    pub fn build(mut self) -> Result<ReportPipeline, PipelineError> {
        let report = self.report.take().ok_or_else(|| {
            PipelineError::Config(
                "No template has been configured. Use `with_template_file` or `with_report`.".to_string(),
            )
        })?;
        self.config.validate()?;

        let flags = TemplateFlags::detect(&report);
        if flags.has_dynamic_lines() {
            log::info!("Template has dynamic lines ({}). Rows are expanded per fill.", flags);
        } else {
            log::info!("Template is static ({}).", flags);
        }

        Ok(ReportPipeline::new(
            report,
            self.config,
            self.functions,
            self.script_functions,
            self.variables,
            flags,
        ))
    }

    fn get_parser_for_extension(&self, extension: &str) -> Result<Box<dyn TemplateParser>, PipelineError> {
        match extension {
            "json" => Ok(Box::new(JsonParser)),
            _ => Err(PipelineError::Config(format!("Unsupported template file extension: .{}", extension))),
        }
    }
}
