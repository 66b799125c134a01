// src/error.rs
use platen_fill::FillError;
use platen_json_template::JsonTemplateError;
use platen_layout::LayoutError;
use platen_source::DataSourceError;
use platen_template_core::TemplateError;
use thiserror::Error;

/// A comprehensive error type for the whole template-to-printer pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Fill failed: {0}")]
    Fill(#[from] FillError),

    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Data source error: {0}")]
    DataSource(#[from] DataSourceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<JsonTemplateError> for PipelineError {
    fn from(e: JsonTemplateError) -> Self {
        PipelineError::Template(e.into())
    }
}

// Handles JSON errors at the top level (e.g., reading data files)
impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self {
        PipelineError::DataSource(DataSourceError::Serialization(e))
    }
}
