use platen_layout::LayoutError;
use platen_template_core::TemplateError;
use platen_types::DomError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JsonTemplateError {
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Template compilation error: {0}")]
    Compilation(String),

    #[error("Invalid value for '{key}': {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

impl From<JsonTemplateError> for TemplateError {
    fn from(err: JsonTemplateError) -> Self {
        match err {
            JsonTemplateError::JsonParse(e) => TemplateError::ParseError(e.to_string()),
            JsonTemplateError::Compilation(s) => TemplateError::ParseError(s),
            e @ JsonTemplateError::InvalidValue { .. } => TemplateError::ConfigError(e.to_string()),
            JsonTemplateError::Dom(e) => TemplateError::ConfigError(e.to_string()),
            JsonTemplateError::Layout(e) => TemplateError::Layout(e),
        }
    }
}
