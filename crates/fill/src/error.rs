use platen_layout::LayoutError;
use platen_source::DataSourceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FillError {
    #[error("Can't resolve placeholder [{0}] in any data source.")]
    UnresolvablePlaceholder(String),

    #[error("[{source_name}] is not a collection: {value}")]
    NotACollection { source_name: String, value: String },

    #[error("Invalid function pattern '{pattern}': {message}")]
    InvalidFunction { pattern: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    DataSource(#[from] DataSourceError),
}
