//! Pagination and fill engine for ESC/P dot-matrix printer reports.
//!
//! A report template is a fixed grid of lines per page. Text lines carry
//! `${...}` and `{{...}}` placeholders plus `%{...}` functions; table and
//! list lines are expanded against collections in the data. The output is a
//! single ESC/P stream ready to be written to a printer.
//!
//! # Example
//!
//! ```ignore
//! use platen::PipelineBuilder;
//! use serde_json::json;
//!
//! let pipeline = PipelineBuilder::new()
//!     .with_template_file("report.json")?
//!     .build()?;
//!
//! let bytes = pipeline.fill_bytes(json!({ "persons": [] }))?;
//! ```

pub mod error;
pub mod pipeline;

pub use error::PipelineError;
pub use pipeline::{PipelineBuilder, ReportPipeline};

pub use platen_escp::BoxCharset;
pub use platen_fill::{FillConfig, FillError, FillJob, Function, FunctionRegistry, LineContext, PatternFunction};
pub use platen_json_template::JsonParser;
pub use platen_layout::{LayoutError, Page, Report};
pub use platen_source::{
    DataSource, DataSourceError, DataSources, EmptyDataSource, JsonDataSource, MapDataSource, RecordDataSource,
};
pub use platen_template_core::{TemplateError, TemplateFlags, TemplateParser};
pub use platen_types::{
    CharacterPitch, Line, LineSpacing, ListLine, PageFormat, TableColumn, TableLine, TextLine, Typeface,
};
