//! JSON template descriptions.
//!
//! A template file has a `pageFormat` object and a `template` that is either
//! an array of detail lines or an object with `firstPage`, `header`,
//! `footer`, `lastPageFooter`, `detail` and `lastPage` sections. Lines are
//! plain strings, `{"table": ...}` objects or `{"list": ...}` objects.
//!
//! ```ignore
//! use platen_json_template::JsonParser;
//! use platen_template_core::TemplateParser;
//!
//! let report = JsonParser.parse(r#"{
//!     "pageFormat": { "pageLength": 10 },
//!     "template": ["Hello ${name}"]
//! }"#)?;
//! ```

pub mod ast;
pub mod compiler;
pub mod error;
pub mod processor;

pub use ast::{JsonColumn, JsonList, JsonPageFormat, JsonSections, JsonTable, JsonTemplateFile, LineNode, TemplateBody};
pub use compiler::Compiler;
pub use error::JsonTemplateError;
pub use processor::JsonParser;
