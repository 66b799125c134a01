//! Fills report templates with data.
//!
//! A [`FillJob`] takes a parsed [`Report`](platen_layout::Report) and a list of
//! data sources and produces the printer stream in a fixed sequence:
//!
//! 1. The template is cloned; the caller's report is never touched.
//! 2. Table and list lines are expanded against their collections and the
//!    generated rows are paginated into the report.
//! 3. The last-page footer replaces the footer of the last page.
//! 4. Every `%{...}` function runs over every text line.
//! 5. Each page is rendered and its `${...}` then `{{...}}` placeholders are
//!    substituted.
//! 6. The pages are wrapped in the page-format initialization sequence and a
//!    trailing reset.

pub mod config;
pub mod error;
pub mod expand;
pub mod format;
pub mod function;
pub mod job;
pub mod placeholder;

pub use config::FillConfig;
pub use error::FillError;
pub use expand::WrappedBuffer;
pub use format::{Aggregate, Alignment, FormatSpec, ValueFormat};
pub use function::{Function, FunctionRegistry, LineContext, PatternFunction};
pub use job::FillJob;
pub use placeholder::{BasicPlaceholder, Placeholder, ScriptContext, ScriptPlaceholder};
