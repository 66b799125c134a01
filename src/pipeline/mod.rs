//! Report fill pipeline.
//!
//! - [`PipelineBuilder`]: Fluent builder that parses a template once
//! - [`ReportPipeline`]: A parsed template plus fill options, reusable for any
//!   number of fills
//!
//! # Example
//!
//! ```ignore
//! use platen::PipelineBuilder;
//!
//! let pipeline = PipelineBuilder::new()
//!     .with_template_file("template.json")?
//!     .with_script_variable("company", "ACME")
//!     .build()?;
//!
//! pipeline.generate_to_file(data, "output.prn")?;
//! ```

mod builder;
mod orchestrator;

pub use builder::PipelineBuilder;
pub use orchestrator::ReportPipeline;

use platen_fill::LineContext;
use regex::Captures;
use std::sync::Arc;

pub(crate) type SharedProcessor = Arc<dyn Fn(&Captures, &LineContext) -> String + Send + Sync>;

/// A custom function as registered on the builder. Every fill gets its own
/// [`PatternFunction`](platen_fill::PatternFunction) built from it.
#[derive(Clone)]
pub(crate) struct FunctionSpec {
    pub(crate) name: String,
    pub(crate) pattern: String,
    pub(crate) processor: SharedProcessor,
}
