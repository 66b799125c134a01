pub mod fixtures;

use platen::{PipelineBuilder, PipelineError};
use platen_escp as escp;
use serde_json::Value;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub const CRLF: &str = escp::CRLF;
pub const CRFF: &str = escp::CRFF;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The reset sequence that opens and closes every fill.
pub fn init() -> String {
    escp::initialize()
}

/// Fill a JSON template with one JSON data document
pub fn fill_json(template: &Value, data: Value) -> Result<String, PipelineError> {
    let template_str = serde_json::to_string(template)?;
    PipelineBuilder::new()
        .with_template_source(&template_str, "json")?
        .build()?
        .fill(data)
}

/// Joins output fragments the way assertions spell them out.
pub fn stream(parts: &[String]) -> String {
    parts.concat()
}
