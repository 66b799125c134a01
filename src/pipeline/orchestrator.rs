// src/pipeline/orchestrator.rs
use super::FunctionSpec;
use crate::error::PipelineError;
use platen_fill::{FillConfig, FillJob, PatternFunction};
use platen_jpath::JPathFunction;
use platen_layout::Report;
use platen_source::{DataSource, DataSources};
use platen_template_core::TemplateFlags;
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// A parsed template ready to be filled.
///
/// The pipeline is immutable after [`build`](super::PipelineBuilder::build);
/// every fill runs its own [`FillJob`], so one pipeline can serve fills on
/// several threads at once.
pub struct ReportPipeline {
    report: Report,
    config: FillConfig,
    functions: Vec<FunctionSpec>,
    script_functions: Vec<(String, JPathFunction)>,
    variables: Vec<(String, Value)>,
    flags: TemplateFlags,
}

impl ReportPipeline {
    pub(crate) fn new(
        report: Report,
        config: FillConfig,
        functions: Vec<FunctionSpec>,
        script_functions: Vec<(String, JPathFunction)>,
        variables: Vec<(String, Value)>,
        flags: TemplateFlags,
    ) -> Self {
        Self { report, config, functions, script_functions, variables, flags }
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn config(&self) -> &FillConfig {
        &self.config
    }

    pub fn flags(&self) -> TemplateFlags {
        self.flags
    }

    /// Fills the template with one JSON document (`null` or an object).
    pub fn fill(&self, data: Value) -> Result<String, PipelineError> {
        self.fill_sources(vec![DataSources::from_value(data)?])
    }

    /// Fills the template with data sources tried in order.
    pub fn fill_sources(&self, sources: Vec<Box<dyn DataSource>>) -> Result<String, PipelineError> {
        let start = Instant::now();
        let mut job = self.job(sources)?;
        let out = job.fill()?;
        log::debug!(
            "Filled {} placeholders into {} characters in {:?}",
            job.placeholders().len(),
            out.len(),
            start.elapsed()
        );
        Ok(out)
    }

    /// [`fill`](Self::fill), encoded to printer bytes.
    pub fn fill_bytes(&self, data: Value) -> Result<Vec<u8>, PipelineError> {
        self.fill(data).map(|out| platen_escp::encode(&out))
    }

    /// Writes the printer bytes to `writer` and returns how many were written.
    pub fn generate_to_writer<W: Write>(&self, data: Value, mut writer: W) -> Result<usize, PipelineError> {
        let bytes = self.fill_bytes(data)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(bytes.len())
    }

    pub fn generate_to_file<P: AsRef<Path>>(&self, data: Value, path: P) -> Result<usize, PipelineError> {
        let output_path = path.as_ref();
        if let Some(parent_dir) = output_path.parent() {
            fs::create_dir_all(parent_dir)?;
        }
        let file = fs::File::create(output_path)?;
        self.generate_to_writer(data, io::BufWriter::new(file))
    }

    fn job(&self, sources: Vec<Box<dyn DataSource>>) -> Result<FillJob<'_>, PipelineError> {
        let mut job = FillJob::new(&self.report, sources).with_config(self.config.clone());
        for (name, value) in &self.variables {
            job.add_script_variable(name.clone(), value.clone());
        }
        for spec in &self.functions {
            let processor = Arc::clone(&spec.processor);
            let function = PatternFunction::new(spec.name.clone(), &spec.pattern, move |captures, line| {
                processor(captures, line)
            })?;
            job.functions_mut().register(function);
        }
        for (name, function) in &self.script_functions {
            job.script_functions_mut().register(name, *function);
        }
        Ok(job)
    }
}
