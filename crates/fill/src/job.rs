//! The fill job: turns a report template plus data into a printer stream.
use crate::config::FillConfig;
use crate::error::FillError;
use crate::expand::Expander;
use crate::function::FunctionRegistry;
use crate::placeholder::{BASIC_RE, BasicPlaceholder, Placeholder, SCRIPT_RE, ScriptContext, ScriptPlaceholder, substitute};
use platen_escp as escp;
use platen_layout::Report;
use platen_source::DataSource;
use platen_types::Line;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Fills one report template with data.
///
/// The template is only borrowed; every fill works on a clone, so one
/// template can serve any number of jobs. Function state lives in the job's
/// own [`FunctionRegistry`] and is reset at the start of every fill.
pub struct FillJob<'r> {
    report: &'r Report,
    sources: Vec<Box<dyn DataSource>>,
    variables: HashMap<String, Value>,
    functions: FunctionRegistry,
    script_functions: platen_jpath::FunctionRegistry,
    config: FillConfig,
    placeholders: HashMap<String, Placeholder>,
}

impl fmt::Debug for FillJob<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FillJob")
            .field("sources", &self.sources.iter().map(|source| source.name()).collect::<Vec<_>>())
            .field("variables", &self.variables)
            .field("functions", &self.functions)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'r> FillJob<'r> {
    /// Sources are searched in the given order.
    pub fn new(report: &'r Report, sources: Vec<Box<dyn DataSource>>) -> Self {
        Self {
            report,
            sources,
            variables: HashMap::new(),
            functions: FunctionRegistry::default(),
            script_functions: platen_jpath::FunctionRegistry::default(),
            config: FillConfig::default(),
            placeholders: HashMap::new(),
        }
    }

    pub fn with_source(report: &'r Report, source: impl DataSource + 'static) -> Self {
        Self::new(report, vec![Box::new(source)])
    }

    pub fn with_config(mut self, config: FillConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &FillConfig {
        &self.config
    }

    pub fn report(&self) -> &Report {
        self.report
    }

    pub fn sources(&self) -> &[Box<dyn DataSource>] {
        &self.sources
    }

    /// Makes `name` visible to script placeholders, shadowing any data
    /// source member of the same name.
    pub fn add_script_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Drops a variable added with [`add_script_variable`](Self::add_script_variable).
    /// Data source members are not affected.
    pub fn remove_script_variable(&mut self, name: &str) -> Option<Value> {
        self.variables.remove(name)
    }

    pub fn functions_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.functions
    }

    /// Functions callable from script placeholders.
    pub fn script_functions_mut(&mut self) -> &mut platen_jpath::FunctionRegistry {
        &mut self.script_functions
    }

    /// Placeholders seen by the last fill, keyed by their full text
    /// (`${name}` or `{{ expr }}`).
    pub fn placeholders(&self) -> &HashMap<String, Placeholder> {
        &self.placeholders
    }

    pub fn placeholder(&self, text: &str) -> Option<&Placeholder> {
        self.placeholders.get(text)
    }

    /// Expands dynamic lines, applies the last-page footer and runs the
    /// functions, returning the report that would be printed.
    pub fn prepare(&mut self) -> Result<Report, FillError> {
        let sources: Vec<&dyn DataSource> = self.sources.iter().map(|source| &**source).collect();
        let root = ScriptContext::root_for(&sources);
        let context = ScriptContext::new(&root, self.variables.clone());
        let expander = Expander {
            sources: &sources,
            context: &context,
            functions: &self.script_functions,
            config: &self.config,
        };
        prepare_report(self.report, &expander, &mut self.functions)
    }

    pub fn fill(&mut self) -> Result<String, FillError> {
        self.config.validate()?;
        let sources: Vec<&dyn DataSource> = self.sources.iter().map(|source| &**source).collect();
        let root = ScriptContext::root_for(&sources);
        let context = ScriptContext::new(&root, self.variables.clone());
        let expander = Expander {
            sources: &sources,
            context: &context,
            functions: &self.script_functions,
            config: &self.config,
        };
        let report = prepare_report(self.report, &expander, &mut self.functions)?;
        log::debug!("Filling {} pages from {} data sources", report.last_page_number(), sources.len());

        let format = report.page_format();
        let mut out = format.build();
        for page in report.pages() {
            let text = page.render(format.auto_line_feed, format.auto_form_feed);
            let text = substitute(&BASIC_RE, &text, |captures| {
                let placeholder = self
                    .placeholders
                    .entry(captures[0].to_string())
                    .or_insert_with(|| Placeholder::Basic(BasicPlaceholder::new(&captures[1])));
                let Placeholder::Basic(placeholder) = placeholder else {
                    return Ok(captures[0].to_string());
                };
                placeholder.render(&sources, &self.config)
            })?;
            let text = substitute(&SCRIPT_RE, &text, |captures| {
                let placeholder = self
                    .placeholders
                    .entry(captures[0].to_string())
                    .or_insert_with(|| Placeholder::Script(ScriptPlaceholder::new(&captures[1])));
                let Placeholder::Script(placeholder) = placeholder else {
                    return Ok(captures[0].to_string());
                };
                Ok(placeholder.render(&context, &self.script_functions, &self.config))
            })?;
            out.push_str(&text);
        }
        if format.auto_form_feed && !out.ends_with(escp::CRFF) {
            out.push_str(escp::CRFF);
        }
        out.push_str(&escp::initialize());
        Ok(out)
    }

    /// [`fill`](Self::fill), encoded to printer bytes.
    pub fn fill_bytes(&mut self) -> Result<Vec<u8>, FillError> {
        self.fill().map(|out| escp::encode(&out))
    }
}

fn prepare_report(
    template: &Report,
    expander: &Expander,
    functions: &mut FunctionRegistry,
) -> Result<Report, FillError> {
    let mut report = template.clone();
    if report.has_dynamic_line() {
        expander.expand_dynamic_lines(&mut report)?;
    }
    apply_last_page_footer(&mut report);
    functions.reset();
    functions.apply(&mut report);
    Ok(report)
}

/// Gives the last page the last-page footer, or a page of its own when the
/// longer footer no longer fits.
fn apply_last_page_footer(report: &mut Report) {
    if report.last_page_footer().is_empty() {
        return;
    }
    let last_page_footer: Vec<Line> = report.last_page_footer().iter().cloned().map(Line::Text).collect();
    let footer: Vec<Line> = report.footer().iter().cloned().map(Line::Text).collect();
    let last = report.last_page_number();
    let Ok(page) = report.page_mut(last) else {
        return;
    };
    page.set_footer(last_page_footer.clone());
    if page.is_overflow() {
        log::debug!("Last-page footer overflows page {}, moving it to a new page", last);
        page.set_footer(footer);
        report.new_page(false).set_footer(last_page_footer);
    }
}
