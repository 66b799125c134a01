//! Basic (`${...}`) and script (`{{...}}`) placeholders.
use crate::config::FillConfig;
use crate::error::FillError;
use crate::format::FormatSpec;
use platen_jpath::{EvaluationContext, Expression, FunctionRegistry, JPathError, evaluate, parse_expression};
use platen_source::DataSource;
use platen_types::line::FORMAT_SEPARATOR;
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::LazyLock;

pub(crate) static BASIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(.+?)\}").expect("BUG: invalid basic placeholder regex"));

pub(crate) static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(.+?)\}\}").expect("BUG: invalid script placeholder regex"));

/// Replaces every match of `pattern` with the result of `replace`, stopping
/// at the first error.
pub(crate) fn substitute<F>(pattern: &Regex, text: &str, mut replace: F) -> Result<String, FillError>
where
    F: FnMut(&Captures) -> Result<String, FillError>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for captures in pattern.captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        out.push_str(&text[last..whole.start()]);
        out.push_str(&replace(&captures)?);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

/// A member path looked up in the data sources, e.g. `${address.city:20}`.
///
/// The suffix is split on single colons, so `${name:10}` and `${name::10}`
/// are the same placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicPlaceholder {
    text: String,
    member: String,
    spec: FormatSpec,
}

impl BasicPlaceholder {
    pub fn new(text: &str) -> Self {
        let mut parts = text.split(':').map(str::trim).filter(|part| !part.is_empty());
        let member = parts.next().unwrap_or_default().to_string();
        Self { text: text.to_string(), member, spec: FormatSpec::parse(parts) }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn member(&self) -> &str {
        &self.member
    }

    pub fn spec(&self) -> &FormatSpec {
        &self.spec
    }

    /// The value from the first source that has the member.
    pub fn resolve(&self, sources: &[&dyn DataSource]) -> Result<Option<Value>, FillError> {
        match sources.iter().find(|source| source.has(&self.member)) {
            Some(source) => Ok(Some(source.get(&self.member)?)),
            None => Ok(None),
        }
    }

    pub fn render(&self, sources: &[&dyn DataSource], config: &FillConfig) -> Result<String, FillError> {
        if sources.is_empty() {
            return Ok(self.spec.format(&Value::Null, &config.currency_symbol));
        }
        let value = match self.resolve(sources)? {
            Some(value) => value,
            None if config.strict_placeholders => {
                return Err(FillError::UnresolvablePlaceholder(self.text.clone()));
            }
            None => {
                log::warn!("No data source has [{}], printing it empty", self.member);
                Value::Null
            }
        };
        Ok(self.spec.format(&value, &config.currency_symbol))
    }
}

/// An expression evaluated in a [`ScriptContext`], e.g. `{{ price * qty::number }}`.
///
/// Only `::` separates the format suffix, so expressions may contain single
/// colons.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptPlaceholder {
    text: String,
    script: String,
    expression: Result<Expression, JPathError>,
    spec: FormatSpec,
}

impl ScriptPlaceholder {
    pub fn new(text: &str) -> Self {
        let (script, spec) = match text.split_once(FORMAT_SEPARATOR) {
            Some((script, suffix)) => (script.trim(), FormatSpec::parse(suffix.split(FORMAT_SEPARATOR))),
            None => (text.trim(), FormatSpec::default()),
        };
        Self {
            text: text.to_string(),
            script: script.to_string(),
            expression: parse_expression(script),
            spec,
        }
    }

    /// Forces a fixed width, as table cells do.
    pub fn with_width(mut self, width: usize) -> Self {
        self.spec.width = Some(width);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn spec(&self) -> &FormatSpec {
        &self.spec
    }

    pub fn evaluate(&self, context: &ScriptContext, functions: &FunctionRegistry) -> Result<Value, JPathError> {
        let expression = self.expression.as_ref().map_err(Clone::clone)?;
        context.evaluate(expression, functions)
    }

    /// Evaluation errors are logged and render as empty text.
    pub fn render(&self, context: &ScriptContext, functions: &FunctionRegistry, config: &FillConfig) -> String {
        let value = self.evaluate(context, functions).unwrap_or_else(|e| {
            log::warn!("Error while evaluating [{}]: {}", self.script, e);
            Value::Null
        });
        self.spec.format(&value, &config.currency_symbol)
    }
}

/// A memoized placeholder of a fill job, keyed by its full text.
#[derive(Debug, Clone, PartialEq)]
pub enum Placeholder {
    Basic(BasicPlaceholder),
    Script(ScriptPlaceholder),
}

impl Placeholder {
    pub fn text(&self) -> &str {
        match self {
            Placeholder::Basic(p) => p.text(),
            Placeholder::Script(p) => p.text(),
        }
    }
}

/// Everything a script placeholder can see.
///
/// The root object holds the members of every data source (the first
/// source wins on a clash) plus each source's members under its stable name.
/// Variables shadow root members.
#[derive(Debug, Clone)]
pub struct ScriptContext<'a> {
    root: &'a Value,
    variables: HashMap<String, Value>,
}

impl<'a> ScriptContext<'a> {
    pub fn new(root: &'a Value, variables: HashMap<String, Value>) -> Self {
        Self { root, variables }
    }

    /// Builds the root object for `sources`.
    pub fn root_for(sources: &[&dyn DataSource]) -> Value {
        let mut root = Map::new();
        let mut named = Vec::with_capacity(sources.len());
        for source in sources {
            let value = source.to_value();
            if let Value::Object(members) = &value {
                for (key, member) in members {
                    if !root.contains_key(key) {
                        root.insert(key.clone(), member.clone());
                    }
                }
            }
            named.push((source.name(), value));
        }
        for (name, value) in named {
            root.entry(name.to_string()).or_insert(value);
        }
        Value::Object(root)
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    pub fn variables(&self) -> &HashMap<String, Value> {
        &self.variables
    }

    /// A child context for one collection element: the element's members
    /// become variables, so they shadow the root.
    pub fn for_element(&self, element: &Value) -> ScriptContext<'a> {
        let mut variables = self.variables.clone();
        if let Value::Object(members) = element {
            variables.extend(members.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        ScriptContext { root: self.root, variables }
    }

    pub fn evaluate(&self, expression: &Expression, functions: &FunctionRegistry) -> Result<Value, JPathError> {
        let e_ctx = EvaluationContext {
            context_node: self.root,
            variables: &self.variables,
            functions,
            loop_position: self.variables.get("row").and_then(Value::as_u64).map(|row| row.saturating_sub(1) as usize),
        };
        evaluate(expression, &e_ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platen_source::{EmptyDataSource, MapDataSource, RecordDataSource};
    use serde_json::json;

    fn person() -> MapDataSource {
        MapDataSource::new().with("id", "007").with("nickname", "Solid Snake")
    }

    #[test]
    fn test_substitute_keeps_surrounding_text() {
        let out = substitute(&BASIC_RE, "a ${x} b ${y}!", |captures| Ok(captures[1].to_uppercase())).unwrap();
        assert_eq!(out, "a X b Y!");
        let out = substitute(&SCRIPT_RE, "{{1}} and {{ 2 }}", |captures| Ok(format!("<{}>", &captures[1]))).unwrap();
        assert_eq!(out, "<1> and < 2 >");
    }

    #[test]
    fn test_substitute_stops_at_first_error() {
        let result = substitute(&BASIC_RE, "${a}${b}", |captures| {
            Err(FillError::UnresolvablePlaceholder(captures[1].to_string()))
        });
        assert!(matches!(result, Err(FillError::UnresolvablePlaceholder(text)) if text == "a"));
    }

    #[test]
    fn test_basic_placeholder_parsing() {
        let p = BasicPlaceholder::new(" firstName : 10 ");
        assert_eq!(p.member(), "firstName");
        assert_eq!(p.spec().width, Some(10));
        assert_eq!(BasicPlaceholder::new("name::right::5").spec().width, Some(5));
    }

    #[test]
    fn test_basic_placeholder_first_source_wins() {
        let first = MapDataSource::new().with("id", "A");
        let second = MapDataSource::new().with("id", "B").with("other", "C");
        let sources: Vec<&dyn DataSource> = vec![&first, &second];
        let config = FillConfig::default();
        assert_eq!(BasicPlaceholder::new("id").render(&sources, &config).unwrap(), "A");
        assert_eq!(BasicPlaceholder::new("other").render(&sources, &config).unwrap(), "C");
    }

    #[test]
    fn test_unresolvable_basic_placeholder() {
        let source = person();
        let sources: Vec<&dyn DataSource> = vec![&source];
        let strict = FillConfig::default();
        assert!(matches!(
            BasicPlaceholder::new("rank").render(&sources, &strict),
            Err(FillError::UnresolvablePlaceholder(text)) if text == "rank"
        ));

        let lenient = FillConfig { strict_placeholders: false, ..Default::default() };
        assert_eq!(BasicPlaceholder::new("rank:3").render(&sources, &lenient).unwrap(), "   ");
    }

    #[test]
    fn test_basic_placeholder_without_sources_is_empty() {
        let config = FillConfig::default();
        assert_eq!(BasicPlaceholder::new("id").render(&[], &config).unwrap(), "");
    }

    #[test]
    fn test_basic_placeholder_null_member() {
        let source = MapDataSource::new().with("nickname", Value::Null);
        let sources: Vec<&dyn DataSource> = vec![&source];
        let config = FillConfig::default();
        assert_eq!(BasicPlaceholder::new("nickname").render(&sources, &config).unwrap(), "");
    }

    #[test]
    fn test_script_placeholder_parsing() {
        let p = ScriptPlaceholder::new(" lastName::5 ");
        assert_eq!(p.script(), "lastName");
        assert_eq!(p.spec().width, Some(5));
        let p = ScriptPlaceholder::new("a > 1").with_width(3);
        assert_eq!(p.spec().width, Some(3));
    }

    #[test]
    fn test_script_root_merges_sources() {
        let map = person();
        let empty = EmptyDataSource;
        let root = ScriptContext::root_for(&[&map, &empty]);
        assert_eq!(root["id"], json!("007"));
        assert_eq!(root["map"]["nickname"], json!("Solid Snake"));
        assert_eq!(root["empty"], json!({}));
    }

    #[test]
    fn test_script_placeholder_renders() {
        let map = person();
        let root = ScriptContext::root_for(&[&map]);
        let context = ScriptContext::new(&root, HashMap::new());
        let functions = FunctionRegistry::default();
        let config = FillConfig::default();
        let p = ScriptPlaceholder::new("concat(id, '/', map.nickname)::12");
        assert_eq!(p.render(&context, &functions, &config), "007/Solid Sn");
    }

    #[test]
    fn test_script_errors_render_empty() {
        let root = json!({});
        let context = ScriptContext::new(&root, HashMap::new());
        let functions = FunctionRegistry::default();
        let config = FillConfig::default();
        assert_eq!(ScriptPlaceholder::new("1 +").render(&context, &functions, &config), "");
        assert_eq!(ScriptPlaceholder::new("1 / 0").render(&context, &functions, &config), "");
        assert_eq!(ScriptPlaceholder::new("launch()::3").render(&context, &functions, &config), "   ");
    }

    #[test]
    fn test_accessor_through_record_source() {
        #[derive(serde::Serialize)]
        struct Person {
            first: &'static str,
            last: &'static str,
        }
        let record = RecordDataSource::new(&Person { first: "David", last: "None" })
            .unwrap()
            .with_accessor("name", |r| {
                json!(format!("{} {}", r["first"].as_str().unwrap_or(""), r["last"].as_str().unwrap_or("")))
            });
        let root = ScriptContext::root_for(&[&record]);
        let context = ScriptContext::new(&root, HashMap::new());
        let functions = FunctionRegistry::default();
        let config = FillConfig::default();
        assert_eq!(ScriptPlaceholder::new("record.name()").render(&context, &functions, &config), "David None");

        let sources: Vec<&dyn DataSource> = vec![&record];
        assert_eq!(BasicPlaceholder::new("@name").render(&sources, &config).unwrap(), "David None");
    }

    #[test]
    fn test_element_context_shadows_root() {
        let root = json!({ "name": "global", "title": "Report" });
        let context = ScriptContext::new(&root, HashMap::new());
        let mut row = context.for_element(&json!({ "name": "Ada" }));
        row.set_variable("row", 2);
        let functions = FunctionRegistry::default();
        let config = FillConfig::default();
        let p = ScriptPlaceholder::new("row + '. ' + name + ' in ' + title");
        assert_eq!(p.render(&row, &functions, &config), "2. Ada in Report");
        assert_eq!(ScriptPlaceholder::new("position()").render(&row, &functions, &config), "2");
    }
}
