//! `%{...}` functions: stateful text macros applied before placeholders.
//!
//! Every function owns a pattern and replaces each match on every text line
//! of the report, in document order. Toggle functions alternate between
//! their select and cancel codes, so the first `%{BOLD}` turns bold on and
//! the second turns it off again.
use crate::error::FillError;
use platen_escp as escp;
use platen_layout::Report;
use platen_types::Line;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

fn keyword_regex(keyword: &str) -> Regex {
    Regex::new(&format!(r"%\{{\s*({keyword})\s*\}}")).expect("BUG: invalid function keyword regex")
}

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| keyword_regex("BOLD"));
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| keyword_regex("ITALIC"));
static UNDERLINE_RE: LazyLock<Regex> = LazyLock::new(|| keyword_regex("UNDERLINE"));
static DOUBLE_RE: LazyLock<Regex> = LazyLock::new(|| keyword_regex("DOUBLE"));
static SUPER_RE: LazyLock<Regex> = LazyLock::new(|| keyword_regex("SUPER"));
static SUB_RE: LazyLock<Regex> = LazyLock::new(|| keyword_regex("SUB"));
static PAGE_NO_RE: LazyLock<Regex> = LazyLock::new(|| keyword_regex("PAGE_NO"));
static LINE_NO_RE: LazyLock<Regex> = LazyLock::new(|| keyword_regex("LINE_NO"));
static GLOBAL_LINE_NO_RE: LazyLock<Regex> = LazyLock::new(|| keyword_regex("GLOBAL_LINE_NO"));

static ASCII_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%\{\s*(\d+)\s*(R\s*(\d+))?\s*\}").expect("BUG: invalid ASCII function regex")
});

static INC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%\{\s*INC\s*(\w+)\s*\}").expect("BUG: invalid INC function regex")
});

/// Where a matched function sits in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineContext {
    pub page_number: usize,
    /// 1-based within the page, header rows included.
    pub line_number: usize,
    /// 1-based within the whole report.
    pub global_line_number: usize,
}

pub trait Function: Send {
    fn name(&self) -> &str;

    fn pattern(&self) -> &Regex;

    /// Returns the replacement for one match.
    fn process(&mut self, captures: &Captures, line: &LineContext) -> String;

    /// Clears state carried between matches. Called at the start of every fill.
    fn reset(&mut self) {}
}

/// Alternates between a select and a cancel code.
struct Toggle {
    name: &'static str,
    pattern: &'static LazyLock<Regex>,
    select: fn() -> String,
    cancel: fn() -> String,
    active: bool,
}

impl Toggle {
    fn new(
        name: &'static str,
        pattern: &'static LazyLock<Regex>,
        select: fn() -> String,
        cancel: fn() -> String,
    ) -> Self {
        Self { name, pattern, select, cancel, active: false }
    }
}

impl Function for Toggle {
    fn name(&self) -> &str {
        self.name
    }

    fn pattern(&self) -> &Regex {
        self.pattern
    }

    fn process(&mut self, _captures: &Captures, _line: &LineContext) -> String {
        let code = if self.active { (self.cancel)() } else { (self.select)() };
        self.active = !self.active;
        code
    }

    fn reset(&mut self) {
        self.active = false;
    }
}

/// Replaces a match with a number taken from its position.
struct Position {
    name: &'static str,
    pattern: &'static LazyLock<Regex>,
    number: fn(&LineContext) -> usize,
}

impl Function for Position {
    fn name(&self) -> &str {
        self.name
    }

    fn pattern(&self) -> &Regex {
        self.pattern
    }

    fn process(&mut self, _captures: &Captures, line: &LineContext) -> String {
        (self.number)(line).to_string()
    }
}

/// A page is at most `u8::MAX` columns wide, so no repeat needs more.
const MAX_REPEAT: usize = u8::MAX as usize;

/// `%{65}` prints `A`, `%{205 R5}` prints the character five times.
struct Ascii;

impl Function for Ascii {
    fn name(&self) -> &str {
        "ASCII"
    }

    fn pattern(&self) -> &Regex {
        &ASCII_RE
    }

    fn process(&mut self, captures: &Captures, _line: &LineContext) -> String {
        let code = captures[1].parse::<u32>().ok().and_then(char::from_u32);
        let Some(c) = code else {
            log::warn!("[{}] is not a character code", &captures[1]);
            return captures[0].to_string();
        };
        let count = match captures.get(3) {
            Some(m) => m.as_str().parse::<usize>().unwrap_or(usize::MAX),
            None => 1,
        };
        if count > MAX_REPEAT {
            log::warn!("[{}] repeats wider than a line, printing {} characters", &captures[0], MAX_REPEAT);
        }
        escp::repeat(c, count.clamp(1, MAX_REPEAT))
    }
}

/// `%{INC name}` counts up from 1 per (case-insensitive) counter name.
#[derive(Default)]
struct AutoIncrement {
    counters: HashMap<String, u64>,
}

impl Function for AutoIncrement {
    fn name(&self) -> &str {
        "INC"
    }

    fn pattern(&self) -> &Regex {
        &INC_RE
    }

    fn process(&mut self, captures: &Captures, _line: &LineContext) -> String {
        let counter = self.counters.entry(captures[1].to_lowercase()).or_default();
        *counter += 1;
        counter.to_string()
    }

    fn reset(&mut self) {
        self.counters.clear();
    }
}

type Processor = Box<dyn FnMut(&Captures, &LineContext) -> String + Send>;

/// A custom function built from a pattern and a closure.
///
/// ```ignore
/// let today = PatternFunction::new("TODAY", r"%\{\s*TODAY\s*\}", |_, _| "2014-01-05".to_string())?;
/// job.functions_mut().register(today);
/// ```
pub struct PatternFunction {
    name: String,
    pattern: Regex,
    processor: Processor,
}

impl PatternFunction {
    pub fn new<F>(name: impl Into<String>, pattern: &str, processor: F) -> Result<Self, FillError>
    where
        F: FnMut(&Captures, &LineContext) -> String + Send + 'static,
    {
        let pattern = Regex::new(pattern).map_err(|e| FillError::InvalidFunction {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { name: name.into(), pattern, processor: Box::new(processor) })
    }
}

impl Function for PatternFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn process(&mut self, captures: &Captures, line: &LineContext) -> String {
        (self.processor)(captures, line)
    }
}

/// The ordered functions of one fill job.
///
/// Each job owns its registry, so toggle and counter state never leaks
/// between concurrent fills.
pub struct FunctionRegistry {
    functions: Vec<Box<dyn Function>>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.functions.iter().map(|function| function.name())).finish()
    }
}

impl FunctionRegistry {
    /// A registry without any function.
    pub fn empty() -> Self {
        Self { functions: Vec::new() }
    }

    pub fn with_builtins() -> Self {
        let builtins: Vec<Box<dyn Function>> = vec![
            Box::new(Toggle::new("BOLD", &BOLD_RE, escp::select_bold, escp::cancel_bold)),
            Box::new(Toggle::new("ITALIC", &ITALIC_RE, escp::select_italic, escp::cancel_italic)),
            Box::new(Toggle::new(
                "UNDERLINE",
                &UNDERLINE_RE,
                escp::select_underline,
                escp::cancel_underline,
            )),
            Box::new(Toggle::new(
                "DOUBLE",
                &DOUBLE_RE,
                escp::select_double_strike,
                escp::cancel_double_strike,
            )),
            Box::new(Toggle::new(
                "SUPER",
                &SUPER_RE,
                escp::select_superscript,
                escp::cancel_superscript_or_subscript,
            )),
            Box::new(Toggle::new(
                "SUB",
                &SUB_RE,
                escp::select_subscript,
                escp::cancel_superscript_or_subscript,
            )),
            Box::new(Position { name: "PAGE_NO", pattern: &PAGE_NO_RE, number: |line| line.page_number }),
            Box::new(Ascii),
            Box::new(AutoIncrement::default()),
            Box::new(Position {
                name: "GLOBAL_LINE_NO",
                pattern: &GLOBAL_LINE_NO_RE,
                number: |line| line.global_line_number,
            }),
            Box::new(Position { name: "LINE_NO", pattern: &LINE_NO_RE, number: |line| line.line_number }),
        ];
        Self { functions: builtins }
    }

    /// Appends a function; it runs after every function registered before it.
    pub fn register(&mut self, function: impl Function + 'static) {
        self.functions.push(Box::new(function));
    }

    /// Removes the first function named `name`.
    pub fn remove(&mut self, name: &str) -> Option<Box<dyn Function>> {
        let index = self.functions.iter().position(|function| function.name() == name)?;
        Some(self.functions.remove(index))
    }

    pub fn names(&self) -> Vec<&str> {
        self.functions.iter().map(|function| function.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn reset(&mut self) {
        self.functions.iter_mut().for_each(|function| function.reset());
    }

    /// Runs every function, in order, over every text line of `report`.
    pub fn apply(&mut self, report: &mut Report) {
        for function in self.functions.iter_mut() {
            let pattern = function.pattern().clone();
            let mut global_line_number = 0;
            for page in report.pages_mut() {
                let page_number = page.page_number();
                for (index, line) in page.lines_mut().enumerate() {
                    global_line_number += 1;
                    let Line::Text(text) = line else {
                        continue;
                    };
                    let context = LineContext { page_number, line_number: index + 1, global_line_number };
                    let replaced = match pattern
                        .replace_all(text.text(), |captures: &Captures| function.process(captures, &context))
                    {
                        Cow::Borrowed(_) => None,
                        Cow::Owned(replaced) => Some(replaced),
                    };
                    if let Some(replaced) = replaced {
                        log::debug!("{} changed line {} of page {}", function.name(), index + 1, page_number);
                        text.set_text(replaced);
                    }
                }
            }
        }
    }
}
