//! The JSON template format as it is parsed from the source file by Serde.
//! This is the **input** representation; [`Compiler`](crate::Compiler) turns it
//! into a report.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct JsonTemplateFile {
    #[serde(default)]
    pub page_format: JsonPageFormat,
    #[serde(default)]
    pub template: TemplateBody,
}

/// A number that may also be written as a string (`10` or `"10"`).
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum LooseNumber {
    Num(u64),
    Str(String),
}

impl LooseNumber {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            LooseNumber::Num(n) => Some(*n),
            LooseNumber::Str(s) => s.trim().parse().ok(),
        }
    }
}

impl std::fmt::Display for LooseNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LooseNumber::Num(n) => write!(f, "{}", n),
            LooseNumber::Str(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct JsonPageFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_length: Option<LooseNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_width: Option<LooseNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_margin: Option<LooseNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_margin: Option<LooseNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_margin: Option<LooseNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_spacing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_pitch: Option<LooseNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typeface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_line_feed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_form_feed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_page_length_from_printer: Option<bool>,
}

/// Either a bare list of detail lines or the full set of sections.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(untagged)]
pub enum TemplateBody {
    Lines(Vec<LineNode>),
    Sections(JsonSections),
}

impl Default for TemplateBody {
    fn default() -> Self {
        TemplateBody::Lines(Vec::new())
    }
}

impl TemplateBody {
    pub fn into_sections(self) -> JsonSections {
        match self {
            TemplateBody::Lines(detail) => JsonSections { detail, ..JsonSections::default() },
            TemplateBody::Sections(sections) => sections,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct JsonSections {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub first_page: Vec<LineNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header: Vec<LineNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub footer: Vec<LineNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub last_page_footer: Vec<LineNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detail: Vec<LineNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub last_page: Vec<LineNode>,
}

/// One template line. Required keys of tables and lists are optional here so
/// the compiler can report what is missing.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(untagged)]
pub enum LineNode {
    Text(String),
    Table(JsonTable),
    List(JsonList),
    Other(Map<String, Value>),
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct JsonTable {
    /// Expression of the collection the rows come from.
    pub table: String,
    #[serde(default)]
    pub border: bool,
    #[serde(default)]
    pub line_separator: bool,
    #[serde(default)]
    pub underline_separator: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<JsonColumn>>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct JsonColumn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<LooseNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default)]
    pub wrap: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct JsonList {
    /// Expression of the collection the rows come from.
    pub list: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub footer: Vec<String>,
}
