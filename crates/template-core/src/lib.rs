//! Core abstractions for template parsing
//!
//! This crate defines the contract between template description formats
//! (JSON today) and the fill pipeline. A parser turns template source into a
//! [`Report`] whose pages still carry unexpanded table and list lines and
//! unsubstituted placeholders.
//!
//! ## Key Abstractions
//!
//! - **`TemplateParser`**: Trait for parsing template source into a report
//! - **`TemplateFlags`**: Features detected in a parsed report
//! - **`TemplateError`**: Errors shared by every template format

use platen_layout::{LayoutError, Report};
use platen_types::Line;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during template processing
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template parsing failed: {0}")]
    ParseError(String),

    #[error("Invalid template configuration: {0}")]
    ConfigError(String),

    #[error("Template layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Features found in a parsed template.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TemplateFlags {
    /// True if any page holds a table line.
    pub has_table_lines: bool,
    /// True if any page holds a list line.
    pub has_list_lines: bool,
    /// True if the template uses a `%{...}` function.
    pub has_functions: bool,
    /// True if the last page gets its own footer.
    pub has_last_page_footer: bool,
}

impl TemplateFlags {
    /// Scans every page, header and footer of `report`.
    pub fn detect(report: &Report) -> Self {
        let text_lines = report
            .flat_lines()
            .into_iter()
            .filter_map(Line::as_text)
            .chain(report.header().iter().map(|l| l.text()))
            .chain(report.footer().iter().map(|l| l.text()))
            .chain(report.last_page_footer().iter().map(|l| l.text()));
        let mut has_functions = false;
        for text in text_lines {
            if text.contains("%{") {
                has_functions = true;
                break;
            }
        }
        Self {
            has_table_lines: report.first_page_with_table_lines().is_some(),
            has_list_lines: report.first_page_with_list_lines().is_some(),
            has_functions,
            has_last_page_footer: !report.last_page_footer().is_empty(),
        }
    }

    /// True if the report needs data before it can be printed.
    pub fn has_dynamic_lines(&self) -> bool {
        self.has_table_lines || self.has_list_lines
    }
}

impl fmt::Display for TemplateFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tables: {}, lists: {}, functions: {}, last page footer: {}",
            self.has_table_lines, self.has_list_lines, self.has_functions, self.has_last_page_footer
        )
    }
}

/// A parser responsible for turning a template description into a [`Report`].
pub trait TemplateParser {
    /// Parses a template source string.
    fn parse(&self, template_source: &str) -> Result<Report, TemplateError>;

    /// Reads and parses a template file.
    fn parse_file(&self, path: &Path) -> Result<Report, TemplateError> {
        let source = std::fs::read_to_string(path)?;
        self.parse(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platen_types::{ListLine, PageFormat, TableLine, TextLine};

    /// Every source line becomes a text line; `[table]` and `[list]` become dynamic lines.
    struct LineParser;

    impl TemplateParser for LineParser {
        fn parse(&self, template_source: &str) -> Result<Report, TemplateError> {
            let mut report = Report::with_format(PageFormat::with_page_length(3))?;
            for text in template_source.lines() {
                let line = match text {
                    "[table]" => Line::from(TableLine::new("rows")),
                    "[list]" => Line::from(ListLine::new("rows", "${name}")),
                    "[bad]" => return Err(TemplateError::ParseError("bad line".into())),
                    other => Line::text(other),
                };
                report.append(line, false)?;
            }
            Ok(report)
        }
    }

    #[test]
    fn test_parse_builds_pages() {
        let report = LineParser.parse("a\nb\nc\nd").unwrap();
        assert_eq!(report.pages().len(), 2);
        assert_eq!(TemplateFlags::detect(&report), TemplateFlags::default());
    }

    #[test]
    fn test_detect_flags() {
        let mut report = LineParser.parse("%{BOLD}a\n[table]\n[list]").unwrap();
        report.set_last_page_footer(vec![TextLine::new("end")]);
        let flags = TemplateFlags::detect(&report);
        assert!(flags.has_table_lines);
        assert!(flags.has_list_lines);
        assert!(flags.has_functions);
        assert!(flags.has_last_page_footer);
        assert!(flags.has_dynamic_lines());
    }

    #[test]
    fn test_parse_error_message() {
        let err = LineParser.parse("a\n[bad]").unwrap_err();
        assert_eq!(err.to_string(), "Template parsing failed: bad line");
    }

    #[test]
    fn test_parse_file_missing() {
        let path = std::env::temp_dir().join("platen-template-core-missing.json");
        let err = LineParser.parse_file(&path).unwrap_err();
        assert!(matches!(err, TemplateError::IoError(_)));
    }

    #[test]
    fn test_parse_file_reads_source() {
        let path = std::env::temp_dir().join(format!("platen-template-core-{}.txt", std::process::id()));
        std::fs::write(&path, "x\ny").unwrap();
        let report = LineParser.parse_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(report.flat_lines().len(), 2);
    }

    #[test]
    fn test_layout_error_converts() {
        let err: TemplateError = LayoutError::MissingPageLength.into();
        assert!(matches!(err, TemplateError::Layout(LayoutError::MissingPageLength)));
    }
}
