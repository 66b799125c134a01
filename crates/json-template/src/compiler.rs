//! Turns a parsed [`JsonTemplateFile`] into a [`Report`].
use crate::ast::{JsonColumn, JsonList, JsonPageFormat, JsonTable, JsonTemplateFile, LineNode, LooseNumber};
use crate::error::JsonTemplateError;
use itertools::Itertools;
use platen_layout::Report;
use platen_types::{CharacterPitch, Line, LineSpacing, ListLine, PageFormat, TableLine, TextLine, Typeface};
use serde_json::Value;

pub struct Compiler;

impl Compiler {
    pub fn compile(file: JsonTemplateFile) -> Result<Report, JsonTemplateError> {
        let page_format = Self::page_format(&file.page_format)?;
        let sections = file.template.into_sections();

        let header = text_lines(sections.header);
        let footer = text_lines(sections.footer);
        let last_page_footer = text_lines(sections.last_page_footer);
        if page_format.page_length.is_none() {
            for (section, lines) in [("header", &header), ("footer", &footer), ("lastPageFooter", &last_page_footer)] {
                if !lines.is_empty() {
                    return Err(JsonTemplateError::Compilation(format!(
                        "Can't use '{}' if 'pageLength' is not defined.",
                        section
                    )));
                }
            }
        }

        let first_page = lines(sections.first_page)?;
        let detail = lines(sections.detail)?;
        let last_page = lines(sections.last_page)?;
        log::debug!(
            "Compiling template: {} first page, {} detail, {} last page lines",
            first_page.len(),
            detail.len(),
            last_page.len()
        );

        let mut report = Report::new(page_format, header, footer, last_page_footer)?;
        if !first_page.is_empty() {
            report.append_single_page(first_page, true)?;
            report.line_break();
        }
        for line in detail {
            report.append(line, false)?;
        }
        if !last_page.is_empty() {
            report.line_break();
            report.append_single_page(last_page, true)?;
        }
        Ok(report)
    }

    pub fn page_format(json: &JsonPageFormat) -> Result<PageFormat, JsonTemplateError> {
        let defaults = PageFormat::default();
        Ok(PageFormat {
            page_length: small_number("pageLength", json.page_length.as_ref())?,
            page_width: small_number("pageWidth", json.page_width.as_ref())?,
            left_margin: small_number("leftMargin", json.left_margin.as_ref())?,
            right_margin: small_number("rightMargin", json.right_margin.as_ref())?,
            bottom_margin: small_number("bottomMargin", json.bottom_margin.as_ref())?,
            line_spacing: json.line_spacing.as_deref().map(str::parse::<LineSpacing>).transpose()?,
            character_pitch: json
                .character_pitch
                .as_ref()
                .map(|pitch| pitch.to_string().parse::<CharacterPitch>())
                .transpose()?,
            typeface: json.typeface.as_deref().map(str::parse::<Typeface>).transpose()?,
            auto_line_feed: json.auto_line_feed.unwrap_or(defaults.auto_line_feed),
            auto_form_feed: json.auto_form_feed.unwrap_or(defaults.auto_form_feed),
            use_printer_page_length: json.use_page_length_from_printer,
        })
    }
}

fn small_number(key: &'static str, value: Option<&LooseNumber>) -> Result<Option<u8>, JsonTemplateError> {
    value
        .map(|number| {
            number
                .as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| JsonTemplateError::InvalidValue { key, value: number.to_string() })
        })
        .transpose()
}

fn lines(nodes: Vec<LineNode>) -> Result<Vec<Line>, JsonTemplateError> {
    nodes.into_iter().map(line).collect()
}

fn line(node: LineNode) -> Result<Line, JsonTemplateError> {
    match node {
        LineNode::Text(text) => Ok(Line::text(text)),
        LineNode::Table(table) => table_line(table).map(Line::Table),
        LineNode::List(list) => list_line(list).map(Line::List),
        LineNode::Other(object) => {
            log::warn!("Found unsupported object with keys [{}]", object.keys().join(", "));
            Err(JsonTemplateError::Compilation(format!("Unsupported object: {}", Value::Object(object))))
        }
    }
}

/// Header and footer rows are text only; anything else is skipped.
fn text_lines(nodes: Vec<LineNode>) -> Vec<TextLine> {
    nodes
        .into_iter()
        .filter_map(|node| match node {
            LineNode::Text(text) => Some(TextLine::new(text)),
            other => {
                log::warn!("[{:?}] is not a string and will be skipped.", other);
                None
            }
        })
        .collect()
}

fn table_line(table: JsonTable) -> Result<TableLine, JsonTemplateError> {
    let columns = table
        .columns
        .ok_or_else(|| JsonTemplateError::Compilation("Table must have 'columns'.".to_string()))?;
    let mut line = TableLine::new(table.table);
    line.draw_border = table.border;
    line.draw_line_separator = table.line_separator;
    line.draw_underline_separator = table.underline_separator;
    for (index, column) in columns.into_iter().enumerate() {
        add_column(&mut line, index, column)?;
    }
    Ok(line)
}

/// `index` is 0-based, as reported in errors.
fn add_column(line: &mut TableLine, index: usize, column: JsonColumn) -> Result<(), JsonTemplateError> {
    let source = column
        .source
        .ok_or_else(|| JsonTemplateError::Compilation(format!("Can't find 'source' for column {}", index)))?;
    let width = column
        .width
        .ok_or_else(|| JsonTemplateError::Compilation(format!("Can't find 'width' for column {}", index)))?;
    let width = width
        .as_u64()
        .and_then(|w| usize::try_from(w).ok())
        .ok_or_else(|| JsonTemplateError::InvalidValue { key: "width", value: width.to_string() })?;
    let added = line.add_column(source, width);
    if let Some(caption) = column.caption {
        added.set_caption(caption);
    }
    added.set_wrap(column.wrap);
    Ok(())
}

fn list_line(list: JsonList) -> Result<ListLine, JsonTemplateError> {
    let line_source = list
        .line
        .ok_or_else(|| JsonTemplateError::Compilation("List must have 'line'.".to_string()))?;
    Ok(ListLine::new(list.list, line_source)
        .with_header(list.header.into_iter().map(TextLine::new).collect())
        .with_footer(list.footer.into_iter().map(TextLine::new).collect()))
}
