//! Expansion of table and list lines into text lines.
use crate::config::FillConfig;
use crate::error::FillError;
use crate::placeholder::{BASIC_RE, BasicPlaceholder, SCRIPT_RE, ScriptContext, ScriptPlaceholder, substitute};
use itertools::Itertools;
use platen_escp::{self as escp, BoxCharset, align_left};
use platen_jpath::FunctionRegistry;
use platen_layout::{Report, SegmentWriter};
use platen_source::{DataSource, DataSourceError, DataSources};
use platen_types::{Line, ListLine, TableColumn, TableLine};
use serde_json::Value;

/// Carries the overflow of wrapped table cells onto the following lines.
///
/// One slot per column; `add` returns what fits in the column now and keeps
/// the rest for [`consume`](Self::consume).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedBuffer {
    widths: Vec<usize>,
    buffer: Vec<Option<String>>,
}

impl WrappedBuffer {
    pub fn new(widths: Vec<usize>) -> Self {
        let buffer = vec![None; widths.len()];
        Self { widths, buffer }
    }

    pub fn width(&self, index: usize) -> usize {
        self.widths[index]
    }

    pub fn buffer(&self, index: usize) -> Option<&str> {
        self.buffer[index].as_deref()
    }

    /// Returns the first `width` characters of `value`, padded, and buffers
    /// the rest.
    pub fn add(&mut self, index: usize, value: &str) -> String {
        let width = self.widths[index];
        if width == 0 {
            return String::new();
        }
        match value.char_indices().nth(width) {
            Some((split, _)) => {
                self.buffer[index] = Some(value[split..].to_string());
                value[..split].to_string()
            }
            None => align_left(value, width),
        }
    }

    /// Takes the next line's worth of buffered text; blank when nothing is left.
    pub fn consume(&mut self, index: usize) -> String {
        let width = self.widths[index];
        match self.buffer[index].take() {
            None => escp::repeat(' ', width),
            Some(rest) if rest.chars().count() <= width => align_left(&rest, width),
            Some(rest) => self.add(index, &rest),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.iter().all(Option::is_none)
    }

    pub fn clear(&mut self) {
        self.buffer.iter_mut().for_each(|slot| *slot = None);
    }

    /// Drains the buffer into lines of cells, one cell per column.
    pub fn flush(&mut self) -> Vec<Vec<String>> {
        let mut lines = Vec::new();
        while !self.is_empty() {
            let cells = (0..self.widths.len()).map(|index| self.consume(index)).collect();
            lines.push(cells);
        }
        lines
    }
}

/// Draws the fixed parts of a table: rules, captions and separators.
pub(crate) struct TableRenderer<'t> {
    table: &'t TableLine,
    charset: BoxCharset,
}

impl<'t> TableRenderer<'t> {
    pub(crate) fn new(table: &'t TableLine, charset: BoxCharset) -> Self {
        Self { table, charset }
    }

    /// Columns lose one character to the border on their right.
    fn cell_width(&self, column: &TableColumn) -> usize {
        column.width().saturating_sub(usize::from(self.table.draw_border))
    }

    pub(crate) fn cell_widths(&self) -> Vec<usize> {
        self.table.columns().iter().map(|column| self.cell_width(column)).collect()
    }

    /// Caption row, wrapped in top and middle rules when bordered.
    pub(crate) fn header(&self) -> Vec<Line> {
        let captions = self
            .table
            .columns()
            .iter()
            .map(|column| {
                let alignment = BasicPlaceholder::new(column.source()).spec().alignment;
                alignment.apply(column.caption(), self.cell_width(column))
            })
            .collect::<Vec<_>>();
        let caption_row = self.row(&captions, false);
        if !self.table.draw_border {
            return vec![caption_row];
        }
        let c = self.charset;
        vec![
            Line::text(self.rule(c.down_right(), c.down_horizontal(), c.down_left())),
            caption_row,
            Line::text(self.rule(c.vertical_right(), c.vertical_horizontal(), c.vertical_left())),
        ]
    }

    pub(crate) fn footer(&self) -> Vec<Line> {
        if !self.table.draw_border {
            return Vec::new();
        }
        let c = self.charset;
        vec![Line::text(self.rule(c.up_right(), c.up_horizontal(), c.up_left()))]
    }

    pub(crate) fn separator(&self) -> Line {
        if !self.table.draw_border {
            return Line::text(escp::repeat(self.charset.horizontal(), self.table.width()));
        }
        let c = self.charset;
        Line::text(self.rule(c.vertical_right(), c.vertical_horizontal(), c.vertical_left()))
    }

    pub(crate) fn row(&self, cells: &[String], underline: bool) -> Line {
        let cells = cells.iter().map(|cell| {
            if underline {
                format!("{}{}{}", escp::select_underline(), cell, escp::cancel_underline())
            } else {
                cell.clone()
            }
        });
        if self.table.draw_border {
            let vertical = self.charset.vertical().to_string();
            Line::text(format!("{vertical}{}{vertical}", cells.format(&vertical)))
        } else {
            Line::text(cells.collect::<String>())
        }
    }

    fn rule(&self, left: char, middle: char, right: char) -> String {
        let horizontal = self.charset.horizontal();
        let segments = self
            .table
            .columns()
            .iter()
            .map(|column| escp::repeat(horizontal, self.cell_width(column)))
            .join(&middle.to_string());
        format!("{left}{segments}{right}")
    }
}

/// Turns the dynamic lines of a report into text lines.
pub(crate) struct Expander<'a> {
    pub(crate) sources: &'a [&'a dyn DataSource],
    pub(crate) context: &'a ScriptContext<'a>,
    pub(crate) functions: &'a FunctionRegistry,
    pub(crate) config: &'a FillConfig,
}

impl Expander<'_> {
    /// Expands every table line, then every list line, in document order.
    pub(crate) fn expand_dynamic_lines(&self, report: &mut Report) -> Result<(), FillError> {
        while let Some((page, line)) = report.find_line(|line| matches!(line, Line::Table(_))) {
            if let Line::Table(table) = report.remove_line(page, line)? {
                let renderer = TableRenderer::new(&table, self.config.box_charset);
                let rows = self.table_rows(&table, &renderer)?;
                log::debug!("Table [{}] expands to {} lines at page {} line {}", table.source(), rows.len(), page, line);
                place(report, page, line, renderer.header(), renderer.footer(), rows)?;
            }
        }
        while let Some((page, line)) = report.find_line(|line| matches!(line, Line::List(_))) {
            if let Line::List(list) = report.remove_line(page, line)? {
                let rows = self.list_rows(&list)?;
                log::debug!("List [{}] expands to {} lines at page {} line {}", list.source(), rows.len(), page, line);
                let header = list.header().iter().cloned().map(Line::Text).collect();
                let footer = list.footer().iter().cloned().map(Line::Text).collect();
                place(report, page, line, header, footer, rows)?;
            }
        }
        Ok(())
    }

    /// The elements a table or list iterates. `null` has no elements.
    pub(crate) fn collection(&self, source: &str) -> Result<Vec<Value>, FillError> {
        let value = if self.sources.is_empty() {
            Value::Null
        } else {
            match BasicPlaceholder::new(source).resolve(self.sources)? {
                Some(value) => value,
                None if self.config.strict_placeholders => {
                    return Err(FillError::UnresolvablePlaceholder(source.to_string()));
                }
                None => {
                    log::warn!("No data source has collection [{}], expanding it empty", source);
                    Value::Null
                }
            }
        };
        let elements = match value {
            Value::Null => Vec::new(),
            Value::Array(elements) => elements,
            other => {
                return Err(FillError::NotACollection { source_name: source.to_string(), value: other.to_string() });
            }
        };
        if let Some(element) = elements.iter().find(|element| !(element.is_object() || element.is_null())) {
            return Err(DataSourceError::Unsupported(element.to_string()).into());
        }
        Ok(elements)
    }

    pub(crate) fn table_rows(&self, table: &TableLine, renderer: &TableRenderer) -> Result<Vec<Line>, FillError> {
        let elements = self.collection(table.source())?;
        let placeholders = table
            .columns()
            .iter()
            .map(|column| {
                let placeholder = ScriptPlaceholder::new(column.source());
                if column.is_wrap() { placeholder } else { placeholder.with_width(renderer.cell_width(column)) }
            })
            .collect::<Vec<_>>();
        let mut buffer = WrappedBuffer::new(renderer.cell_widths());
        let mut rows = Vec::with_capacity(elements.len());

        for (index, element) in elements.iter().enumerate() {
            let mut context = self.context.for_element(element);
            context.set_variable("row", index + 1);
            let mut cells = Vec::with_capacity(placeholders.len());
            for (col, (column, placeholder)) in table.columns().iter().zip(&placeholders).enumerate() {
                context.set_variable("col", col + 1);
                let value = placeholder.render(&context, self.functions, self.config);
                cells.push(if column.is_wrap() { buffer.add(col, &value) } else { value });
            }
            rows.push(renderer.row(&cells, table.draw_underline_separator && buffer.is_empty()));

            let wrapped = buffer.flush();
            let last = wrapped.len();
            for (n, cells) in wrapped.iter().enumerate() {
                rows.push(renderer.row(cells, table.draw_underline_separator && n + 1 == last));
            }
            if table.draw_line_separator && index + 1 < elements.len() {
                rows.push(renderer.separator());
            }
        }
        Ok(rows)
    }

    /// One line per element. The element's members are looked up before the
    /// fill's own sources.
    pub(crate) fn list_rows(&self, list: &ListLine) -> Result<Vec<Line>, FillError> {
        let elements = self.collection(list.source())?;
        let mut rows = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            let row_source = DataSources::from_value(element.clone())?;
            let mut sources: Vec<&dyn DataSource> = Vec::with_capacity(self.sources.len() + 1);
            sources.push(&*row_source);
            sources.extend(self.sources.iter().copied());
            let text = substitute(&BASIC_RE, list.line_source(), |captures| {
                BasicPlaceholder::new(&captures[1]).render(&sources, self.config)
            })?;

            let mut context = self.context.for_element(element);
            context.set_variable("row", index + 1);
            let text = substitute(&SCRIPT_RE, &text, |captures| {
                Ok(ScriptPlaceholder::new(&captures[1]).render(&context, self.functions, self.config))
            })?;
            rows.push(Line::text(text));
        }
        Ok(rows)
    }
}

fn place(
    report: &mut Report,
    page: usize,
    line: usize,
    header: Vec<Line>,
    footer: Vec<Line>,
    rows: Vec<Line>,
) -> Result<(), FillError> {
    if rows.is_empty() {
        return Ok(());
    }
    let mut writer = SegmentWriter::new(report, page, line, header, footer);
    for row in rows {
        writer.write(row)?;
    }
    writer.finish()?;
    Ok(())
}
