//! Line variants that make up a page.
use crate::error::DomError;

/// Separator between a placeholder expression and its format suffix.
pub const FORMAT_SEPARATOR: &str = "::";

/// A single line slot of a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Text(TextLine),
    /// Padding for skipped positions. Dropped when lines are flattened.
    Empty,
    Table(TableLine),
    List(ListLine),
}

impl Line {
    pub fn text(text: impl Into<String>) -> Self {
        Line::Text(TextLine::new(text))
    }

    /// Table and list lines must be expanded against data before printing.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Line::Table(_) | Line::List(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Line::Text(t) => Some(t.text()),
            _ => None,
        }
    }

    /// Printable form of the line. Empty lines print as blank lines and
    /// dynamic lines, which should never reach the printer, print as nothing.
    pub fn printable(&self) -> &str {
        match self {
            Line::Text(t) => t.text(),
            Line::Empty | Line::Table(_) | Line::List(_) => "",
        }
    }
}

impl From<TextLine> for Line {
    fn from(line: TextLine) -> Self {
        Line::Text(line)
    }
}

impl From<TableLine> for Line {
    fn from(line: TableLine) -> Self {
        Line::Table(line)
    }
}

impl From<ListLine> for Line {
    fn from(line: ListLine) -> Self {
        Line::List(line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextLine {
    text: String,
}

impl TextLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

/// A column of a [`TableLine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    source: String,
    width: usize,
    caption: Option<String>,
    wrap: bool,
}

impl TableColumn {
    /// `source` is a script placeholder expression, optionally with a
    /// `::format` suffix.
    pub fn new(source: impl Into<String>, width: usize) -> Self {
        Self { source: source.into(), width, caption: None, wrap: false }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// The explicit caption, or the source expression without its format suffix.
    pub fn caption(&self) -> &str {
        match &self.caption {
            Some(caption) => caption,
            None => self.source.split(FORMAT_SEPARATOR).next().unwrap_or_default().trim(),
        }
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) -> &mut Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn is_wrap(&self) -> bool {
        self.wrap
    }

    pub fn set_wrap(&mut self, wrap: bool) -> &mut Self {
        self.wrap = wrap;
        self
    }
}

/// A table bound to a collection; one row per element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLine {
    source: String,
    columns: Vec<TableColumn>,
    pub draw_border: bool,
    pub draw_line_separator: bool,
    pub draw_underline_separator: bool,
}

impl TableLine {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            columns: Vec::new(),
            draw_border: false,
            draw_line_separator: false,
            draw_underline_separator: false,
        }
    }

    /// Basic placeholder path of the collection this table iterates.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn add_column(&mut self, source: impl Into<String>, width: usize) -> &mut TableColumn {
        self.columns.push(TableColumn::new(source, width));
        let last = self.columns.len() - 1;
        &mut self.columns[last]
    }

    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    pub fn number_of_columns(&self) -> usize {
        self.columns.len()
    }

    /// 1-based column lookup.
    pub fn column_at(&self, index: usize) -> Result<&TableColumn, DomError> {
        index
            .checked_sub(1)
            .and_then(|i| self.columns.get(i))
            .ok_or(DomError::InvalidColumnIndex(index))
    }

    /// Total width of all columns, borders included.
    pub fn width(&self) -> usize {
        self.columns.iter().map(TableColumn::width).sum()
    }
}

/// A list bound to a collection; one text line per element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLine {
    source: String,
    line_source: String,
    header: Vec<TextLine>,
    footer: Vec<TextLine>,
}

impl ListLine {
    pub fn new(source: impl Into<String>, line_source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            line_source: line_source.into(),
            header: Vec::new(),
            footer: Vec::new(),
        }
    }

    pub fn with_header(mut self, header: Vec<TextLine>) -> Self {
        self.header = header;
        self
    }

    pub fn with_footer(mut self, footer: Vec<TextLine>) -> Self {
        self.footer = footer;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Template text printed once per element.
    pub fn line_source(&self) -> &str {
        &self.line_source
    }

    pub fn header(&self) -> &[TextLine] {
        &self.header
    }

    pub fn footer(&self) -> &[TextLine] {
        &self.footer
    }
}
