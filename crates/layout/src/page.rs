//! A single page: header rows, content rows and footer rows.
use crate::LayoutError;
use platen_escp as escp;
use platen_types::Line;

/// Page-local line numbers are 1-based and count header, content and footer
/// rows in that order. Only content rows can be inserted or removed.
///
/// Rows are not padded: a page holds exactly the lines appended to it. The
/// page length bounds the content to `page_length - header - footer` rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    header: Vec<Line>,
    content: Vec<Line>,
    footer: Vec<Line>,
    page_number: usize,
    page_length: Option<usize>,
}

impl Page {
    /// `page_length` of `None` leaves the content unbounded.
    pub fn new(
        content: Vec<Line>,
        header: Vec<Line>,
        footer: Vec<Line>,
        page_number: usize,
        page_length: Option<usize>,
    ) -> Self {
        Self { header, content, footer, page_number, page_length }
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn page_length(&self) -> Option<usize> {
        self.page_length
    }

    pub fn header(&self) -> &[Line] {
        &self.header
    }

    pub fn content(&self) -> &[Line] {
        &self.content
    }

    pub fn footer(&self) -> &[Line] {
        &self.footer
    }

    pub fn set_footer(&mut self, footer: Vec<Line>) {
        self.footer = footer;
    }

    pub fn number_of_lines(&self) -> usize {
        self.header.len() + self.content.len() + self.footer.len()
    }

    /// Content capacity, `None` when unbounded.
    pub fn content_lines_per_page(&self) -> Option<usize> {
        self.page_length
            .map(|length| length.saturating_sub(self.header.len() + self.footer.len()))
    }

    /// Number of content rows still free, `None` when unbounded.
    pub fn free_content_lines(&self) -> Option<usize> {
        self.content_lines_per_page()
            .map(|capacity| capacity.saturating_sub(self.content.len()))
    }

    /// 0-based index of the first footer row of a fully packed page.
    pub fn start_of_footer(&self) -> usize {
        self.header.len() + self.content_lines_per_page().unwrap_or(self.content.len())
    }

    /// Line number of the first content row.
    pub fn first_content_line(&self) -> usize {
        self.header.len() + 1
    }

    pub fn is_full(&self) -> bool {
        self.free_content_lines() == Some(0)
    }

    pub fn is_overflow(&self) -> bool {
        self.page_length
            .is_some_and(|length| self.number_of_lines() > length)
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.header.iter().chain(&self.content).chain(&self.footer)
    }

    pub fn lines_mut(&mut self) -> impl Iterator<Item = &mut Line> {
        self.header
            .iter_mut()
            .chain(self.content.iter_mut())
            .chain(self.footer.iter_mut())
    }

    pub fn line(&self, line_number: usize) -> Result<&Line, LayoutError> {
        line_number
            .checked_sub(1)
            .and_then(|i| self.lines().nth(i))
            .ok_or(self.invalid_line(line_number))
    }

    /// Replaces any row, header and footer included.
    pub fn set_line(&mut self, line_number: usize, line: Line) -> Result<(), LayoutError> {
        let err = self.invalid_line(line_number);
        let slot = line_number
            .checked_sub(1)
            .and_then(|i| self.lines_mut().nth(i))
            .ok_or(err)?;
        *slot = line;
        Ok(())
    }

    pub fn append(&mut self, line: Line) -> Result<(), LayoutError> {
        if self.is_full() {
            return Err(LayoutError::PageFull(self.page_number));
        }
        self.content.push(line);
        Ok(())
    }

    /// Inserts into the content region, shifting the following rows down.
    ///
    /// Returns the row pushed past the last content slot, if any.
    pub fn insert(&mut self, line: Line, line_number: usize) -> Result<Option<Line>, LayoutError> {
        let index = self.content_index(line_number, self.content.len())?;
        self.content.insert(index, line);
        let over = self
            .content_lines_per_page()
            .is_some_and(|capacity| self.content.len() > capacity);
        Ok(if over { self.content.pop() } else { None })
    }

    /// Removes a content row, shifting the following rows up.
    pub fn remove_line(&mut self, line_number: usize) -> Result<Line, LayoutError> {
        let last = self.content.len().saturating_sub(1);
        if self.content.is_empty() {
            return Err(self.invalid_line(line_number));
        }
        let index = self.content_index(line_number, last)?;
        Ok(self.content.remove(index))
    }

    /// Removes the content rows from `line_number` to the end of the content.
    pub fn split_content_at(&mut self, line_number: usize) -> Result<Vec<Line>, LayoutError> {
        let index = self.content_index(line_number, self.content.len())?;
        Ok(self.content.split_off(index))
    }

    /// Pads the content with empty rows until the next appended row lands on `line_number`.
    pub fn append_empty_line_until(&mut self, line_number: usize) {
        while self.header.len() + self.content.len() + 1 < line_number && !self.is_full() {
            self.content.push(Line::Empty);
        }
    }

    /// Renders every row followed by its terminator, then the page end.
    pub fn render(&self, auto_line_feed: bool, auto_form_feed: bool) -> String {
        let terminator = if auto_line_feed { escp::CR } else { escp::CRLF };
        let mut out = String::new();
        for line in self.lines() {
            out.push_str(line.printable());
            out.push_str(terminator);
        }
        if auto_form_feed {
            out.push_str(escp::CRFF);
        }
        out
    }

    /// Maps a line number to a content index no greater than `max_index`.
    fn content_index(&self, line_number: usize, max_index: usize) -> Result<usize, LayoutError> {
        line_number
            .checked_sub(self.first_content_line())
            .filter(|index| *index <= max_index)
            .ok_or(self.invalid_line(line_number))
    }

    fn invalid_line(&self, line_number: usize) -> LayoutError {
        LayoutError::InvalidLineNumber { page: self.page_number, line: line_number }
    }
}
