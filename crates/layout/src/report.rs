//! The report: an ordered sequence of pages plus the pagination engine.
use crate::LayoutError;
use crate::page::Page;
use platen_types::{Line, PageFormat, TextLine};

/// A line together with its position in the report.
#[derive(Debug, Clone, Copy)]
pub struct NumberedLine<'a> {
    pub page_number: usize,
    /// 1-based position within the page, header rows included.
    pub line_number: usize,
    /// 1-based position within the whole report.
    pub global_line_number: usize,
    pub line: &'a Line,
}

/// An ordered sequence of pages sharing a page format and header/footer templates.
///
/// `pages[i]` always has page number `i + 1`. Cloning a report deep-copies
/// every page and line.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    page_format: PageFormat,
    header: Vec<TextLine>,
    footer: Vec<TextLine>,
    last_page_footer: Vec<TextLine>,
    pages: Vec<Page>,
    current_page: Option<usize>,
    line_break: bool,
}

impl Report {
    pub fn new(
        page_format: PageFormat,
        header: Vec<TextLine>,
        footer: Vec<TextLine>,
        last_page_footer: Vec<TextLine>,
    ) -> Result<Self, LayoutError> {
        if page_format.page_length.is_none() && !page_format.uses_printer_page_length() {
            return Err(LayoutError::MissingPageLength);
        }
        Ok(Self {
            page_format,
            header,
            footer,
            last_page_footer,
            pages: Vec::new(),
            current_page: None,
            line_break: false,
        })
    }

    /// A report without headers or footers.
    pub fn with_format(page_format: PageFormat) -> Result<Self, LayoutError> {
        Self::new(page_format, Vec::new(), Vec::new(), Vec::new())
    }

    pub fn page_format(&self) -> &PageFormat {
        &self.page_format
    }

    pub fn page_format_mut(&mut self) -> &mut PageFormat {
        &mut self.page_format
    }

    pub fn header(&self) -> &[TextLine] {
        &self.header
    }

    pub fn footer(&self) -> &[TextLine] {
        &self.footer
    }

    pub fn last_page_footer(&self) -> &[TextLine] {
        &self.last_page_footer
    }

    pub fn set_last_page_footer(&mut self, lines: Vec<TextLine>) {
        self.last_page_footer = lines;
    }

    pub fn page_length(&self) -> Option<usize> {
        self.page_format.page_length.map(usize::from)
    }

    /// Content rows on a page that carries the report header and footer.
    pub fn content_lines_per_page(&self) -> Option<usize> {
        self.page_length()
            .map(|length| length.saturating_sub(self.header.len() + self.footer.len()))
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut [Page] {
        &mut self.pages
    }

    pub fn last_page_number(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, page_number: usize) -> Result<&Page, LayoutError> {
        page_number
            .checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .ok_or(LayoutError::InvalidPageNumber(page_number))
    }

    pub fn page_mut(&mut self, page_number: usize) -> Result<&mut Page, LayoutError> {
        page_number
            .checked_sub(1)
            .and_then(|i| self.pages.get_mut(i))
            .ok_or(LayoutError::InvalidPageNumber(page_number))
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.current_page.and_then(|n| self.page(n).ok())
    }

    pub fn next_page(&self, page_number: usize) -> Option<&Page> {
        self.page(page_number + 1).ok()
    }

    pub fn previous_page(&self, page_number: usize) -> Option<&Page> {
        page_number.checked_sub(1).and_then(|n| self.page(n).ok())
    }

    /// Starts a new page and makes it current. A `plain` page has no header or footer.
    pub fn new_page(&mut self, plain: bool) -> &mut Page {
        self.line_break = false;
        let (header, footer) = if plain {
            (Vec::new(), Vec::new())
        } else {
            (to_lines(&self.header), to_lines(&self.footer))
        };
        let page_number = self.pages.len() + 1;
        log::debug!("Starting page {} (plain: {})", page_number, plain);
        self.pages.push(Page::new(Vec::new(), header, footer, page_number, self.page_length()));
        self.current_page = Some(page_number);
        let index = self.pages.len() - 1;
        &mut self.pages[index]
    }

    /// Starts a new page whose first appended line lands on `start_at`.
    pub fn new_page_starting_at(&mut self, plain: bool, start_at: usize) -> &mut Page {
        let page = self.new_page(plain);
        page.append_empty_line_until(start_at);
        page
    }

    /// Forces the next [`append`](Self::append) onto a fresh page.
    pub fn line_break(&mut self) {
        self.line_break = true;
    }

    pub fn append(&mut self, line: Line, plain: bool) -> Result<(), LayoutError> {
        let needs_page = self.line_break || self.current_page().is_none_or(Page::is_full);
        if needs_page {
            self.new_page(plain).append(line)
        } else {
            let current = self.current_page.unwrap_or(self.pages.len());
            self.page_mut(current)?.append(line)
        }
    }

    /// Puts `lines` on a page of their own; they must fit on one page.
    pub fn append_single_page(&mut self, lines: Vec<Line>, plain: bool) -> Result<(), LayoutError> {
        let page = self.new_page(plain);
        for line in lines {
            page.append(line)?;
        }
        Ok(())
    }

    /// Inserts `line` at `line_number` of page `page_number`, cascading the
    /// row pushed off each full page onto the next one.
    ///
    /// A displaced row lands on the next page right after its header and
    /// `new_page_first_lines`. Pages created by the cascade carry the report
    /// header and footer and start with a copy of `new_page_first_lines`.
    /// When such a page has no room for the displaced row after that prefix,
    /// the cascade stops with [`LayoutError::SegmentTooLarge`].
    pub fn insert(
        &mut self,
        line: Line,
        page_number: usize,
        line_number: usize,
        new_page_first_lines: &[Line],
    ) -> Result<(), LayoutError> {
        let mut displaced = self.page_mut(page_number)?.insert(line, line_number)?;
        let mut page_number = page_number;
        while let Some(line) = displaced.take() {
            page_number += 1;
            if page_number > self.pages.len() {
                let needed = new_page_first_lines.len() + 1;
                if let Some(available) = self.content_lines_per_page().filter(|available| *available < needed) {
                    return Err(LayoutError::SegmentTooLarge { needed, available });
                }
                let page = self.new_page(false);
                for first in new_page_first_lines {
                    page.append(first.clone())?;
                }
            }
            let page = self.page_mut(page_number)?;
            let at = page.first_content_line() + new_page_first_lines.len().min(page.content().len());
            log::debug!("Cascading displaced line to page {} line {}", page_number, at);
            displaced = page.insert(line, at)?;
        }
        Ok(())
    }

    pub fn remove_line(&mut self, page_number: usize, line_number: usize) -> Result<Line, LayoutError> {
        self.page_mut(page_number)?.remove_line(line_number)
    }

    /// Every line in document order except empty padding rows.
    pub fn flat_lines(&self) -> Vec<&Line> {
        self.pages
            .iter()
            .flat_map(Page::lines)
            .filter(|line| !matches!(line, Line::Empty))
            .collect()
    }

    /// Every line with its page, page-local and report-global number.
    pub fn numbered_lines(&self) -> impl Iterator<Item = NumberedLine<'_>> {
        self.pages
            .iter()
            .flat_map(|page| {
                page.lines().enumerate().map(move |(i, line)| (page.page_number(), i + 1, line))
            })
            .enumerate()
            .map(|(global, (page_number, line_number, line))| NumberedLine {
                page_number,
                line_number,
                global_line_number: global + 1,
                line,
            })
    }

    pub fn has_dynamic_line(&self) -> bool {
        self.pages.iter().flat_map(Page::lines).any(Line::is_dynamic)
    }

    pub fn first_page_with_table_lines(&self) -> Option<&Page> {
        self.pages
            .iter()
            .find(|page| page.lines().any(|line| matches!(line, Line::Table(_))))
    }

    pub fn first_page_with_list_lines(&self) -> Option<&Page> {
        self.pages
            .iter()
            .find(|page| page.lines().any(|line| matches!(line, Line::List(_))))
    }

    /// Position of the first line matching `predicate`, as (page, line) numbers.
    pub fn find_line(&self, predicate: impl Fn(&Line) -> bool) -> Option<(usize, usize)> {
        self.numbered_lines()
            .find(|numbered| predicate(numbered.line))
            .map(|numbered| (numbered.page_number, numbered.line_number))
    }
}

fn to_lines(lines: &[TextLine]) -> Vec<Line> {
    lines.iter().cloned().map(Line::Text).collect()
}
