//! Placement of generated line blocks (expanded tables and lists) into a report.
use crate::LayoutError;
use crate::report::Report;
use platen_types::Line;

/// Writes a run of rows into a report at a fixed position, bracketing the
/// rows on every page with a segment header and footer.
///
/// Rows are inserted through [`Report::insert`], so the lines that followed
/// the insertion point move down and cascade onto later pages. A segment is
/// opened only when its header, one row and its footer fit on the current
/// page; while open, a row is placed only if the footer still fits after it.
pub struct SegmentWriter<'a> {
    report: &'a mut Report,
    page: usize,
    line: usize,
    header: Vec<Line>,
    footer: Vec<Line>,
    open: bool,
}

impl<'a> SegmentWriter<'a> {
    /// Rows are written starting at `line_number` of `page_number`.
    pub fn new(
        report: &'a mut Report,
        page_number: usize,
        line_number: usize,
        header: Vec<Line>,
        footer: Vec<Line>,
    ) -> Self {
        Self { report, page: page_number, line: line_number, header, footer, open: false }
    }

    pub fn write(&mut self, row: Line) -> Result<(), LayoutError> {
        if self.open && !self.fits(1 + self.footer.len())? {
            self.close()?;
            self.break_page()?;
        }
        if !self.open {
            let needed = self.header.len() + 1 + self.footer.len();
            if !self.fits(needed)? {
                self.break_page()?;
                if !self.fits(needed)? {
                    let available = self
                        .report
                        .page(self.page)?
                        .content_lines_per_page()
                        .unwrap_or_default();
                    return Err(LayoutError::SegmentTooLarge { needed, available });
                }
            }
            for line in self.header.clone() {
                self.put(line)?;
            }
            self.open = true;
        }
        self.put(row)
    }

    /// Closes the last segment.
    pub fn finish(mut self) -> Result<(), LayoutError> {
        if self.open {
            self.close()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), LayoutError> {
        for line in self.footer.clone() {
            self.put(line)?;
        }
        self.open = false;
        Ok(())
    }

    fn put(&mut self, line: Line) -> Result<(), LayoutError> {
        self.report.insert(line, self.page, self.line, &[])?;
        self.line += 1;
        Ok(())
    }

    /// Whether `count` rows fit between the cursor and the end of the content region.
    fn fits(&self, count: usize) -> Result<bool, LayoutError> {
        let page = self.report.page(self.page)?;
        Ok(check_segment_fit(
            page.content_lines_per_page(),
            self.line.saturating_sub(page.first_content_line()),
            count,
        ))
    }

    /// Moves the lines after the cursor and the cursor itself to the start of the next page.
    fn break_page(&mut self) -> Result<(), LayoutError> {
        let tail = self.report.page_mut(self.page)?.split_content_at(self.line)?;
        let next = self.page + 1;
        if next > self.report.last_page_number() {
            self.report.new_page(false);
        }
        let start = self.report.page(next)?.first_content_line();
        log::debug!(
            "Segment continues on page {}, moving {} trailing lines",
            next,
            tail.len()
        );
        for (offset, line) in tail.into_iter().enumerate() {
            self.report.insert(line, next, start + offset, &[])?;
        }
        self.page = next;
        self.line = start;
        Ok(())
    }
}

/// Checks whether `count` rows fit after `used` content rows on a page with
/// the given content capacity. Unbounded pages always fit.
pub fn check_segment_fit(capacity: Option<usize>, used: usize, count: usize) -> bool {
    capacity.is_none_or(|capacity| used + count <= capacity)
}
