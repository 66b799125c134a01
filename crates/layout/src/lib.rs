use platen_types::DomError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Invalid page number [{0}].")]
    InvalidPageNumber(usize),
    #[error("Invalid line number [{line}] on page {page}.")]
    InvalidLineNumber { page: usize, line: usize },
    #[error("Page {0} is full.")]
    PageFull(usize),
    #[error("Page {page} has {lines} lines which exceeds the page length of {length}.")]
    Overflow { page: usize, lines: usize, length: usize },
    #[error("Page length is required when the printer page length is not used.")]
    MissingPageLength,
    #[error("A block of {needed} lines does not fit in the {available} content lines of a page.")]
    SegmentTooLarge { needed: usize, available: usize },
    #[error(transparent)]
    Dom(#[from] DomError),
}

pub mod flow;
pub mod page;
pub mod report;

pub use self::flow::SegmentWriter;
pub use self::page::Page;
pub use self::report::{NumberedLine, Report};
