pub mod error;
pub mod line;
pub mod page_format;

pub use error::DomError;
pub use line::{Line, ListLine, TableColumn, TableLine, TextLine};
pub use page_format::{CharacterPitch, LineSpacing, PageFormat, Typeface};
