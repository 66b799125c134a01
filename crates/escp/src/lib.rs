//! ESC/P device-control vocabulary for impact printers.
//!
//! Everything the engine writes to a printer stream goes through this crate:
//! control sequences, line and page terminators, the box-drawing characters
//! used for table borders, and the fixed-cell alignment helpers used to size
//! every cell and placeholder.
//!
//! Output is modelled as a `String` whose characters are all in the range
//! `U+0000..=U+00FF`, one character per printer byte. [`encode`] turns such a
//! string into the bytes sent to the device.

pub mod charset;
pub mod codes;
pub mod text;

pub use charset::BoxCharset;
pub use codes::*;
pub use text::{align_center, align_left, align_right, repeat};

/// Converts device text into printer bytes.
///
/// Characters up to `U+00FF` map to their byte value; anything wider cannot be
/// sent to the device and is replaced by `?`.
pub fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}
