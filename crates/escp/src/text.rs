//! Fixed-cell text helpers.
//!
//! Widths are measured in `char`s: every character occupies one printer cell.
//! All three alignments truncate text that is wider than the cell.

pub fn align_left(text: &str, width: usize) -> String {
    let (fitted, len) = fit(text, width);
    let mut s = String::with_capacity(width);
    s.push_str(fitted);
    s.extend(std::iter::repeat_n(' ', width - len));
    s
}

pub fn align_right(text: &str, width: usize) -> String {
    let (fitted, len) = fit(text, width);
    let mut s = String::with_capacity(width);
    s.extend(std::iter::repeat_n(' ', width - len));
    s.push_str(fitted);
    s
}

/// Centers `text`; when the padding is odd the extra space goes on the right.
pub fn align_center(text: &str, width: usize) -> String {
    let (fitted, len) = fit(text, width);
    let left = (width - len) / 2;
    let mut s = String::with_capacity(width);
    s.extend(std::iter::repeat_n(' ', left));
    s.push_str(fitted);
    s.extend(std::iter::repeat_n(' ', width - len - left));
    s
}

pub fn repeat(c: char, times: usize) -> String {
    std::iter::repeat_n(c, times).collect()
}

/// Returns the longest prefix of `text` that fits in `width` cells and its length.
fn fit(text: &str, width: usize) -> (&str, usize) {
    match text.char_indices().nth(width) {
        Some((idx, _)) => (&text[..idx], width),
        None => (text, text.chars().count()),
    }
}
