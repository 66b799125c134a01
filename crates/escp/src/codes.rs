//! ESC/P command table.

/// Escape character that prefixes every ESC/P command.
pub const ESC: char = '\u{1B}';
pub const CR: &str = "\r";
pub const LF: &str = "\n";
pub const FF: &str = "\u{0C}";
pub const CRLF: &str = "\r\n";
/// Carriage return followed by form feed; ends a page.
pub const CRFF: &str = "\r\u{0C}";

/// Builds an `ESC <command>` sequence.
pub fn escape(command: u8) -> String {
    let mut s = String::with_capacity(2);
    s.push(ESC);
    s.push(char::from(command));
    s
}

/// Builds an `ESC <command> <n>` sequence.
pub fn escape_with(command: u8, n: u8) -> String {
    let mut s = escape(command);
    s.push(char::from(n));
    s
}

/// `ESC @`: resets the printer to its power-on state.
pub fn initialize() -> String {
    escape(b'@')
}

/// `ESC 0`: 1/8 inch line spacing.
pub fn one_per_eight_inch_line_spacing() -> String {
    escape(b'0')
}

/// `ESC 2`: 1/6 inch line spacing.
pub fn one_per_six_inch_line_spacing() -> String {
    escape(b'2')
}

/// `ESC C n`: page length in lines.
pub fn page_length(lines: u8) -> String {
    escape_with(b'C', lines)
}

/// `ESC l n`: left margin in columns.
pub fn left_margin(columns: u8) -> String {
    escape_with(b'l', columns)
}

/// `ESC Q n`: right margin, counted from the left edge.
pub fn right_margin(columns: u8) -> String {
    escape_with(b'Q', columns)
}

/// `ESC N n`: bottom margin in lines.
pub fn bottom_margin(lines: u8) -> String {
    escape_with(b'N', lines)
}

/// `ESC ! n`: master select.
pub fn master_select(mode: u8) -> String {
    escape_with(b'!', mode)
}

/// `ESC g`: 15 characters per inch.
pub fn select_15_cpi() -> String {
    escape(b'g')
}

/// `ESC k n`: typeface selection.
pub fn select_typeface(typeface: u8) -> String {
    escape_with(b'k', typeface)
}

pub fn select_bold() -> String {
    escape(b'E')
}

pub fn cancel_bold() -> String {
    escape(b'F')
}

pub fn select_italic() -> String {
    escape(b'4')
}

pub fn cancel_italic() -> String {
    escape(b'5')
}

pub fn select_double_strike() -> String {
    escape(b'G')
}

pub fn cancel_double_strike() -> String {
    escape(b'H')
}

/// `ESC - 1`
pub fn select_underline() -> String {
    escape_with(b'-', 1)
}

/// `ESC - 0`
pub fn cancel_underline() -> String {
    escape_with(b'-', 0)
}

/// `ESC S 0`
pub fn select_superscript() -> String {
    escape_with(b'S', 0)
}

/// `ESC S 1`
pub fn select_subscript() -> String {
    escape_with(b'S', 1)
}

/// `ESC T`: cancels both superscript and subscript.
pub fn cancel_superscript_or_subscript() -> String {
    escape(b'T')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequences_carry_parameter_as_raw_char() {
        assert_eq!(page_length(10), "\u{1B}C\u{0A}");
        assert_eq!(right_margin(70), "\u{1B}Q\u{46}");
        assert_eq!(select_underline(), "\u{1B}-\u{01}");
    }

    #[test]
    fn test_initialize() {
        assert_eq!(initialize().chars().collect::<Vec<_>>(), vec!['\u{1B}', '@']);
    }
}
