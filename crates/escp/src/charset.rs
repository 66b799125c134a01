//! Box-drawing characters for table borders.

/// Character set used to draw table borders and separators.
///
/// `Cp437` emits the single-line box-drawing glyphs of code page 437 as raw
/// device characters. `Ascii` is a compatibility set for printers without a
/// graphics code page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoxCharset {
    #[default]
    Cp437,
    Ascii,
}

impl BoxCharset {
    /// `─`
    pub fn horizontal(self) -> char {
        match self {
            BoxCharset::Cp437 => '\u{C4}',
            BoxCharset::Ascii => '-',
        }
    }

    /// `│`
    pub fn vertical(self) -> char {
        match self {
            BoxCharset::Cp437 => '\u{B3}',
            BoxCharset::Ascii => '|',
        }
    }

    /// `┌`
    pub fn down_right(self) -> char {
        self.corner('\u{DA}')
    }

    /// `┐`
    pub fn down_left(self) -> char {
        self.corner('\u{BF}')
    }

    /// `└`
    pub fn up_right(self) -> char {
        self.corner('\u{C0}')
    }

    /// `┘`
    pub fn up_left(self) -> char {
        self.corner('\u{D9}')
    }

    /// `├`
    pub fn vertical_right(self) -> char {
        self.corner('\u{C3}')
    }

    /// `┤`
    pub fn vertical_left(self) -> char {
        self.corner('\u{B4}')
    }

    /// `┬`
    pub fn down_horizontal(self) -> char {
        self.corner('\u{C2}')
    }

    /// `┴`
    pub fn up_horizontal(self) -> char {
        self.corner('\u{C1}')
    }

    /// `┼`
    pub fn vertical_horizontal(self) -> char {
        self.corner('\u{C5}')
    }

    fn corner(self, cp437: char) -> char {
        match self {
            BoxCharset::Cp437 => cp437,
            BoxCharset::Ascii => '+',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cp437_code_points() {
        let cs = BoxCharset::Cp437;
        assert_eq!(u32::from(cs.down_right()), 218);
        assert_eq!(u32::from(cs.horizontal()), 196);
        assert_eq!(u32::from(cs.vertical_horizontal()), 197);
        assert_eq!(u32::from(cs.up_left()), 217);
    }

    #[test]
    fn test_ascii_compatibility() {
        let cs = BoxCharset::Ascii;
        assert_eq!(cs.down_left(), '+');
        assert_eq!(cs.vertical(), '|');
        assert_eq!(cs.horizontal(), '-');
    }
}
