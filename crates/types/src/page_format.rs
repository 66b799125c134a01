//! Printer-facing page configuration.
use crate::error::DomError;
use platen_escp as escp;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineSpacing {
    #[serde(rename = "1/8")]
    OnePerEightInch,
    #[serde(rename = "1/6")]
    OnePerSixInch,
}

impl FromStr for LineSpacing {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1/8" => Ok(LineSpacing::OnePerEightInch),
            "1/6" => Ok(LineSpacing::OnePerSixInch),
            other => Err(DomError::UnknownValue { kind: "line spacing", value: other.to_string() }),
        }
    }
}

/// Characters per inch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterPitch {
    #[serde(rename = "5")]
    Cpi5,
    #[serde(rename = "10")]
    Cpi10,
    #[serde(rename = "12")]
    Cpi12,
    #[serde(rename = "15")]
    Cpi15,
    #[serde(rename = "17")]
    Cpi17,
    #[serde(rename = "20")]
    Cpi20,
}

impl CharacterPitch {
    fn command(self) -> String {
        match self {
            CharacterPitch::Cpi5 => escp::master_select(32),
            CharacterPitch::Cpi10 => escp::master_select(0),
            CharacterPitch::Cpi12 => escp::master_select(1),
            CharacterPitch::Cpi15 => escp::select_15_cpi(),
            CharacterPitch::Cpi17 => escp::master_select(4),
            CharacterPitch::Cpi20 => escp::master_select(5),
        }
    }
}

impl FromStr for CharacterPitch {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "5" => Ok(CharacterPitch::Cpi5),
            "10" => Ok(CharacterPitch::Cpi10),
            "12" => Ok(CharacterPitch::Cpi12),
            "15" => Ok(CharacterPitch::Cpi15),
            "17" => Ok(CharacterPitch::Cpi17),
            "20" => Ok(CharacterPitch::Cpi20),
            other => Err(DomError::UnknownValue { kind: "character pitch", value: other.to_string() }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Typeface {
    Roman,
    SansSerif,
}

impl FromStr for Typeface {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "roman" => Ok(Typeface::Roman),
            "sans-serif" | "sans_serif" => Ok(Typeface::SansSerif),
            other => Err(DomError::UnknownValue { kind: "typeface", value: other.to_string() }),
        }
    }
}

/// Page geometry and printer setup for a report.
///
/// Lengths are in lines and widths in character columns, the units ESC/P
/// takes them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFormat {
    /// Lines per page. `None` means the content is not paginated by the engine.
    pub page_length: Option<u8>,
    pub page_width: Option<u8>,
    pub left_margin: Option<u8>,
    pub right_margin: Option<u8>,
    pub bottom_margin: Option<u8>,
    pub line_spacing: Option<LineSpacing>,
    pub character_pitch: Option<CharacterPitch>,
    pub typeface: Option<Typeface>,
    /// End lines with `CR` only and let the printer add the line feed.
    pub auto_line_feed: bool,
    /// End every page with `CR FF`.
    pub auto_form_feed: bool,
    /// Explicit choice between the printer's page length and `page_length`.
    /// When unset the printer's length is used only if no page length is given.
    pub use_printer_page_length: Option<bool>,
}

impl Default for PageFormat {
    fn default() -> Self {
        Self {
            page_length: None,
            page_width: None,
            left_margin: None,
            right_margin: None,
            bottom_margin: None,
            line_spacing: None,
            character_pitch: None,
            typeface: None,
            auto_line_feed: false,
            auto_form_feed: true,
            use_printer_page_length: None,
        }
    }
}

impl PageFormat {
    pub fn new() -> Self {
        Self::default()
    }

    /// A format with a fixed page length.
    pub fn with_page_length(page_length: u8) -> Self {
        Self { page_length: Some(page_length), ..Self::default() }
    }

    pub fn uses_printer_page_length(&self) -> bool {
        self.use_printer_page_length.unwrap_or(self.page_length.is_none())
    }

    /// Builds the initialization sequence sent before the first page.
    pub fn build(&self) -> String {
        let mut out = escp::initialize();
        match self.line_spacing {
            Some(LineSpacing::OnePerEightInch) => out.push_str(&escp::one_per_eight_inch_line_spacing()),
            Some(LineSpacing::OnePerSixInch) => out.push_str(&escp::one_per_six_inch_line_spacing()),
            None => {}
        }
        if let Some(typeface) = self.typeface {
            let n = match typeface {
                Typeface::Roman => 0,
                Typeface::SansSerif => 1,
            };
            out.push_str(&escp::select_typeface(n));
        }
        if let Some(pitch) = self.character_pitch {
            out.push_str(&pitch.command());
        }
        if let Some(length) = self.page_length
            && !self.uses_printer_page_length()
        {
            out.push_str(&escp::page_length(length));
        }
        if let Some(left) = self.left_margin {
            out.push_str(&escp::left_margin(left));
        }
        match (self.page_width, self.right_margin) {
            (Some(width), Some(right)) => out.push_str(&escp::right_margin(width.saturating_sub(right))),
            (Some(width), None) => out.push_str(&escp::right_margin(width)),
            (None, Some(right)) => out.push_str(&escp::right_margin(right)),
            (None, None) => {}
        }
        if let Some(bottom) = self.bottom_margin {
            out.push_str(&escp::bottom_margin(bottom));
        }
        out
    }
}
