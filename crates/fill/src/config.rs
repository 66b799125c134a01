use platen_escp::BoxCharset;

/// Engine options for a fill job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillConfig {
    /// Characters used for table borders and separators.
    pub box_charset: BoxCharset,
    /// Prefix of values formatted with the `currency` keyword.
    pub currency_symbol: String,
    /// Fail on `${...}` placeholders no data source can resolve. When off
    /// they are logged and rendered empty.
    pub strict_placeholders: bool,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            box_charset: BoxCharset::Cp437,
            currency_symbol: "$".to_string(),
            strict_placeholders: true,
        }
    }
}

impl FillConfig {
    /// The output stream is one byte per character, so every configured
    /// string must stay within `U+0000..=U+00FF`.
    pub fn validate(&self) -> Result<(), crate::FillError> {
        if let Some(c) = self.currency_symbol.chars().find(|c| u32::from(*c) > 0xFF) {
            return Err(crate::FillError::Config(format!(
                "currency symbol '{}' contains '{}', which the printer can't encode",
                self.currency_symbol, c
            )));
        }
        Ok(())
    }
}
