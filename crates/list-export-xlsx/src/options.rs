//! XLSX export options

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: usize = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: usize = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Options controlling how an export sheet is rendered
#[derive(Debug, Clone, PartialEq)]
pub struct XlsxExportOptions {
    /// Worksheet name
    pub sheet_name: String,
    /// Header background as `RRGGBB`
    pub header_fill: String,
    /// Header font colour as `RRGGBB`
    pub header_font_color: String,
    /// Characters added to the widest text of a column
    pub column_padding: usize,
    /// Upper bound for auto-fitted column widths
    pub max_column_width: usize,
    /// Keep the header row visible while scrolling
    pub freeze_header: bool,
    /// Number format for numeric cells
    pub number_format: String,
    /// Number format for date cells
    pub date_format: String,
    /// Number format for datetime cells
    pub datetime_format: String,
}

impl Default for XlsxExportOptions {
    fn default() -> Self {
        Self {
            sheet_name: "Data".to_string(),
            header_fill: "4472C4".to_string(),
            header_font_color: "FFFFFF".to_string(),
            column_padding: 2,
            max_column_width: 50,
            freeze_header: true,
            number_format: "#,##0.00".to_string(),
            date_format: "yyyy-mm-dd".to_string(),
            datetime_format: "yyyy-mm-dd hh:mm:ss".to_string(),
        }
    }
}

impl XlsxExportOptions {
    /// Width of a column whose widest text is `text_width` characters
    pub fn column_width(&self, text_width: usize) -> usize {
        (text_width + self.column_padding).min(self.max_column_width)
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("header_fill", &self.header_fill),
            ("header_font_color", &self.header_font_color),
        ] {
            if value.len() != 6 || !value.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(format!("{name} must be RRGGBB, got '{value}'"));
            }
        }
        if self.sheet_name.trim().is_empty() {
            return Err("sheet_name must not be empty".to_string());
        }
        if self.max_column_width == 0 {
            return Err("max_column_width must be positive".to_string());
        }
        Ok(())
    }

    /// Sheet name with the characters Excel forbids replaced
    pub(crate) fn safe_sheet_name(&self) -> String {
        self.sheet_name
            .chars()
            .map(|c| match c {
                '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
                c => c,
            })
            .take(MAX_SHEET_NAME_LEN)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_width_is_capped() {
        let options = XlsxExportOptions::default();
        assert_eq!(options.column_width(4), 6);
        assert_eq!(options.column_width(48), 50);
        assert_eq!(options.column_width(300), 50);
    }

    #[test]
    fn test_validation() {
        assert!(XlsxExportOptions::default().validate().is_ok());
        let bad = XlsxExportOptions {
            header_fill: "#4472C4".into(),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_safe_sheet_name() {
        let options = XlsxExportOptions {
            sheet_name: "Sales/Q1 [draft] with a very long trailing name".into(),
            ..Default::default()
        };
        let name = options.safe_sheet_name();
        assert_eq!(name.chars().count(), MAX_SHEET_NAME_LEN);
        assert!(name.starts_with("Sales_Q1 _draft_"));
    }
}
