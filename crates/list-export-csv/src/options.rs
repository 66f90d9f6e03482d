//! CSV options

/// Options for writing CSV files
#[derive(Debug, Clone)]
pub struct CsvWriteOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Write header row
    pub write_header: bool,
    /// Line terminator
    pub line_terminator: LineTerminator,
    /// Start the file with a UTF-8 byte order mark so spreadsheet
    /// applications read accented labels correctly
    pub utf8_bom: bool,
}

impl Default for CsvWriteOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            write_header: true,
            line_terminator: LineTerminator::CRLF,
            utf8_bom: false,
        }
    }
}

impl CsvWriteOptions {
    /// Options for a file opened directly in a spreadsheet application
    pub fn spreadsheet() -> Self {
        Self {
            utf8_bom: true,
            ..Self::default()
        }
    }
}

/// Line terminator type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTerminator {
    /// Unix-style (LF)
    LF,
    /// Windows-style (CRLF)
    CRLF,
}
