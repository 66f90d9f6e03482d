//! Fixed style table (styles.xml) used by export sheets

use quick_xml::escape::escape;

use crate::options::XlsxExportOptions;

/// Built-in number format id for `#,##0.00`
const BUILTIN_NUMBER_SEP_DEC2: u32 = 4;
/// First id available for custom number formats
const FIRST_CUSTOM_NUM_FMT: u32 = 164;

/// Index of each cell format in `cellXfs`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub(crate) enum CellStyle {
    Header = 1,
    Text = 2,
    Number = 3,
    Date = 4,
    DateTime = 5,
}

impl CellStyle {
    pub(crate) fn xf_id(self) -> u32 {
        self as u32
    }
}

/// Number format ids of the body styles plus the custom formats to declare
struct NumberFormats<'a> {
    number: u32,
    date: u32,
    datetime: u32,
    custom: Vec<(u32, &'a str)>,
}

impl<'a> NumberFormats<'a> {
    fn new(options: &'a XlsxExportOptions) -> Self {
        let mut custom = Vec::new();
        let mut next = FIRST_CUSTOM_NUM_FMT;
        let mut declare = |code: &'a str| {
            custom.push((next, code));
            next += 1;
            next - 1
        };

        let number = if options.number_format == "#,##0.00" {
            BUILTIN_NUMBER_SEP_DEC2
        } else {
            declare(options.number_format.as_str())
        };
        let date = declare(options.date_format.as_str());
        let datetime = declare(options.datetime_format.as_str());

        Self {
            number,
            date,
            datetime,
            custom,
        }
    }
}

/// Render `xl/styles.xml`
pub(crate) fn styles_xml(options: &XlsxExportOptions) -> String {
    let formats = NumberFormats::new(options);

    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );

    xml.push_str(&format!(
        "\n    <numFmts count=\"{}\">",
        formats.custom.len()
    ));
    for (id, code) in &formats.custom {
        xml.push_str(&format!(
            "\n        <numFmt numFmtId=\"{}\" formatCode=\"{}\"/>",
            id,
            escape(*code)
        ));
    }
    xml.push_str("\n    </numFmts>");

    xml.push_str(&format!(
        r#"
    <fonts count="2">
        <font><sz val="11"/><color theme="1"/><name val="Calibri"/><family val="2"/><scheme val="minor"/></font>
        <font><b/><sz val="11"/><color rgb="FF{}"/><name val="Calibri"/><family val="2"/><scheme val="minor"/></font>
    </fonts>
    <fills count="3">
        <fill><patternFill patternType="none"/></fill>
        <fill><patternFill patternType="gray125"/></fill>
        <fill><patternFill patternType="solid"><fgColor rgb="FF{}"/><bgColor indexed="64"/></patternFill></fill>
    </fills>
    <borders count="2">
        <border><left/><right/><top/><bottom/><diagonal/></border>
        <border><left style="thin"><color indexed="64"/></left><right style="thin"><color indexed="64"/></right><top style="thin"><color indexed="64"/></top><bottom style="thin"><color indexed="64"/></bottom><diagonal/></border>
    </borders>
    <cellStyleXfs count="1">
        <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
    </cellStyleXfs>"#,
        options.header_font_color.to_ascii_uppercase(),
        options.header_fill.to_ascii_uppercase()
    ));

    let body_xf = |num_fmt: u32| {
        let apply = if num_fmt != 0 {
            " applyNumberFormat=\"1\""
        } else {
            ""
        };
        format!(
            "\n        <xf numFmtId=\"{num_fmt}\" fontId=\"0\" fillId=\"0\" borderId=\"1\" xfId=\"0\"{apply} applyBorder=\"1\" applyAlignment=\"1\"><alignment vertical=\"center\"/></xf>"
        )
    };

    xml.push_str("\n    <cellXfs count=\"6\">");
    xml.push_str("\n        <xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\"/>");
    xml.push_str("\n        <xf numFmtId=\"0\" fontId=\"1\" fillId=\"2\" borderId=\"1\" xfId=\"0\" applyFont=\"1\" applyFill=\"1\" applyBorder=\"1\" applyAlignment=\"1\"><alignment horizontal=\"center\" vertical=\"center\"/></xf>");
    xml.push_str(&body_xf(0));
    xml.push_str(&body_xf(formats.number));
    xml.push_str(&body_xf(formats.date));
    xml.push_str(&body_xf(formats.datetime));
    xml.push_str("\n    </cellXfs>");

    xml.push_str(
        r#"
    <cellStyles count="1">
        <cellStyle name="Normal" xfId="0" builtinId="0"/>
    </cellStyles>
</styleSheet>"#,
    );
    xml
}
