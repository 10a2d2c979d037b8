//! XLSX workbook writer.
//!
//! Produces a single-sheet Office Open XML package. Text is stored as
//! inline strings so no shared-string table is needed; typed cells carry a
//! style whose number format matches their [`CellFormat`].

use std::io::{Cursor, Write};

use chrono::{Datelike, NaiveDate};
use quick_xml::escape::escape;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::model::{cell_reference, Cell, CellFormat, CellValue, Table};

use super::SpreadsheetWriter;

/// Sheet name used when none is configured.
pub const DEFAULT_SHEET_NAME: &str = "Report";

const MAX_SHEET_NAME_LEN: usize = 31;

/// Built-in `#,##0.00`
const DECIMAL_FMT_ID: u32 = 4;
const DATE_FMT_ID: u32 = 164;
const FIRST_CURRENCY_FMT_ID: u32 = 165;

/// Days from 0001-01-01 to the spreadsheet epoch 1899-12-30.
const SERIAL_EPOCH_DAYS_FROM_CE: i32 = 693_594;

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const RELATIONSHIP_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

/// Writes a table as an XLSX workbook with one sheet.
#[derive(Debug, Clone)]
pub struct XlsxWriter {
    sheet_name: String,
}

impl XlsxWriter {
    /// Create a writer using the default sheet name.
    pub fn new() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }

    /// Set the sheet name. Characters a workbook forbids are removed.
    pub fn with_sheet_name(mut self, name: &str) -> Self {
        self.sheet_name = sanitize_sheet_name(name);
        self
    }

    /// Effective sheet name.
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    fn workbook_xml(&self) -> String {
        format!(
            r#"{}
<workbook xmlns="{}" xmlns:r="{}"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
            XML_DECLARATION,
            SPREADSHEET_NS,
            RELATIONSHIP_NS,
            escape(self.sheet_name.as_str())
        )
    }
}

impl Default for XlsxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SpreadsheetWriter for XlsxWriter {
    fn name(&self) -> &str {
        "xlsx"
    }

    fn extension(&self) -> &str {
        "xlsx"
    }

    fn mime_type(&self) -> &str {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    }

    fn write(&self, table: &Table, widths: &[usize]) -> Result<Vec<u8>> {
        let styles = StyleSheet::for_table(table);
        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
            ("_rels/.rels", ROOT_RELS_XML.to_string()),
            ("xl/workbook.xml", self.workbook_xml()),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML.to_string()),
            ("xl/styles.xml", styles.to_xml()),
            ("xl/worksheets/sheet1.xml", sheet_xml(table, widths, &styles)),
        ];

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, content) in parts {
            zip.start_file(name, options)?;
            zip.write_all(content.as_bytes())?;
        }
        let cursor = zip.finish()?;

        log::debug!(
            "Wrote workbook '{}' with {} rows",
            self.sheet_name,
            table.row_count()
        );
        Ok(cursor.into_inner())
    }
}

/// Make a name acceptable as a worksheet title.
///
/// Removes `[ ] : * ? / \` and control characters, strips surrounding
/// apostrophes and whitespace, and truncates to 31 characters. Falls back to
/// [`DEFAULT_SHEET_NAME`] when nothing is left.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .filter(|c| !c.is_control())
        .collect();
    let truncated: String = cleaned
        .trim()
        .trim_matches('\'')
        .chars()
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let result = truncated.trim_end();

    if result.is_empty() {
        DEFAULT_SHEET_NAME.to_string()
    } else {
        result.to_string()
    }
}

/// Cell styles needed by one table.
struct StyleSheet {
    currencies: Vec<char>,
}

impl StyleSheet {
    fn for_table(table: &Table) -> Self {
        let mut currencies = Vec::new();
        for cell in table.rows.iter().flat_map(|r| r.cells.iter()) {
            if let CellFormat::Currency(symbol) = cell.format() {
                if !currencies.contains(&symbol) {
                    currencies.push(symbol);
                }
            }
        }
        Self { currencies }
    }

    /// Index into `cellXfs`; `None` means the default style.
    fn style_index(&self, format: CellFormat) -> Option<usize> {
        match format {
            CellFormat::Text | CellFormat::General => None,
            CellFormat::Decimal => Some(1),
            CellFormat::Date => Some(2),
            CellFormat::Currency(symbol) => self
                .currencies
                .iter()
                .position(|s| *s == symbol)
                .map(|i| 3 + i),
        }
    }

    fn to_xml(&self) -> String {
        let mut num_fmts = format!(
            r#"<numFmt numFmtId="{}" formatCode="{}"/>"#,
            DATE_FMT_ID,
            escape(CellFormat::Date.number_format().unwrap_or_default().as_str())
        );
        let mut xfs = String::from(r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>"#);
        xfs.push_str(&format!(
            r#"<xf numFmtId="{}" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>"#,
            DECIMAL_FMT_ID
        ));
        xfs.push_str(&format!(
            r#"<xf numFmtId="{}" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>"#,
            DATE_FMT_ID
        ));

        for (i, symbol) in self.currencies.iter().enumerate() {
            let id = FIRST_CURRENCY_FMT_ID + i as u32;
            let code = CellFormat::Currency(*symbol)
                .number_format()
                .unwrap_or_default();
            num_fmts.push_str(&format!(
                r#"<numFmt numFmtId="{}" formatCode="{}"/>"#,
                id,
                escape(code.as_str())
            ));
            xfs.push_str(&format!(
                r#"<xf numFmtId="{}" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>"#,
                id
            ));
        }

        format!(
            concat!(
                "{}\n<styleSheet xmlns=\"{}\">",
                "<numFmts count=\"{}\">{}</numFmts>",
                "<fonts count=\"1\"><font><sz val=\"11\"/><name val=\"Calibri\"/></font></fonts>",
                "<fills count=\"2\"><fill><patternFill patternType=\"none\"/></fill>",
                "<fill><patternFill patternType=\"gray125\"/></fill></fills>",
                "<borders count=\"1\"><border><left/><right/><top/><bottom/><diagonal/></border></borders>",
                "<cellStyleXfs count=\"1\"><xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\"/></cellStyleXfs>",
                "<cellXfs count=\"{}\">{}</cellXfs>",
                "<cellStyles count=\"1\"><cellStyle name=\"Normal\" xfId=\"0\" builtinId=\"0\"/></cellStyles>",
                "</styleSheet>"
            ),
            XML_DECLARATION,
            SPREADSHEET_NS,
            1 + self.currencies.len(),
            num_fmts,
            3 + self.currencies.len(),
            xfs
        )
    }
}

fn sheet_xml(table: &Table, widths: &[usize], styles: &StyleSheet) -> String {
    let mut xml = format!(
        r#"{}
<worksheet xmlns="{}" xmlns:r="{}">"#,
        XML_DECLARATION, SPREADSHEET_NS, RELATIONSHIP_NS
    );

    let columns = table.column_count();
    if table.row_count() > 0 && columns > 0 {
        xml.push_str(&format!(
            r#"<dimension ref="A1:{}"/>"#,
            cell_reference(table.row_count() - 1, columns - 1)
        ));
    }

    if !widths.is_empty() {
        xml.push_str("<cols>");
        for (i, width) in widths.iter().enumerate() {
            xml.push_str(&format!(
                r#"<col min="{n}" max="{n}" width="{w}" customWidth="1"/>"#,
                n = i + 1,
                w = width
            ));
        }
        xml.push_str("</cols>");
    }

    xml.push_str("<sheetData>");
    for (r, row) in table.rows.iter().enumerate() {
        xml.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, cell) in row.cells.iter().enumerate() {
            write_cell(&mut xml, &cell_reference(r, c), cell, styles);
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData>");

    if !table.merges.is_empty() {
        xml.push_str(&format!(r#"<mergeCells count="{}">"#, table.merges.len()));
        for region in &table.merges {
            xml.push_str(&format!(r#"<mergeCell ref="{}"/>"#, region.a1_range()));
        }
        xml.push_str("</mergeCells>");
    }

    xml.push_str("</worksheet>");
    xml
}

fn write_cell(xml: &mut String, reference: &str, cell: &Cell, styles: &StyleSheet) {
    let style = match styles.style_index(cell.format()) {
        Some(index) => format!(r#" s="{}""#, index),
        None => String::new(),
    };

    match cell.value() {
        CellValue::Text(_) => {
            if cell.is_empty() {
                return;
            }
            xml.push_str(&format!(
                r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                reference,
                escape(xml_chars(cell.raw()).as_str())
            ));
        }
        CellValue::Integer(n) => {
            xml.push_str(&format!(r#"<c r="{}"{}><v>{}</v></c>"#, reference, style, n));
        }
        CellValue::Decimal(x) | CellValue::Currency { amount: x, .. } => {
            xml.push_str(&format!(r#"<c r="{}"{}><v>{}</v></c>"#, reference, style, x));
        }
        CellValue::Date(date) => {
            xml.push_str(&format!(
                r#"<c r="{}"{}><v>{}</v></c>"#,
                reference,
                style,
                date_serial(*date)
            ));
        }
    }
}

/// Spreadsheet serial number of a date (1900 date system).
///
/// Exact from 1900-03-01 on; earlier dates never reach here as typed cells.
pub(crate) fn date_serial(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - SERIAL_EPOCH_DAYS_FROM_CE
}

/// Drop characters XML 1.0 cannot carry.
fn xml_chars(text: &str) -> String {
    text.chars()
        .filter(|&c| {
            matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MergeRegion, Row, RowKind};
    use std::io::Read;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    fn invoice_table() -> Table {
        let mut table = Table::new();
        table.add_row(Row::from_strings(["INVOICE", "", ""], RowKind::Heading));
        table.add_row(Row::new(
            vec![
                Cell::text("3").with_value(CellValue::Integer(3)),
                Cell::text("2,5").with_value(CellValue::Decimal(2.5)),
                Cell::text("10,00€").with_value(CellValue::Currency {
                    amount: 10.0,
                    symbol: '€',
                }),
            ],
            RowKind::SpaceDelimited,
        ));
        table.add_row(Row::new(
            vec![
                Cell::text("25/12/2024").with_value(CellValue::Date(
                    NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
                )),
                Cell::text("R&D <x>"),
                Cell::text("1,00$").with_value(CellValue::Currency {
                    amount: 1.0,
                    symbol: '$',
                }),
            ],
            RowKind::TabDelimited,
        ));
        table
    }

    // ==================== Package ====================

    #[test]
    fn test_package_parts() {
        let bytes = XlsxWriter::new().write(&invoice_table(), &[12, 12, 12]).unwrap();
        assert!(bytes.starts_with(b"PK"));

        let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "xl/workbook.xml",
            "xl/_rels/workbook.xml.rels",
            "xl/styles.xml",
            "xl/worksheets/sheet1.xml",
        ] {
            assert!(names.contains(&part), "missing {}", part);
        }

        let workbook = read_part(&bytes, "xl/workbook.xml");
        assert!(workbook.contains(r#"<sheet name="Report""#));
    }

    // ==================== Cells ====================

    #[test]
    fn test_sheet_cells() {
        let bytes = XlsxWriter::new().write(&invoice_table(), &[12, 12, 12]).unwrap();
        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");

        assert!(sheet.contains(r#"<dimension ref="A1:C3"/>"#));
        assert!(sheet.contains(
            r#"<c r="A1" t="inlineStr"><is><t xml:space="preserve">INVOICE</t></is></c>"#
        ));
        // Empty padding cells are not written
        assert!(!sheet.contains(r#"r="B1""#));
        assert!(sheet.contains(r#"<c r="A2"><v>3</v></c>"#));
        assert!(sheet.contains(r#"<c r="B2" s="1"><v>2.5</v></c>"#));
        assert!(sheet.contains(r#"<c r="C2" s="3"><v>10</v></c>"#));
        assert!(sheet.contains(r#"<c r="A3" s="2"><v>45651</v></c>"#));
        assert!(sheet.contains("R&amp;D &lt;x&gt;"));
        assert!(sheet.contains(r#"<c r="C3" s="4"><v>1</v></c>"#));
    }

    #[test]
    fn test_column_widths_and_merges() {
        let mut table = invoice_table();
        table.add_merge(MergeRegion::row_span(0, 0, 3));
        let bytes = XlsxWriter::new().write(&table, &[10, 35, 50]).unwrap();
        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");

        assert!(sheet.contains(r#"<col min="2" max="2" width="35" customWidth="1"/>"#));
        assert!(sheet.find("<cols>") < sheet.find("<sheetData>"));
        assert!(sheet.contains(r#"<mergeCells count="1"><mergeCell ref="A1:C1"/></mergeCells>"#));
        assert!(sheet.find("</sheetData>") < sheet.find("<mergeCells"));
    }

    #[test]
    fn test_empty_table() {
        let bytes = XlsxWriter::new().write(&Table::new(), &[]).unwrap();
        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("<sheetData></sheetData>"));
        assert!(!sheet.contains("<cols>"));
        assert!(!sheet.contains("<dimension"));
    }

    // ==================== Styles ====================

    #[test]
    fn test_styles_number_formats() {
        let bytes = XlsxWriter::new().write(&invoice_table(), &[]).unwrap();
        let styles = read_part(&bytes, "xl/styles.xml");

        assert!(styles.contains(r#"<numFmts count="3">"#));
        assert!(styles.contains(r#"formatCode="dd/mm/yyyy""#));
        assert!(styles.contains(r##"<numFmt numFmtId="165" formatCode="#,##0.00 &quot;€&quot;"/>"##));
        assert!(styles.contains(r##"<numFmt numFmtId="166" formatCode="#,##0.00 &quot;$&quot;"/>"##));
        assert!(styles.contains(r#"<cellXfs count="5">"#));
    }

    #[test]
    fn test_date_serial() {
        assert_eq!(date_serial(NaiveDate::from_ymd_opt(1899, 12, 31).unwrap()), 1);
        assert_eq!(date_serial(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()), 25569);
        assert_eq!(date_serial(NaiveDate::from_ymd_opt(2024, 12, 25).unwrap()), 45651);
    }

    // ==================== Sheet name ====================

    #[test]
    fn test_sanitize_sheet_name() {
        assert_eq!(sanitize_sheet_name("Reporte"), "Reporte");
        assert_eq!(sanitize_sheet_name("Q1/Q2: [draft]"), "Q1Q2 draft");
        assert_eq!(sanitize_sheet_name("'quoted'"), "quoted");
        assert_eq!(sanitize_sheet_name("???"), DEFAULT_SHEET_NAME);
        assert_eq!(sanitize_sheet_name(&"x".repeat(40)).chars().count(), 31);
    }

    #[test]
    fn test_custom_sheet_name_is_escaped() {
        let writer = XlsxWriter::new().with_sheet_name("Sales & Costs");
        assert_eq!(writer.sheet_name(), "Sales & Costs");
        let bytes = writer.write(&Table::new(), &[]).unwrap();
        let workbook = read_part(&bytes, "xl/workbook.xml");
        assert!(workbook.contains(r#"name="Sales &amp; Costs""#));
    }

    #[test]
    fn test_xml_chars() {
        assert_eq!(xml_chars("a\u{0}b\u{1F}c\td"), "abc\td");
    }
}
