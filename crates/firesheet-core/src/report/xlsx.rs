//! Minimal SpreadsheetML package writer.
//!
//! Produces the smallest set of parts Excel, LibreOffice and calamine
//! accept: content types, package and workbook relationships, the
//! workbook, one styles part, a shared string table and one worksheet per
//! sheet. Text cells go through the shared string table; formulas are
//! written together with their cached value.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{cell_ref, CellStyle, CellValue, Sheet, Workbook};
use crate::error::ConvertError;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_SHARED_STRINGS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";
const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// Excel refuses longer sheet names.
const MAX_SHEET_NAME: usize = 31;

/// Write `workbook` as an .xlsx file at `path`.
pub fn save(workbook: &Workbook, path: &Path) -> Result<(), ConvertError> {
    let file = File::create(path)?;
    write_xlsx(workbook, BufWriter::new(file))?;
    Ok(())
}

/// Serialize `workbook` into an in-memory .xlsx package.
pub fn to_bytes(workbook: &Workbook) -> Result<Vec<u8>, ConvertError> {
    let cursor = write_xlsx(workbook, Cursor::new(Vec::new()))?;
    Ok(cursor.into_inner())
}

/// Write the package to any seekable sink and hand the sink back.
pub fn write_xlsx<W: Write + Seek>(workbook: &Workbook, sink: W) -> Result<W, ConvertError> {
    validate_sheet_names(workbook)?;

    let mut shared = SharedStrings::default();
    let worksheets: Vec<String> = workbook
        .sheets()
        .iter()
        .map(|sheet| worksheet_xml(sheet, &mut shared))
        .collect();
    let sheet_count = worksheets.len();

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(sink);

    let mut parts: Vec<(String, String)> = vec![
        ("[Content_Types].xml".into(), content_types_xml(sheet_count)),
        ("_rels/.rels".into(), package_rels_xml()),
        ("xl/workbook.xml".into(), workbook_xml(workbook)),
        ("xl/_rels/workbook.xml.rels".into(), workbook_rels_xml(sheet_count)),
        ("xl/styles.xml".into(), styles_xml()),
        ("xl/sharedStrings.xml".into(), shared.to_xml()),
    ];
    for (i, xml) in worksheets.into_iter().enumerate() {
        parts.push((format!("xl/worksheets/sheet{}.xml", i + 1), xml));
    }

    for (name, xml) in &parts {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(xml.as_bytes())?;
    }

    log::debug!("wrote workbook package with {} sheet(s)", sheet_count);
    Ok(zip.finish()?)
}

fn validate_sheet_names(workbook: &Workbook) -> Result<(), ConvertError> {
    if workbook.sheets().is_empty() {
        return Err(ConvertError::Workbook("workbook has no sheets".into()));
    }
    let mut seen: Vec<String> = Vec::new();
    for sheet in workbook.sheets() {
        let name = &sheet.name;
        if name.is_empty() || name.chars().count() > MAX_SHEET_NAME {
            return Err(ConvertError::Workbook(format!(
                "sheet name '{name}' must be 1 to {MAX_SHEET_NAME} characters"
            )));
        }
        if let Some(c) = name.chars().find(|c| "[]:*?/\\".contains(*c)) {
            return Err(ConvertError::Workbook(format!(
                "sheet name '{name}' contains '{c}'"
            )));
        }
        let lower = name.to_lowercase();
        if seen.contains(&lower) {
            return Err(ConvertError::Workbook(format!("duplicate sheet name '{name}'")));
        }
        seen.push(lower);
    }
    Ok(())
}

/// Shared string table, in first-use order.
#[derive(Default)]
struct SharedStrings {
    strings: Vec<String>,
    index: HashMap<String, usize>,
    references: usize,
}

impl SharedStrings {
    fn intern(&mut self, s: &str) -> usize {
        self.references += 1;
        if let Some(&i) = self.index.get(s) {
            return i;
        }
        let i = self.strings.len();
        self.strings.push(s.to_string());
        self.index.insert(s.to_string(), i);
        i
    }

    fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(XML_DECL);
        xml.push_str(&format!(
            r#"<sst xmlns="{}" count="{}" uniqueCount="{}">"#,
            NS_MAIN,
            self.references,
            self.strings.len()
        ));
        for s in &self.strings {
            xml.push_str(&format!(r#"<si><t xml:space="preserve">{}</t></si>"#, escape(s.as_str())));
        }
        xml.push_str("</sst>");
        xml
    }
}

fn worksheet_xml(sheet: &Sheet, shared: &mut SharedStrings) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECL);
    xml.push_str(&format!(r#"<worksheet xmlns="{}" xmlns:r="{}">"#, NS_MAIN, NS_REL));

    if !sheet.column_widths().is_empty() {
        xml.push_str("<cols>");
        for (col, width) in sheet.column_widths() {
            xml.push_str(&format!(
                r#"<col min="{col}" max="{col}" width="{width}" customWidth="1"/>"#
            ));
        }
        xml.push_str("</cols>");
    }

    xml.push_str("<sheetData>");
    for (row, cells) in sheet.rows() {
        xml.push_str(&format!(r#"<row r="{row}">"#));
        for (col, cell) in cells {
            let reference = cell_ref(row, *col);
            let style = xf_index(cell.style);
            match &cell.value {
                // Blank, so that arithmetic on the cell sees zero.
                CellValue::Text(s) if s.is_empty() => {
                    xml.push_str(&format!(r#"<c r="{reference}" s="{style}"/>"#));
                }
                CellValue::Text(s) => {
                    let idx = shared.intern(s);
                    xml.push_str(&format!(
                        r#"<c r="{reference}" s="{style}" t="s"><v>{idx}</v></c>"#
                    ));
                }
                CellValue::Number(n) => {
                    xml.push_str(&format!(r#"<c r="{reference}" s="{style}"><v>{n}</v></c>"#));
                }
                CellValue::Formula { expr, cached } => {
                    xml.push_str(&format!(
                        r#"<c r="{reference}" s="{style}"><f>{}</f><v>{cached}</v></c>"#,
                        escape(expr.as_str())
                    ));
                }
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData>");

    if !sheet.merges().is_empty() {
        xml.push_str(&format!(r#"<mergeCells count="{}">"#, sheet.merges().len()));
        for range in sheet.merges() {
            xml.push_str(&format!(r#"<mergeCell ref="{}"/>"#, escape(range.as_str())));
        }
        xml.push_str("</mergeCells>");
    }

    xml.push_str("</worksheet>");
    xml
}

fn content_types_xml(sheet_count: usize) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECL);
    xml.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
    }
    xml.push_str(r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#);
    xml.push_str("</Types>");
    xml
}

fn package_rels_xml() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{NS_PKG_REL}"><Relationship Id="rId1" Type="{REL_OFFICE_DOCUMENT}" Target="xl/workbook.xml"/></Relationships>"#
    )
}

fn workbook_xml(workbook: &Workbook) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECL);
    xml.push_str(&format!(r#"<workbook xmlns="{}" xmlns:r="{}"><sheets>"#, NS_MAIN, NS_REL));
    for (i, sheet) in workbook.sheets().iter().enumerate() {
        xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(sheet.name.as_str()),
            i + 1,
            i + 1
        ));
    }
    xml.push_str("</sheets></workbook>");
    xml
}

fn workbook_rels_xml(sheet_count: usize) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECL);
    xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, NS_PKG_REL));
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{i}" Type="{REL_WORKSHEET}" Target="worksheets/sheet{i}.xml"/>"#
        ));
    }
    xml.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="{REL_STYLES}" Target="styles.xml"/>"#,
        sheet_count + 1
    ));
    xml.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="{REL_SHARED_STRINGS}" Target="sharedStrings.xml"/>"#,
        sheet_count + 2
    ));
    xml.push_str("</Relationships>");
    xml
}

/// Position of the style in the `cellXfs` list of [`styles_xml`].
fn xf_index(style: CellStyle) -> usize {
    match style {
        CellStyle::Plain => 0,
        CellStyle::Title => 1,
        CellStyle::Timestamp => 2,
        CellStyle::BoqHeader => 3,
        CellStyle::SpecHeader => 4,
        CellStyle::Bordered => 5,
        CellStyle::PriceInput => 6,
        CellStyle::Price => 7,
        CellStyle::TotalLabel => 8,
        CellStyle::GrandTotal => 9,
        CellStyle::CategoryLabel => 10,
        CellStyle::Wrapped => 11,
        CellStyle::Bold => 12,
        CellStyle::Heading => 13,
    }
}

/// Custom number format id for currency cells.
const CURRENCY_FMT: u32 = 164;

fn styles_xml() -> String {
    let fonts = [
        r#"<font><sz val="11"/><name val="Calibri"/></font>"#,
        r#"<font><b/><sz val="14"/><color rgb="FFFFFFFF"/><name val="Calibri"/></font>"#,
        r#"<font><i/><sz val="9"/><name val="Calibri"/></font>"#,
        r#"<font><b/><sz val="11"/><color rgb="FFFFFFFF"/><name val="Calibri"/></font>"#,
        r#"<font><sz val="11"/><color rgb="FF0000FF"/><name val="Calibri"/></font>"#,
        r#"<font><b/><sz val="11"/><name val="Calibri"/></font>"#,
        r#"<font><b/><sz val="12"/><name val="Calibri"/></font>"#,
    ];

    let solid = |rgb: &str| {
        format!(
            r#"<fill><patternFill patternType="solid"><fgColor rgb="FF{rgb}"/><bgColor indexed="64"/></patternFill></fill>"#
        )
    };
    let fills = [
        r#"<fill><patternFill patternType="none"/></fill>"#.to_string(),
        r#"<fill><patternFill patternType="gray125"/></fill>"#.to_string(),
        solid("1F4E78"),
        solid("4472C4"),
        solid("70AD47"),
        solid("FFFF00"),
        solid("E2EFDA"),
    ];

    let thin = r#"<left style="thin"><color indexed="64"/></left><right style="thin"><color indexed="64"/></right><top style="thin"><color indexed="64"/></top><bottom style="thin"><color indexed="64"/></bottom><diagonal/>"#;
    let borders = [
        "<border><left/><right/><top/><bottom/><diagonal/></border>".to_string(),
        format!("<border>{thin}</border>"),
    ];

    let center = r#"<alignment horizontal="center" vertical="center"/>"#;
    let wrap_top = r#"<alignment vertical="top" wrapText="1"/>"#;
    let right = r#"<alignment horizontal="right"/>"#;
    // (numFmtId, fontId, fillId, borderId, alignment), indexed by xf_index.
    let xfs: [(u32, u32, u32, u32, &str); 14] = [
        (0, 0, 0, 0, ""),
        (0, 1, 2, 0, center),
        (0, 2, 0, 0, ""),
        (0, 3, 3, 1, center),
        (0, 3, 4, 1, center),
        (0, 0, 0, 1, ""),
        (CURRENCY_FMT, 4, 0, 1, ""),
        (CURRENCY_FMT, 0, 0, 1, ""),
        (0, 5, 0, 0, right),
        (CURRENCY_FMT, 5, 5, 0, ""),
        (0, 5, 6, 1, wrap_top),
        (0, 0, 0, 1, wrap_top),
        (0, 5, 0, 0, ""),
        (0, 6, 0, 0, ""),
    ];

    let mut xml = String::new();
    xml.push_str(XML_DECL);
    xml.push_str(&format!(r#"<styleSheet xmlns="{}">"#, NS_MAIN));
    xml.push_str(&format!(
        r#"<numFmts count="1"><numFmt numFmtId="{CURRENCY_FMT}" formatCode="&quot;$&quot;#,##0.00"/></numFmts>"#
    ));
    xml.push_str(&format!(r#"<fonts count="{}">{}</fonts>"#, fonts.len(), fonts.concat()));
    xml.push_str(&format!(r#"<fills count="{}">{}</fills>"#, fills.len(), fills.concat()));
    xml.push_str(&format!(
        r#"<borders count="{}">{}</borders>"#,
        borders.len(),
        borders.concat()
    ));
    xml.push_str(r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#);
    xml.push_str(&format!(r#"<cellXfs count="{}">"#, xfs.len()));
    for (num_fmt, font, fill, border, alignment) in xfs {
        let mut attrs = format!(
            r#"numFmtId="{num_fmt}" fontId="{font}" fillId="{fill}" borderId="{border}" xfId="0""#
        );
        if num_fmt != 0 {
            attrs.push_str(r#" applyNumberFormat="1""#);
        }
        if font != 0 {
            attrs.push_str(r#" applyFont="1""#);
        }
        if fill != 0 {
            attrs.push_str(r#" applyFill="1""#);
        }
        if border != 0 {
            attrs.push_str(r#" applyBorder="1""#);
        }
        if alignment.is_empty() {
            xml.push_str(&format!("<xf {attrs}/>"));
        } else {
            xml.push_str(&format!(r#"<xf {attrs} applyAlignment="1">{alignment}</xf>"#));
        }
    }
    xml.push_str("</cellXfs>");
    xml.push_str(r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#);
    xml.push_str("</styleSheet>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportOptions;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut xml = String::new();
        part.read_to_string(&mut xml).unwrap();
        xml
    }

    fn sample_workbook() -> Workbook {
        let mut sheet = Sheet::new("Data & Notes");
        sheet.set_text(1, 1, "Smoke <detector>", CellStyle::Title);
        sheet.set_text(1, 2, "Smoke <detector>", CellStyle::Plain);
        sheet.set_text(2, 1, "", CellStyle::Bordered);
        sheet.set(
            3,
            7,
            CellValue::Formula {
                expr: "SUM(G5:G6)".into(),
                cached: rust_decimal::Decimal::TEN,
            },
            CellStyle::GrandTotal,
        );
        sheet.merge("A1:B1");
        let mut workbook = Workbook::new();
        workbook.push(sheet);
        workbook
    }

    #[test]
    fn package_contains_all_parts() {
        let bytes = to_bytes(&sample_workbook()).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "xl/_rels/workbook.xml.rels",
                "xl/sharedStrings.xml",
                "xl/styles.xml",
                "xl/workbook.xml",
                "xl/worksheets/sheet1.xml",
            ]
        );
    }

    #[test]
    fn text_is_escaped_and_shared() {
        let bytes = to_bytes(&sample_workbook()).unwrap();
        let sst = read_part(&bytes, "xl/sharedStrings.xml");
        assert!(sst.contains(r#"count="2" uniqueCount="1""#));
        assert!(sst.contains("Smoke &lt;detector&gt;"));

        let workbook = read_part(&bytes, "xl/workbook.xml");
        assert!(workbook.contains(r#"name="Data &amp; Notes""#));
    }

    #[test]
    fn formulas_blanks_and_merges() {
        let bytes = to_bytes(&sample_workbook()).unwrap();
        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains(r#"<c r="G3" s="9"><f>SUM(G5:G6)</f><v>10</v></c>"#));
        assert!(sheet.contains(r#"<c r="A2" s="5"/>"#));
        assert!(sheet.contains(r#"<mergeCell ref="A1:B1"/>"#));
    }

    #[test]
    fn every_style_has_an_xf() {
        let styles = styles_xml();
        assert!(styles.contains(r#"<cellXfs count="14">"#));
        assert_eq!(xf_index(CellStyle::Heading), 13);
    }

    #[test]
    fn rejects_bad_sheet_names() {
        let mut workbook = Workbook::new();
        workbook.push(Sheet::new("BOQ"));
        workbook.push(Sheet::new("boq"));
        assert!(matches!(to_bytes(&workbook), Err(ConvertError::Workbook(_))));

        let mut workbook = Workbook::new();
        workbook.push(Sheet::new("Q1/Q2"));
        assert!(matches!(to_bytes(&workbook), Err(ConvertError::Workbook(_))));

        assert!(matches!(to_bytes(&Workbook::new()), Err(ConvertError::Workbook(_))));
    }

    #[test]
    fn writes_real_report() {
        let mut workbook = Workbook::new();
        workbook.push(crate::report::spec::spec_sheet(&[], &ReportOptions::default()));
        let bytes = to_bytes(&workbook).unwrap();
        assert!(bytes.starts_with(b"PK"));
        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains(r#"<col min="3" max="3" width="40" customWidth="1"/>"#));
    }
}
