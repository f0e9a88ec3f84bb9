//! Builds small `.xlsx` packages for the integration tests.

#![allow(dead_code)]

use std::{
    fs::File,
    io::{Seek, Write},
    path::PathBuf,
};

use tempfile::TempDir;
use xlsx_rows::sheet::column::cell_reference;
use zip::{ZipWriter, result::ZipResult, write::SimpleFileOptions};

const RELS_DOT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
    r#"</Relationships>"#,
);

/// A cell as written into the fixture sheet.
pub enum Value<'a> {
    Blank,
    Number(&'a str),
    Styled(usize, &'a str),
    Shared(usize),
    Inline(&'a str),
    Bool(bool),
    Error(&'a str),
    Formula(&'a str, &'a str),
}

pub fn cell(reference: &str, value: &Value<'_>) -> String {
    match value {
        Value::Blank => format!(r#"<c r="{reference}"/>"#),
        Value::Number(n) => format!(r#"<c r="{reference}"><v>{n}</v></c>"#),
        Value::Styled(s, n) => format!(r#"<c r="{reference}" s="{s}"><v>{n}</v></c>"#),
        Value::Shared(i) => format!(r#"<c r="{reference}" t="s"><v>{i}</v></c>"#),
        Value::Inline(text) => format!(
            r#"<c r="{reference}" t="inlineStr"><is><t>{}</t></is></c>"#,
            xml_escape(text)
        ),
        Value::Bool(b) => format!(r#"<c r="{reference}" t="b"><v>{}</v></c>"#, u8::from(*b)),
        Value::Error(e) => format!(r#"<c r="{reference}" t="e"><v>{}</v></c>"#, xml_escape(e)),
        Value::Formula(f, cached) => format!(
            r#"<c r="{reference}" t="str"><f>{}</f><v>{}</v></c>"#,
            xml_escape(f),
            xml_escape(cached)
        ),
    }
}

/// `<row>` with its cells laid out from column A.
pub fn row(number: u32, values: &[Value<'_>]) -> String {
    let cells: String = values
        .iter()
        .enumerate()
        .map(|(column, value)| cell(&cell_reference(column, number), value))
        .collect();
    format!(r#"<row r="{number}">{cells}</row>"#)
}

pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[derive(Default)]
pub struct Fixture {
    sheets: Vec<(String, String)>,
    shared_strings: Option<Vec<String>>,
    num_formats: Vec<(u32, String)>,
    cell_formats: Option<Vec<u32>>,
    date1904: bool,
    missing_parts: Vec<String>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sheet whose `<sheetData>` holds `rows`.
    pub fn sheet(mut self, name: &str, rows: impl Into<String>) -> Self {
        self.sheets.push((name.to_owned(), rows.into()));
        self
    }

    pub fn shared_strings(mut self, strings: &[&str]) -> Self {
        self.shared_strings = Some(strings.iter().map(|s| (*s).to_owned()).collect());
        self
    }

    pub fn num_format(mut self, id: u32, code: &str) -> Self {
        self.num_formats.push((id, code.to_owned()));
        self
    }

    /// `numFmtId` of each `cellXfs` entry, in style-index order.
    pub fn cell_formats(mut self, ids: &[u32]) -> Self {
        self.cell_formats = Some(ids.to_vec());
        self
    }

    pub fn date1904(mut self) -> Self {
        self.date1904 = true;
        self
    }

    /// Leaves the worksheet part of sheet number `index` (1-based) out of the
    /// zip while still listing it in the workbook.
    pub fn without_sheet_part(mut self, index: usize) -> Self {
        self.missing_parts.push(format!("xl/worksheets/sheet{index}.xml"));
        self
    }

    /// Writes the package into a fresh temp dir. Keep the `TempDir` alive
    /// while the file is in use.
    pub fn write(&self) -> (TempDir, String) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path: PathBuf = dir.path().join("fixture.xlsx");
        let file = File::create(&path).expect("create fixture");
        self.write_to(file).expect("write fixture");
        (dir, path.to_string_lossy().into_owned())
    }

    fn write_to<W: Write + Seek>(&self, out: W) -> ZipResult<()> {
        let mut zip = ZipWriter::new(out);
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        zip_write_str(&mut zip, "[Content_Types].xml", &self.content_types_xml(), options)?;
        zip_write_str(&mut zip, "_rels/.rels", RELS_DOT_RELS, options)?;
        zip_write_str(&mut zip, "xl/workbook.xml", &self.workbook_xml(), options)?;
        zip_write_str(&mut zip, "xl/_rels/workbook.xml.rels", &self.workbook_rels_xml(), options)?;
        if let Some(strings) = &self.shared_strings {
            zip_write_str(&mut zip, "xl/sharedStrings.xml", &shared_strings_xml(strings), options)?;
        }
        if let Some(styles) = self.styles_xml() {
            zip_write_str(&mut zip, "xl/styles.xml", &styles, options)?;
        }
        for (i, (_, rows)) in self.sheets.iter().enumerate() {
            let path = format!("xl/worksheets/sheet{}.xml", i + 1);
            if self.missing_parts.contains(&path) {
                continue;
            }
            zip_write_str(&mut zip, &path, &sheet_xml(rows), options)?;
        }

        zip.finish()?;
        Ok(())
    }

    fn workbook_xml(&self) -> String {
        let mut sheets = String::new();
        for (i, (name, _)) in self.sheets.iter().enumerate() {
            let sheet_id = i + 1;
            let escaped_name = xml_escape(name);
            sheets.push_str(&format!(
                r#"<sheet name="{escaped_name}" sheetId="{sheet_id}" r:id="rId{sheet_id}"/>"#
            ));
        }
        let date1904 = if self.date1904 { r#" date1904="1""# } else { "" };

        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
                r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
                r#"<workbookPr{}/>"#,
                r#"<bookViews><workbookView activeTab="0"/></bookViews>"#,
                r#"<sheets>{}</sheets>"#,
                r#"</workbook>"#,
            ),
            date1904, sheets
        )
    }

    fn workbook_rels_xml(&self) -> String {
        let mut rels = String::new();
        for i in 1..=self.sheets.len() {
            rels.push_str(&format!(
                r#"<Relationship Id="rId{i}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{i}.xml"/>"#
            ));
        }
        let next = self.sheets.len() + 1;
        rels.push_str(&format!(
            r#"<Relationship Id="rId{next}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#
        ));

        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
                r#"{}"#,
                r#"</Relationships>"#,
            ),
            rels
        )
    }

    fn content_types_xml(&self) -> String {
        let mut overrides = String::new();
        for i in 1..=self.sheets.len() {
            overrides.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            ));
        }

        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
                r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
                r#"<Default Extension="xml" ContentType="application/xml"/>"#,
                r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
                r#"{}"#,
                r#"</Types>"#,
            ),
            overrides
        )
    }

    fn styles_xml(&self) -> Option<String> {
        let cell_formats = self.cell_formats.as_ref()?;
        let num_fmts: String = self
            .num_formats
            .iter()
            .map(|(id, code)| format!(r#"<numFmt numFmtId="{id}" formatCode="{}"/>"#, xml_escape(code)))
            .collect();
        let xfs: String = cell_formats
            .iter()
            .map(|id| format!(r#"<xf numFmtId="{id}" fontId="0" fillId="0" borderId="0" xfId="0"/>"#))
            .collect();

        Some(format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
                r#"<numFmts count="{}">{}</numFmts>"#,
                r#"<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>"#,
                r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#,
                r#"<cellXfs count="{}">{}</cellXfs>"#,
                r#"</styleSheet>"#,
            ),
            self.num_formats.len(),
            num_fmts,
            cell_formats.len(),
            xfs
        ))
    }
}

fn shared_strings_xml(strings: &[String]) -> String {
    let items: String = strings
        .iter()
        .map(|s| format!(r#"<si><t xml:space="preserve">{}</t></si>"#, xml_escape(s)))
        .collect();
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
            r#"{1}"#,
            r#"</sst>"#,
        ),
        strings.len(),
        items
    )
}

fn sheet_xml(rows: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
            r#"<sheetViews><sheetView workbookViewId="0"/></sheetViews>"#,
            r#"<sheetData>{}</sheetData>"#,
            r#"<pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/>"#,
            r#"</worksheet>"#,
        ),
        rows
    )
}

fn zip_write_str<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    path: &str,
    content: &str,
    options: SimpleFileOptions,
) -> ZipResult<()> {
    zip.start_file(path, options)?;
    zip.write_all(content.as_bytes())?;
    Ok(())
}
