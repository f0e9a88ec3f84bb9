//! Sheet-by-name reads over an `.xlsx` file.
//!
//! [`XlsxReader`] opens the package once, loads the shared-string and style
//! tables, and then decodes worksheets on request, each through its own
//! stream over the zip entry.

pub mod builder;
pub mod package;
pub mod records;
pub mod shared_strings;
pub mod styles;

use std::{collections::HashMap, io::Write};

use log::warn;

pub use builder::ReaderBuilder;
pub use package::Package;
pub use shared_strings::SharedStrings;
pub use styles::StylesTable;

use crate::{
    Result,
    reader::{
        records::{header_columns, header_from_row, rows_to_maps},
        shared_strings::SHARED_STRINGS_PART,
        styles::STYLES_PART,
    },
    sheet::{DecodeOptions, DecodeOutcome, decode_sheet, row::Row},
};

pub struct XlsxReader {
    path: String,
    package: Package,
    shared_strings: SharedStrings,
    styles: StylesTable,
    options: DecodeOptions,
}

impl XlsxReader {
    /// Opens `path`, reading whole sheets into rows `min_columns` wide.
    pub fn open(path: &str, min_columns: usize) -> Result<Self> {
        Self::open_with(path.to_owned(), min_columns, None)
    }

    pub(crate) fn open_with(path: String, min_columns: usize, stop_at: Option<String>) -> Result<Self> {
        let mut package = Package::open(&path)?;

        let shared_strings = match package.part(SHARED_STRINGS_PART)? {
            Some(part) => SharedStrings::parse(part)?,
            None => SharedStrings::default(),
        };
        let styles = match package.part(STYLES_PART)? {
            Some(part) => StylesTable::parse(part)?,
            None => StylesTable::default(),
        };

        let mut options = DecodeOptions::new(min_columns).date1904(package.date1904());
        options.stop_at = stop_at;

        Ok(XlsxReader {
            path,
            package,
            shared_strings,
            styles,
            options,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.package.sheet_names()
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    pub fn shared_strings(&self) -> &SharedStrings {
        &self.shared_strings
    }

    pub fn styles(&self) -> &StylesTable {
        &self.styles
    }

    /// Decodes `name` with the options the reader was built with.
    pub fn read_sheet(&mut self, name: &str) -> Result<DecodeOutcome> {
        let options = self.options.clone();
        self.read_sheet_with(name, &options)
    }

    pub fn read_sheet_with(&mut self, name: &str, options: &DecodeOptions) -> Result<DecodeOutcome> {
        let stream = self.package.sheet_stream(name)?;
        decode_sheet(stream, &self.styles, &self.shared_strings, options)
    }

    /// Every accepted row of `name`, header included.
    pub fn sheet_rows(&mut self, name: &str) -> Result<Vec<Row>> {
        let options = self.whole_sheet();
        Ok(self.read_sheet_with(name, &options)?.into_rows())
    }

    /// Rows after the header, up to the header-discovery stop reference.
    pub fn sheet_body(&mut self, name: &str) -> Result<Vec<Row>> {
        let options = self.whole_sheet().header_discovery();
        let mut rows = self.read_sheet_with(name, &options)?.into_rows();
        if !rows.is_empty() {
            rows.remove(0);
        }
        Ok(rows)
    }

    /// Titles of the first accepted row of `name`, read `width` columns wide.
    /// A sheet with no rows has an empty header.
    pub fn sheet_header(&mut self, name: &str, width: usize) -> Result<Vec<String>> {
        let options = DecodeOptions::new(width)
            .header_discovery()
            .date1904(self.options.date1904);
        let rows = self.read_sheet_with(name, &options)?.into_rows();
        Ok(rows.first().map(header_from_row).unwrap_or_default())
    }

    /// Names of the sheets that hold at least one row when read `width`
    /// columns wide. Sheets that fail to decode are logged and left out.
    pub fn sheets_with_rows(&mut self, width: usize) -> Vec<String> {
        let options = DecodeOptions::new(width)
            .header_discovery()
            .date1904(self.options.date1904);
        let names: Vec<String> = self.sheet_names().into_iter().map(str::to_owned).collect();

        names
            .into_iter()
            .filter(|name| match self.read_sheet_with(name, &options) {
                Ok(outcome) => !outcome.rows().is_empty(),
                Err(e) => {
                    warn!("skipping sheet '{name}': {e}");
                    false
                }
            })
            .collect()
    }

    /// Rows of `name` after the first, keyed by the titles of the first.
    pub fn sheet_maps(&mut self, name: &str) -> Result<Vec<HashMap<String, Option<String>>>> {
        let rows = self.sheet_rows(name)?;
        let Some((header, body)) = rows.split_first() else {
            return Ok(Vec::new());
        };
        Ok(rows_to_maps(&header_columns(header), body))
    }

    /// Writes every accepted row of `name` as one comma-joined line and
    /// returns the number of lines.
    pub fn sheet_to_csv<W: Write>(&mut self, name: &str, out: &mut W) -> Result<usize> {
        let mut count = 0;
        for row in self.sheet_rows(name)? {
            writeln!(out, "{}", row.to_csv_line())?;
            count += 1;
        }
        Ok(count)
    }

    fn whole_sheet(&self) -> DecodeOptions {
        DecodeOptions {
            stop_at: None,
            ..self.options.clone()
        }
    }
}
