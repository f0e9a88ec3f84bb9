//! Streaming decode of one worksheet part into rows.
//!
//! The walk keeps a single row record and the cell currently open; every
//! accepted row is appended to the result in document order. With a stop
//! reference configured, the walk ends as soon as a cell with that reference
//! starts, and everything accepted before it is returned.

pub mod cell;
pub mod column;
pub mod lookup;
pub mod row;
pub mod value;

use std::io::BufRead;

use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};

use crate::{
    Result,
    error::{CellDiagnostic, XlsxError},
    sheet::{
        cell::{PendingCell, classify},
        column::{cell_reference, reference_column},
        lookup::{SharedStringLookup, StyleLookup},
        row::{Row, RowAssembler},
        value::resolve_value,
    },
    xml::{attr_val, xml_reader},
};

/// Stop reference used for header discovery: the header row plus 200 data rows.
pub const DEFAULT_STOP_AT: &str = "A202";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Width of every row; cells must fall in columns `0..min_columns`.
    pub min_columns: usize,
    /// Cell reference at which the walk stops early.
    pub stop_at: Option<String>,
    /// Serial dates count from 1904-01-01.
    pub date1904: bool,
}

impl DecodeOptions {
    pub fn new(min_columns: usize) -> Self {
        DecodeOptions {
            min_columns,
            stop_at: None,
            date1904: false,
        }
    }

    pub fn stop_at(mut self, reference: impl Into<String>) -> Self {
        self.stop_at = Some(reference.into());
        self
    }

    /// Stops at [`DEFAULT_STOP_AT`].
    pub fn header_discovery(self) -> Self {
        self.stop_at(DEFAULT_STOP_AT)
    }

    pub fn date1904(mut self, date1904: bool) -> Self {
        self.date1904 = date1904;
        self
    }
}

/// Rows accepted by a decode, with the cells that could not be resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedSheet {
    pub rows: Vec<Row>,
    pub diagnostics: Vec<CellDiagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// The whole sheet was read.
    Completed(DecodedSheet),
    /// The stop reference was reached; rows from before its row are kept.
    StoppedEarly(DecodedSheet),
}

impl DecodeOutcome {
    pub fn sheet(&self) -> &DecodedSheet {
        match self {
            DecodeOutcome::Completed(sheet) | DecodeOutcome::StoppedEarly(sheet) => sheet,
        }
    }

    pub fn into_sheet(self) -> DecodedSheet {
        match self {
            DecodeOutcome::Completed(sheet) | DecodeOutcome::StoppedEarly(sheet) => sheet,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.sheet().rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.into_sheet().rows
    }

    pub fn diagnostics(&self) -> &[CellDiagnostic] {
        &self.sheet().diagnostics
    }

    pub fn stopped_early(&self) -> bool {
        matches!(self, DecodeOutcome::StoppedEarly(_))
    }
}

/// Decodes one worksheet part.
///
/// `source` is owned for the duration of the walk and dropped as soon as the
/// walk ends, early stop included. Malformed markup, malformed cell references,
/// unparsable style indexes and cells outside `options.min_columns` abort the
/// decode; cells whose value cannot be resolved are left unset and reported in
/// [`DecodedSheet::diagnostics`].
pub fn decode_sheet<R, T, S>(
    source: R,
    styles: &T,
    strings: &S,
    options: &DecodeOptions,
) -> Result<DecodeOutcome>
where
    R: BufRead,
    T: StyleLookup + ?Sized,
    S: SharedStringLookup + ?Sized,
{
    let mut xml = xml_reader(source);
    let mut decoder = SheetDecoder::new(styles, strings, options);
    let mut buf = Vec::with_capacity(1024);

    loop {
        buf.clear();
        let flow = match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => decoder.start(e)?,
            Event::Empty(ref e) => match decoder.start(e)? {
                Flow::Continue => decoder.end(e.local_name().as_ref())?,
                stop => stop,
            },
            Event::Text(ref e) => {
                decoder.text(&e.unescape()?);
                Flow::Continue
            }
            Event::CData(e) => {
                decoder.text(&String::from_utf8_lossy(&e));
                Flow::Continue
            }
            Event::End(ref e) => decoder.end(e.local_name().as_ref())?,
            Event::Eof => Flow::Finished,
            _ => Flow::Continue,
        };

        match flow {
            Flow::Continue => {}
            Flow::Finished => return Ok(DecodeOutcome::Completed(decoder.finish())),
            Flow::StopReached(reference) => {
                drop(xml);
                debug!("reached stop reference {reference}, sheet stream closed");
                return Ok(DecodeOutcome::StoppedEarly(decoder.finish()));
            }
        }
    }
}

enum Flow {
    Continue,
    Finished,
    StopReached(String),
}

struct SheetDecoder<'a, T: ?Sized, S: ?Sized> {
    styles: &'a T,
    strings: &'a S,
    options: &'a DecodeOptions,
    rows: RowAssembler,
    row_number: u32,
    cell: Option<PendingCell>,
    value: String,
    in_v: bool,
    in_is: bool,
    in_t: bool,
    in_phonetic: bool,
    diagnostics: Vec<CellDiagnostic>,
}

impl<'a, T, S> SheetDecoder<'a, T, S>
where
    T: StyleLookup + ?Sized,
    S: SharedStringLookup + ?Sized,
{
    fn new(styles: &'a T, strings: &'a S, options: &'a DecodeOptions) -> Self {
        SheetDecoder {
            styles,
            strings,
            options,
            rows: RowAssembler::new(options.min_columns),
            row_number: 0,
            cell: None,
            value: String::new(),
            in_v: false,
            in_is: false,
            in_t: false,
            in_phonetic: false,
            diagnostics: Vec::new(),
        }
    }

    fn start(&mut self, e: &BytesStart<'_>) -> Result<Flow> {
        match e.local_name().as_ref() {
            b"row" => self.start_row(e)?,
            b"c" => return self.start_cell(e),
            b"v" => {
                self.in_v = true;
                self.value.clear();
            }
            b"is" => {
                self.in_is = true;
                self.value.clear();
            }
            b"t" => self.in_t = true,
            b"rPh" => self.in_phonetic = true,
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn start_row(&mut self, e: &BytesStart<'_>) -> Result<()> {
        let mut number = None;
        for attr in e.attributes() {
            let attr = attr?;
            if attr.key.local_name().as_ref() == b"r" {
                number = attr_val(&attr)?.trim().parse::<u32>().ok();
            }
        }
        self.row_number = number.unwrap_or(self.row_number.saturating_add(1));
        Ok(())
    }

    fn start_cell(&mut self, e: &BytesStart<'_>) -> Result<Flow> {
        let mut reference = None;
        let mut type_attr = None;
        let mut style_attr = None;
        for attr in e.attributes() {
            let attr = attr?;
            match attr.key.local_name().as_ref() {
                b"r" => reference = Some(attr_val(&attr)?),
                b"t" => type_attr = Some(attr_val(&attr)?),
                b"s" => style_attr = Some(attr_val(&attr)?),
                _ => {}
            }
        }

        if let (Some(stop_at), Some(reference)) = (&self.options.stop_at, &reference) {
            if stop_at == reference {
                return Ok(Flow::StopReached(reference.clone()));
            }
        }

        self.value.clear();
        self.cell = None;

        let (reference, column) = match reference {
            Some(reference) => {
                let column = reference_column(&reference)?;
                (reference, column)
            }
            None => {
                let column = self.rows.next_column();
                (cell_reference(column, self.row_number), column)
            }
        };
        self.rows.note_column(column);

        let (cell_type, format) = classify(type_attr.as_deref(), style_attr.as_deref(), self.styles)?;
        self.cell = Some(PendingCell {
            reference,
            column,
            cell_type,
            format,
        });
        Ok(Flow::Continue)
    }

    fn text(&mut self, text: &str) {
        if self.in_v || (self.in_is && self.in_t && !self.in_phonetic) {
            self.value.push_str(text);
        }
    }

    fn end(&mut self, name: &[u8]) -> Result<Flow> {
        match name {
            b"v" => {
                self.in_v = false;
                self.resolve_cell()?;
            }
            b"is" => {
                self.in_is = false;
                self.resolve_cell()?;
            }
            b"t" => self.in_t = false,
            b"rPh" => self.in_phonetic = false,
            b"c" => self.cell = None,
            b"row" => self.rows.finish_row(),
            b"sheetData" => return Ok(Flow::Finished),
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn resolve_cell(&mut self) -> Result<()> {
        let Some(cell) = &self.cell else {
            warn!("value element outside of a cell in row {}, ignored", self.row_number);
            return Ok(());
        };
        let value = match resolve_value(
            cell.cell_type,
            cell.format.as_ref(),
            &self.value,
            self.strings,
            self.options.date1904,
        ) {
            Ok(value) => Some(value),
            Err(issue) => {
                warn!("{}: {issue}", cell.reference);
                self.diagnostics.push(CellDiagnostic {
                    reference: cell.reference.clone(),
                    issue,
                });
                None
            }
        };
        self.rows.store(&cell.reference, cell.column, value)
    }

    fn finish(self) -> DecodedSheet {
        DecodedSheet {
            rows: self.rows.into_rows(),
            diagnostics: self.diagnostics,
        }
    }
}
