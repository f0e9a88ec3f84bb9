//! Streaming decoder for the worksheet part of an `.xlsx` package.
//!
//! [`sheet::decode_sheet`] walks one worksheet's XML and assembles fixed-width
//! rows of resolved cell text, one row in memory at a time. [`reader::XlsxReader`]
//! wraps it with package access, the shared-string table and the style table.

pub mod error;
pub mod reader;
pub mod sheet;
pub mod style;

pub(crate) mod xml;

pub use error::{CellDiagnostic, CellIssue, XlsxError};
pub use reader::{ReaderBuilder, XlsxReader};
pub use sheet::{DecodeOptions, DecodeOutcome, DecodedSheet, decode_sheet, row::Row};

pub(crate) type Result<T> = std::result::Result<T, error::XlsxError>;
