use quick_xml::events::attributes::AttrError;
use thiserror::Error;
use zip::result::ZipError;

/// Errors that abort a package read or a sheet decode.
///
/// Problems confined to a single cell never surface here; they are reported as
/// [`CellIssue`] diagnostics next to the decoded rows.
#[derive(Debug, Error)]
pub enum XlsxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] ZipError),

    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("xml attribute error: {0}")]
    XmlAttr(#[from] AttrError),

    #[error("sheet '{0}' not found")]
    SheetNotFound(String),

    #[error("package part '{0}' not found")]
    PartNotFound(String),

    /// A cell reference with no row digits or no column letters.
    #[error("malformed cell reference '{0}'")]
    MalformedReference(String),

    /// A cell addressed a column the configured row width cannot hold.
    #[error("cell '{reference}' is in column {column}, but rows are {width} columns wide")]
    ColumnOutOfRange {
        reference: String,
        column: usize,
        width: usize,
    },

    #[error("style index '{0}' is not an integer")]
    InvalidStyleIndex(String),
}

/// A cell whose value could not be resolved. The cell is left unset and the
/// decode carries on with the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellIssue {
    #[error("failed to parse shared string index '{0}'")]
    SharedStringIndexInvalid(String),

    #[error("shared string index {0} is out of range")]
    SharedStringOutOfRange(usize),

    #[error("failed to parse numeric literal '{0}'")]
    NumericLiteralInvalid(String),

    #[error("serial {0} is not a valid date")]
    DateOutOfRange(String),
}

/// A [`CellIssue`] tied to the cell it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellDiagnostic {
    pub reference: String,
    pub issue: CellIssue,
}

impl std::fmt::Display for CellDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.reference, self.issue)
    }
}
