use crate::{Result, reader::XlsxReader, sheet::DEFAULT_STOP_AT};

pub struct ReaderBuilder<T: Into<String>> {
    path: T,
    min_columns: usize,
    stop_at: Option<String>,
}

impl<T> ReaderBuilder<T>
where
    T: Into<String>,
{
    pub fn new(path: T, min_columns: usize) -> Self {
        Self {
            path,
            min_columns,
            stop_at: None,
        }
    }

    /// Stop reference for [`XlsxReader::read_sheet`].
    pub fn stop_at(mut self, reference: impl Into<String>) -> Self {
        self.stop_at = Some(reference.into());
        self
    }

    pub fn header_discovery(self) -> Self {
        self.stop_at(DEFAULT_STOP_AT)
    }

    pub fn build(self) -> Result<XlsxReader> {
        XlsxReader::open_with(self.path.into(), self.min_columns, self.stop_at)
    }
}
