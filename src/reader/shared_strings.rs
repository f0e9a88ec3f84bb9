use std::io::BufRead;

use quick_xml::events::Event;

use crate::{Result, sheet::lookup::SharedStringLookup, xml::xml_reader};

pub const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// The workbook's shared-string table, one entry per `<si>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedStrings {
    strings: Vec<String>,
}

impl SharedStrings {
    /// Reads `xl/sharedStrings.xml`. Rich-text runs are joined; phonetic
    /// runs (`<rPh>`) are left out.
    pub fn parse<R: BufRead>(source: R) -> Result<Self> {
        let mut xml = xml_reader(source);
        let mut strings = Vec::new();
        let mut current = String::new();
        let (mut in_t, mut in_phonetic) = (false, false);
        let mut buf = Vec::new();

        loop {
            match xml.read_event_into(&mut buf)? {
                Event::Start(ref e) => match e.local_name().as_ref() {
                    b"si" => current.clear(),
                    b"t" => in_t = true,
                    b"rPh" => in_phonetic = true,
                    _ => {}
                },
                Event::Empty(ref e) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
                Event::End(ref e) => match e.local_name().as_ref() {
                    b"si" => strings.push(std::mem::take(&mut current)),
                    b"t" => in_t = false,
                    b"rPh" => in_phonetic = false,
                    _ => {}
                },
                Event::Text(ref e) if in_t && !in_phonetic => current.push_str(&e.unescape()?),
                Event::CData(ref e) if in_t && !in_phonetic => current.push_str(&String::from_utf8_lossy(e)),
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(SharedStrings { strings })
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl SharedStringLookup for SharedStrings {
    fn lookup(&self, index: usize) -> Option<&str> {
        self.get(index)
    }
}

impl From<Vec<String>> for SharedStrings {
    fn from(strings: Vec<String>) -> Self {
        SharedStrings { strings }
    }
}
