use std::{collections::HashMap, io::BufRead};

use quick_xml::events::{BytesStart, Event};

use crate::{
    Result,
    sheet::lookup::StyleLookup,
    style::NumberFormat,
    xml::{attr_val, xml_reader},
};

pub const STYLES_PART: &str = "xl/styles.xml";

/// Number formats of the cell styles in `xl/styles.xml`, indexed like the
/// `s` attribute of a cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StylesTable {
    formats: Vec<NumberFormat>,
}

impl StylesTable {
    /// Reads `<numFmts>` and `<cellXfs>`; fonts, fills, borders and the
    /// named-style records are skipped.
    pub fn parse<R: BufRead>(source: R) -> Result<Self> {
        let mut xml = xml_reader(source);
        let mut custom: HashMap<u32, String> = HashMap::new();
        let mut xf_ids: Vec<u32> = Vec::new();
        let mut in_cell_xfs = false;
        let mut buf = Vec::new();

        loop {
            match xml.read_event_into(&mut buf)? {
                Event::Start(ref e) if e.local_name().as_ref() == b"cellXfs" => in_cell_xfs = true,
                Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                    b"numFmt" => {
                        if let (Some(id), Some(code)) = num_fmt(e)? {
                            custom.insert(id, code);
                        }
                    }
                    b"xf" if in_cell_xfs => xf_ids.push(num_fmt_id(e)?.unwrap_or(0)),
                    _ => {}
                },
                Event::End(ref e) if e.local_name().as_ref() == b"cellXfs" => in_cell_xfs = false,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        let formats = xf_ids
            .into_iter()
            .map(|id| NumberFormat::new(id, custom.get(&id).cloned()))
            .collect();
        Ok(StylesTable { formats })
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl StyleLookup for StylesTable {
    fn style_at(&self, index: usize) -> Option<&NumberFormat> {
        self.formats.get(index)
    }
}

impl From<Vec<NumberFormat>> for StylesTable {
    fn from(formats: Vec<NumberFormat>) -> Self {
        StylesTable { formats }
    }
}

fn num_fmt_id(e: &BytesStart<'_>) -> Result<Option<u32>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == b"numFmtId" {
            return Ok(attr_val(&attr)?.trim().parse().ok());
        }
    }
    Ok(None)
}

fn num_fmt(e: &BytesStart<'_>) -> Result<(Option<u32>, Option<String>)> {
    let (mut id, mut code) = (None, None);
    for attr in e.attributes() {
        let attr = attr?;
        match attr.key.local_name().as_ref() {
            b"numFmtId" => id = attr_val(&attr)?.trim().parse().ok(),
            b"formatCode" => code = Some(attr_val(&attr)?),
            _ => {}
        }
    }
    Ok((id, code))
}
