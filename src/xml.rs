use std::io::BufRead;

use quick_xml::{Reader as XmlReader, events::attributes::Attribute};

use crate::Result;

/// Reader for a package part. Text is kept as written: leading and trailing
/// spaces are part of cell values.
pub(crate) fn xml_reader<R: BufRead>(source: R) -> XmlReader<R> {
    let mut xml = XmlReader::from_reader(source);
    xml.config_mut().trim_text(false);
    xml
}

#[inline]
pub(crate) fn attr_val(attr: &Attribute<'_>) -> Result<String> {
    Ok(attr.unescape_value()?.into_owned())
}
