//! The zip container and the two parts that say where the sheets are:
//! `xl/workbook.xml` and `xl/_rels/workbook.xml.rels`.

use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::debug;
use quick_xml::events::Event;
use zip::{ZipArchive, result::ZipError};

use crate::{
    Result,
    error::XlsxError,
    xml::{attr_val, xml_reader},
};

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const PART_BUFFER: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
struct SheetEntry {
    name: String,
    /// Zip path of the worksheet part, e.g. `xl/worksheets/sheet1.xml`.
    path: String,
}

pub struct Package {
    archive: ZipArchive<File>,
    sheets: Vec<SheetEntry>,
    date1904: bool,
}

impl Package {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file)?;

        let workbook = {
            let entry = archive
                .by_name(WORKBOOK_PART)
                .map_err(|e| part_error(WORKBOOK_PART, e))?;
            parse_workbook(BufReader::new(entry))?
        };
        let rels = {
            let entry = archive
                .by_name(WORKBOOK_RELS_PART)
                .map_err(|e| part_error(WORKBOOK_RELS_PART, e))?;
            parse_workbook_rels(BufReader::new(entry))?
        };

        let sheets = workbook
            .sheets
            .into_iter()
            .filter_map(|(name, rid)| match rels.get(&rid) {
                Some(path) => Some(SheetEntry {
                    name,
                    path: path.clone(),
                }),
                None => {
                    debug!("sheet '{name}' has no worksheet relationship '{rid}', skipped");
                    None
                }
            })
            .collect();

        Ok(Package {
            archive,
            sheets,
            date1904: workbook.date1904,
        })
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn date1904(&self) -> bool {
        self.date1904
    }

    /// Buffered stream over the worksheet part of `name`. Dropping it closes
    /// the entry.
    pub fn sheet_stream(&mut self, name: &str) -> Result<impl BufRead + '_> {
        let path = self
            .sheets
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.path.clone())
            .ok_or_else(|| XlsxError::SheetNotFound(name.to_owned()))?;
        debug!("reading sheet '{name}' from {path}");
        let entry = self.archive.by_name(&path).map_err(|e| part_error(&path, e))?;
        Ok(BufReader::with_capacity(PART_BUFFER, entry))
    }

    /// Stream over an optional part; `None` when the package lacks it.
    pub fn part(&mut self, path: &str) -> Result<Option<impl BufRead + '_>> {
        match self.archive.by_name(path) {
            Ok(entry) => Ok(Some(BufReader::with_capacity(PART_BUFFER, entry))),
            Err(ZipError::FileNotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn part_error(path: &str, e: ZipError) -> XlsxError {
    match e {
        ZipError::FileNotFound => XlsxError::PartNotFound(path.to_owned()),
        e => XlsxError::Zip(e),
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct WorkbookInfo {
    /// `(name, relationship id)` in document order.
    pub(crate) sheets: Vec<(String, String)>,
    pub(crate) date1904: bool,
}

pub(crate) fn parse_workbook<R: BufRead>(source: R) -> Result<WorkbookInfo> {
    let mut xml = xml_reader(source);
    let mut info = WorkbookInfo::default();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Empty(ref e) | Event::Start(ref e) => match e.local_name().as_ref() {
                b"sheet" => {
                    let (mut name, mut rid) = (String::new(), String::new());
                    for attr in e.attributes() {
                        let attr = attr?;
                        match attr.key.local_name().as_ref() {
                            b"name" => name = attr_val(&attr)?,
                            b"id" => rid = attr_val(&attr)?,
                            _ => {}
                        }
                    }
                    if !name.is_empty() && !rid.is_empty() {
                        info.sheets.push((name, rid));
                    }
                }
                b"workbookPr" => {
                    for attr in e.attributes() {
                        let attr = attr?;
                        if attr.key.local_name().as_ref() == b"date1904" {
                            info.date1904 = matches!(attr_val(&attr)?.as_str(), "1" | "true");
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(info)
}

/// Relationship id → worksheet part path.
pub(crate) fn parse_workbook_rels<R: BufRead>(source: R) -> Result<HashMap<String, String>> {
    let mut xml = xml_reader(source);
    let mut map = HashMap::new();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Empty(ref e) | Event::Start(ref e) if e.local_name().as_ref() == b"Relationship" => {
                let (mut id, mut target, mut is_sheet) = (String::new(), String::new(), false);
                for attr in e.attributes() {
                    let attr = attr?;
                    match attr.key.local_name().as_ref() {
                        b"Id" => id = attr_val(&attr)?,
                        b"Target" => target = attr_val(&attr)?,
                        b"Type" => is_sheet = attr_val(&attr)?.ends_with("/worksheet"),
                        _ => {}
                    }
                }
                if is_sheet && !id.is_empty() {
                    map.insert(id, normalize_path(&target));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(map)
}

/// Relationship targets are relative to `xl/` unless they start at the root.
fn normalize_path(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_owned();
    }
    let relative = target.trim_start_matches("./");
    if relative.starts_with("xl/") {
        relative.to_owned()
    } else {
        format!("xl/{relative}")
    }
}
