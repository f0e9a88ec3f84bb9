//! Turns the captured text of one cell into its final string.
//!
//! Text-like values (errors, formula results, inline and shared strings) come
//! back wrapped in double quotes so a delimited rendering of the row can tell
//! them from bare numbers.

use crate::{
    error::CellIssue,
    sheet::{
        cell::{CellFormat, CellType},
        lookup::SharedStringLookup,
    },
    style::{date, number},
};

pub fn quoted(text: &str) -> String {
    format!("\"{text}\"")
}

pub fn resolve_value<S>(
    cell_type: CellType,
    format: Option<&CellFormat>,
    raw: &str,
    strings: &S,
    date1904: bool,
) -> Result<String, CellIssue>
where
    S: SharedStringLookup + ?Sized,
{
    match cell_type {
        CellType::Bool => Ok(if raw.starts_with('0') { "FALSE" } else { "TRUE" }.to_owned()),
        CellType::Error => Ok(quoted(&format!("ERROR:{raw}"))),
        CellType::Formula | CellType::InlineString => Ok(quoted(raw)),
        CellType::SharedString => {
            let index = raw
                .trim()
                .parse::<usize>()
                .map_err(|_| CellIssue::SharedStringIndexInvalid(raw.to_owned()))?;
            strings
                .lookup(index)
                .map(quoted)
                .ok_or(CellIssue::SharedStringOutOfRange(index))
        }
        CellType::Number => resolve_number(format, raw, date1904),
    }
}

fn resolve_number(format: Option<&CellFormat>, raw: &str, date1904: bool) -> Result<String, CellIssue> {
    let Some(format) = format else {
        return Ok(raw.to_owned());
    };
    if format.is_date() {
        let serial = parse_literal(raw)?;
        return date::format_serial(serial, date1904)
            .ok_or_else(|| CellIssue::DateOutOfRange(raw.to_owned()));
    }
    match &format.pattern {
        Some(pattern) => Ok(number::format_number(parse_literal(raw)?, pattern)),
        None => Ok(raw.to_owned()),
    }
}

fn parse_literal(raw: &str) -> Result<f64, CellIssue> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| CellIssue::NumericLiteralInvalid(raw.to_owned()))
}
