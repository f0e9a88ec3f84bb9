use log::warn;

use crate::{
    Result,
    error::XlsxError,
    sheet::lookup::StyleLookup,
    style::NumberFormat,
};

/// How the text inside a cell's value element is to be read. Taken from the
/// cell's `t` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellType {
    /// `t="b"`: `0` or `1`
    Bool,
    /// `t="e"`: error literal such as `#DIV/0!`
    Error,
    /// `t="str"`: cached string result of a formula
    Formula,
    /// `t="inlineStr"`: text in an `<is>` element
    InlineString,
    /// `t="s"`: index into the shared-string table
    SharedString,
    /// no `t`, or one we do not know: a number, possibly styled as a date
    #[default]
    Number,
}

impl CellType {
    pub fn from_type_attr(t: Option<&str>) -> Self {
        match t {
            Some("b") => CellType::Bool,
            Some("e") => CellType::Error,
            Some("inlineStr") => CellType::InlineString,
            Some("s") => CellType::SharedString,
            Some("str") => CellType::Formula,
            _ => CellType::Number,
        }
    }
}

/// Number format of a styled numeric cell, pattern already resolved.
pub type CellFormat = NumberFormat;

/// The cell whose element is currently open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCell {
    /// Reference as written in the sheet (or synthesised when `r` is missing).
    pub reference: String,
    pub column: usize,
    pub cell_type: CellType,
    pub format: Option<CellFormat>,
}

/// Decides how the value of a `<c>` element will be read.
///
/// Only numeric cells consult the style: a `s` attribute is looked up in the
/// style table, and a format without an explicit pattern gets its built-in
/// one. An `s` that is not an integer is an error; one that points past the
/// table is logged and treated as unstyled.
pub fn classify<T>(
    type_attr: Option<&str>,
    style_attr: Option<&str>,
    styles: &T,
) -> Result<(CellType, Option<CellFormat>)>
where
    T: StyleLookup + ?Sized,
{
    let cell_type = CellType::from_type_attr(type_attr);
    if cell_type != CellType::Number {
        return Ok((cell_type, None));
    }
    let Some(style) = style_attr else {
        return Ok((cell_type, None));
    };

    let index = style
        .trim()
        .parse::<usize>()
        .map_err(|_| XlsxError::InvalidStyleIndex(style.to_owned()))?;
    let Some(number_format) = styles.style_at(index) else {
        warn!("style index {index} is not in the style table, reading cell as a plain number");
        return Ok((cell_type, None));
    };

    let pattern = match &number_format.pattern {
        Some(pattern) => Some(pattern.clone()),
        None => styles.builtin_pattern(number_format.id).map(str::to_owned),
    };
    Ok((cell_type, Some(CellFormat::new(number_format.id, pattern))))
}
