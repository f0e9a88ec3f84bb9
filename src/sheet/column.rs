//! Column letters and cell references (`A`, `AB`, `AB12`).

use crate::{Result, error::XlsxError};

const ALPHABET_LEN: usize = 26;

/// Zero-based index of a column label: `A` is 0, `Z` is 25, `AA` is 26.
///
/// Bijective base 26; lowercase letters are accepted.
pub fn column_index(letters: &str) -> Result<usize> {
    if letters.is_empty() {
        return Err(XlsxError::MalformedReference(letters.to_owned()));
    }
    let mut index: Option<usize> = None;
    for b in letters.bytes() {
        if !b.is_ascii_alphabetic() {
            return Err(XlsxError::MalformedReference(letters.to_owned()));
        }
        let letter = usize::from(b.to_ascii_uppercase() - b'A');
        index = index
            .map_or(Some(0), |i| i.checked_add(1))
            .and_then(|i| i.checked_mul(ALPHABET_LEN))
            .and_then(|i| i.checked_add(letter));
        if index.is_none() {
            return Err(XlsxError::MalformedReference(letters.to_owned()));
        }
    }
    index.ok_or_else(|| XlsxError::MalformedReference(letters.to_owned()))
}

/// Splits `AB12` into `("AB", 12)` at the first digit.
pub fn split_reference(reference: &str) -> Result<(&str, u32)> {
    let malformed = || XlsxError::MalformedReference(reference.to_owned());
    let first_digit = reference
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(malformed)?;
    let (letters, row) = reference.split_at(first_digit);
    if letters.is_empty() {
        return Err(malformed());
    }
    let row = row.parse::<u32>().map_err(|_| malformed())?;
    Ok((letters, row))
}

/// Zero-based column of a cell reference.
pub fn reference_column(reference: &str) -> Result<usize> {
    let (letters, _) = split_reference(reference)?;
    column_index(letters)
}

/// Inverse of [`column_index`].
pub fn column_name(mut column: usize) -> String {
    let mut letters = Vec::new();
    loop {
        // `column % 26` is below 26, the cast cannot truncate.
        letters.push(b'A' + (column % ALPHABET_LEN) as u8);
        if column < ALPHABET_LEN {
            break;
        }
        column = column / ALPHABET_LEN - 1;
    }
    letters.iter().rev().map(|&b| char::from(b)).collect()
}

pub fn cell_reference(column: usize, row: u32) -> String {
    format!("{}{row}", column_name(column))
}
