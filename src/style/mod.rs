//! Number formats as seen through the style table: built-in format codes,
//! date-format detection, serial dates and pattern rendering.

pub mod date;
pub mod number;

/// The number format attached to a cell style.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NumberFormat {
    /// `numFmtId` of the style.
    pub id: u32,
    /// Format pattern, e.g. `#,##0.00` or `yyyy-mm-dd`.
    pub pattern: Option<String>,
}

impl NumberFormat {
    pub fn new(id: u32, pattern: Option<String>) -> Self {
        Self { id, pattern }
    }

    /// A built-in format, with its pattern filled in from the built-in table.
    pub fn builtin(id: u32) -> Self {
        Self {
            id,
            pattern: builtin_format_code(id).map(str::to_owned),
        }
    }

    pub fn is_date(&self) -> bool {
        is_date_format(self.id, self.pattern.as_deref())
    }
}

/// Pattern of a built-in number format id. Ids 23–36 are locale-reserved and
/// have no fixed pattern.
pub fn builtin_format_code(id: u32) -> Option<&'static str> {
    let code = match id {
        0 => "General",
        1 => "0",
        2 => "0.00",
        3 => "#,##0",
        4 => "#,##0.00",
        5 => "\"$\"#,##0_);(\"$\"#,##0)",
        6 => "\"$\"#,##0_);[Red](\"$\"#,##0)",
        7 => "\"$\"#,##0.00_);(\"$\"#,##0.00)",
        8 => "\"$\"#,##0.00_);[Red](\"$\"#,##0.00)",
        9 => "0%",
        10 => "0.00%",
        11 => "0.00E+00",
        12 => "# ?/?",
        13 => "# ??/??",
        14 => "m/d/yy",
        15 => "d-mmm-yy",
        16 => "d-mmm",
        17 => "mmm-yy",
        18 => "h:mm AM/PM",
        19 => "h:mm:ss AM/PM",
        20 => "h:mm",
        21 => "h:mm:ss",
        22 => "m/d/yy h:mm",
        37 => "#,##0_);(#,##0)",
        38 => "#,##0_);[Red](#,##0)",
        39 => "#,##0.00_);(#,##0.00)",
        40 => "#,##0.00_);[Red](#,##0.00)",
        41 => "_(* #,##0_);_(* (#,##0);_(* \"-\"_);_(@_)",
        42 => "_(\"$\"* #,##0_);_(\"$\"* (#,##0);_(\"$\"* \"-\"_);_(@_)",
        43 => "_(* #,##0.00_);_(* (#,##0.00);_(* \"-\"??_);_(@_)",
        44 => "_(\"$\"* #,##0.00_);_(\"$\"* (#,##0.00);_(\"$\"* \"-\"??_);_(@_)",
        45 => "mm:ss",
        46 => "[h]:mm:ss",
        47 => "mm:ss.0",
        48 => "##0.0E+0",
        49 => "@",
        _ => return None,
    };
    Some(code)
}

/// Built-in ids that always hold a date or time, whatever the pattern says.
pub fn is_internal_date_format(id: u32) -> bool {
    matches!(id, 14..=22 | 45..=47)
}

/// Decides whether a number carrying this format is a serial date.
///
/// Internal date ids win outright. Otherwise the first section of the pattern
/// is scanned for date or time tokens outside quoted literals, escapes and
/// bracket tokens. Elapsed-time patterns such as `[h]:mm` count as durations,
/// not dates.
pub fn is_date_format(id: u32, pattern: Option<&str>) -> bool {
    if is_internal_date_format(id) {
        return true;
    }
    pattern.is_some_and(is_date_pattern)
}

fn is_date_pattern(pattern: &str) -> bool {
    let mut chars = pattern.chars().peekable();
    let mut in_quotes = false;
    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                in_quotes = false;
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            '\\' | '_' | '*' => {
                chars.next();
            }
            ';' => return false,
            '[' => {
                let token: String = chars.by_ref().take_while(|c| *c != ']').collect();
                let elapsed = !token.is_empty()
                    && token
                        .chars()
                        .all(|c| matches!(c.to_ascii_lowercase(), 'h' | 'm' | 's'));
                if elapsed {
                    return false;
                }
            }
            'y' | 'Y' | 'm' | 'M' | 'd' | 'D' | 'h' | 'H' | 's' | 'S' => return true,
            'a' | 'A' => {
                let rest: String = chars.clone().take(4).collect();
                let rest = rest.to_ascii_uppercase();
                if rest.starts_with("M/PM") || rest.starts_with("/P") {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}
