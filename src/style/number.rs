//! Renders a number through a format pattern.
//!
//! Covers what shows up in real worksheets: section selection, `General`,
//! digit placeholders, grouping, scaling commas, percent, scientific and
//! engineering notation, fractions and literal text.

/// Largest magnitude `General` prints in positional notation.
const GENERAL_MAX_POSITIONAL: f64 = 1e11;
const GENERAL_MIN_POSITIONAL: f64 = 1e-9;
const GENERAL_SIGNIFICANT_DIGITS: i32 = 10;

pub fn format_number(value: f64, pattern: &str) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let sections = split_sections(pattern);
    let (section, auto_sign) = match sections.as_slice() {
        [] => ("General", true),
        [only] => (*only, true),
        [positive, negative, rest @ ..] => {
            if value < 0.0 {
                (*negative, false)
            } else if value == 0.0 {
                (rest.first().copied().unwrap_or(*positive), false)
            } else {
                (*positive, false)
            }
        }
    };

    // An empty section in a multi-section pattern hides the value.
    if sections.len() > 1 && section.is_empty() {
        return String::new();
    }

    let body = render_section(value.abs(), section);
    if auto_sign && value < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{body}")
    } else {
        body
    }
}

/// Excel's `General`: integers as integers, everything else rounded to ten
/// significant digits, very large or very small magnitudes in scientific
/// notation.
pub fn format_general(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    let magnitude = value.abs();
    if magnitude >= GENERAL_MAX_POSITIONAL || magnitude < GENERAL_MIN_POSITIONAL {
        let body = render_scientific(magnitude, &parse_scientific("0.#####E+00"));
        return if value < 0.0 { format!("-{body}") } else { body };
    }
    if value.fract() == 0.0 {
        return format!("{value:.0}");
    }
    // `magnitude` is within the positional range checked above, so the
    // exponent is a small integer.
    let int_digits = magnitude.log10().floor() as i32 + 1;
    let decimals = usize::try_from(GENERAL_SIGNIFICANT_DIGITS - int_digits).unwrap_or(0);
    let mut s = format!("{:.*}", decimals, value);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

fn render_section(value: f64, section: &str) -> String {
    let trimmed = section.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("general") {
        return format_general(value);
    }

    if let Some((start, end, fraction)) = fraction_span(section) {
        return format!(
            "{}{}{}",
            render_literal(&section[..start]),
            render_fraction(value, &fraction),
            render_literal(&section[end..])
        );
    }

    let Some((start, end)) = placeholder_span(section) else {
        // Text-only sections: "@" shows the number itself, anything else is a literal.
        return if section.contains('@') {
            format_general(value)
        } else {
            render_literal(section)
        };
    };

    let prefix = &section[..start];
    let number = &section[start..end];
    let suffix = &section[end..];

    let mut scaled = value;
    for _ in 0..count_outside_literals(section, '%') {
        scaled *= 100.0;
    }

    let digits = if number.contains(['E', 'e']) {
        render_scientific(scaled, &parse_scientific(number))
    } else {
        render_fixed(scaled, &parse_fixed(number))
    };

    format!("{}{digits}{}", render_literal(prefix), render_literal(suffix))
}

/// Walks `pattern` and reports, for every char outside quotes, escapes,
/// padding/fill operands and brackets, its byte offset.
fn visible_chars(pattern: &str) -> Vec<(usize, char)> {
    let mut out = Vec::new();
    let mut chars = pattern.char_indices();
    let mut in_quotes = false;
    while let Some((idx, ch)) = chars.next() {
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
            '[' => {
                for (_, c) in chars.by_ref() {
                    if c == ']' {
                        break;
                    }
                }
            }
            _ => out.push((idx, ch)),
        }
    }
    out
}

fn split_sections(pattern: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut start = 0;
    for (idx, ch) in visible_chars(pattern) {
        if ch == ';' {
            sections.push(&pattern[start..idx]);
            start = idx + 1;
        }
    }
    sections.push(&pattern[start..]);
    sections
}

fn count_outside_literals(pattern: &str, needle: char) -> usize {
    visible_chars(pattern)
        .into_iter()
        .filter(|(_, c)| *c == needle)
        .count()
}

/// Byte range covering the digit placeholders, including the separators and
/// exponent between them and any trailing scaling commas.
fn placeholder_span(section: &str) -> Option<(usize, usize)> {
    let visible = visible_chars(section);
    let first = visible
        .iter()
        .position(|(_, c)| matches!(c, '0' | '#' | '?'))?;
    let mut last = first;
    for (pos, (_, c)) in visible.iter().enumerate().skip(first) {
        match c {
            '0' | '#' | '?' => last = pos,
            '.' | ',' | 'E' | 'e' | '+' | '-' => {}
            _ => break,
        }
    }
    // Scaling commas directly after the last placeholder belong to the number.
    while visible
        .get(last + 1)
        .is_some_and(|(idx, c)| *c == ',' && *idx == visible[last].0 + 1)
    {
        last += 1;
    }
    // A decimal point right before the first placeholder (`.00`) is part of
    // the number.
    let start = match first.checked_sub(1).map(|pos| visible[pos]) {
        Some((idx, '.')) if idx + 1 == visible[first].0 => idx,
        _ => visible[first].0,
    };
    let (end_idx, end_ch) = visible[last];
    Some((start, end_idx + end_ch.len_utf8()))
}

fn render_literal(segment: &str) -> String {
    let mut out = String::new();
    let mut chars = segment.chars();
    let mut in_quotes = false;
    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                in_quotes = false;
            } else {
                out.push(ch);
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            '\\' => out.extend(chars.next()),
            '_' => {
                chars.next();
                out.push(' ');
            }
            '*' => {
                chars.next();
            }
            '[' => {
                let token: String = chars.by_ref().take_while(|c| *c != ']').collect();
                if let Some(currency) = token.strip_prefix('$') {
                    out.push_str(currency.split('-').next().unwrap_or_default());
                }
            }
            '@' => {}
            _ => out.push(ch),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
struct FixedSpec {
    min_int: usize,
    int_placeholders: usize,
    min_frac: usize,
    max_frac: usize,
    grouping: bool,
    scale_commas: usize,
    has_decimal_point: bool,
}

fn parse_fixed(number: &str) -> FixedSpec {
    let mut raw = number;
    let mut scale_commas = 0;
    while let Some(rest) = raw.strip_suffix(',') {
        raw = rest;
        scale_commas += 1;
    }
    let (int_pat, frac_pat, has_decimal_point) = match raw.split_once('.') {
        Some((int_pat, frac_pat)) => (int_pat, frac_pat, true),
        None => (raw, "", false),
    };
    let is_placeholder = |c: &char| matches!(c, '0' | '#' | '?');
    FixedSpec {
        min_int: int_pat.chars().filter(|c| *c == '0').count(),
        int_placeholders: int_pat.chars().filter(is_placeholder).count(),
        min_frac: frac_pat.chars().filter(|c| *c == '0').count(),
        max_frac: frac_pat.chars().filter(is_placeholder).count(),
        grouping: int_pat.contains(','),
        scale_commas,
        has_decimal_point,
    }
}

fn render_fixed(value: f64, spec: &FixedSpec) -> String {
    let mut value = value;
    for _ in 0..spec.scale_commas {
        value /= 1000.0;
    }
    let rendered = format!("{:.*}", spec.max_frac, round_half_away(value, spec.max_frac));
    let (int_digits, frac_digits) = rendered
        .split_once('.')
        .unwrap_or((rendered.as_str(), ""));

    let mut int_part = if spec.min_int == 0 && int_digits == "0" {
        String::new()
    } else {
        int_digits.to_owned()
    };
    while int_part.len() < spec.min_int {
        int_part.insert(0, '0');
    }
    if spec.grouping {
        int_part = group_thousands(&int_part);
    }

    let mut frac_part = frac_digits.to_owned();
    while frac_part.len() > spec.min_frac && frac_part.ends_with('0') {
        frac_part.pop();
    }

    let mut out = int_part;
    if spec.has_decimal_point && (spec.max_frac == 0 || !frac_part.is_empty()) {
        out.push('.');
    }
    out.push_str(&frac_part);
    out
}

fn round_half_away(value: f64, decimals: usize) -> f64 {
    let factor = 10_f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX));
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() { rounded } else { value }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let len = digits.len();
    for (i, ch) in digits.chars().enumerate() {
        out.push(ch);
        let remaining = len - i - 1;
        if remaining > 0 && remaining % 3 == 0 {
            out.push(',');
        }
    }
    out
}

/// Largest denominator tried for `?/???`-style patterns.
const MAX_DENOMINATOR_DIGITS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Denominator {
    /// `?/??`: best approximation with up to this many digits.
    Digits(usize),
    /// `?/8`
    Fixed(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FractionSpec {
    whole: bool,
    denominator: Denominator,
}

/// Byte range of a fraction (`# ?/?`, `?/8`) in `section`, with its layout.
fn fraction_span(section: &str) -> Option<(usize, usize, FractionSpec)> {
    let visible = visible_chars(section);
    let is_placeholder = |c: char| matches!(c, '0' | '#' | '?');
    let slash = visible.iter().position(|(_, c)| *c == '/')?;

    let mut numerator_start = slash;
    while numerator_start > 0 && is_placeholder(visible[numerator_start - 1].1) {
        numerator_start -= 1;
    }
    if numerator_start == slash {
        return None;
    }

    let mut denominator_end = slash + 1;
    while visible
        .get(denominator_end)
        .is_some_and(|(_, c)| is_placeholder(*c) || c.is_ascii_digit())
    {
        denominator_end += 1;
    }
    if denominator_end == slash + 1 {
        return None;
    }
    let denominator: String = visible[slash + 1..denominator_end].iter().map(|(_, c)| *c).collect();
    let denominator = match denominator.parse::<u64>() {
        Ok(fixed) if fixed > 0 && !denominator.contains(is_placeholder) => Denominator::Fixed(fixed),
        _ => Denominator::Digits(denominator.len().min(MAX_DENOMINATOR_DIGITS)),
    };

    // Whole-number placeholders sit before the numerator, separated by spaces.
    let mut start = numerator_start;
    let mut gap = numerator_start;
    while gap > 0 && visible[gap - 1].1 == ' ' {
        gap -= 1;
    }
    let whole = gap < numerator_start && gap > 0 && is_placeholder(visible[gap - 1].1);
    if whole {
        start = gap - 1;
        while start > 0 && matches!(visible[start - 1].1, '0' | '#' | '?' | ',') {
            start -= 1;
        }
    }

    let (end_idx, end_ch) = visible[denominator_end - 1];
    Some((
        visible[start].0,
        end_idx + end_ch.len_utf8(),
        FractionSpec { whole, denominator },
    ))
}

/// Renders `value` as `whole numerator/denominator`, leaving out a zero whole
/// part and a zero fraction.
fn render_fraction(value: f64, spec: &FractionSpec) -> String {
    let (mut whole, part) = if spec.whole {
        (value.trunc(), value.fract())
    } else {
        (0.0, value)
    };
    let (mut numerator, denominator) = approximate(part, spec.denominator);
    if spec.whole && numerator == denominator {
        whole += 1.0;
        numerator = 0;
    }

    match (whole == 0.0, numerator == 0) {
        (_, true) => format!("{whole:.0}"),
        (true, false) => format!("{numerator}/{denominator}"),
        (false, false) => format!("{whole:.0} {numerator}/{denominator}"),
    }
}

/// Closest `numerator/denominator` to `value`; ties go to the smaller
/// denominator.
fn approximate(value: f64, denominator: Denominator) -> (u64, u64) {
    // Fraction values are non-negative and bounded by the caller's magnitude;
    // the casts saturate rather than wrap.
    match denominator {
        Denominator::Fixed(d) => ((value * d as f64).round() as u64, d),
        Denominator::Digits(digits) => {
            let max = 10_u64.pow(u32::try_from(digits).unwrap_or(1)) - 1;
            let mut best = (value.round() as u64, 1);
            let mut best_error = (value - best.0 as f64).abs();
            for d in 2..=max {
                let n = (value * d as f64).round() as u64;
                let error = (value - n as f64 / d as f64).abs();
                if error < best_error {
                    best = (n, d);
                    best_error = error;
                }
            }
            best
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ScientificSpec {
    mantissa: FixedSpec,
    exp_digits: usize,
    always_sign: bool,
}

fn parse_scientific(number: &str) -> ScientificSpec {
    let (mantissa, exponent) = number
        .split_once(['E', 'e'])
        .unwrap_or((number, "+00"));
    let always_sign = exponent.starts_with('+');
    let exp_digits = exponent
        .chars()
        .filter(|c| matches!(c, '0' | '#' | '?'))
        .count()
        .max(1);
    ScientificSpec {
        mantissa: parse_fixed(mantissa),
        exp_digits,
        always_sign,
    }
}

fn render_scientific(value: f64, spec: &ScientificSpec) -> String {
    // `##0.0E+0` keeps the exponent a multiple of the integer placeholders.
    let step = match spec.mantissa.int_placeholders {
        n if n > 1 && n > spec.mantissa.min_int => i32::try_from(n).unwrap_or(1),
        _ => 1,
    };
    let (mut mantissa, mut exponent) = if value == 0.0 {
        (0.0, 0)
    } else {
        // log10 of a finite positive f64 is within ±400, safely an i32.
        let exponent = (value.log10().floor() as i32).div_euclid(step) * step;
        (value / 10_f64.powi(exponent), exponent)
    };
    mantissa = round_half_away(mantissa, spec.mantissa.max_frac);
    if mantissa >= 10_f64.powi(step) {
        mantissa /= 10_f64.powi(step);
        exponent += step;
    }

    let sign = if exponent < 0 {
        "-"
    } else if spec.always_sign {
        "+"
    } else {
        ""
    };
    format!(
        "{}E{sign}{:0width$}",
        render_fixed(mantissa, &spec.mantissa),
        exponent.unsigned_abs(),
        width = spec.exp_digits
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general() {
        assert_eq!(format_number(44197.0, "General"), "44197");
        assert_eq!(format_number(0.1, "General"), "0.1");
        assert_eq!(format_number(-2.5, "General"), "-2.5");
        assert_eq!(format_number(0.0, "General"), "0");
        assert_eq!(format_general(123_456_789_012.0), "1.23457E+11");
        assert_eq!(format_general(3.14159265358979), "3.141592654");
        assert_eq!(format_general(1234.56789012345), "1234.56789");
        assert_eq!(format_general(0.000123456789012), "0.000123456789");
    }

    #[test]
    fn fixed_and_grouping() {
        assert_eq!(format_number(1234.5, "#,##0.00"), "1,234.50");
        assert_eq!(format_number(1234.5, "#,##0"), "1,235");
        assert_eq!(format_number(2.5, "0"), "3");
        assert_eq!(format_number(0.5, "#.00"), ".50");
        assert_eq!(format_number(7.0, "000"), "007");
        assert_eq!(format_number(1_234_567.891, "#,##0.0"), "1,234,567.9");
        assert_eq!(format_number(-3.25, "0.0"), "-3.3");
    }

    #[test]
    fn percent() {
        assert_eq!(format_number(0.25, "0%"), "25%");
        assert_eq!(format_number(0.123, "0.00%"), "12.30%");
    }

    #[test]
    fn scientific() {
        assert_eq!(format_number(12345.0, "0.00E+00"), "1.23E+04");
        assert_eq!(format_number(0.000123, "0.00E+00"), "1.23E-04");
        assert_eq!(format_number(0.0, "0.00E+00"), "0.00E+00");
    }

    #[test]
    fn literals_and_sections() {
        assert_eq!(format_number(1234.5, "\"$\"#,##0.00_);(\"$\"#,##0.00)"), "$1,234.50 ");
        assert_eq!(format_number(-1234.5, "\"$\"#,##0.00_);(\"$\"#,##0.00)"), "($1,234.50)");
        assert_eq!(format_number(0.0, "0;-0;\"zero\""), "zero");
        assert_eq!(format_number(5.0, "[$€-407]#,##0.00"), "€5.00");
        assert_eq!(format_number(0.5, "[Red]0.0"), "0.5");
        assert_eq!(format_number(12.0, "0\\ \"kg\""), "12 kg");
    }

    #[test]
    fn scaling_commas() {
        assert_eq!(format_number(12345.0, "#,##0,\"K\""), "12K");
        assert_eq!(format_number(12_345_678.0, "0.0,,\"M\""), "12.3M");
    }

    #[test]
    fn empty_sections_hide_the_value() {
        assert_eq!(format_number(0.0, "0;-0;"), "");
        assert_eq!(format_number(3.0, "0;-0;"), "3");
        assert_eq!(format_number(5.0, ";;;"), "");
        assert_eq!(format_number(-5.0, ";;;"), "");
        assert_eq!(format_number(5.0, ""), "5");
    }

    #[test]
    fn leading_decimal_point() {
        assert_eq!(format_number(12.5, ".00"), "12.50");
        assert_eq!(format_number(0.5, ".00"), ".50");
        assert_eq!(format_number(0.125, ".0%"), "12.5%");
    }

    #[test]
    fn fractions() {
        assert_eq!(format_number(1.5, "# ?/?"), "1 1/2");
        assert_eq!(format_number(2.25, "# ??/??"), "2 1/4");
        assert_eq!(format_number(0.75, "# ?/?"), "3/4");
        assert_eq!(format_number(3.0, "# ?/?"), "3");
        assert_eq!(format_number(0.0, "# ?/?"), "0");
        assert_eq!(format_number(1.99, "# ?/?"), "2");
        assert_eq!(format_number(-1.5, "# ?/?"), "-1 1/2");
        assert_eq!(format_number(1.5, "?/?"), "3/2");
        assert_eq!(format_number(0.3, "# ?/8"), "2/8");
        assert_eq!(format_number(3.14159, "# ???/???"), "3 16/113");
    }

    #[test]
    fn engineering_notation() {
        assert_eq!(format_number(12345.0, "##0.0E+0"), "12.3E+3");
        assert_eq!(format_number(123.0, "##0.0E+0"), "123.0E+0");
        assert_eq!(format_number(0.00123, "##0.0E+0"), "1.2E-3");
    }

    #[test]
    fn text_section() {
        assert_eq!(format_number(42.0, "@"), "42");
    }
}
