//! Read-only tables the decoder consults while resolving cells.

use crate::style::{NumberFormat, builtin_format_code};

/// Index → text, as held in `xl/sharedStrings.xml`.
pub trait SharedStringLookup {
    fn lookup(&self, index: usize) -> Option<&str>;
}

/// Style index → number format, as held in the `cellXfs` of `xl/styles.xml`.
pub trait StyleLookup {
    /// Format of the style at `index`. The pattern is only set when the
    /// workbook spells it out.
    fn style_at(&self, index: usize) -> Option<&NumberFormat>;

    fn builtin_pattern(&self, id: u32) -> Option<&str> {
        builtin_format_code(id)
    }
}

impl SharedStringLookup for [String] {
    fn lookup(&self, index: usize) -> Option<&str> {
        self.get(index).map(String::as_str)
    }
}

impl SharedStringLookup for Vec<String> {
    fn lookup(&self, index: usize) -> Option<&str> {
        self.as_slice().lookup(index)
    }
}

impl StyleLookup for [NumberFormat] {
    fn style_at(&self, index: usize) -> Option<&NumberFormat> {
        self.get(index)
    }
}

impl StyleLookup for Vec<NumberFormat> {
    fn style_at(&self, index: usize) -> Option<&NumberFormat> {
        self.as_slice().style_at(index)
    }
}
