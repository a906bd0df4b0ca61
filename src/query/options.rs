/// Default number of spaces per indent level.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Options controlling how plans are laid out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrinterOptions {
    /// Spaces emitted per indent level.
    pub indent_width: usize,
}

impl PrinterOptions {
    /// Returns options with the given indent width.
    pub fn with_indent_width(mut self, indent_width: usize) -> Self {
        self.indent_width = indent_width;
        self
    }

    pub(crate) fn prefix_len(&self, indent: usize) -> usize {
        indent * self.indent_width
    }
}

impl Default for PrinterOptions {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }
}
