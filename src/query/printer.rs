//! Indented text rendering of plan trees.
//!
//! Each node produces a header line at its own indent followed by detail
//! lines two levels deeper. Children follow at one level deeper, in stored
//! order, so the output is a pre-order, left-to-right listing of the tree.

use std::fmt;
use std::io::{self, Write};

use tracing::{debug, error};

use crate::query::errors::{PrintError, PrintErrorWithCode, Result};
use crate::query::expr::{ExpressionFormatter, SqlFormatter};
use crate::query::options::PrinterOptions;
use crate::query::plan::{PlanNode, Slot, SortOrder};

/// Prints `root` to standard output using the default options.
pub fn print(root: &PlanNode) -> Result<()> {
    print_with_options(root, PrinterOptions::default())
}

/// Prints `root` to standard output.
pub fn print_with_options(root: &PlanNode, options: PrinterOptions) -> Result<()> {
    let stdout = io::stdout();
    PlanPrinter::new(stdout.lock()).with_options(options).print(root)
}

/// Renders `root` into a string.
pub fn render_to_string(root: &PlanNode, options: PrinterOptions) -> Result<String> {
    let mut buf = Vec::new();
    PlanPrinter::new(&mut buf).with_options(options).print(root)?;
    String::from_utf8(buf).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err).into())
}

/// Writes plan trees to an output sink.
///
/// The printer keeps no traversal state between calls; the indent level
/// travels with each pending node. Concurrent use of one sink needs
/// external synchronization.
pub struct PlanPrinter<W, F = SqlFormatter> {
    out: W,
    formatter: F,
    options: PrinterOptions,
}

impl<W: Write> PlanPrinter<W, SqlFormatter> {
    /// Creates a printer using [`SqlFormatter`] for expressions.
    pub fn new(out: W) -> Self {
        Self::with_formatter(out, SqlFormatter)
    }
}

impl<W: Write, F: ExpressionFormatter> PlanPrinter<W, F> {
    /// Creates a printer with a caller-supplied expression formatter.
    pub fn with_formatter(out: W, formatter: F) -> Self {
        Self {
            out,
            formatter,
            options: PrinterOptions::default(),
        }
    }

    /// Replaces the layout options.
    pub fn with_options(mut self, options: PrinterOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Prints the tree rooted at `root`.
    ///
    /// Stops at the first node without a rendering rule or the first failed
    /// write. Lines written before the failure stay in the sink.
    pub fn print(&mut self, root: &PlanNode) -> Result<()> {
        debug!(root = root.kind(), "printing plan");
        let mut visited = 0usize;
        for (node, indent) in PreOrder::new(root) {
            if let Err(err) = self.render_node(node, indent) {
                if let PrintError::UnsupportedNodeKind { kind } = &err {
                    error!(kind = *kind, indent, "{}", PrintErrorWithCode(&err));
                }
                return Err(err);
            }
            visited += 1;
        }
        self.out.flush()?;
        debug!(root = root.kind(), nodes = visited, "plan printed");
        Ok(())
    }

    fn render_node(&mut self, node: &PlanNode, indent: usize) -> Result<()> {
        let detail = indent + 2;
        match node {
            PlanNode::Limit(n) => {
                self.line(indent, format_args!("- Limit => [{}]", Outputs(&n.outputs)))?;
                self.line(detail, format_args!("count = {}", n.count))?;
            }
            PlanNode::Aggregation(n) => {
                self.line(indent, format_args!("- Aggregate => [{}]", Outputs(&n.outputs)))?;
                if !n.group_by.is_empty() {
                    self.line(detail, format_args!("key = {}", Names(&n.group_by)))?;
                }
                for (slot, call) in &n.aggregations {
                    let call = self.formatter.format_call(call);
                    self.line(detail, format_args!("{slot} := {call}"))?;
                }
            }
            PlanNode::TableScan(n) => {
                self.line(
                    indent,
                    format_args!(
                        "- TableScan[{}.{}.{}] => [{}]",
                        n.catalog,
                        n.schema,
                        n.table,
                        Outputs(&n.outputs)
                    ),
                )?;
                for (attribute, slot) in &n.attributes {
                    self.line(detail, format_args!("{attribute} := {slot}"))?;
                }
            }
            PlanNode::Filter(n) => {
                self.line(indent, format_args!("- Filter => [{}]", Outputs(&n.outputs)))?;
                let predicate = self.formatter.format_expression(&n.predicate);
                self.line(detail, format_args!("predicate = {predicate}"))?;
            }
            PlanNode::Project(n) => {
                self.line(indent, format_args!("- Project => [{}]", Outputs(&n.outputs)))?;
                for (slot, expr) in &n.assignments {
                    let expr = self.formatter.format_expression(expr);
                    self.line(detail, format_args!("{slot} := {expr}"))?;
                }
            }
            PlanNode::Output(n) => {
                self.line(indent, format_args!("- Output[{}]", n.columns.join(", ")))?;
                for column in &n.columns {
                    match n.assignment(column) {
                        Some(slot) => self.line(detail, format_args!("{column} := {slot}"))?,
                        None => self.line(detail, format_args!("{column} := null"))?,
                    }
                }
            }
            PlanNode::TopN(n) => {
                self.line(indent, format_args!("- TopN => [{}]", Outputs(&n.outputs)))?;
                self.line(detail, format_args!("key = [{}]", Names(&n.order_by)))?;
                self.line(detail, format_args!("order = {{{}}}", Orderings(&n.orderings)))?;
                self.line(detail, format_args!("count = {}", n.count))?;
            }
            PlanNode::Join(_) | PlanNode::Sort(_) => {
                return Err(PrintError::UnsupportedNodeKind { kind: node.kind() });
            }
        }
        Ok(())
    }

    /// Writes one line at `indent`. Templates without arguments are copied
    /// verbatim.
    fn line(&mut self, indent: usize, args: fmt::Arguments<'_>) -> Result<()> {
        let width = self.options.prefix_len(indent);
        write!(self.out, "{:width$}", "")?;
        match args.as_str() {
            Some(literal) => self.out.write_all(literal.as_bytes())?,
            None => self.out.write_fmt(args)?,
        }
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

/// Pre-order, left-to-right walk yielding each node with its depth.
///
/// Pending nodes live on an explicit stack, so depth is bounded by memory
/// rather than by the call stack. Children are pushed in reverse so the
/// first source pops first.
struct PreOrder<'a> {
    pending: Vec<(&'a PlanNode, usize)>,
}

impl<'a> PreOrder<'a> {
    fn new(root: &'a PlanNode) -> Self {
        Self {
            pending: vec![(root, 0)],
        }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (&'a PlanNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, indent) = self.pending.pop()?;
        self.pending
            .extend(node.sources().into_iter().rev().map(|child| (child, indent + 1)));
        Some((node, indent))
    }
}

/// `name:type` pairs joined by `, `.
struct Outputs<'a>(&'a [Slot]);

impl fmt::Display for Outputs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, slot) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", slot.typed())?;
        }
        Ok(())
    }
}

/// Slot names joined by `, `.
struct Names<'a>(&'a [Slot]);

impl fmt::Display for Names<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, slot) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{slot}")?;
        }
        Ok(())
    }
}

/// `slot=ORDER` pairs joined by `, `.
struct Orderings<'a>(&'a [(Slot, SortOrder)]);

impl fmt::Display for Orderings<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (slot, order)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{slot}={order}")?;
        }
        Ok(())
    }
}
