#![forbid(unsafe_code)]

//! Query plan diagnostics.
//!
//! This module provides the plan tree handed over by the planner, the
//! expression formatting seam, and the printer that renders plans as text.

/// Structured errors raised while printing a plan.
pub mod errors;

/// Scalar expressions and the formatter used to display them.
///
/// The printer never inspects expressions; it only hands them to an
/// [`expr::ExpressionFormatter`].
pub mod expr;

/// Printer configuration.
pub mod options;

/// Plan operator tree.
///
/// Closed set of operator kinds with their children and output columns.
pub mod plan;

/// Indented text rendering of plan trees.
pub mod printer;

pub use errors::{PrintError, Result};
pub use expr::{Expression, ExpressionFormatter, FunctionCall, SqlFormatter};
pub use options::PrinterOptions;
pub use plan::{PlanNode, Slot, SortOrder};
pub use printer::{print, print_with_options, render_to_string, PlanPrinter};
