//! Plan Printer renders query execution plan trees as indented text for
//! diagnostics and debugging.
//!
//! The [`query`] module holds the plan node model, the expression formatter
//! seam, and the [`query::PlanPrinter`] that walks a plan in pre-order.
//! [`cli`] loads serialized plans for the `plan-print` binary.

#![warn(missing_docs)]

pub mod cli;
pub mod query;

pub use query::{print, render_to_string, PlanNode, PlanPrinter, PrintError, PrinterOptions};
