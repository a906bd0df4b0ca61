//! Scalar expressions attached to plan nodes and the formatter that turns
//! them into display strings.

use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};

/// Scalar expression tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    /// Reference to a named column.
    Reference(String),
    /// Constant value.
    Literal(Literal),
    /// Binary comparison.
    Comparison {
        /// Comparison operator.
        op: ComparisonOp,
        /// Left operand.
        left: Box<Expression>,
        /// Right operand.
        right: Box<Expression>,
    },
    /// Binary arithmetic.
    Arithmetic {
        /// Arithmetic operator.
        op: ArithmeticOp,
        /// Left operand.
        left: Box<Expression>,
        /// Right operand.
        right: Box<Expression>,
    },
    /// Logical AND over all terms.
    And(Vec<Expression>),
    /// Logical OR over all terms.
    Or(Vec<Expression>),
    /// Logical NOT.
    Not(Box<Expression>),
    /// Function invocation.
    FunctionCall(FunctionCall),
}

impl Expression {
    /// Builds a column reference.
    pub fn reference(name: impl Into<String>) -> Self {
        Expression::Reference(name.into())
    }

    /// Builds an integer literal.
    pub fn int(value: i64) -> Self {
        Expression::Literal(Literal::Int(value))
    }

    /// Builds a string literal.
    pub fn string(value: impl Into<String>) -> Self {
        Expression::Literal(Literal::String(value.into()))
    }

    /// Builds a comparison between two expressions.
    pub fn compare(op: ComparisonOp, left: Expression, right: Expression) -> Self {
        Expression::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Builds an arithmetic expression.
    pub fn arithmetic(op: ArithmeticOp, left: Expression, right: Expression) -> Self {
        Expression::Arithmetic {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn is_compound(&self) -> bool {
        matches!(
            self,
            Expression::Comparison { .. }
                | Expression::Arithmetic { .. }
                | Expression::And(_)
                | Expression::Or(_)
        )
    }
}

/// Literal constant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point number.
    Float(f64),
    /// String value.
    String(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Bool(v) => write!(f, "{v}"),
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Float(v) => write!(f, "{v:?}"),
            Literal::String(v) => write!(f, "'{}'", v.replace('\'', "''")),
        }
    }
}

/// Comparison operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOp {
    /// `=`
    Eq,
    /// `<>`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl ComparisonOp {
    fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "<>",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
        }
    }
}

/// Arithmetic operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithmeticOp {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Modulus,
}

impl ArithmeticOp {
    fn symbol(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Subtract => "-",
            ArithmeticOp::Multiply => "*",
            ArithmeticOp::Divide => "/",
            ArithmeticOp::Modulus => "%",
        }
    }
}

/// Function invocation, used for scalar calls and aggregates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Function name.
    pub name: String,
    /// Call arguments in order.
    #[serde(default)]
    pub arguments: Vec<Expression>,
    /// Whether the call is `DISTINCT` (aggregates only).
    #[serde(default)]
    pub distinct: bool,
}

impl FunctionCall {
    /// Creates a non-distinct call.
    pub fn new(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Self {
            name: name.into(),
            arguments,
            distinct: false,
        }
    }

    /// Marks the call as `DISTINCT`.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }
}

/// Converts expressions to display strings.
///
/// The printer inserts the returned text verbatim into detail lines.
pub trait ExpressionFormatter {
    /// Formats a scalar expression.
    fn format_expression(&self, expr: &Expression) -> String;

    /// Formats a function call such as an aggregate.
    fn format_call(&self, call: &FunctionCall) -> String;
}

/// SQL-flavoured expression formatter.
#[derive(Clone, Copy, Debug, Default)]
pub struct SqlFormatter;

impl SqlFormatter {
    fn write_expr(&self, out: &mut String, expr: &Expression) -> fmt::Result {
        match expr {
            Expression::Reference(name) => out.write_str(name),
            Expression::Literal(lit) => write!(out, "{lit}"),
            Expression::Comparison { op, left, right } => {
                self.write_operand(out, left)?;
                write!(out, " {} ", op.symbol())?;
                self.write_operand(out, right)
            }
            Expression::Arithmetic { op, left, right } => {
                self.write_operand(out, left)?;
                write!(out, " {} ", op.symbol())?;
                self.write_operand(out, right)
            }
            Expression::And(terms) => self.write_terms(out, terms, " AND "),
            Expression::Or(terms) => self.write_terms(out, terms, " OR "),
            Expression::Not(inner) => {
                out.write_str("NOT ")?;
                self.write_operand(out, inner)
            }
            Expression::FunctionCall(call) => self.write_call(out, call),
        }
    }

    fn write_operand(&self, out: &mut String, expr: &Expression) -> fmt::Result {
        if expr.is_compound() {
            out.write_char('(')?;
            self.write_expr(out, expr)?;
            out.write_char(')')
        } else {
            self.write_expr(out, expr)
        }
    }

    fn write_terms(&self, out: &mut String, terms: &[Expression], sep: &str) -> fmt::Result {
        for (i, term) in terms.iter().enumerate() {
            if i > 0 {
                out.write_str(sep)?;
            }
            self.write_operand(out, term)?;
        }
        Ok(())
    }

    fn write_call(&self, out: &mut String, call: &FunctionCall) -> fmt::Result {
        write!(out, "{}(", call.name)?;
        if call.distinct {
            out.write_str("DISTINCT ")?;
        }
        if call.arguments.is_empty() {
            out.write_char('*')?;
        }
        for (i, arg) in call.arguments.iter().enumerate() {
            if i > 0 {
                out.write_str(", ")?;
            }
            self.write_expr(out, arg)?;
        }
        out.write_char(')')
    }
}

impl ExpressionFormatter for SqlFormatter {
    fn format_expression(&self, expr: &Expression) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_expr(&mut out, expr);
        out
    }

    fn format_call(&self, call: &FunctionCall) -> String {
        let mut out = String::new();
        let _ = self.write_call(&mut out, call);
        out
    }
}
