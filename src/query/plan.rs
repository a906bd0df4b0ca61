//! Plan operator tree handed to the printer by the planner.
//!
//! Nodes are immutable once built. Each node records its output columns
//! explicitly; the constructors below derive them from the node's sources
//! the same way the planner does.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::query::expr::{Expression, FunctionCall};

/// Named, typed output column.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    /// Column name, unique within the producing node.
    pub name: String,
    /// Type name.
    #[serde(rename = "type")]
    pub ty: String,
}

impl Slot {
    /// Creates a slot.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }

    /// Returns the `name:type` form used in output lists.
    pub fn typed(&self) -> TypedSlot<'_> {
        TypedSlot(self)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Displays a slot as `name:type`.
pub struct TypedSlot<'a>(&'a Slot);

impl fmt::Display for TypedSlot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.0.name, self.0.ty)
    }
}

/// Sort direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Ascending order.
    Ascending,
    /// Descending order.
    Descending,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => f.write_str("ASCENDING"),
            SortOrder::Descending => f.write_str("DESCENDING"),
        }
    }
}

/// Operator in a query execution plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PlanNode {
    /// Caps the number of rows.
    Limit(LimitNode),
    /// Groups rows and evaluates aggregate calls.
    Aggregation(AggregationNode),
    /// Reads a table.
    TableScan(TableScanNode),
    /// Keeps rows satisfying a predicate.
    Filter(FilterNode),
    /// Computes output columns from expressions.
    Project(ProjectNode),
    /// Names the columns returned to the client.
    Output(OutputNode),
    /// Keeps the first rows under an ordering.
    TopN(TopNNode),
    /// Equi-join of two inputs.
    Join(JoinNode),
    /// Full sort of the input.
    Sort(SortNode),
}

/// `Limit` operator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LimitNode {
    /// Input operator.
    pub source: Box<PlanNode>,
    /// Maximum rows produced.
    pub count: u64,
    /// Output columns.
    pub outputs: Vec<Slot>,
}

/// `Aggregation` operator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AggregationNode {
    /// Input operator.
    pub source: Box<PlanNode>,
    /// Grouping columns, possibly empty for a global aggregate.
    pub group_by: Vec<Slot>,
    /// Aggregate calls keyed by the slot they produce, in insertion order.
    pub aggregations: Vec<(Slot, FunctionCall)>,
    /// Output columns.
    pub outputs: Vec<Slot>,
}

/// `TableScan` operator. Always a leaf.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableScanNode {
    /// Catalog name.
    pub catalog: String,
    /// Schema name.
    pub schema: String,
    /// Table name.
    pub table: String,
    /// Table attribute names bound to the slots they populate.
    pub attributes: Vec<(String, Slot)>,
    /// Output columns.
    pub outputs: Vec<Slot>,
}

/// `Filter` operator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterNode {
    /// Input operator.
    pub source: Box<PlanNode>,
    /// Row predicate.
    pub predicate: Expression,
    /// Output columns.
    pub outputs: Vec<Slot>,
}

/// `Project` operator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectNode {
    /// Input operator.
    pub source: Box<PlanNode>,
    /// Expressions keyed by the slot they produce, in insertion order.
    pub assignments: Vec<(Slot, Expression)>,
    /// Output columns.
    pub outputs: Vec<Slot>,
}

/// `Output` operator at the root of a query plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputNode {
    /// Input operator.
    pub source: Box<PlanNode>,
    /// Client-visible column names, in order.
    pub columns: Vec<String>,
    /// Column name to the slot supplying it.
    pub assignments: Vec<(String, Slot)>,
    /// Output columns.
    pub outputs: Vec<Slot>,
}

impl OutputNode {
    /// Looks up the slot assigned to a column name.
    pub fn assignment(&self, column: &str) -> Option<&Slot> {
        self.assignments
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, slot)| slot)
    }
}

/// `TopN` operator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopNNode {
    /// Input operator.
    pub source: Box<PlanNode>,
    /// Rows kept.
    pub count: u64,
    /// Sort key columns, most significant first.
    pub order_by: Vec<Slot>,
    /// Direction per sort key column.
    pub orderings: Vec<(Slot, SortOrder)>,
    /// Output columns.
    pub outputs: Vec<Slot>,
}

/// `Join` operator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JoinNode {
    /// Left input.
    pub left: Box<PlanNode>,
    /// Right input.
    pub right: Box<PlanNode>,
    /// Equi-join criteria as `(left, right)` slot pairs.
    pub criteria: Vec<(Slot, Slot)>,
    /// Output columns.
    pub outputs: Vec<Slot>,
}

/// `Sort` operator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SortNode {
    /// Input operator.
    pub source: Box<PlanNode>,
    /// Sort key columns, most significant first.
    pub order_by: Vec<Slot>,
    /// Direction per sort key column.
    pub orderings: Vec<(Slot, SortOrder)>,
    /// Output columns.
    pub outputs: Vec<Slot>,
}

impl PlanNode {
    /// Builds a table scan whose outputs are the attribute slots.
    pub fn table_scan(
        catalog: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
        attributes: Vec<(String, Slot)>,
    ) -> Self {
        let outputs = attributes.iter().map(|(_, slot)| slot.clone()).collect();
        PlanNode::TableScan(TableScanNode {
            catalog: catalog.into(),
            schema: schema.into(),
            table: table.into(),
            attributes,
            outputs,
        })
    }

    /// Builds a filter over `source`.
    pub fn filter(source: PlanNode, predicate: Expression) -> Self {
        let outputs = source.outputs().to_vec();
        PlanNode::Filter(FilterNode {
            source: Box::new(source),
            predicate,
            outputs,
        })
    }

    /// Builds a limit over `source`.
    pub fn limit(source: PlanNode, count: u64) -> Self {
        let outputs = source.outputs().to_vec();
        PlanNode::Limit(LimitNode {
            source: Box::new(source),
            count,
            outputs,
        })
    }

    /// Builds a projection whose outputs are the assigned slots.
    pub fn project(source: PlanNode, assignments: Vec<(Slot, Expression)>) -> Self {
        let outputs = assignments.iter().map(|(slot, _)| slot.clone()).collect();
        PlanNode::Project(ProjectNode {
            source: Box::new(source),
            assignments,
            outputs,
        })
    }

    /// Builds an aggregation whose outputs are the grouping columns followed
    /// by the aggregate slots.
    pub fn aggregation(
        source: PlanNode,
        group_by: Vec<Slot>,
        aggregations: Vec<(Slot, FunctionCall)>,
    ) -> Self {
        let outputs = group_by
            .iter()
            .cloned()
            .chain(aggregations.iter().map(|(slot, _)| slot.clone()))
            .collect();
        PlanNode::Aggregation(AggregationNode {
            source: Box::new(source),
            group_by,
            aggregations,
            outputs,
        })
    }

    /// Builds the root output node.
    pub fn output(
        source: PlanNode,
        columns: Vec<String>,
        assignments: Vec<(String, Slot)>,
    ) -> Self {
        let outputs = source.outputs().to_vec();
        PlanNode::Output(OutputNode {
            source: Box::new(source),
            columns,
            assignments,
            outputs,
        })
    }

    /// Builds a top-N over `source`.
    pub fn top_n(
        source: PlanNode,
        count: u64,
        order_by: Vec<Slot>,
        orderings: Vec<(Slot, SortOrder)>,
    ) -> Self {
        let outputs = source.outputs().to_vec();
        PlanNode::TopN(TopNNode {
            source: Box::new(source),
            count,
            order_by,
            orderings,
            outputs,
        })
    }

    /// Builds a join whose outputs are the left outputs followed by the right.
    pub fn join(left: PlanNode, right: PlanNode, criteria: Vec<(Slot, Slot)>) -> Self {
        let outputs = left
            .outputs()
            .iter()
            .chain(right.outputs())
            .cloned()
            .collect();
        PlanNode::Join(JoinNode {
            left: Box::new(left),
            right: Box::new(right),
            criteria,
            outputs,
        })
    }

    /// Builds a sort over `source`.
    pub fn sort(source: PlanNode, order_by: Vec<Slot>, orderings: Vec<(Slot, SortOrder)>) -> Self {
        let outputs = source.outputs().to_vec();
        PlanNode::Sort(SortNode {
            source: Box::new(source),
            order_by,
            orderings,
            outputs,
        })
    }

    /// Name of the operator kind.
    pub fn kind(&self) -> &'static str {
        match self {
            PlanNode::Limit(_) => "Limit",
            PlanNode::Aggregation(_) => "Aggregation",
            PlanNode::TableScan(_) => "TableScan",
            PlanNode::Filter(_) => "Filter",
            PlanNode::Project(_) => "Project",
            PlanNode::Output(_) => "Output",
            PlanNode::TopN(_) => "TopN",
            PlanNode::Join(_) => "Join",
            PlanNode::Sort(_) => "Sort",
        }
    }

    /// Input operators in order.
    pub fn sources(&self) -> Vec<&PlanNode> {
        match self {
            PlanNode::TableScan(_) => Vec::new(),
            PlanNode::Limit(LimitNode { source, .. })
            | PlanNode::Aggregation(AggregationNode { source, .. })
            | PlanNode::Filter(FilterNode { source, .. })
            | PlanNode::Project(ProjectNode { source, .. })
            | PlanNode::Output(OutputNode { source, .. })
            | PlanNode::TopN(TopNNode { source, .. })
            | PlanNode::Sort(SortNode { source, .. }) => vec![source.as_ref()],
            PlanNode::Join(JoinNode { left, right, .. }) => vec![left.as_ref(), right.as_ref()],
        }
    }

    /// Output columns in order.
    pub fn outputs(&self) -> &[Slot] {
        match self {
            PlanNode::Limit(n) => &n.outputs,
            PlanNode::Aggregation(n) => &n.outputs,
            PlanNode::TableScan(n) => &n.outputs,
            PlanNode::Filter(n) => &n.outputs,
            PlanNode::Project(n) => &n.outputs,
            PlanNode::Output(n) => &n.outputs,
            PlanNode::TopN(n) => &n.outputs,
            PlanNode::Join(n) => &n.outputs,
            PlanNode::Sort(n) => &n.outputs,
        }
    }

    /// Number of nodes in the tree rooted here.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.sources());
        }
        count
    }
}
