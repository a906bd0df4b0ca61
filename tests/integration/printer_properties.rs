use plan_printer::query::expr::{ComparisonOp, Expression, FunctionCall};
use plan_printer::query::{render_to_string, PlanNode, PrinterOptions, Slot, SortOrder};
use proptest::prelude::*;

const WIDTH: usize = 4;

fn arb_slot() -> impl Strategy<Value = Slot> {
    ("[a-z]{1,3}", prop_oneof![Just("int"), Just("varchar"), Just("double")])
        .prop_map(|(name, ty)| Slot::new(name, ty))
}

fn arb_scan() -> impl Strategy<Value = PlanNode> {
    ("[a-z]{1,6}", prop::collection::vec(arb_slot(), 1..4)).prop_map(|(table, slots)| {
        let attributes = slots.into_iter().map(|s| (s.name.clone(), s)).collect();
        PlanNode::table_scan("catalog", "schema", table, attributes)
    })
}

fn arb_plan() -> impl Strategy<Value = PlanNode> {
    arb_scan().prop_recursive(8, 32, 1, |inner| {
        prop_oneof![
            (inner.clone(), 0u64..1000).prop_map(|(source, count)| PlanNode::limit(source, count)),
            (inner.clone(), "[a-z]{1,3}", any::<i64>()).prop_map(|(source, col, v)| {
                let predicate =
                    Expression::compare(ComparisonOp::Ge, Expression::reference(col), Expression::int(v));
                PlanNode::filter(source, predicate)
            }),
            (inner.clone(), prop::collection::vec(arb_slot(), 0..3)).prop_map(|(source, slots)| {
                let assignments = slots
                    .into_iter()
                    .map(|s| {
                        let expr = Expression::reference(s.name.clone());
                        (s, expr)
                    })
                    .collect();
                PlanNode::project(source, assignments)
            }),
            (
                inner.clone(),
                prop::collection::vec(arb_slot(), 0..2),
                prop::collection::vec(arb_slot(), 0..3)
            )
                .prop_map(|(source, keys, aggs)| {
                    let aggregations = aggs
                        .into_iter()
                        .map(|s| {
                            let call = FunctionCall::new("max", vec![Expression::reference(s.name.clone())]);
                            (s, call)
                        })
                        .collect();
                    PlanNode::aggregation(source, keys, aggregations)
                }),
            (inner.clone(), prop::collection::vec("[a-z]{1,3}", 0..3)).prop_map(|(source, columns)| {
                let assignments = columns
                    .iter()
                    .map(|c| (c.clone(), Slot::new(c.clone(), "int")))
                    .collect();
                PlanNode::output(source, columns, assignments)
            }),
            (inner, 1u64..50, prop::collection::vec(arb_slot(), 1..3)).prop_map(
                |(source, count, keys)| {
                    let orderings = keys.iter().map(|k| (k.clone(), SortOrder::Ascending)).collect();
                    PlanNode::top_n(source, count, keys, orderings)
                }
            ),
        ]
    })
}

fn header_prefix(node: &PlanNode) -> &'static str {
    match node {
        PlanNode::Limit(_) => "- Limit =>",
        PlanNode::Aggregation(_) => "- Aggregate =>",
        PlanNode::TableScan(_) => "- TableScan[",
        PlanNode::Filter(_) => "- Filter =>",
        PlanNode::Project(_) => "- Project =>",
        PlanNode::Output(_) => "- Output[",
        PlanNode::TopN(_) => "- TopN =>",
        PlanNode::Join(_) | PlanNode::Sort(_) => unreachable!("not generated"),
    }
}

fn preorder(node: &PlanNode, depth: usize, out: &mut Vec<(usize, &'static str)>) {
    out.push((depth, header_prefix(node)));
    for child in node.sources() {
        preorder(child, depth + 1, out);
    }
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn render(plan: &PlanNode) -> String {
    render_to_string(plan, PrinterOptions::default().with_indent_width(WIDTH)).unwrap()
}

proptest! {
    #[test]
    fn prop_one_header_per_node(plan in arb_plan()) {
        let out = render(&plan);
        let headers = out.lines().filter(|l| l.trim_start().starts_with("- ")).count();
        prop_assert_eq!(headers, plan.node_count());
    }

    #[test]
    fn prop_headers_follow_preorder_with_depth_indent(plan in arb_plan()) {
        let out = render(&plan);
        let mut expected = Vec::new();
        preorder(&plan, 0, &mut expected);

        let headers: Vec<&str> = out.lines().filter(|l| l.trim_start().starts_with("- ")).collect();
        prop_assert_eq!(headers.len(), expected.len());
        for (line, (depth, prefix)) in headers.iter().zip(&expected) {
            prop_assert_eq!(leading_spaces(line), depth * WIDTH);
            prop_assert!(line.trim_start().starts_with(prefix), "{} !~ {}", line, prefix);
        }
    }

    #[test]
    fn prop_details_sit_two_levels_below_header(plan in arb_plan()) {
        let out = render(&plan);
        let mut header_indent = None;
        for line in out.lines() {
            if line.trim_start().starts_with("- ") {
                header_indent = Some(leading_spaces(line));
            } else {
                let header = header_indent.expect("detail line before any header");
                prop_assert_eq!(leading_spaces(line), header + 2 * WIDTH);
            }
        }
    }

    #[test]
    fn prop_rendering_is_deterministic(plan in arb_plan()) {
        prop_assert_eq!(render(&plan), render(&plan.clone()));
    }
}
