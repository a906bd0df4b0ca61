use plan_printer::query::expr::{ArithmeticOp, ComparisonOp, Expression, FunctionCall};
use plan_printer::query::{
    render_to_string, PlanNode, PlanPrinter, PrintError, PrinterOptions, Slot, SortOrder,
};

fn int(name: &str) -> Slot {
    Slot::new(name, "int")
}

fn scan(table: &str, columns: &[&str]) -> PlanNode {
    PlanNode::table_scan(
        "catalog",
        "schema",
        table,
        columns.iter().map(|c| (c.to_string(), int(c))).collect(),
    )
}

#[test]
fn output_filter_scan() {
    let filter = PlanNode::filter(
        scan("t", &["a"]),
        Expression::compare(ComparisonOp::Gt, Expression::reference("a"), Expression::int(1)),
    );
    let plan = PlanNode::output(filter, vec!["x".into()], vec![("x".into(), int("a"))]);

    let expected = "\
- Output[x]
        x := a
    - Filter => [a:int]
            predicate = a > 1
        - TableScan[catalog.schema.t] => [a:int]
                a := a
";
    assert_eq!(render_to_string(&plan, PrinterOptions::default()).unwrap(), expected);
}

#[test]
fn top_n_over_aggregate_over_project() {
    let project = PlanNode::project(
        scan("orders", &["customer", "price", "qty"]),
        vec![
            (int("customer"), Expression::reference("customer")),
            (
                int("amount"),
                Expression::arithmetic(
                    ArithmeticOp::Multiply,
                    Expression::reference("price"),
                    Expression::reference("qty"),
                ),
            ),
        ],
    );
    let aggregate = PlanNode::aggregation(
        project,
        vec![int("customer")],
        vec![(
            Slot::new("total", "bigint"),
            FunctionCall::new("sum", vec![Expression::reference("amount")]),
        )],
    );
    let plan = PlanNode::top_n(
        aggregate,
        10,
        vec![Slot::new("total", "bigint"), int("customer")],
        vec![
            (Slot::new("total", "bigint"), SortOrder::Descending),
            (int("customer"), SortOrder::Ascending),
        ],
    );

    let expected = "\
- TopN => [customer:int, total:bigint]
        key = [total, customer]
        order = {total=DESCENDING, customer=ASCENDING}
        count = 10
    - Aggregate => [customer:int, total:bigint]
            key = customer
            total := sum(amount)
        - Project => [customer:int, amount:int]
                customer := customer
                amount := price * qty
            - TableScan[catalog.schema.orders] => [customer:int, price:int, qty:int]
                    customer := customer
                    price := price
                    qty := qty
";
    assert_eq!(render_to_string(&plan, PrinterOptions::default()).unwrap(), expected);
}

#[test]
fn printing_twice_is_identical() {
    let plan = PlanNode::limit(
        PlanNode::filter(
            scan("t", &["a", "b"]),
            Expression::Or(vec![
                Expression::compare(ComparisonOp::Lt, Expression::reference("a"), Expression::int(0)),
                Expression::compare(ComparisonOp::Ne, Expression::reference("b"), Expression::string("x")),
            ]),
        ),
        100,
    );
    let first = render_to_string(&plan, PrinterOptions::default()).unwrap();
    let second = render_to_string(&plan, PrinterOptions::default()).unwrap();
    assert_eq!(first, second);
    assert!(first.contains("predicate = (a < 0) OR (b <> 'x')"));
}

#[test]
fn join_aborts_without_rendering_its_subtree() {
    let join = PlanNode::join(
        scan("l", &["a"]),
        scan("r", &["b"]),
        vec![(int("a"), int("b"))],
    );
    let plan = PlanNode::output(join, vec!["a".into()], vec![("a".into(), int("a"))]);

    let mut printer = PlanPrinter::new(Vec::new());
    let err = printer.print(&plan).unwrap_err();
    assert_eq!(err.code(), "UnsupportedNodeKind");
    assert!(matches!(err, PrintError::UnsupportedNodeKind { kind: "Join" }));

    let out = String::from_utf8(printer.into_inner()).unwrap();
    assert_eq!(out, "- Output[a]\n        a := a\n");
}

#[test]
fn printer_is_reusable_across_plans() {
    let mut printer = PlanPrinter::new(Vec::new());
    printer.print(&scan("a", &["x"])).unwrap();
    printer.print(&scan("b", &["y"])).unwrap();
    let out = String::from_utf8(printer.into_inner()).unwrap();
    assert_eq!(
        out,
        "- TableScan[catalog.schema.a] => [x:int]\n        x := x\n\
         - TableScan[catalog.schema.b] => [y:int]\n        y := y\n"
    );
}
