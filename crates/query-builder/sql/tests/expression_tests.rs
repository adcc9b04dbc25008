//! Printing expressions.

use query_builder_sql::helpers::*;
use query_builder_sql::scope::Scope;
use query_builder_sql::string::PrintResult;
use query_builder_sql::{Error, Expression, Table, View};
use similar_asserts::assert_eq;

fn print(expression: &Expression, scope: &Scope) -> Result<String, Error> {
    let mut sql = PrintResult::new();
    expression.to_sql(scope, &mut sql);
    sql.print()
}

fn table_scope() -> (Table, Scope) {
    let table = Table::new("table");
    let scope = Scope::new().add(View::from(&table), "t");
    (table, scope)
}

#[test]
fn prints_constants() -> anyhow::Result<()> {
    let scope = Scope::new();
    assert_eq!(print(&constant(10), &scope)?, "10");
    assert_eq!(print(&constant(2.5), &scope)?, "2.5");
    assert_eq!(print(&constant("it's"), &scope)?, "'it''s'");
    assert_eq!(print(&constant(true), &scope)?, "TRUE");
    assert_eq!(print(&null(), &scope)?, "NULL");
    Ok(())
}

#[test]
fn prints_comparisons() -> anyhow::Result<()> {
    let (table, scope) = table_scope();
    let a = table.column("a");
    let b = table.column("b");
    assert_eq!(print(&equals(&a, &b), &scope)?, "t.a=t.b");
    assert_eq!(print(&greater(&a, constant(1)), &scope)?, "t.a>1");
    assert_eq!(print(&less(&a, constant(1)), &scope)?, "t.a<1");
    Ok(())
}

#[test]
fn prints_conjunctions_of_pairs() -> anyhow::Result<()> {
    let (table, scope) = table_scope();
    let columns: Vec<Expression> = vec![table.column("a").into(), table.column("b").into()];
    let predicate = equals_lists(&columns, &columns)?;
    insta::assert_snapshot!(print(&predicate, &scope)?, @"t.a=t.a AND t.b=t.b");
    Ok(())
}

#[test]
fn prints_aggregates() -> anyhow::Result<()> {
    let (table, scope) = table_scope();
    let amount = table.column("amount");
    assert_eq!(print(&sum(&amount), &scope)?, "SUM(t.amount)");
    assert_eq!(print(&avg(&amount), &scope)?, "AVG(t.amount)");
    assert_eq!(print(&count(&amount), &scope)?, "COUNT(t.amount)");
    assert_eq!(
        print(&divide(sum(&amount), count(star(&table))), &scope)?,
        "SUM(t.amount)/COUNT(t.*)"
    );
    Ok(())
}

#[test]
fn keeps_the_grouping_of_subtractions() -> anyhow::Result<()> {
    let (table, scope) = table_scope();
    let a = table.column("a");
    let b = table.column("b");
    assert_eq!(
        print(&multiply(subtract(&a, &b), constant(2)), &scope)?,
        "(t.a-t.b)*2"
    );
    Ok(())
}

#[test]
fn fails_on_an_unresolved_column() {
    let table = Table::new("table");
    let error = print(&table.column("a").into(), &Scope::new()).unwrap_err();
    assert!(matches!(error, Error::Print { partial, .. } if partial == "a"));
}

#[test]
fn compares_expressions_structurally() {
    let table = Table::new("table");
    assert_eq!(
        equals(table.column("a"), constant(1)),
        equals(Table::new("table").column("a"), constant(1))
    );
    assert!(equals(table.column("a"), constant(1)) != equals(table.column("a"), constant(2)));
}
