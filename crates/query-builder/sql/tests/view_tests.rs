//! Joins, concrete tables and scopes as seen from outside the crate.

pub mod common;

use query_builder_sql::helpers::*;
use query_builder_sql::scope::Scope;
use query_builder_sql::string::PrintResult;
use query_builder_sql::{ConcreteTable, Error, Expression, Join, Select, Table, View};
use similar_asserts::assert_eq;

fn print_view(view: &View, scope: &Scope) -> anyhow::Result<String> {
    let mut sql = PrintResult::new();
    view.to_sql(scope, &mut sql);
    Ok(sql.print()?)
}

fn print_expression(expression: &Expression, scope: &Scope) -> anyhow::Result<String> {
    let mut sql = PrintResult::new();
    expression.to_sql(scope, &mut sql);
    Ok(sql.print()?)
}

#[test]
fn prints_a_join_in_scope() -> anyhow::Result<()> {
    let a = Table::new("a");
    let b = Table::new("b");
    let join = Join::infer(
        View::from(&b),
        equals(a.column("ID"), b.column("A_ID_FK")),
    )?;
    let scope = Scope::new()
        .add(View::from(&a), "a")
        .add(View::from(&b), "b");
    insta::assert_snapshot!(
        print_view(&View::from(join), &scope)?,
        @"INNER JOIN b ON a.ID=b.A_ID_FK"
    );
    Ok(())
}

#[test]
fn prints_a_self_join_through_its_name() -> anyhow::Result<()> {
    let people = common::people()?;
    let manager = View::from(people.join_as("manager", &people, &["MANAGER_ID_FK"])?);
    let scope = Scope::new()
        .add(View::from(&people), "people")
        .add(manager.clone(), "manager");

    assert_eq!(scope.resolves(&manager)?.alias(), "manager");
    assert_eq!(scope.resolves(&View::from(&people))?.alias(), "manager");
    assert_eq!(scope.resolves_bound(&View::from(&people))?.alias(), "people");

    let View::Join(join) = &manager else {
        unreachable!()
    };
    insta::assert_snapshot!(
        print_expression(join.predicate(), &scope)?,
        @"people.MANAGER_ID_FK=manager.ID"
    );
    Ok(())
}

#[test]
fn lists_every_model_column_of_a_concrete_table() -> anyhow::Result<()> {
    let people = common::people()?;
    let concrete = ConcreteTable::new(&people);
    let mut select = Select::new();
    select.from(&concrete)?;
    insta::assert_snapshot!(select.print()?, @"SELECT p.ID, p.name, p.city, p.revenue FROM people p");
    Ok(())
}

#[test]
fn refuses_undeclared_columns_of_a_concrete_table() -> anyhow::Result<()> {
    let people = common::people()?;
    let concrete = ConcreteTable::new(&people);
    assert!(matches!(
        concrete.column("undefined"),
        Err(Error::UndefinedColumn { .. })
    ));
    assert!(View::from(&concrete).selector("undefined").is_err());

    // the model is frozen when the concrete table is created
    people.column("added_later");
    assert!(concrete.column("added_later").is_err());

    let mut select = Select::new();
    select.from(&concrete)?.select(concrete.column("name")?)?;
    insta::assert_snapshot!(select.print()?, @"SELECT p.name FROM people p");
    Ok(())
}

#[test]
fn prints_scoped_expressions_with_their_own_scope() -> anyhow::Result<()> {
    let test = Table::new("test");
    let a = test.column("a");
    let x = Scope::new().add(View::from(&test), "x");
    let y = Scope::new().add(View::from(&test), "y");
    let pinned = scoped(x, &a);

    assert_eq!(print_expression(&pinned, &y)?, "x.a");
    assert_eq!(print_expression(&a.into(), &y)?, "y.a");
    Ok(())
}

#[test]
fn reports_the_trail_of_an_unresolved_view() {
    let first = Table::new("first");
    let second = Table::new("second");
    let scope = Scope::new().add(View::from(&first), "f");
    let error = scope.resolves(&View::from(&second)).unwrap_err();
    insta::assert_snapshot!(
        error.to_string(),
        @"undefined reference to [TABLE 'second'] in scope [[TABLE 'first']->f]"
    );
}

#[test]
fn refuses_a_join_without_a_primary_key() {
    let people = Table::new("people");
    let department = Table::new("department");
    let error = department.join(&people.fk(&["DEP_ID_FK"])).unwrap_err();
    insta::assert_snapshot!(error.to_string(), @"table 'department' has no PK defined");
}
