//! Helpers for building expressions.

use crate::error::Error;
use crate::expression::{Expression, Operator, Value};
use crate::scope::Scope;
use crate::view::View;

fn apply(operator: Operator, arguments: Vec<Expression>) -> Expression {
    Expression::Apply {
        operator,
        arguments,
    }
}

fn binary(
    operator: Operator,
    left: impl Into<Expression>,
    right: impl Into<Expression>,
) -> Expression {
    apply(operator, vec![left.into(), right.into()])
}

/// A literal.
pub fn constant(value: impl Into<Value>) -> Expression {
    Expression::Constant(value.into())
}

/// `NULL`
pub fn null() -> Expression {
    Expression::Constant(Value::Null)
}

// Arithmetic //

pub fn add(left: impl Into<Expression>, right: impl Into<Expression>) -> Expression {
    binary(Operator::Add, left, right)
}

pub fn subtract(left: impl Into<Expression>, right: impl Into<Expression>) -> Expression {
    binary(Operator::Subtract, left, right)
}

pub fn multiply(left: impl Into<Expression>, right: impl Into<Expression>) -> Expression {
    binary(Operator::Multiply, left, right)
}

pub fn divide(left: impl Into<Expression>, right: impl Into<Expression>) -> Expression {
    binary(Operator::Divide, left, right)
}

/// String concatenation.
pub fn concat(arguments: Vec<Expression>) -> Expression {
    apply(Operator::Concat, arguments)
}

// Predicates //

pub fn equals(left: impl Into<Expression>, right: impl Into<Expression>) -> Expression {
    binary(Operator::Equals, left, right)
}

pub fn greater(left: impl Into<Expression>, right: impl Into<Expression>) -> Expression {
    binary(Operator::Greater, left, right)
}

pub fn less(left: impl Into<Expression>, right: impl Into<Expression>) -> Expression {
    binary(Operator::Less, left, right)
}

/// Conjunction of a non-empty list. A single predicate is returned as is.
pub fn and(mut predicates: Vec<Expression>) -> Result<Expression, Error> {
    match predicates.len() {
        0 => Err(Error::EmptyList),
        1 => Ok(predicates.remove(0)),
        _ => Ok(apply(Operator::And, predicates)),
    }
}

/// Pairwise equality of two lists of the same, non-zero, length.
pub fn equals_lists(left: &[Expression], right: &[Expression]) -> Result<Expression, Error> {
    if left.len() != right.len() {
        return Err(Error::ListSizeMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    let pairs = left.iter().zip(right).map(|(l, r)| equals(l, r)).collect();
    and(pairs)
}

/// `value IN (list)`, where the list is usually a sub-select.
pub fn in_(value: impl Into<Expression>, list: impl Into<Expression>) -> Expression {
    binary(Operator::In, value, list)
}

pub fn not(predicate: impl Into<Expression>) -> Expression {
    apply(Operator::Not, vec![predicate.into()])
}

pub fn is_null(value: impl Into<Expression>) -> Expression {
    apply(Operator::IsNull, vec![value.into()])
}

// Aggregates //

pub fn sum(value: impl Into<Expression>) -> Expression {
    apply(Operator::Sum, vec![value.into()])
}

pub fn avg(value: impl Into<Expression>) -> Expression {
    apply(Operator::Avg, vec![value.into()])
}

pub fn count(value: impl Into<Expression>) -> Expression {
    apply(Operator::Count, vec![value.into()])
}

pub fn count_distinct(value: impl Into<Expression>) -> Expression {
    apply(Operator::CountDistinct, vec![value.into()])
}

/// Count the distinct rows of a view by its primary key.
///
/// A composite key is concatenated.
pub fn count_view(view: &View) -> Result<Expression, Error> {
    let primary_key = view.pk();
    match primary_key.keys() {
        [] => Err(Error::MissingPrimaryKey {
            table: view.name().map_or_else(|| view.to_string(), str::to_string),
        }),
        [key] => Ok(count_distinct(key)),
        keys => Ok(count_distinct(concat(keys.to_vec()))),
    }
}

// Others //

/// `alias.*`
pub fn star(view: impl Into<View>) -> Expression {
    Expression::Star(view.into())
}

/// Any other SQL function.
pub fn function(name: &str, arguments: Vec<Expression>) -> Expression {
    apply(Operator::Function(name.to_string()), arguments)
}

/// An expression that always prints with `scope`.
pub fn scoped(scope: Scope, expression: impl Into<Expression>) -> Expression {
    Expression::Scoped {
        scope,
        expression: Box::new(expression.into()),
    }
}
