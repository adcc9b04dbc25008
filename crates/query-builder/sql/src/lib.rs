//! A relational-algebra query builder.
//!
//! Tables, joins and sub-selects are [`view::View`]s; predicates, projections
//! and groupings are [`expression::Expression`]s built with [`helpers`]. A
//! [`select::Select`] checks every expression against the views it has in
//! scope and prints the statement with unique aliases and minimal
//! parentheses.

pub mod convert;
pub mod error;
pub mod expression;
pub mod function_type;
pub mod helpers;
pub mod precedence;
pub mod scope;
pub mod select;
pub mod string;
pub mod view;

pub use error::Error;
pub use expression::{Expression, Value};
pub use select::Select;
pub use view::{ConcreteTable, Join, Key, Table, View};
