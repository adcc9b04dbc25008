//! Type definitions of the expression graph.

use std::fmt;

use crate::function_type::FunctionType;
use crate::precedence;
use crate::scope::Scope;
use crate::view::{Table, View};

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl From<&str> for Value {
    fn from(value: &str) -> Value {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Value {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Value {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Value {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Value {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Value {
        Value::Boolean(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "'{s}'"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Boolean(true) => write!(f, "TRUE"),
            Value::Boolean(false) => write!(f, "FALSE"),
            Value::Null => write!(f, "NULL"),
        }
    }
}

/// Where an operator's symbol goes relative to its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixity {
    /// `op arg`
    Prefix,
    /// `a op b`, no spaces
    Infix,
    /// `arg op`
    Postfix,
    /// `op(a,b)`
    Function,
    /// `a op b`, spaced
    InfixFunction,
}

/// An operator or function applied to a list of arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equals,
    Greater,
    Less,
    And,
    Concat,
    In,
    Not,
    IsNull,
    Sum,
    Avg,
    Count,
    CountDistinct,
    /// Any other SQL function, printed as `name(args)`.
    Function(String),
}

impl Operator {
    pub fn symbol(&self) -> &str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Equals => "=",
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::And => "AND",
            Operator::Concat => "||",
            Operator::In => "IN",
            Operator::Not => "NOT",
            Operator::IsNull => "IS NULL",
            Operator::Sum => "SUM",
            Operator::Avg => "AVG",
            Operator::Count | Operator::CountDistinct => "COUNT",
            Operator::Function(name) => name,
        }
    }

    pub fn fixity(&self) -> Fixity {
        match self {
            Operator::Add
            | Operator::Subtract
            | Operator::Multiply
            | Operator::Divide
            | Operator::Equals
            | Operator::Greater
            | Operator::Less
            | Operator::Concat => Fixity::Infix,
            Operator::And | Operator::In => Fixity::InfixFunction,
            Operator::Not => Fixity::Prefix,
            Operator::IsNull => Fixity::Postfix,
            Operator::Sum
            | Operator::Avg
            | Operator::Count
            | Operator::CountDistinct
            | Operator::Function(_) => Fixity::Function,
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Multiply | Operator::Divide => precedence::MULTIPLICATIVE,
            Operator::Add | Operator::Subtract | Operator::Concat => precedence::ADDITIVE,
            Operator::Greater | Operator::Less => precedence::RELATIONAL,
            Operator::Equals => precedence::EQUALITY,
            Operator::IsNull => precedence::IS_NULL,
            Operator::Not => precedence::NOT,
            Operator::And => precedence::AND,
            Operator::In => precedence::STATEMENT,
            Operator::Sum
            | Operator::Avg
            | Operator::Count
            | Operator::CountDistinct
            | Operator::Function(_) => precedence::FUNCTION,
        }
    }
}

/// A named column of a table.
#[derive(Debug, Clone)]
pub struct Column {
    table: Table,
    name: String,
}

impl Column {
    pub(crate) fn new(table: Table, name: &str) -> Column {
        Column {
            table,
            name: name.to_string(),
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owning table as a view.
    pub fn view(&self) -> View {
        View::Table(self.table.clone())
    }
}

impl PartialEq for Column {
    fn eq(&self, other: &Column) -> bool {
        self.table == other.table && self.name == other.name
    }
}

/// A reference to a clause projected by a Select.
///
/// Outside the Select it prints as `alias.name`. It compares equal to its
/// definition.
#[derive(Debug, Clone)]
pub struct Selection {
    view: View,
    name: Option<String>,
    definition: Box<Expression>,
}

impl Selection {
    pub(crate) fn new(view: View, name: Option<String>, definition: Expression) -> Selection {
        Selection {
            view,
            name,
            definition: Box::new(definition),
        }
    }

    /// The Select that projects this value.
    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn definition(&self) -> &Expression {
        &self.definition
    }
}

/// A node of the expression graph.
#[derive(Debug, Clone)]
pub enum Expression {
    Constant(Value),
    Apply {
        operator: Operator,
        arguments: Vec<Expression>,
    },
    Column(Column),
    /// `alias.*` for a view.
    Star(View),
    Selection(Selection),
    /// A table, join or sub-select used as a value.
    View(View),
    /// A leaf resolved against `view` instead of its owner.
    Relinked {
        expression: Box<Expression>,
        view: View,
    },
    /// An expression that always prints with its own scope.
    Scoped {
        scope: Scope,
        expression: Box<Expression>,
    },
}

impl Expression {
    pub fn precedence(&self) -> u8 {
        match self {
            Expression::Apply { operator, .. } => operator.precedence(),
            Expression::View(view) => view.precedence(),
            Expression::Relinked { expression, .. } | Expression::Scoped { expression, .. } => {
                expression.precedence()
            }
            Expression::Constant(_)
            | Expression::Column(_)
            | Expression::Star(_)
            | Expression::Selection(_) => precedence::DEFAULT,
        }
    }

    /// The name used to alias this expression when it is selected.
    pub fn name(&self) -> Option<&str> {
        match self {
            Expression::Column(column) => Some(column.name()),
            Expression::Selection(selection) => selection.name(),
            Expression::Relinked { expression, .. } | Expression::Scoped { expression, .. } => {
                expression.name()
            }
            _ => None,
        }
    }

    /// The name the database gives to this expression when it is selected.
    pub fn system_name(&self) -> Option<&str> {
        match self {
            Expression::Column(column) => Some(column.name()),
            Expression::Selection(selection) => selection.name(),
            Expression::Star(_) => Some("*"),
            Expression::Relinked { expression, .. } | Expression::Scoped { expression, .. } => {
                expression.system_name()
            }
            _ => None,
        }
    }

    /// The views this expression depends on.
    pub fn function_type(&self) -> FunctionType {
        match self {
            Expression::Constant(_) => FunctionType::new(),
            Expression::Apply { arguments, .. } => {
                let mut result = FunctionType::new();
                for argument in arguments {
                    result.extend(&argument.function_type());
                }
                result
            }
            Expression::Column(column) => FunctionType::from(column.view()),
            Expression::Star(view) | Expression::Relinked { view, .. } => {
                FunctionType::from(view.clone())
            }
            Expression::Selection(selection) => FunctionType::from(selection.view.clone()),
            Expression::View(view) => view.function_type(),
            Expression::Scoped { expression, .. } => expression.function_type(),
        }
    }

    /// A copy that shares no mutable registry with the original.
    pub fn copy(&self) -> Expression {
        match self {
            Expression::View(view) => Expression::View(view.copy()),
            Expression::Apply {
                operator,
                arguments,
            } => Expression::Apply {
                operator: operator.clone(),
                arguments: arguments.iter().map(Expression::copy).collect(),
            },
            other => other.clone(),
        }
    }

    /// Strip wrappers and selections down to the node that defines the value.
    pub(crate) fn reduced(&self) -> &Expression {
        match self {
            Expression::Relinked { expression, .. } | Expression::Scoped { expression, .. } => {
                expression.reduced()
            }
            Expression::Selection(selection) => selection.definition.reduced(),
            other => other,
        }
    }

    /// The canonical form used for equality.
    pub fn redux(&self) -> Expression {
        match self.reduced() {
            Expression::Apply {
                operator,
                arguments,
            } => Expression::Apply {
                operator: operator.clone(),
                arguments: arguments.iter().map(Expression::redux).collect(),
            },
            other => other.clone(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Expression::Column(_)
                | Expression::Star(_)
                | Expression::Selection(_)
                | Expression::Relinked { .. }
        )
    }

    /// The view owning a plain leaf.
    pub(crate) fn leaf_view(&self) -> Option<View> {
        match self {
            Expression::Column(column) => Some(column.view()),
            Expression::Star(view) => Some(view.clone()),
            Expression::Selection(selection) => Some(selection.view.clone()),
            _ => None,
        }
    }

    /// The leaf without its binding.
    pub(crate) fn unbound(&self) -> &Expression {
        match self {
            Expression::Relinked { expression, .. } => expression,
            other => other,
        }
    }

    /// Rebuild the expression, replacing every leaf with `f(leaf)`.
    pub(crate) fn map_leaves(&self, f: &mut impl FnMut(&Expression) -> Expression) -> Expression {
        match self {
            Expression::Apply {
                operator,
                arguments,
            } => Expression::Apply {
                operator: operator.clone(),
                arguments: arguments.iter().map(|arg| arg.map_leaves(f)).collect(),
            },
            Expression::Scoped { scope, expression } => Expression::Scoped {
                scope: scope.clone(),
                expression: Box::new(expression.map_leaves(f)),
            },
            leaf if leaf.is_leaf() => f(leaf),
            other => other.clone(),
        }
    }

    /// Rebind the leaves owned by a view that `target` extends.
    ///
    /// Relinking back to the owner collapses the wrapper.
    pub fn relink_to(&self, target: &View) -> Expression {
        self.map_leaves(&mut |leaf| {
            let plain = leaf.unbound();
            let Some(owner) = plain.leaf_view() else {
                return leaf.clone();
            };
            if owner == *target {
                plain.clone()
            } else if target.inherits_from(&owner) {
                Expression::Relinked {
                    expression: Box::new(plain.clone()),
                    view: target.clone(),
                }
            } else {
                leaf.clone()
            }
        })
    }

    /// Pin every leaf to the mapping of exactly `view`.
    ///
    /// Used to tell apart two instances of the same table, for instance
    /// both sides of a self-join.
    pub fn bind(&self, view: &View) -> Expression {
        self.map_leaves(&mut |leaf| Expression::Relinked {
            expression: Box::new(leaf.unbound().clone()),
            view: view.clone(),
        })
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Expression) -> bool {
        match (self.reduced(), other.reduced()) {
            (Expression::Constant(a), Expression::Constant(b)) => a == b,
            (
                Expression::Apply {
                    operator: left_operator,
                    arguments: left_arguments,
                },
                Expression::Apply {
                    operator: right_operator,
                    arguments: right_arguments,
                },
            ) => left_operator == right_operator && left_arguments == right_arguments,
            (Expression::Column(a), Expression::Column(b)) => a == b,
            (Expression::Star(a), Expression::Star(b)) | (Expression::View(a), Expression::View(b)) => {
                a == b
            }
            _ => false,
        }
    }
}

impl From<Column> for Expression {
    fn from(column: Column) -> Expression {
        Expression::Column(column)
    }
}

impl From<&Column> for Expression {
    fn from(column: &Column) -> Expression {
        Expression::Column(column.clone())
    }
}

impl From<Value> for Expression {
    fn from(value: Value) -> Expression {
        Expression::Constant(value)
    }
}

impl From<View> for Expression {
    fn from(view: View) -> Expression {
        Expression::View(view)
    }
}

impl From<&Expression> for Expression {
    fn from(expression: &Expression) -> Expression {
        expression.clone()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::Constant(value) => write!(f, "{value}"),
            Expression::Apply {
                operator,
                arguments,
            } => {
                write!(f, "{}(", operator.symbol())?;
                for (index, argument) in arguments.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{argument}")?;
                }
                write!(f, ")")
            }
            Expression::Column(column) => {
                write!(f, "[Column '{}'.'{}']", column.table.name(), column.name)
            }
            Expression::Star(view) => write!(f, "[STAR {view}]"),
            Expression::Selection(selection) => write!(
                f,
                "[Reference to '{}'={}]",
                selection.name().unwrap_or("$"),
                selection.definition
            ),
            Expression::View(view) => write!(f, "{view}"),
            Expression::Relinked { expression, view } => write!(f, "{expression}@{view}"),
            Expression::Scoped { expression, .. } => write!(f, "{expression}"),
        }
    }
}
