//! Views: the addressable sources of selectors.
//!
//! A view is a table, a join, a sub-select or a concrete table. Views are
//! matched against each other through compatibility rather than plain
//! equality, so that a join can stand for its target table and a derived
//! view for the tables it is built from.

mod concrete;
mod join;
mod key;
mod table;

use std::fmt;
use std::rc::Rc;

use query_builder_configuration::DatabaseProperties;

use crate::error::Error;
use crate::expression::Expression;
use crate::function_type::FunctionType;
use crate::precedence;
use crate::select::Select;

pub use concrete::ConcreteTable;
pub use join::Join;
pub use key::Key;
pub use table::Table;

/// A typed source of selectors.
#[derive(Debug, Clone)]
pub enum View {
    Table(Table),
    Concrete(ConcreteTable),
    Join(Rc<Join>),
    Select(Rc<Select>),
}

impl View {
    pub fn name(&self) -> Option<&str> {
        match self {
            View::Table(table) => Some(table.name()),
            View::Concrete(concrete) => Some(concrete.name()),
            View::Join(join) => join.name().or_else(|| join.target().name()),
            View::Select(_) => None,
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            View::Select(_) => precedence::STATEMENT,
            View::Table(_) | View::Concrete(_) | View::Join(_) => precedence::VIEW,
        }
    }

    /// Look up, or for a table lazily create, a named selector.
    pub fn selector(&self, name: &str) -> Result<Expression, Error> {
        match self {
            View::Table(table) => Ok(table.column(name).into()),
            View::Concrete(concrete) => concrete.column(name).map(Expression::from),
            View::Join(join) => join.target().selector(name),
            View::Select(select) => select.selector_of(self, name),
        }
    }

    /// The selectors currently known by this view, in order.
    pub fn selectors(&self) -> Vec<Expression> {
        match self {
            View::Table(table) => table.columns().into_iter().map(Expression::from).collect(),
            View::Concrete(concrete) => concrete
                .columns()
                .into_iter()
                .map(Expression::from)
                .collect(),
            View::Join(join) => join.target().selectors(),
            View::Select(select) => select.selectors_of(self),
        }
    }

    /// The declared or derived primary key, empty if there is none.
    pub fn pk(&self) -> Key {
        match self {
            View::Table(table) => table.primary_key(),
            View::Concrete(concrete) => {
                Key::new(self.clone(), concrete.primary_key().keys().to_vec())
            }
            View::Join(join) => Key::new(self.clone(), join.target().pk().keys().to_vec()),
            View::Select(select) => select.pk(),
        }
    }

    /// The "is-a" relation between views.
    pub fn inherits_from(&self, parent: &View) -> bool {
        match self {
            View::Table(_) => self == parent,
            View::Concrete(concrete) => {
                View::Table(concrete.model().clone()).is_compatible_with(parent)
            }
            View::Join(join) => match parent {
                View::Join(_) => self == parent,
                _ => join.target().is_compatible_with(parent),
            },
            View::Select(select) => select.inherits_from(parent),
        }
    }

    pub fn is_compatible_with(&self, other: &View) -> bool {
        self == other || self.inherits_from(other) || other.inherits_from(self)
    }

    /// True when this view is a different, more specific instance of `other`.
    pub fn extends(&self, other: &View) -> bool {
        self != other && self.inherits_from(other)
    }

    pub fn function_type(&self) -> FunctionType {
        match self {
            View::Join(join) => FunctionType::from(join.source().clone()).add(self.clone()),
            View::Select(select) => select.function_type(),
            View::Table(_) | View::Concrete(_) => FunctionType::from(self.clone()),
        }
    }

    /// A copy that does not share the column registry of a table.
    pub fn copy(&self) -> View {
        match self {
            View::Table(table) => View::Table(table.copy()),
            other => other.clone(),
        }
    }

    pub fn database_properties(&self) -> DatabaseProperties {
        match self {
            View::Table(table) => table.properties().clone(),
            View::Concrete(concrete) => concrete.model().properties().clone(),
            View::Join(join) => join.target().database_properties(),
            View::Select(select) => select.database_properties(),
        }
    }
}

impl PartialEq for View {
    fn eq(&self, other: &View) -> bool {
        match (self, other) {
            (View::Table(a), View::Table(b)) => a == b,
            (View::Concrete(a), View::Concrete(b)) => a == b,
            (View::Join(a), View::Join(b)) => Rc::ptr_eq(a, b) || a == b,
            (View::Select(a), View::Select(b)) => Rc::ptr_eq(a, b) || a == b,
            _ => false,
        }
    }
}

impl From<Table> for View {
    fn from(table: Table) -> View {
        View::Table(table)
    }
}

impl From<&Table> for View {
    fn from(table: &Table) -> View {
        View::Table(table.clone())
    }
}

impl From<ConcreteTable> for View {
    fn from(concrete: ConcreteTable) -> View {
        View::Concrete(concrete)
    }
}

impl From<&ConcreteTable> for View {
    fn from(concrete: &ConcreteTable) -> View {
        View::Concrete(concrete.clone())
    }
}

impl From<Join> for View {
    fn from(join: Join) -> View {
        View::Join(Rc::new(join))
    }
}

impl From<&Join> for View {
    fn from(join: &Join) -> View {
        View::Join(Rc::new(join.clone()))
    }
}

impl From<Select> for View {
    fn from(select: Select) -> View {
        View::Select(Rc::new(select))
    }
}

impl From<&Select> for View {
    fn from(select: &Select) -> View {
        View::Select(Rc::new(select.clone()))
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            View::Table(table) => write!(f, "[TABLE '{}']", table.name()),
            View::Concrete(concrete) => write!(f, "[CONCRETE TABLE '{}']", concrete.name()),
            View::Join(join) => match join.name() {
                Some(name) => write!(f, "[JOIN '{name}' {} -> {}]", join.source(), join.target()),
                None => write!(f, "[JOIN {} -> {}]", join.source(), join.target()),
            },
            View::Select(select) => write!(f, "[SELECT {}]", select.function_type()),
        }
    }
}
