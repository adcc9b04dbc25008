//! The clauses a Select is made of.

use crate::expression::Expression;
use crate::scope::Scope;
use crate::view::View;

/// A source in the FROM list, or an `INNER JOIN` when `on` is set.
///
/// `scope` is the scope right after this source was registered, so the
/// clause and its predicate resolve against it even if later sources reuse
/// the same tables.
#[derive(Debug, Clone)]
pub(crate) struct FromClause {
    pub view: View,
    pub alias: String,
    pub scope: Scope,
    pub on: Option<Expression>,
}

impl FromClause {
    pub fn is_join(&self) -> bool {
        self.on.is_some()
    }
}

/// A projected expression.
#[derive(Debug, Clone)]
pub(crate) struct SelectClause {
    pub definition: Expression,
    pub alias: Option<String>,
    pub scope: Scope,
}

impl SelectClause {
    /// The name the result column is known by.
    pub fn name(&self) -> Option<&str> {
        self.alias
            .as_deref()
            .or_else(|| self.definition.system_name())
    }

    /// True when the projection needs an explicit `AS alias`.
    pub fn needs_alias(&self) -> bool {
        match (&self.alias, &self.definition) {
            (None, _) | (Some(_), Expression::Star(_)) => false,
            (Some(alias), definition) if definition.is_leaf() => {
                definition.system_name() != Some(alias.as_str())
            }
            (Some(_), _) => true,
        }
    }
}
