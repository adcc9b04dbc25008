//! The Select builder.
//!
//! A [`Select`] collects FROM sources, projections, predicates and groupings,
//! checking each expression against the sources registered so far. Every
//! builder call is all-or-nothing: when it fails the Select is left exactly as
//! it was.

mod accept;
mod clauses;

use std::rc::Rc;

use query_builder_configuration::DatabaseProperties;

use crate::error::Error;
use crate::expression::{Expression, Selection};
use crate::function_type::FunctionType;
use crate::helpers;
use crate::scope::{AliasMap, Scope};
use crate::string::PrintResult;
use crate::view::{Join, Key, View};

pub(crate) use clauses::{FromClause, SelectClause};

/// A `SELECT` statement under construction.
///
/// Clones share the identity of the statement they were made from, so the
/// copies a parent makes while projecting through a sub-select still stand
/// for that sub-select.
#[derive(Debug, Clone, Default)]
pub struct Select {
    identity: Rc<()>,
    pub(crate) from: Vec<FromClause>,
    pub(crate) selection: Vec<SelectClause>,
    pub(crate) where_: Vec<Expression>,
    pub(crate) having: Vec<Expression>,
    pub(crate) group_by: Vec<Expression>,
    pub(crate) aliases: AliasMap,
    pub(crate) scope: Scope,
}

impl Select {
    pub fn new() -> Select {
        Select::default()
    }

    /// Run `change` on a draft and keep it only if it succeeds.
    fn commit(
        &mut self,
        change: impl FnOnce(&mut Select) -> Result<(), Error>,
    ) -> Result<&mut Select, Error> {
        let mut draft = self.clone();
        change(&mut draft)?;
        *self = draft;
        Ok(self)
    }

    // FROM //

    /// Add a source. A join is added as an `INNER JOIN` from its source,
    /// which must already be in scope.
    pub fn from(&mut self, view: impl Into<View>) -> Result<&mut Select, Error> {
        let view = view.into();
        self.commit(|draft| draft.add_from(&view))
            .map_err(|error| Error::rejected("FROM", &view, error))
    }

    /// Join `target` on `predicate`, taking the source from the predicate.
    pub fn join(
        &mut self,
        target: impl Into<View>,
        predicate: impl Into<Expression>,
    ) -> Result<&mut Select, Error> {
        let join = Join::infer(target.into(), predicate.into())?;
        self.from(join)
    }

    fn add_from(&mut self, view: &View) -> Result<(), Error> {
        match view {
            View::Join(join) => self.add_join(join),
            other => {
                let view = other.copy();
                let alias = self.aliases.view_alias(view.name());
                self.register(view, alias, None)
            }
        }
    }

    fn add_join(&mut self, join: &Join) -> Result<(), Error> {
        let source = self.scope.resolves(join.source())?.view().clone();
        let join = if source.extends(join.source()) {
            join.change_source(source)?
        } else {
            join.clone()
        };
        let view = View::from(join);
        let alias = self.aliases.view_alias(view.name());
        let predicate = match &view {
            View::Join(join) => Some(join.predicate().clone()),
            _ => None,
        };
        self.register(view, alias, predicate)
    }

    fn register(&mut self, view: View, alias: String, on: Option<Expression>) -> Result<(), Error> {
        tracing::debug!("Registered {} as {}", view, alias);
        self.scope = self.scope.add(view.clone(), &alias);
        let on = match on {
            Some(predicate) => Some(self.accept(&predicate)?),
            None => None,
        };
        self.from.push(FromClause {
            view,
            alias,
            scope: self.scope.clone(),
            on,
        });
        Ok(())
    }

    /// Add a FROM source for every view of `expression` that is not in scope
    /// yet, returning the views added.
    pub fn add_to_scope_if_needed(&mut self, expression: &Expression) -> Vec<View> {
        let mut added = vec![];
        for view in expression.function_type().values() {
            if self.scope.can_resolve(view) {
                continue;
            }
            match self.from(view.clone()) {
                Ok(_) => added.push(view.clone()),
                Err(error) => tracing::warn!("Unable to add {} to scope: {}", view, error),
            }
        }
        added
    }

    // SELECT //

    /// Project an expression under its own name.
    pub fn select(&mut self, expression: impl Into<Expression>) -> Result<&mut Select, Error> {
        let expression = expression.into();
        let alias = expression.name().map(str::to_string);
        self.commit(|draft| draft.add_selection(&expression, alias.as_deref(), false))
            .map_err(|error| Error::rejected("SELECT", &expression, error))
    }

    /// Project an expression as `alias`.
    pub fn select_as(
        &mut self,
        expression: impl Into<Expression>,
        alias: &str,
    ) -> Result<&mut Select, Error> {
        let expression = expression.into();
        self.commit(|draft| draft.add_selection(&expression, Some(alias), true))
            .map_err(|error| Error::rejected("SELECT", &expression, error))
    }

    /// Project `expression`, reusing an identical clause. An explicit alias
    /// must match as well.
    fn add_selection(
        &mut self,
        expression: &Expression,
        alias: Option<&str>,
        explicit: bool,
    ) -> Result<(), Error> {
        let accepted = self.accept(expression)?;
        let exists = self.selection.iter().any(|clause| {
            clause.definition == accepted
                && (!explicit || clause.alias.as_deref() == alias)
                && leaf_aliases(&clause.definition, &clause.scope)
                    == leaf_aliases(&accepted, &self.scope)
        });
        if !exists {
            let alias = self.aliases.alias(alias);
            self.selection.push(SelectClause {
                definition: accepted,
                alias,
                scope: self.scope.clone(),
            });
        }
        Ok(())
    }

    // WHERE, GROUP BY, HAVING //

    /// Add a predicate, joined to the previous ones with `AND`.
    pub fn and_where(&mut self, predicate: impl Into<Expression>) -> Result<&mut Select, Error> {
        let predicate = predicate.into();
        self.commit(|draft| {
            let accepted = draft.accept_harder(&predicate)?;
            let scoped = helpers::scoped(draft.scope.clone(), accepted);
            draft.where_.push(scoped);
            Ok(())
        })
        .map_err(|error| Error::rejected("WHERE", &predicate, error))
    }

    /// Add a predicate on groups, joined to the previous ones with `AND`.
    pub fn and_having(&mut self, predicate: impl Into<Expression>) -> Result<&mut Select, Error> {
        let predicate = predicate.into();
        self.commit(|draft| {
            let accepted = draft.accept_harder(&predicate)?;
            let scoped = helpers::scoped(draft.scope.clone(), accepted);
            draft.having.push(scoped);
            Ok(())
        })
        .map_err(|error| Error::rejected("HAVING", &predicate, error))
    }

    /// Group by `expression`, which is selected as well.
    pub fn group_by(&mut self, expression: impl Into<Expression>) -> Result<&mut Select, Error> {
        let expression = expression.into();
        self.commit(|draft| draft.add_group_by(&expression))
            .map_err(|error| Error::rejected("GROUP BY", &expression, error))
    }

    pub fn group_by_all(&mut self, expressions: &[Expression]) -> Result<&mut Select, Error> {
        self.commit(|draft| {
            for expression in expressions {
                draft
                    .add_group_by(expression)
                    .map_err(|error| Error::rejected("GROUP BY", expression, error))?;
            }
            Ok(())
        })
    }

    fn add_group_by(&mut self, expression: &Expression) -> Result<(), Error> {
        let accepted = self.accept(expression)?;
        let scoped = helpers::scoped(self.scope.clone(), accepted);
        self.group_by.push(scoped);
        self.add_selection(expression, None, false)
    }

    // Output //

    /// Generate the SQL text.
    pub fn print(&self) -> Result<String, Error> {
        let mut sql = PrintResult::new();
        self.to_sql(&mut sql);
        let text = sql.print()?;
        tracing::info!("Generated SQL: {}", text);
        Ok(text)
    }

    // As a view //

    /// A projected value by alias or system name, usable outside this Select.
    pub fn selector(&self, name: &str) -> Result<Expression, Error> {
        self.selector_of(&View::from(self), name)
    }

    pub(crate) fn selector_of(&self, view: &View, name: &str) -> Result<Expression, Error> {
        self.selection
            .iter()
            .find(|clause| {
                clause.alias.as_deref() == Some(name) || clause.definition.system_name() == Some(name)
            })
            .map(|clause| {
                Expression::Selection(Selection::new(
                    view.clone(),
                    clause.name().map(str::to_string),
                    clause.definition.clone(),
                ))
            })
            .ok_or_else(|| Error::UndefinedSelector {
                name: name.to_string(),
                view: view.to_string(),
            })
    }

    /// The explicitly projected values.
    pub fn selectors(&self) -> Vec<Expression> {
        self.selectors_of(&View::from(self))
    }

    pub(crate) fn selectors_of(&self, view: &View) -> Vec<Expression> {
        self.selection
            .iter()
            .map(|clause| {
                Expression::Selection(Selection::new(
                    view.clone(),
                    clause.name().map(str::to_string),
                    clause.definition.clone(),
                ))
            })
            .collect()
    }

    /// The grouping when there is one, else the keys of every source.
    pub fn pk(&self) -> Key {
        let keys = if self.group_by.is_empty() {
            self.from
                .iter()
                .flat_map(|clause| clause.view.pk().keys().to_vec())
                .collect()
        } else {
            self.group_by.iter().map(unscoped).collect()
        };
        Key::new(View::from(self), keys)
    }

    /// The views of the FROM list.
    pub fn function_type(&self) -> FunctionType {
        self.from.iter().map(|clause| clause.view.clone()).collect()
    }

    pub fn inherits_from(&self, parent: &View) -> bool {
        self.from
            .iter()
            .any(|clause| clause.view.is_compatible_with(parent))
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// The properties of the first source.
    pub fn database_properties(&self) -> DatabaseProperties {
        self.from
            .first()
            .map(|clause| clause.view.database_properties())
            .unwrap_or_default()
    }
}

impl PartialEq for Select {
    fn eq(&self, other: &Select) -> bool {
        Rc::ptr_eq(&self.identity, &other.identity)
            && self.from.len() == other.from.len()
            && self
                .from
                .iter()
                .zip(&other.from)
                .all(|(a, b)| a.view == b.view && a.alias == b.alias)
            && self.where_ == other.where_
            && self.having == other.having
            && self.group_by == other.group_by
    }
}

fn unscoped(expression: &Expression) -> Expression {
    match expression {
        Expression::Scoped { expression, .. } => (**expression).clone(),
        other => other.clone(),
    }
}

/// The alias every leaf of `expression` resolves to in `scope`.
fn leaf_aliases(expression: &Expression, scope: &Scope) -> Vec<Option<String>> {
    let mut aliases = vec![];
    expression.map_leaves(&mut |leaf| {
        aliases.push(
            scope
                .resolves_leaf(leaf)
                .ok()
                .map(|mapping| mapping.alias().to_string()),
        );
        leaf.clone()
    });
    aliases
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Table;

    #[test]
    fn it_fails_to_print_without_from() {
        assert_eq!(
            Select::new().print().unwrap_err().to_string(),
            "missing FROM clause: SELECT FROM"
        );
    }

    #[test]
    fn it_leaves_the_select_unchanged_on_failure() {
        let people = Table::new("people").pk(&["ID"]).unwrap();
        let department = Table::new("department").pk(&["ID"]).unwrap();
        let manager = people.join(&department.fk(&["MANAGER_ID_FK"])).unwrap();
        let mut select = Select::new();
        select.from(&people).unwrap();
        let before = select.clone();
        assert!(select.from(manager).is_err());
        assert_eq!(select, before);
        assert_eq!(select.print().unwrap(), before.print().unwrap());
    }

    #[test]
    fn it_rejects_columns_without_source() {
        let table = Table::new("table");
        let error = Select::new().select(table.column("test")).unwrap_err();
        assert!(matches!(error, Error::Rejected { clause: "SELECT", .. }));
    }

    #[test]
    fn it_types_itself_by_its_sources() {
        let table = Table::new("table");
        let b = Table::new("b");
        let mut select = Select::new();
        select
            .from(&table)
            .unwrap()
            .select(table.column("a"))
            .unwrap()
            .select(table.column("b"))
            .unwrap();
        assert_eq!(select.function_type(), View::Table(table.clone()));
        let mut both = Select::new();
        both.from(&table).unwrap().from(&b).unwrap();
        let expected: FunctionType = [View::Table(table), View::Table(b)].into_iter().collect();
        assert_eq!(both.function_type(), expected);
    }

    #[test]
    fn it_adds_missing_views_to_scope() {
        let people = Table::new("people").pk(&["peopleID"]).unwrap();
        let revenue = Expression::from(people.column("revenue"));
        let mut select = Select::new();
        let added = select.add_to_scope_if_needed(&revenue);
        assert_eq!(added, vec![View::Table(people.clone())]);
        assert_eq!(select.function_type(), View::Table(people));
        assert!(select.add_to_scope_if_needed(&revenue).is_empty());
    }

    #[test]
    fn it_has_lower_precedence_than_a_table() {
        let table = Table::new("table");
        let mut select = Select::new();
        select.from(&table).unwrap();
        assert!(View::Table(table).precedence() > View::from(&select).precedence());
    }
}
