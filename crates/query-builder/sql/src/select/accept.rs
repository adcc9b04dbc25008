//! Checking expressions against the sources of a Select.
//!
//! Accepting an expression resolves each of its leaves in the current scope.
//! A leaf reached through a sub-select is projected by that sub-select on
//! demand and replaced by a reference to the projection.

use std::rc::Rc;

use super::{Select, SelectClause};
use crate::error::Error;
use crate::expression::{Expression, Selection};
use crate::view::View;

impl Select {
    pub(crate) fn accept(&mut self, expression: &Expression) -> Result<Expression, Error> {
        match expression {
            Expression::Constant(_) => Ok(expression.clone()),
            Expression::Apply {
                operator,
                arguments,
            } => {
                let arguments = arguments
                    .iter()
                    .map(|argument| self.accept(argument))
                    .collect::<Result<Vec<_>, Error>>()?;
                Ok(Expression::Apply {
                    operator: operator.clone(),
                    arguments,
                })
            }
            Expression::Selection(selection) if self.is_view(selection.view()) => {
                self.accept(selection.definition())
            }
            Expression::Column(_)
            | Expression::Star(_)
            | Expression::Selection(_)
            | Expression::Relinked { .. } => self.accept_leaf(expression),
            Expression::View(view) => self.accept_view(view),
            Expression::Scoped { .. } => Err(Error::NotSupported(format!(
                "accepting the scoped expression {expression}"
            ))),
        }
    }

    /// Accept, unwrapping references to their definitions and joins to their
    /// predicates until the expression is accepted or nothing is left to
    /// unwrap.
    pub(crate) fn accept_harder(&mut self, expression: &Expression) -> Result<Expression, Error> {
        let mut current = expression.clone();
        loop {
            let mut attempt = self.clone();
            match attempt.accept(&current) {
                Ok(accepted) => {
                    *self = attempt;
                    return Ok(accepted);
                }
                Err(error) => match unwrapped(&current) {
                    Some(simpler) => current = simpler,
                    None => return Err(error),
                },
            }
        }
    }

    fn is_view(&self, view: &View) -> bool {
        match view {
            View::Select(select) => **select == *self,
            _ => false,
        }
    }

    fn accept_leaf(&mut self, leaf: &Expression) -> Result<Expression, Error> {
        let mapping = self.scope.resolves_leaf(leaf)?;
        check_declared(mapping.view(), leaf.unbound())?;
        let through_select = match mapping.view() {
            View::Select(_) => true,
            View::Join(join) => matches!(join.target(), View::Select(_)),
            View::Table(_) | View::Concrete(_) => false,
        };
        if !through_select {
            return Ok(leaf.clone());
        }
        let alias = mapping.alias().to_string();
        self.project_through(&alias, leaf.unbound())
    }

    /// Have the sub-select registered as `alias` project `leaf`, and refer to
    /// the projection.
    fn project_through(&mut self, alias: &str, leaf: &Expression) -> Result<Expression, Error> {
        let clause = self
            .from
            .iter_mut()
            .find(|clause| clause.alias == alias)
            .ok_or_else(|| Error::NotSupported(format!("projecting through '{alias}'")))?;
        let sub_select = sub_select_mut(&mut clause.view)
            .ok_or_else(|| Error::NotSupported(format!("projecting through '{alias}'")))?;
        let (name, definition) = sub_select.accept_for_parent(leaf)?;
        Ok(Expression::Selection(Selection::new(
            clause.view.clone(),
            name,
            definition,
        )))
    }

    /// Project `expression` for an enclosing Select, reusing an identical
    /// projection when there is one.
    fn accept_for_parent(
        &mut self,
        expression: &Expression,
    ) -> Result<(Option<String>, Expression), Error> {
        let accepted = self.accept(expression)?;
        if let Some(clause) = self
            .selection
            .iter()
            .find(|clause| clause.definition == accepted)
        {
            return Ok((
                clause.name().map(str::to_string),
                clause.definition.clone(),
            ));
        }
        let alias = self.aliases.alias(expression.name());
        let name = alias
            .clone()
            .or_else(|| accepted.system_name().map(str::to_string));
        self.selection.push(SelectClause {
            definition: accepted.clone(),
            alias,
            scope: self.scope.clone(),
        });
        Ok((name, accepted))
    }

    fn accept_view(&mut self, view: &View) -> Result<Expression, Error> {
        match view {
            View::Select(_) => Ok(Expression::View(view.clone())),
            View::Join(join) => {
                let source = self.scope.resolves(join.source())?;
                let target = self.scope.resolves(join.target())?;
                if source.alias() == target.alias() {
                    return Err(Error::AmbiguousJoin {
                        source_view: join.source().to_string(),
                        target: join.target().to_string(),
                        reason: format!("both sides resolve to '{}'", source.alias()),
                    });
                }
                Ok(join.predicate_between(source.view(), target.view()))
            }
            View::Table(_) | View::Concrete(_) => {
                let mapping = self.scope.resolves(view)?;
                Ok(Expression::View(mapping.view().clone()))
            }
        }
    }
}

/// A column of a concrete source must be one of its model columns.
fn check_declared(view: &View, leaf: &Expression) -> Result<(), Error> {
    let concrete = match view {
        View::Concrete(concrete) => concrete,
        View::Join(join) => match join.target() {
            View::Concrete(concrete) => concrete,
            _ => return Ok(()),
        },
        View::Table(_) | View::Select(_) => return Ok(()),
    };
    match leaf {
        Expression::Column(column) if !concrete.model().has_column(column.name()) => {
            Err(Error::UndefinedColumn {
                column: column.name().to_string(),
                table: concrete.name().to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// The sub-select behind a FROM source, detached from other owners.
fn sub_select_mut(view: &mut View) -> Option<&mut Select> {
    match view {
        View::Select(select) => Some(Rc::make_mut(select)),
        View::Join(join) => sub_select_mut(Rc::make_mut(join).target_mut()),
        View::Table(_) | View::Concrete(_) => None,
    }
}

/// One step of unwrapping, or `None` when there is nothing left to unwrap.
fn unwrapped(expression: &Expression) -> Option<Expression> {
    match expression {
        Expression::Selection(selection) => Some(selection.definition().clone()),
        Expression::View(View::Join(join)) => Some(join.predicate().clone()),
        Expression::Apply {
            operator,
            arguments,
        } => {
            let mut changed = false;
            let arguments = arguments
                .iter()
                .map(|argument| match unwrapped(argument) {
                    Some(simpler) => {
                        changed = true;
                        simpler
                    }
                    None => argument.clone(),
                })
                .collect();
            changed.then(|| Expression::Apply {
                operator: operator.clone(),
                arguments,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::{constant, equals, greater};
    use crate::view::Table;

    #[test]
    fn it_unwraps_join_predicates() {
        let a = Table::new("a").pk(&["ID"]).unwrap();
        let b = Table::new("b");
        let join = a.join(&b.fk(&["A_ID_FK"])).unwrap();
        let predicate = Expression::View(View::from(&join));
        assert_eq!(unwrapped(&predicate).unwrap(), *join.predicate());
        assert!(unwrapped(&equals(a.column("ID"), constant(1))).is_none());
    }

    #[test]
    fn it_accepts_a_join_in_scope() {
        let a = Table::new("a").pk(&["ID"]).unwrap();
        let b = Table::new("b");
        let join = a.join(&b.fk(&["A_ID_FK"])).unwrap();
        let mut select = Select::new();
        select.from(&b).unwrap().from(&a).unwrap();
        let accepted = select.accept(&Expression::View(View::from(&join))).unwrap();
        assert_eq!(accepted, *join.predicate());
    }

    #[test]
    fn it_accepts_a_selection_of_itself_as_its_definition() {
        let people = Table::new("people").pk(&["peopleID"]).unwrap();
        let revenue = people.column("revenue");
        let mut select = Select::new();
        select
            .from(&people)
            .unwrap()
            .select_as(greater(&revenue, constant(0)), "positive")
            .unwrap();
        let positive = select.selector("positive").unwrap();
        let accepted = select.accept(&positive).unwrap();
        assert!(matches!(accepted, Expression::Apply { .. }));
    }

    #[test]
    fn it_refuses_columns_a_concrete_source_does_not_declare() {
        let people = Table::new("people").pk(&["ID"]).unwrap();
        people.column("name");
        let concrete = crate::view::ConcreteTable::new(&people);
        let mut select = Select::new();
        select.from(&concrete).unwrap();
        assert!(select.accept(&people.column("name").into()).is_ok());
        assert_eq!(
            select.accept(&people.column("undefined").into()),
            Err(Error::UndefinedColumn {
                column: "undefined".to_string(),
                table: "people".to_string(),
            })
        );
    }

    #[test]
    fn it_refuses_scoped_expressions() {
        let people = Table::new("people");
        let mut select = Select::new();
        select.from(&people).unwrap();
        let scoped = crate::helpers::scoped(select.scope().clone(), people.column("name"));
        assert!(matches!(
            select.accept(&scoped),
            Err(Error::NotSupported(_))
        ));
    }
}
