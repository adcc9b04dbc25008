//! Inner joins between two views.

use super::View;
use crate::error::Error;
use crate::expression::Expression;

/// `INNER JOIN target ON predicate`, reached from `source`.
///
/// A join is itself a view: it stands for its target reached through this
/// path, and its type is `{source, this}`. Leaves of the predicate owned by
/// the source are pinned to it, leaves owned by the target stay plain.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    name: Option<String>,
    source: View,
    target: View,
    predicate: Expression,
}

impl Join {
    /// A join with an explicit source.
    pub fn new(source: View, target: View, predicate: Expression) -> Result<Join, Error> {
        Join::build(None, source, target, predicate)
    }

    /// A join whose target is known under its own name, as in a self-join.
    pub fn named(
        name: &str,
        source: View,
        target: View,
        predicate: Expression,
    ) -> Result<Join, Error> {
        Join::build(Some(name.to_string()), source, target, predicate)
    }

    /// A join whose source is the only view of the predicate that is not
    /// compatible with `target`.
    pub fn infer(target: View, predicate: Expression) -> Result<Join, Error> {
        let predicate_type = predicate.function_type();
        let candidates: Vec<&View> = predicate_type
            .values()
            .iter()
            .filter(|view| !view.is_compatible_with(&target))
            .collect();
        match candidates.as_slice() {
            [source] => Join::new((*source).clone(), target, predicate),
            _ => Err(Error::JoinSourceInference {
                target: target.to_string(),
                candidates: candidates.len(),
            }),
        }
    }

    fn build(
        name: Option<String>,
        source: View,
        target: View,
        predicate: Expression,
    ) -> Result<Join, Error> {
        let incompatible = || Error::IncompatibleJoin {
            source_view: source.to_string(),
            target: target.to_string(),
            predicate: predicate.function_type().to_string(),
        };
        let predicate_type = predicate.function_type();
        let valid = match predicate_type.len() {
            1 => source.is_compatible_with(&target),
            2 => {
                predicate_type.is_compatible_with(&source)
                    && predicate_type.is_compatible_with(&target)
            }
            _ => false,
        };
        if !valid {
            return Err(incompatible());
        }

        let mut unresolved = false;
        let mut bound_to_source = false;
        let bound = predicate.map_leaves(&mut |leaf| {
            if let Expression::Relinked { view, .. } = leaf {
                bound_to_source |= *view == source;
                return leaf.clone();
            }
            let Some(owner) = leaf.leaf_view() else {
                return leaf.clone();
            };
            if owner == target {
                leaf.clone()
            } else if owner == source {
                bound_to_source = true;
                leaf.bind(&source)
            } else if owner.is_compatible_with(&target) {
                leaf.clone()
            } else if owner.is_compatible_with(&source) {
                bound_to_source = true;
                leaf.bind(&source)
            } else {
                unresolved = true;
                leaf.clone()
            }
        });
        if unresolved {
            return Err(incompatible());
        }
        if !bound_to_source && source.is_compatible_with(&target) {
            return Err(Error::AmbiguousJoin {
                source_view: source.to_string(),
                target: target.to_string(),
                reason: "no predicate column is bound to the source".to_string(),
            });
        }

        Ok(Join {
            name,
            source,
            target,
            predicate: bound,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn source(&self) -> &View {
        &self.source
    }

    pub fn target(&self) -> &View {
        &self.target
    }

    pub fn predicate(&self) -> &Expression {
        &self.predicate
    }

    pub(crate) fn target_mut(&mut self) -> &mut View {
        &mut self.target
    }

    /// The same join walked the other way round.
    #[must_use]
    pub fn opposite(&self) -> Join {
        let new_source = self.target.clone();
        let predicate = self.predicate.map_leaves(&mut |leaf| match leaf {
            Expression::Relinked { expression, .. } => (**expression).clone(),
            plain => plain.bind(&new_source),
        });
        Join {
            name: None,
            source: new_source,
            target: self.source.clone(),
            predicate,
        }
    }

    /// Rebase the join on a different but compatible source.
    pub fn change_source(&self, source: View) -> Result<Join, Error> {
        if !source.is_compatible_with(&self.source) {
            return Err(Error::IncompatibleJoin {
                source_view: source.to_string(),
                target: self.target.to_string(),
                predicate: self.predicate.function_type().to_string(),
            });
        }
        let predicate = self.predicate.map_leaves(&mut |leaf| match leaf {
            Expression::Relinked { .. } => leaf.bind(&source),
            plain => plain.clone(),
        });
        Ok(Join {
            name: self.name.clone(),
            source,
            target: self.target.clone(),
            predicate,
        })
    }

    /// The predicate with its sides pinned to the given instances.
    pub(crate) fn predicate_between(&self, source: &View, target: &View) -> Expression {
        self.predicate.map_leaves(&mut |leaf| match leaf {
            Expression::Relinked { .. } => leaf.bind(source),
            plain => plain.bind(target),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function_type::FunctionType;
    use crate::helpers::equals;
    use crate::view::Table;

    #[test]
    fn it_infers_the_source_from_the_predicate() {
        let a = Table::new("a");
        let b = Table::new("b");
        let join = Join::infer(
            View::Table(b.clone()),
            equals(a.column("ID"), b.column("A_ID_FK")),
        )
        .unwrap();
        assert_eq!(*join.source(), View::Table(a.clone()));
        let expected: FunctionType = [View::Table(a), View::Table(b)].into_iter().collect();
        assert_eq!(join.predicate().function_type(), expected);
    }

    #[test]
    fn it_fails_to_infer_without_exactly_one_candidate() {
        let a = Table::new("a");
        let b = Table::new("b");
        let c = Table::new("c");
        let none = Join::infer(
            View::Table(a.clone()),
            equals(a.column("ID"), a.column("PARENT_ID")),
        );
        assert_eq!(
            none.unwrap_err(),
            Error::JoinSourceInference {
                target: "[TABLE 'a']".to_string(),
                candidates: 0
            }
        );
        let two = Join::infer(View::Table(a), equals(b.column("ID"), c.column("B_ID")));
        assert!(matches!(
            two,
            Err(Error::JoinSourceInference { candidates: 2, .. })
        ));
    }

    #[test]
    fn it_rejects_predicates_foreign_to_the_join() {
        let a = Table::new("a");
        let b = Table::new("b");
        let c = Table::new("c");
        let join = Join::new(
            View::Table(a),
            View::Table(b.clone()),
            equals(c.column("ID"), b.column("C_ID")),
        );
        assert!(matches!(join, Err(Error::IncompatibleJoin { .. })));
    }

    #[test]
    fn it_rejects_an_unbound_self_join() {
        let people = Table::new("people");
        let join = Join::new(
            View::Table(people.clone()),
            View::Table(people.clone()),
            equals(people.column("MANAGER_ID_FK"), people.column("ID")),
        );
        assert!(matches!(join, Err(Error::AmbiguousJoin { .. })));
    }

    #[test]
    fn it_swaps_sides_on_opposite() {
        let first = Table::new("first").pk(&["ID"]).unwrap();
        let second = Table::new("second");
        let join = first.join(&second.fk(&["FIRST_ID_FK"])).unwrap();
        let opposite = join.opposite();
        assert_eq!(*opposite.source(), View::Table(first));
        assert_eq!(*opposite.target(), View::Table(second));
        assert_eq!(opposite.predicate(), join.predicate());
        assert_eq!(opposite.opposite(), join);
    }

    #[test]
    fn it_changes_source_to_a_compatible_view() {
        let people = Table::new("people").pk(&["ID"]).unwrap();
        let department = Table::new("department").pk(&["ID"]).unwrap();
        let people_department = department.join(&people.fk(&["DEPARTMENT_ID_FK"])).unwrap();
        let manager = people.join(&department.fk(&["MANAGER_ID_FK"])).unwrap();
        let rebased = manager
            .change_source(View::from(&people_department))
            .unwrap();
        assert_eq!(*rebased.source(), View::from(&people_department));
        assert!(manager
            .change_source(View::Table(Table::new("other")))
            .is_err());
    }
}
