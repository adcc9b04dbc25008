//! Alias resolution.
//!
//! A [`Scope`] is a persistent chain of view-to-alias mappings. Adding a
//! mapping returns a new chain and leaves the original untouched, so a clause
//! can keep the scope it was accepted in while the Select grows.

mod alias;

use std::fmt;
use std::rc::Rc;

use crate::error::Error;
use crate::expression::Expression;
use crate::view::View;

pub use alias::AliasMap;

/// A view known under an alias.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    view: View,
    alias: String,
}

impl Mapping {
    pub fn new(view: View, alias: &str) -> Mapping {
        Mapping {
            view,
            alias: alias.to_string(),
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}->{}", self.view, self.alias)
    }
}

struct Node {
    mapping: Mapping,
    parent: Option<Rc<Node>>,
}

/// An immutable chain of mappings, most recent first.
#[derive(Clone, Default)]
pub struct Scope {
    head: Option<Rc<Node>>,
}

impl Scope {
    pub fn new() -> Scope {
        Scope::default()
    }

    /// A new scope with one more mapping on top of this one.
    #[must_use]
    pub fn add(&self, view: View, alias: &str) -> Scope {
        Scope {
            head: Some(Rc::new(Node {
                mapping: Mapping::new(view, alias),
                parent: self.head.clone(),
            })),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Mappings from the most recent to the oldest.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// The most recent mapping whose view is compatible with `view`.
    pub fn resolves(&self, view: &View) -> Result<&Mapping, Error> {
        self.iter()
            .find(|mapping| mapping.view.is_compatible_with(view))
            .ok_or_else(|| self.unresolved(view))
    }

    /// Like [`Scope::resolves`], but an exact match anywhere in the chain wins
    /// over a compatible one.
    pub fn resolves_bound(&self, view: &View) -> Result<&Mapping, Error> {
        match self.iter().find(|mapping| mapping.view == *view) {
            Some(mapping) => Ok(mapping),
            None => self.resolves(view),
        }
    }

    /// The mapping of exactly `view`, possibly reached through a join.
    ///
    /// A sub-select only answers for its own selectors, never for those of
    /// another statement over the same tables.
    pub fn resolves_exact(&self, view: &View) -> Result<&Mapping, Error> {
        self.iter()
            .find(|mapping| match &mapping.view {
                View::Join(join) => mapping.view == *view || join.target() == view,
                other => other == view,
            })
            .ok_or_else(|| self.unresolved(view))
    }

    /// The mapping a leaf prints against.
    pub(crate) fn resolves_leaf(&self, leaf: &Expression) -> Result<&Mapping, Error> {
        match leaf {
            Expression::Relinked { view, .. } => self.resolves_bound(view),
            Expression::Selection(selection) => self.resolves_exact(selection.view()),
            plain => match plain.leaf_view() {
                Some(owner) => self.resolves(&owner),
                None => Err(Error::NotSupported(format!("resolving {plain}"))),
            },
        }
    }

    pub fn can_resolve(&self, view: &View) -> bool {
        self.resolves(view).is_ok()
    }

    fn unresolved(&self, view: &View) -> Error {
        Error::Unresolved {
            view: view.to_string(),
            trail: self.to_string(),
        }
    }
}

pub struct Iter<'a> {
    next: Option<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Mapping;

    fn next(&mut self) -> Option<&'a Mapping> {
        let node = self.next?;
        self.next = node.parent.as_deref();
        Some(&node.mapping)
    }
}

impl<'a> IntoIterator for &'a Scope {
    type Item = &'a Mapping;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl PartialEq for Scope {
    fn eq(&self, other: &Scope) -> bool {
        match (&self.head, &other.head) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (index, mapping) in self.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{mapping}")?;
        }
        write!(f, "]")
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Scope{self}")
    }
}
