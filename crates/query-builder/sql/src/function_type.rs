//! The ordered set of views an expression depends on.

use std::fmt;

use crate::view::View;

/// Free variables of an expression, in order of first appearance.
///
/// A one-element type compares equal to the view it contains.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionType {
    views: Vec<View>,
}

impl FunctionType {
    pub fn new() -> FunctionType {
        FunctionType { views: vec![] }
    }

    /// Add a view unless an equal one is already present.
    #[must_use]
    pub fn add(mut self, view: View) -> FunctionType {
        self.push(view);
        self
    }

    fn push(&mut self, view: View) {
        if !self.contains(&view) {
            self.views.push(view);
        }
    }

    /// Ordered union.
    pub fn extend(&mut self, other: &FunctionType) {
        for view in &other.views {
            self.push(view.clone());
        }
    }

    pub fn contains(&self, view: &View) -> bool {
        self.views.iter().any(|v| v == view)
    }

    /// True if any element is compatible with `view`.
    pub fn is_compatible_with(&self, view: &View) -> bool {
        self.views.iter().any(|v| v.is_compatible_with(view))
    }

    pub fn head(&self) -> Option<&View> {
        self.views.first()
    }

    pub fn tail(&self) -> Option<&View> {
        self.views.last()
    }

    pub fn values(&self) -> &[View] {
        &self.views
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl From<View> for FunctionType {
    fn from(view: View) -> FunctionType {
        FunctionType { views: vec![view] }
    }
}

impl FromIterator<View> for FunctionType {
    fn from_iter<I: IntoIterator<Item = View>>(iter: I) -> FunctionType {
        let mut result = FunctionType::new();
        for view in iter {
            result.push(view);
        }
        result
    }
}

impl PartialEq<View> for FunctionType {
    fn eq(&self, view: &View) -> bool {
        self.views.len() == 1 && self.views[0] == *view
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (index, view) in self.views.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{view}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{ConcreteTable, Table};

    #[test]
    fn it_equals_when_same_views_in_same_order() {
        let a = View::Table(Table::new("A"));
        let b = View::Table(Table::new("B"));
        let ab: FunctionType = [a.clone(), b.clone()].into_iter().collect();
        assert_eq!(
            ab,
            FunctionType::from(View::Table(Table::new("A"))).add(View::Table(Table::new("B")))
        );
        assert_ne!(ab, [b, a].into_iter().collect::<FunctionType>());
    }

    #[test]
    fn it_ignores_duplicates() {
        let a = View::Table(Table::new("A"));
        let aa = FunctionType::from(a.clone()).add(View::Table(Table::new("A")));
        assert_eq!(aa.len(), 1);
        assert_eq!(aa, a);
        assert_eq!(aa.head(), aa.tail());
    }

    #[test]
    fn it_is_compatible_through_inheritance() {
        let people = Table::new("people");
        let concrete = View::Concrete(ConcreteTable::new(&people));
        let t = FunctionType::from(concrete);
        assert!(t.is_compatible_with(&View::Table(people)));
        assert!(!t.is_compatible_with(&View::Table(Table::new("other"))));
    }
}
