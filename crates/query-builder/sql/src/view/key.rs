//! Primary and foreign keys.

use super::View;
use crate::expression::Expression;

/// An ordered list of key expressions owned by a view.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    view: View,
    keys: Vec<Expression>,
}

impl Key {
    pub fn new(view: View, keys: Vec<Expression>) -> Key {
        Key { view, keys }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn keys(&self) -> &[Expression] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}
