//! Tables with a frozen set of columns.

use super::{Key, Table};
use crate::error::Error;
use crate::expression::Column;

/// A table whose selectors are fixed when it is created.
///
/// Selecting a column the model did not declare is an error, and the default
/// projection lists every model column.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcreteTable {
    model: Table,
}

impl ConcreteTable {
    pub fn new(model: &Table) -> ConcreteTable {
        ConcreteTable {
            model: model.copy(),
        }
    }

    pub fn model(&self) -> &Table {
        &self.model
    }

    pub fn name(&self) -> &str {
        self.model.name()
    }

    pub fn column(&self, name: &str) -> Result<Column, Error> {
        if self.model.has_column(name) {
            Ok(self.model.column(name))
        } else {
            Err(Error::UndefinedColumn {
                column: name.to_string(),
                table: self.model.name().to_string(),
            })
        }
    }

    pub fn columns(&self) -> Vec<Column> {
        self.model.columns()
    }

    pub fn primary_key(&self) -> Key {
        self.model.primary_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::View;

    fn people() -> Table {
        let people = Table::new("people").pk(&["ID"]).unwrap();
        people.column("name");
        people.column("city");
        people.column("revenue");
        people
    }

    #[test]
    fn it_inherits_from_its_model() {
        let people = people();
        let concrete = ConcreteTable::new(&people);
        let view = View::Concrete(concrete.clone());
        assert!(view.inherits_from(&View::Table(people.clone())));
        assert!(view.is_compatible_with(&View::Table(people)));
        assert_eq!(view.function_type(), view);
    }

    #[test]
    fn it_freezes_the_model_columns() {
        let people = people();
        let concrete = ConcreteTable::new(&people);
        people.column("added_later");
        assert_eq!(
            concrete
                .columns()
                .iter()
                .map(Column::name)
                .collect::<Vec<_>>(),
            vec!["ID", "name", "city", "revenue"]
        );
        assert!(concrete.column("added_later").is_err());
    }

    #[test]
    fn it_rejects_undefined_columns() {
        let concrete = ConcreteTable::new(&people());
        assert_eq!(
            concrete.column("undefined").unwrap_err(),
            Error::UndefinedColumn {
                column: "undefined".to_string(),
                table: "people".to_string()
            }
        );
        assert_eq!(concrete.column("city").unwrap().name(), "city");
    }
}
