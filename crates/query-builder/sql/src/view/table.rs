//! Tables bound to an actual database relation.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexSet;
use query_builder_configuration::DatabaseProperties;

use super::{Join, Key, View};
use crate::error::Error;
use crate::expression::{Column, Expression};
use crate::helpers;

/// A database table.
///
/// Tables compare by name only. A `Table` is a cheap handle: clones share the
/// same column registry, while [`Table::copy`] creates an independent one.
#[derive(Clone)]
pub struct Table(Rc<TableInner>);

#[derive(Debug)]
struct TableInner {
    name: String,
    properties: DatabaseProperties,
    columns: RefCell<IndexSet<String>>,
    primary_key: RefCell<Option<Vec<String>>>,
}

impl Table {
    pub fn new(name: &str) -> Table {
        Table::with_properties(name, DatabaseProperties::default())
    }

    pub fn with_properties(name: &str, properties: DatabaseProperties) -> Table {
        Table(Rc::new(TableInner {
            name: name.to_string(),
            properties,
            columns: RefCell::new(IndexSet::new()),
            primary_key: RefCell::new(None),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn properties(&self) -> &DatabaseProperties {
        &self.0.properties
    }

    /// Get a column, registering it on first use.
    pub fn column(&self, name: &str) -> Column {
        self.0.columns.borrow_mut().insert(name.to_string());
        Column::new(self.clone(), name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.0.columns.borrow().contains(name)
    }

    /// Registered columns, in registration order.
    pub fn columns(&self) -> Vec<Column> {
        self.0
            .columns
            .borrow()
            .iter()
            .map(|name| Column::new(self.clone(), name))
            .collect()
    }

    // Keys //

    /// Declare the primary key by column names. A table has at most one.
    pub fn pk(&self, names: &[&str]) -> Result<Table, Error> {
        self.check_no_primary_key()?;
        let columns: Vec<Column> = names.iter().map(|name| self.column(name)).collect();
        self.pk_columns(&columns)
    }

    /// Declare the primary key from columns, which must belong to this table.
    pub fn pk_columns(&self, columns: &[Column]) -> Result<Table, Error> {
        self.check_no_primary_key()?;
        if columns.is_empty() {
            return Err(Error::EmptyList);
        }
        if let Some(foreign) = columns.iter().find(|column| column.table() != self) {
            return Err(Error::ForeignColumn {
                column: foreign.name().to_string(),
                table: self.name().to_string(),
            });
        }
        let names = columns
            .iter()
            .map(|column| self.column(column.name()).name().to_string())
            .collect();
        *self.0.primary_key.borrow_mut() = Some(names);
        Ok(self.clone())
    }

    fn check_no_primary_key(&self) -> Result<(), Error> {
        if self.0.primary_key.borrow().is_some() {
            return Err(Error::PrimaryKeyAlreadyDefined {
                table: self.name().to_string(),
            });
        }
        Ok(())
    }

    /// The declared primary key, empty if there is none.
    pub fn primary_key(&self) -> Key {
        let keys = match &*self.0.primary_key.borrow() {
            Some(names) => names
                .iter()
                .map(|name| Column::new(self.clone(), name).into())
                .collect(),
            None => vec![],
        };
        Key::new(View::Table(self.clone()), keys)
    }

    /// A foreign key made of the named columns of this table.
    pub fn fk(&self, names: &[&str]) -> Key {
        Key::new(
            View::Table(self.clone()),
            names.iter().map(|name| self.column(name).into()).collect(),
        )
    }

    // Joins //

    /// Join this table to the view owning `foreign_key`.
    ///
    /// This table is the target and the key's view the source; the predicate
    /// equates this table's primary key with the foreign key.
    pub fn join(&self, foreign_key: &Key) -> Result<Join, Error> {
        let primary_key = self.primary_key();
        if primary_key.is_empty() {
            return Err(Error::MissingPrimaryKey {
                table: self.name().to_string(),
            });
        }
        let predicate = helpers::equals_lists(primary_key.keys(), foreign_key.keys())?;
        Join::new(
            foreign_key.view().clone(),
            View::Table(self.clone()),
            predicate,
        )
    }

    /// A named join from this table to another instance of `target`.
    ///
    /// The foreign key columns belong to this table and are pinned to it, so
    /// the join also works when `target` is this very table.
    pub fn join_as(&self, name: &str, target: &Table, foreign_key: &[&str]) -> Result<Join, Error> {
        let primary_key = target.primary_key();
        if primary_key.is_empty() {
            return Err(Error::MissingPrimaryKey {
                table: target.name().to_string(),
            });
        }
        let source = View::Table(self.clone());
        let foreign_key: Vec<Expression> = self
            .fk(foreign_key)
            .keys()
            .iter()
            .map(|key| key.bind(&source))
            .collect();
        let predicate = helpers::equals_lists(&foreign_key, primary_key.keys())?;
        Join::named(name, source, View::Table(target.clone()), predicate)
    }

    /// An independent table with the same name, columns and key.
    pub fn copy(&self) -> Table {
        Table(Rc::new(TableInner {
            name: self.0.name.clone(),
            properties: self.0.properties.clone(),
            columns: RefCell::new(self.0.columns.borrow().clone()),
            primary_key: RefCell::new(self.0.primary_key.borrow().clone()),
        }))
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Table) -> bool {
        self.0.name == other.0.name
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.0.name)
            .field("columns", &self.0.columns.borrow())
            .field("primary_key", &self.0.primary_key.borrow())
            .finish()
    }
}
