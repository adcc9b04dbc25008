//! Type definitions of a low-level SQL string representation.

use query_builder_configuration::DatabaseProperties;

use crate::error::Error;
use crate::expression::Value;

/// Quote used around string literals. Not configurable.
pub const LITERAL_QUOTE: char = '\'';

/// An output buffer for generated SQL.
///
/// Errors found while printing are recorded instead of aborting the traversal,
/// so that the partial text is still available for diagnostics. Only the final
/// call to [`PrintResult::print`] fails.
#[derive(Debug, Default, PartialEq)]
pub struct PrintResult {
    pub sql: String,
    errors: Vec<Error>,
}

impl PrintResult {
    pub fn new() -> PrintResult {
        PrintResult {
            sql: String::new(),
            errors: vec![],
        }
    }

    pub fn append_syntax(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    pub fn space(&mut self) {
        self.sql.push(' ');
    }

    pub fn comma(&mut self) {
        self.sql.push(',');
    }

    pub fn dot(&mut self) {
        self.sql.push('.');
    }

    /// Append a table or column name, quoted when the database asks for it.
    pub fn append_identifier(&mut self, name: &str, properties: &DatabaseProperties) {
        if properties.quote_identifiers {
            let quote = &properties.identifier_quote;
            self.sql.push_str(quote);
            self.sql.push_str(name);
            self.sql.push_str(quote);
        } else {
            self.sql.push_str(name);
        }
    }

    pub fn append_constant(&mut self, value: &Value) {
        match value {
            Value::String(s) => {
                self.sql.push(LITERAL_QUOTE);
                for c in s.chars() {
                    if c == LITERAL_QUOTE {
                        self.sql.push(LITERAL_QUOTE);
                    }
                    self.sql.push(c);
                }
                self.sql.push(LITERAL_QUOTE);
            }
            Value::Integer(i) => self.sql.push_str(&i.to_string()),
            Value::Float(f) => self.sql.push_str(&f.to_string()),
            Value::Boolean(true) => self.sql.push_str("TRUE"),
            Value::Boolean(false) => self.sql.push_str("FALSE"),
            Value::Null => self.sql.push_str("NULL"),
        }
    }

    /// Record an error and carry on.
    pub fn error(&mut self, error: Error) {
        self.errors.push(error);
    }

    /// Record an error tagged with the current buffer position.
    pub fn error_at_position(&mut self, error: Error) {
        let position = self.sql.len();
        self.errors.push(Error::Positioned {
            message: error.to_string(),
            position,
        });
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sql.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Extract the generated text, failing with the first recorded error.
    pub fn print(self) -> Result<String, Error> {
        match self.errors.into_iter().next() {
            None => Ok(self.sql),
            Some(first) => Err(Error::Print {
                message: first.to_string(),
                partial: self.sql,
            }),
        }
    }
}
