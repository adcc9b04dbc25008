//! Convert expressions, views and selects to SQL text.

use crate::error::Error;
use crate::expression::{Expression, Fixity, Operator};
use crate::precedence;
use crate::scope::{Mapping, Scope};
use crate::select::{FromClause, Select, SelectClause};
use crate::string::PrintResult;
use crate::view::View;

// Expressions //

impl Expression {
    /// Print against `scope`. Unresolved references are recorded in `sql`
    /// and printed without an alias.
    pub fn to_sql(&self, scope: &Scope, sql: &mut PrintResult) {
        match self {
            Expression::Constant(value) => sql.append_constant(value),
            Expression::Apply {
                operator,
                arguments,
            } => apply_to_sql(operator, arguments, scope, sql),
            Expression::Column(_) | Expression::Star(_) | Expression::Selection(_) => {
                match scope.resolves_leaf(self) {
                    Ok(mapping) => leaf_to_sql(self, Some(mapping), sql),
                    Err(error) => {
                        sql.error_at_position(error);
                        leaf_to_sql(self, None, sql);
                    }
                }
            }
            Expression::Relinked { expression, view } => match scope.resolves_bound(view) {
                Ok(mapping) => leaf_to_sql(expression, Some(mapping), sql),
                Err(error) => {
                    sql.error_at_position(error);
                    leaf_to_sql(expression, None, sql);
                }
            },
            Expression::Scoped { scope, expression } => expression.to_sql(scope, sql),
            Expression::View(view) => view.to_sql(scope, sql),
        }
    }
}

/// `alias.name`, or just `name` when there is no mapping.
fn leaf_to_sql(leaf: &Expression, mapping: Option<&Mapping>, sql: &mut PrintResult) {
    let qualify = |sql: &mut PrintResult| {
        if let Some(mapping) = mapping {
            sql.append_syntax(mapping.alias());
            sql.dot();
        }
    };
    match leaf {
        Expression::Column(column) => {
            qualify(sql);
            sql.append_identifier(column.name(), column.table().properties());
        }
        Expression::Star(_) => {
            qualify(sql);
            sql.append_syntax("*");
        }
        Expression::Selection(selection) => match selection.name() {
            Some(name) => {
                qualify(sql);
                sql.append_identifier(name, &selection.view().database_properties());
            }
            None => sql.error(Error::UnnamedReference(selection.view().to_string())),
        },
        other => sql.error(Error::NotSupported(format!("printing {other} as a reference"))),
    }
}

/// Print `argument`, in parentheses if it binds looser than its parent.
fn enclosed(argument: &Expression, parent: u8, scope: &Scope, sql: &mut PrintResult) {
    if argument.precedence() > parent {
        sql.append_syntax("(");
        argument.to_sql(scope, sql);
        sql.append_syntax(")");
    } else {
        argument.to_sql(scope, sql);
    }
}

fn apply_to_sql(
    operator: &Operator,
    arguments: &[Expression],
    scope: &Scope,
    sql: &mut PrintResult,
) {
    let symbol = operator.symbol();
    let precedence = operator.precedence();
    match operator.fixity() {
        Fixity::Prefix => {
            sql.append_syntax(symbol);
            for argument in arguments {
                sql.space();
                enclosed(argument, precedence, scope, sql);
            }
        }
        Fixity::Postfix => {
            for argument in arguments {
                enclosed(argument, precedence, scope, sql);
                sql.space();
            }
            sql.append_syntax(symbol);
        }
        Fixity::Function => {
            sql.append_syntax(symbol);
            sql.append_syntax("(");
            if *operator == Operator::CountDistinct {
                sql.append_syntax("DISTINCT ");
            }
            for (index, argument) in arguments.iter().enumerate() {
                if index > 0 {
                    sql.comma();
                }
                argument.to_sql(scope, sql);
            }
            sql.append_syntax(")");
        }
        Fixity::Infix => {
            for (index, argument) in arguments.iter().enumerate() {
                if index > 0 {
                    sql.append_syntax(symbol);
                }
                enclosed(argument, precedence, scope, sql);
            }
        }
        Fixity::InfixFunction if *operator == Operator::In => {
            if let Some((value, list)) = arguments.split_first() {
                enclosed(value, precedence, scope, sql);
                sql.append_syntax(" IN (");
                for (index, argument) in list.iter().enumerate() {
                    if index > 0 {
                        sql.comma();
                    }
                    argument.to_sql(scope, sql);
                }
                sql.append_syntax(")");
            }
        }
        Fixity::InfixFunction => {
            for (index, argument) in arguments.iter().enumerate() {
                if index > 0 {
                    sql.space();
                    sql.append_syntax(symbol);
                    sql.space();
                }
                enclosed(argument, precedence, scope, sql);
            }
        }
    }
}

// Views //

impl View {
    pub fn to_sql(&self, scope: &Scope, sql: &mut PrintResult) {
        match self {
            View::Table(table) => sql.append_identifier(table.name(), table.properties()),
            View::Concrete(concrete) => {
                let model = concrete.model();
                sql.append_identifier(model.name(), model.properties());
            }
            View::Join(join) => {
                sql.append_syntax("INNER JOIN ");
                join.target().to_sql(scope, sql);
                sql.append_syntax(" ON ");
                join.predicate().to_sql(scope, sql);
            }
            View::Select(select) => select.to_sql(sql),
        }
    }
}

// Select //

impl Select {
    /// Print the statement with its own scope.
    pub fn to_sql(&self, sql: &mut PrintResult) {
        sql.append_syntax("SELECT");
        let projection = self.projection();
        for (index, clause) in projection.iter().enumerate() {
            if index > 0 {
                sql.comma();
            }
            sql.space();
            clause.to_sql(sql);
        }

        sql.append_syntax(" FROM");
        if self.from.is_empty() {
            sql.error(Error::MissingFrom);
        }
        for (index, clause) in self.from.iter().enumerate() {
            if index > 0 && !clause.is_join() {
                sql.comma();
            }
            sql.space();
            clause.to_sql(sql);
        }

        if !self.where_.is_empty() {
            sql.append_syntax(" WHERE ");
            conjunction_to_sql(&self.where_, sql);
        }

        if !self.group_by.is_empty() {
            sql.append_syntax(" GROUP BY");
            for (index, expression) in self.group_by.iter().enumerate() {
                if index > 0 {
                    sql.comma();
                }
                sql.space();
                expression.to_sql(&self.scope, sql);
            }
        }

        if !self.having.is_empty() {
            sql.append_syntax(" HAVING ");
            conjunction_to_sql(&self.having, sql);
        }
    }

    /// The explicit projection, or a default one: every known selector of each
    /// source that prints in its scope, or `alias.*` when there is none.
    fn projection(&self) -> Vec<SelectClause> {
        if !self.selection.is_empty() {
            return self.selection.clone();
        }
        let mut aliases = self.aliases.clone();
        let mut projection = vec![];
        for clause in &self.from {
            let selectors: Vec<Expression> = clause
                .view
                .selectors()
                .into_iter()
                .filter(|selector| prints_cleanly(selector, &clause.scope))
                .collect();
            if selectors.is_empty() {
                projection.push(SelectClause {
                    definition: Expression::Star(clause.view.clone()),
                    alias: None,
                    scope: clause.scope.clone(),
                });
            }
            for selector in selectors {
                let alias = aliases.alias(selector.name());
                projection.push(SelectClause {
                    definition: selector,
                    alias,
                    scope: clause.scope.clone(),
                });
            }
        }
        projection
    }
}

fn prints_cleanly(expression: &Expression, scope: &Scope) -> bool {
    let mut scratch = PrintResult::new();
    expression.to_sql(scope, &mut scratch);
    !scratch.has_errors()
}

/// Predicates joined with `AND`. A single predicate is printed as is.
fn conjunction_to_sql(predicates: &[Expression], sql: &mut PrintResult) {
    let scope = Scope::new();
    if let [predicate] = predicates {
        predicate.to_sql(&scope, sql);
        return;
    }
    for (index, predicate) in predicates.iter().enumerate() {
        if index > 0 {
            sql.append_syntax(" AND ");
        }
        enclosed(predicate, precedence::AND, &scope, sql);
    }
}

impl SelectClause {
    pub fn to_sql(&self, sql: &mut PrintResult) {
        self.definition.to_sql(&self.scope, sql);
        if self.needs_alias() {
            if let Some(alias) = &self.alias {
                sql.append_syntax(" AS ");
                sql.append_syntax(alias);
            }
        }
    }
}

impl FromClause {
    pub fn to_sql(&self, sql: &mut PrintResult) {
        match (&self.view, &self.on) {
            (View::Join(join), Some(predicate)) => {
                sql.append_syntax("INNER JOIN ");
                source_to_sql(join.target(), &self.scope, sql);
                sql.space();
                sql.append_syntax(&self.alias);
                sql.append_syntax(" ON ");
                predicate.to_sql(&self.scope, sql);
            }
            (view, _) => {
                source_to_sql(view, &self.scope, sql);
                sql.space();
                sql.append_syntax(&self.alias);
            }
        }
    }
}

/// A FROM source, in parentheses when it is a statement.
fn source_to_sql(view: &View, scope: &Scope, sql: &mut PrintResult) {
    if view.precedence() < precedence::VIEW {
        sql.append_syntax("(");
        view.to_sql(scope, sql);
        sql.append_syntax(")");
    } else {
        view.to_sql(scope, sql);
    }
}
