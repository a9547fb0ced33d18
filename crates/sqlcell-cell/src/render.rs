//! Predicate rendering for literal cells.

use sqlcell_core::{Dialect, Error, Literal, Result, Value};

use crate::cell::ValueCell;
use crate::operator::{CellId, Operator};

impl<T: Literal> ValueCell<T> {
    /// Render the cell's constraint as a WHERE-clause fragment for `column`.
    ///
    /// Returns an empty string when no operator is bound.
    pub fn render_predicate(&self, column: &str, dialect: &dyn Dialect) -> Result<String> {
        let Some(op) = self.operator() else {
            return Ok(String::new());
        };
        let column_sql = dialect.quote_identifier(column);
        let sql = self
            .render_operator(op, &column_sql, dialect)
            .map_err(|e| e.column(column))?;
        tracing::trace!(
            column,
            dialect = dialect.name(),
            operator = op.name(),
            sql = %sql,
            "Rendered predicate"
        );
        Ok(sql)
    }

    /// Render the root value as a literal, or the dialect's NULL.
    pub fn render_literal(&self, dialect: &dyn Dialect) -> String {
        let value = self.value().map_or(Value::Null, Literal::to_value);
        dialect.render_literal(&value, T::SQL_TYPE)
    }

    fn literal_of(&self, id: CellId) -> Option<Value> {
        self.node(id).value().map(Literal::to_value)
    }

    fn lit(&self, value: &Value, dialect: &dyn Dialect) -> String {
        dialect.render_literal(value, T::SQL_TYPE)
    }

    fn render_operator(&self, op: &Operator, col: &str, dialect: &dyn Dialect) -> Result<String> {
        let (fragment, negated) = match op {
            Operator::IsNull { negated } => return Ok(is_null_sql(col, *negated)),
            Operator::Equals { bound, negated } => match self.literal_of(*bound) {
                None => return Ok(is_null_sql(col, *negated)),
                Some(v) => (format!("{col} = {}", self.lit(&v, dialect)), *negated),
            },
            Operator::Range {
                lower,
                upper,
                lower_inclusive,
                upper_inclusive,
                negated,
            } => {
                let lower = lower.and_then(|id| self.literal_of(id)).map(|v| {
                    let cmp = if *lower_inclusive { ">=" } else { ">" };
                    format!("{col} {cmp} {}", self.lit(&v, dialect))
                });
                let upper = upper.and_then(|id| self.literal_of(id)).map(|v| {
                    let cmp = if *upper_inclusive { "<=" } else { "<" };
                    format!("{col} {cmp} {}", self.lit(&v, dialect))
                });
                let fragment = match (lower, upper) {
                    // NOT (...) already groups the conjunction.
                    (Some(lo), Some(hi)) if *negated => {
                        return Ok(format!("NOT ({lo} AND {hi})"));
                    }
                    (Some(lo), Some(hi)) => format!("({lo} AND {hi})"),
                    (Some(one), None) | (None, Some(one)) => one,
                    (None, None) => dialect.true_predicate().to_string(),
                };
                (fragment, *negated)
            }
            Operator::PermittedSet { members, negated } => {
                let literals: Vec<String> = members
                    .iter()
                    .filter_map(|id| self.literal_of(*id))
                    .map(|v| self.lit(&v, dialect))
                    .collect();
                let fragment = if literals.is_empty() {
                    dialect.false_predicate().to_string()
                } else {
                    format!("{col} IN ({})", literals.join(", "))
                };
                (fragment, *negated)
            }
            Operator::Pattern { template, negated } => {
                if !T::SQL_TYPE.is_textual() {
                    return Err(Error::UnsupportedPredicate {
                        operator: "pattern",
                        sql_type: T::SQL_TYPE,
                        column: None,
                    });
                }
                let fragment = match self.literal_of(*template) {
                    Some(v) => format!(
                        "{col} {} {}",
                        dialect.pattern_operator(),
                        self.lit(&v, dialect)
                    ),
                    None => dialect.false_predicate().to_string(),
                };
                (fragment, *negated)
            }
        };
        Ok(if negated {
            format!("NOT ({fragment})")
        } else {
            fragment
        })
    }
}

fn is_null_sql(col: &str, negated: bool) -> String {
    if negated {
        format!("{col} IS NOT NULL")
    } else {
        format!("{col} IS NULL")
    }
}
