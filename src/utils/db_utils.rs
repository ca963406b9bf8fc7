use chrono::NaiveDate;
use sqlx::MySql;
use sqlx::mysql::MySqlArguments;
use sqlx::query::QueryAs;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    Date(NaiveDate),
}

/// ===============================
/// SQL select container
/// ===============================
#[derive(Debug, Default)]
pub struct SqlSelect {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Accumulates `column = ?` conditions for a dynamic WHERE clause.
#[derive(Debug, Default)]
pub struct WhereBuilder {
    conditions: Vec<String>,
    values: Vec<SqlValue>,
}

impl WhereBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: Option<SqlValue>) -> Self {
        if let Some(value) = value {
            self.conditions.push(format!("{column} = ?"));
            self.values.push(value);
        }
        self
    }

    /// Appends the WHERE clause (if any) and the trailing clause to `base`.
    pub fn build(self, base: &str, tail: &str) -> SqlSelect {
        let mut sql = base.to_string();
        if !self.conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.conditions.join(" AND "));
        }
        if !tail.is_empty() {
            sql.push(' ');
            sql.push_str(tail);
        }

        SqlSelect {
            sql,
            values: self.values,
        }
    }
}

/// Binds values in order onto a typed query.
pub fn bind_values<'q, O>(
    mut query: QueryAs<'q, MySql, O, MySqlArguments>,
    values: Vec<SqlValue>,
) -> QueryAs<'q, MySql, O, MySqlArguments> {
    for value in values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_conditions_means_no_where_clause() {
        let select = WhereBuilder::new()
            .eq("date", None)
            .build("SELECT * FROM attendance", "ORDER BY date DESC");
        assert_eq!(select.sql, "SELECT * FROM attendance ORDER BY date DESC");
        assert!(select.values.is_empty());
    }

    #[test]
    fn conditions_are_joined_in_order() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let select = WhereBuilder::new()
            .eq("date", Some(SqlValue::Date(date)))
            .eq("employee_id", None)
            .eq("status", Some(SqlValue::String("Present".into())))
            .build("SELECT * FROM attendance", "");
        assert_eq!(
            select.sql,
            "SELECT * FROM attendance WHERE date = ? AND status = ?"
        );
        assert_eq!(
            select.values,
            vec![SqlValue::Date(date), SqlValue::String("Present".into())]
        );
    }
}
