use chrono::{DateTime, Utc};
use sqlx::MySql;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug)]
pub enum SqlValue {
    String(String),
    I64(i64),
    DateTime(DateTime<Utc>),
}

/// ===============================
/// Dynamic UPDATE builder for PATCH endpoints
/// ===============================
///
/// Column names are supplied by handlers as static strings, never from
/// request payloads.
#[derive(Debug)]
pub struct UpdateBuilder {
    table: &'static str,
    sets: Vec<(&'static str, SqlValue)>,
}

impl UpdateBuilder {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            sets: Vec::new(),
        }
    }

    pub fn set(&mut self, column: &'static str, value: SqlValue) -> &mut Self {
        self.sets.push((column, value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Execute `UPDATE <table> SET ... WHERE id = ?`, returning affected rows.
    /// Takes any executor so callers can run inside an open transaction.
    pub async fn execute<'e, E>(self, executor: E, id: &str) -> Result<u64, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = MySql>,
    {
        let set_clause = self
            .sets
            .iter()
            .map(|(column, _)| format!("{} = ?", column))
            .collect::<Vec<_>>()
            .join(", ");

        let sql = format!("UPDATE {} SET {} WHERE id = ?", self.table, set_clause);

        let mut query = sqlx::query(&sql);
        for (_, value) in self.sets {
            query = match value {
                SqlValue::String(v) => query.bind(v),
                SqlValue::I64(v) => query.bind(v),
                SqlValue::DateTime(v) => query.bind(v),
            };
        }
        query = query.bind(id);

        let result = query.execute(executor).await?;
        Ok(result.rows_affected())
    }
}
