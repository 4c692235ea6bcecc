use chrono::NaiveDate;
use sqlx::MySql;
use sqlx::mysql::MySqlArguments;
use sqlx::query::{Query, QueryAs};

/// A value destined for a positional `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    U64(u64),
    I64(i64),
    F64(f64),
    Bool(bool),
    Str(String),
    Date(NaiveDate),
    Null,
}

impl From<u64> for SqlValue {
    fn from(v: u64) -> Self {
        SqlValue::U64(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::I64(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::F64(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Str(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Str(v.to_string())
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => SqlValue::Null,
        }
    }
}

/// AND-composed predicate list for dynamically filtered statements.
///
/// Predicate text is always a static fragment with `?` placeholders; the
/// matching values are bound positionally, never interpolated.
#[derive(Debug, Default)]
pub struct QueryFilters {
    conditions: Vec<&'static str>,
    values: Vec<SqlValue>,
}

impl QueryFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, predicate: &'static str, value: impl Into<SqlValue>) {
        self.conditions.push(predicate);
        self.values.push(value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// `""`, or `"WHERE a AND b"` when any predicate was supplied.
    pub fn where_clause(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// `""`, or `" AND a AND b"` for statements with a fixed leading predicate.
    pub fn and_clause(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" AND {}", self.conditions.join(" AND "))
        }
    }

    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }
}

pub fn bind_values<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    values: Vec<SqlValue>,
) -> Query<'q, MySql, MySqlArguments> {
    for value in values {
        query = match value {
            SqlValue::U64(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Str(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }
    query
}

pub fn bind_values_as<'q, T>(
    mut query: QueryAs<'q, MySql, T, MySqlArguments>,
    values: Vec<SqlValue>,
) -> QueryAs<'q, MySql, T, MySqlArguments> {
    for value in values {
        query = match value {
            SqlValue::U64(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Str(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filters_produce_no_clause() {
        let filters = QueryFilters::new();
        assert!(filters.is_empty());
        assert_eq!(filters.where_clause(), "");
        assert_eq!(filters.and_clause(), "");
        assert!(filters.into_values().is_empty());
    }

    #[test]
    fn supplied_predicates_are_and_composed_in_order() {
        let mut filters = QueryFilters::new();
        filters.push("a.site_id = ?", 7u64);
        filters.push("a.date >= ?", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        filters.push("a.date <= ?", NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());

        assert_eq!(
            filters.where_clause(),
            "WHERE a.site_id = ? AND a.date >= ? AND a.date <= ?"
        );
        assert_eq!(
            filters.and_clause(),
            " AND a.site_id = ? AND a.date >= ? AND a.date <= ?"
        );

        let values = filters.into_values();
        assert_eq!(values.len(), 3);
        assert_eq!(values[0], SqlValue::U64(7));
        assert_eq!(
            values[1],
            SqlValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );
    }

    #[test]
    fn single_predicate_has_no_trailing_and() {
        let mut filters = QueryFilters::new();
        filters.push("type = ?", "Incoming");
        assert_eq!(filters.where_clause(), "WHERE type = ?");
    }

    #[test]
    fn absent_options_become_null() {
        assert_eq!(SqlValue::from(None::<String>), SqlValue::Null);
        assert_eq!(
            SqlValue::from(Some("photo.jpg".to_string())),
            SqlValue::Str("photo.jpg".to_string())
        );
        assert_eq!(SqlValue::from(Some(3u64)), SqlValue::U64(3));
    }
}
