use uuid::Uuid;

use crate::store::error::StoreError;

/// A bindable column value
///
/// Every column the store reads or writes is one of these, which keeps the
/// generic SQL path free of per-entity binding code.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Uuid(Uuid),
    Text(String),
    NullableText(Option<String>),
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Option<String>> for Value {
    fn from(v: Option<String>) -> Self {
        Value::NullableText(v)
    }
}

/// Sort order options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Filter {
    /// column = value
    Eq(&'static str, Value),
    /// column ILIKE pattern, case-insensitive; `%` and `_` are wildcards
    ILike(&'static str, String),
}

/// Selection criteria for `find_one` and `list`
///
/// Filters are ANDed. Without an explicit order rows come back
/// newest-first by `created_at`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    filters: Vec<Filter>,
    order: Option<(&'static str, SortOrder)>,
    limit: Option<u32>,
    offset: u32,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: Uuid) -> Self {
        Self::new().eq("id", id)
    }

    /// Exact equality on a column
    pub fn eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(column, value.into()));
        self
    }

    /// Case-insensitive pattern match on a text column
    pub fn ilike(mut self, column: &'static str, pattern: impl Into<String>) -> Self {
        self.filters.push(Filter::ILike(column, pattern.into()));
        self
    }

    pub fn order_by(mut self, column: &'static str, order: SortOrder) -> Self {
        self.order = Some((column, order));
        self
    }

    /// Page is 1-indexed; page 0 is treated as page 1
    pub fn paginate(mut self, page: u32, limit: u32) -> Self {
        self.limit = Some(limit);
        self.offset = page.saturating_sub(1).saturating_mul(limit);
        self
    }

    pub(crate) fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// SQL builder for constructing parameterized SELECT statements
/// over one table, driven by a `Criteria`
pub struct SelectBuilder {
    table: &'static str,
    columns: &'static [&'static str],
    where_clauses: Vec<String>,
    params: Vec<Value>,
    order_clause: String,
    limit: Option<u32>,
    offset: u32,
}

impl SelectBuilder {
    /// Creates a builder for `table`. `columns` is both the select list
    /// and the whitelist criteria columns are checked against.
    pub fn new(table: &'static str, columns: &'static [&'static str]) -> Self {
        Self {
            table,
            columns,
            where_clauses: Vec::new(),
            params: Vec::new(),
            order_clause: "created_at DESC".to_string(),
            limit: None,
            offset: 0,
        }
    }

    /// Applies every filter, the ordering and pagination from `criteria`
    pub fn apply(mut self, criteria: &Criteria) -> Result<Self, StoreError> {
        for filter in &criteria.filters {
            match filter {
                Filter::Eq(column, value) => {
                    self.check_column(column)?;
                    let param_index = self.params.len() + 1;
                    self.where_clauses.push(format!("{} = ${}", column, param_index));
                    self.params.push(value.clone());
                }
                Filter::ILike(column, pattern) => {
                    self.check_column(column)?;
                    let param_index = self.params.len() + 1;
                    self.where_clauses.push(format!("{} ILIKE ${}", column, param_index));
                    self.params.push(Value::Text(pattern.clone()));
                }
            }
        }

        if let Some((column, order)) = criteria.order {
            self.check_column(column)?;
            self.order_clause = format!("{} {}", column, order.as_sql());
        }

        self.limit = criteria.limit;
        self.offset = criteria.offset;
        Ok(self)
    }

    fn check_column(&self, column: &'static str) -> Result<(), StoreError> {
        if self.columns.contains(&column) {
            Ok(())
        } else {
            Err(StoreError::UnknownColumn(column))
        }
    }

    /// Builds the final SQL string and the parameters to bind, in order
    pub fn build(self) -> (String, Vec<Value>) {
        let mut query = format!("SELECT {} FROM {}", self.columns.join(", "), self.table);

        if !self.where_clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&self.where_clauses.join(" AND "));
        }

        query.push_str(" ORDER BY ");
        query.push_str(&self.order_clause);

        // LIMIT/OFFSET are integers we computed, not user text
        if let Some(limit) = self.limit {
            query.push_str(&format!(" LIMIT {}", limit));
            query.push_str(&format!(" OFFSET {}", self.offset));
        }

        (query, self.params)
    }
}

/// `$1, $2, ... $n`
pub(crate) fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|i| format!("${}", i))
        .collect::<Vec<_>>()
        .join(", ")
}
