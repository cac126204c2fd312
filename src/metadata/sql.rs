// Copyright (c) 2025 ADBC Drivers Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! SQL statement builder for the column metadata query.
//!
//! Renders a fixed `INFORMATION_SCHEMA.COLUMNS` query. The configured
//! where-clause suffix is inserted verbatim between the `FROM` clause and
//! the `ORDER BY`, so callers can filter (for example by schema) without
//! touching the template.

/// Result column aliases produced by the query.
pub const SCHEMA_COLUMN: &str = "schema";
pub const TABLE_NAME_COLUMN: &str = "name";
pub const COLUMN_NAME_COLUMN: &str = "col_name";
pub const COLUMN_TYPE_COLUMN: &str = "col_type";
pub const SORT_ORDER_COLUMN: &str = "col_sort_order";

/// Builds the column metadata query.
///
/// # Examples
///
/// ```ignore
/// let sql = SqlStatementBuilder::new()
///     .with_where_clause_suffix(Some("WHERE TABLE_SCHEMA = 'druid'"))
///     .build();
/// assert!(sql.contains("FROM INFORMATION_SCHEMA.COLUMNS\nWHERE TABLE_SCHEMA = 'druid'\n"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SqlStatementBuilder {
    where_clause_suffix: Option<String>,
}

impl SqlStatementBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text appended after the `FROM` clause. `None` appends nothing.
    pub fn with_where_clause_suffix(mut self, suffix: Option<&str>) -> Self {
        self.where_clause_suffix = suffix.map(|s| s.to_string());
        self
    }

    /// Build the query. Rows come back ordered by schema, table name and
    /// numeric ordinal position, which the grouping engine relies on.
    pub fn build(&self) -> String {
        format!(
            "SELECT\n\
             TABLE_SCHEMA as {SCHEMA_COLUMN},\n\
             TABLE_NAME as {TABLE_NAME_COLUMN},\n\
             COLUMN_NAME as {COLUMN_NAME_COLUMN},\n\
             DATA_TYPE as {COLUMN_TYPE_COLUMN},\n\
             ORDINAL_POSITION as {SORT_ORDER_COLUMN}\n\
             FROM INFORMATION_SCHEMA.COLUMNS\n\
             {suffix}\n\
             order by TABLE_SCHEMA, TABLE_NAME, CAST(ORDINAL_POSITION AS int)\n",
            suffix = self.where_clause_suffix.as_deref().unwrap_or("")
        )
    }
}
