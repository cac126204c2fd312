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

//! Data structures for Druid metadata extraction.
//!
//! [`RawRow`] is one row of `INFORMATION_SCHEMA.COLUMNS` as returned by the
//! row source. The grouping engine folds runs of rows into
//! [`TableMetadata`] records, each owning its [`ColumnMetadata`] in
//! ordinal order. The serialized field names of the two records are the
//! catalog ingestion contract and must not change.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the source system stamped on every table record.
pub const DRUID_DATABASE: &str = "druid";

/// One flat row from `INFORMATION_SCHEMA.COLUMNS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub schema: String,
    pub table_name: String,
    pub column_name: String,
    pub column_type: String,
    /// 1-based position of the column within its table.
    pub ordinal_position: i64,
}

impl RawRow {
    pub fn new(
        schema: impl Into<String>,
        table_name: impl Into<String>,
        column_name: impl Into<String>,
        column_type: impl Into<String>,
        ordinal_position: i64,
    ) -> Self {
        Self {
            schema: schema.into(),
            table_name: table_name.into(),
            column_name: column_name.into(),
            column_type: column_type.into(),
            ordinal_position,
        }
    }

    /// The grouping key of this row.
    pub fn key(&self) -> TableKey {
        TableKey {
            schema: self.schema.clone(),
            table_name: self.table_name.clone(),
        }
    }

    /// Returns `true` if this row belongs to the table identified by `key`.
    pub fn has_key(&self, key: &TableKey) -> bool {
        self.schema == key.schema && self.table_name == key.table_name
    }

    /// Converts this row into a column record with an empty description.
    pub fn into_column(self) -> ColumnMetadata {
        ColumnMetadata {
            name: self.column_name,
            description: String::new(),
            col_type: self.column_type,
            sort_order: self.ordinal_position,
        }
    }
}

/// Composite `(schema, table_name)` key used to group rows.
///
/// Ordering is lexicographic on schema, then table name, matching the
/// `ORDER BY` of the extraction query.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableKey {
    pub schema: String,
    pub table_name: String,
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table_name)
    }
}

/// Column record owned by a [`TableMetadata`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    /// Always empty: Druid exposes no column comments.
    pub description: String,
    #[serde(rename = "type")]
    pub col_type: String,
    pub sort_order: i64,
}

/// Table record produced by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub database: String,
    pub cluster: String,
    pub schema: String,
    pub name: String,
    /// Always empty: Druid exposes no table comments.
    pub description: String,
    pub columns: Vec<ColumnMetadata>,
}

impl TableMetadata {
    /// Builds a Druid table record for `key` with no description.
    pub fn druid(cluster: impl Into<String>, key: TableKey, columns: Vec<ColumnMetadata>) -> Self {
        Self {
            database: DRUID_DATABASE.to_string(),
            cluster: cluster.into(),
            schema: key.schema,
            name: key.table_name,
            description: String::new(),
            columns,
        }
    }

    /// Catalog key of the table: `{database}://{cluster}.{schema}/{name}`.
    pub fn key(&self) -> String {
        format!(
            "{}://{}.{}/{}",
            self.database, self.cluster, self.schema, self.name
        )
    }

    /// Catalog key of one of this table's columns: `{table key}/{column}`.
    pub fn column_key(&self, column: &ColumnMetadata) -> String {
        format!("{}/{}", self.key(), column.name)
    }
}

impl fmt::Display for TableMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.key())?;
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}:{}", column.name, column.col_type)?;
        }
        write!(f, ")")
    }
}
