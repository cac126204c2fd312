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

//! Druid column metadata: query, row decoding and grouping.
//!
//! ## Module Structure
//!
//! - `types`: raw rows and the table/column records
//! - `sql`: the `INFORMATION_SCHEMA.COLUMNS` query builder
//! - `parse`: decoding of JSON and Arrow results into raw rows
//! - `grouping`: folding sorted rows into table records

pub mod grouping;
pub mod parse;
pub mod sql;
pub mod types;

pub use grouping::TableGrouper;
pub use sql::SqlStatementBuilder;
pub use types::{ColumnMetadata, RawRow, TableKey, TableMetadata, DRUID_DATABASE};
