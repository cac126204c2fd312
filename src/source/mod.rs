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

//! Row sources: components that run the metadata query and hand back its
//! rows one at a time.
//!
//! - `DruidSqlRowSource`: runs the query over the broker's SQL HTTP API
//! - `ArrowRowSource`: runs the query through a caller-supplied executor
//!   returning Arrow record batches (e.g. an ADBC statement)
//!
//! Every source receives the statement to run under [`EXTRACT_SQL_KEY`] in
//! its configuration scope and executes it lazily, on the first `extract()`.

pub mod arrow;
pub mod druid_sql;

use crate::error::Result;
use crate::extractor::Extractor;
use crate::metadata::types::RawRow;

pub use arrow::ArrowRowSource;
pub use druid_sql::DruidSqlRowSource;

/// Configuration key holding the SQL statement a row source executes.
pub const EXTRACT_SQL_KEY: &str = "extract_sql";

/// An extractor producing raw `INFORMATION_SCHEMA.COLUMNS` rows.
pub trait RowSource: Extractor<Item = RawRow> {}

impl<T> RowSource for T where T: Extractor<Item = RawRow> {}

/// Adapts a [`RowSource`] into an iterator of rows.
#[derive(Debug)]
pub(crate) struct RowIter<S> {
    source: S,
}

impl<S> RowIter<S> {
    pub(crate) fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: RowSource> Iterator for RowIter<S> {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.source.extract().transpose()
    }
}
