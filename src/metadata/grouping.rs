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

//! Grouping of flat column rows into table records.
//!
//! [`TableGrouper`] folds a stream of [`RawRow`]s, sorted by
//! `(schema, table_name, ordinal_position)`, into one [`TableMetadata`] per
//! maximal run of rows sharing a [`TableKey`]. Columns keep input order.
//!
//! Sortedness is a precondition, not a check: if a key's rows are split by
//! another key, every contiguous run becomes its own table. A key that
//! sorts before its predecessor is logged at `warn` so the duplication is
//! visible.

use crate::error::Result;
use crate::metadata::types::{RawRow, TableKey, TableMetadata};
use tracing::{trace, warn};

/// Lazy, single-pass grouping of rows into tables.
///
/// Holds at most one lookahead row: the first row of the next run, read
/// while closing the current one. Upstream errors are yielded once and end
/// the iteration; the table being built when the error arrived is dropped.
#[derive(Debug)]
pub struct TableGrouper<I> {
    rows: I,
    cluster: String,
    lookahead: Option<RawRow>,
    previous_key: Option<TableKey>,
    done: bool,
}

impl<I> TableGrouper<I>
where
    I: Iterator<Item = Result<RawRow>>,
{
    /// Create a grouper stamping `cluster` on every table it emits.
    pub fn new(rows: I, cluster: impl Into<String>) -> Self {
        Self {
            rows,
            cluster: cluster.into(),
            lookahead: None,
            previous_key: None,
            done: false,
        }
    }

    /// Pull the next row, marking the grouper done on end or error.
    fn pull(&mut self) -> Option<Result<RawRow>> {
        let next = self.rows.next();
        match next {
            None | Some(Err(_)) => self.done = true,
            Some(Ok(_)) => {}
        }
        next
    }

    /// Warn when `key` sorts before the previous table. Returns whether it did.
    fn check_order(&self, key: &TableKey) -> bool {
        match self.previous_key {
            Some(ref previous) if key < previous => {
                warn!(
                    "Rows are not sorted by table: {} arrived after {}; {} may be emitted more than once",
                    key, previous, key
                );
                true
            }
            _ => false,
        }
    }
}

impl<I> Iterator for TableGrouper<I>
where
    I: Iterator<Item = Result<RawRow>>,
{
    type Item = Result<TableMetadata>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = match self.lookahead.take() {
            Some(row) => row,
            None => {
                if self.done {
                    return None;
                }
                match self.pull()? {
                    Ok(row) => row,
                    Err(e) => return Some(Err(e)),
                }
            }
        };

        let key = first.key();
        self.check_order(&key);
        let mut columns = vec![first.into_column()];

        while !self.done {
            match self.pull() {
                None => break,
                Some(Err(e)) => return Some(Err(e)),
                Some(Ok(row)) if row.has_key(&key) => columns.push(row.into_column()),
                Some(Ok(row)) => {
                    self.lookahead = Some(row);
                    break;
                }
            }
        }

        trace!("Grouped {} columns for table {}", columns.len(), key);
        self.previous_key = Some(key.clone());
        Some(Ok(TableMetadata::druid(self.cluster.clone(), key, columns)))
    }
}
