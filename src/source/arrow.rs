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

//! Row source over Arrow record batches.
//!
//! The query is executed by a caller-supplied closure returning a
//! `RecordBatchReader`, which lets any Arrow-native SQL client (an ADBC
//! statement, a Flight SQL client) feed the extractor. Batches are decoded
//! one at a time as rows are pulled.

use crate::config::Config;
use crate::error::{ExtractorErrorHelper, Result};
use crate::extractor::Extractor;
use crate::metadata::parse::parse_batch;
use crate::metadata::types::RawRow;
use crate::source::EXTRACT_SQL_KEY;
use arrow_array::RecordBatchReader;
use std::collections::VecDeque;
use tracing::debug;

/// Configuration scope of [`ArrowRowSource`].
pub const ARROW_SCOPE: &str = "arrow";

/// Executes a SQL statement and returns its result as Arrow batches.
pub type BatchExecutor =
    Box<dyn FnMut(&str) -> Result<Box<dyn RecordBatchReader + Send>> + Send>;

/// Pull-based row source decoding Arrow batches.
pub struct ArrowRowSource {
    executor: BatchExecutor,
    sql: Option<String>,
    reader: Option<Box<dyn RecordBatchReader + Send>>,
    buffered: VecDeque<RawRow>,
    finished: bool,
}

impl std::fmt::Debug for ArrowRowSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrowRowSource")
            .field("sql", &self.sql)
            .field("reader", &if self.reader.is_some() { "<open>" } else { "<none>" })
            .field("buffered", &self.buffered.len())
            .field("finished", &self.finished)
            .finish()
    }
}

impl ArrowRowSource {
    pub fn new<F>(executor: F) -> Self
    where
        F: FnMut(&str) -> Result<Box<dyn RecordBatchReader + Send>> + Send + 'static,
    {
        Self {
            executor: Box::new(executor),
            sql: None,
            reader: None,
            buffered: VecDeque::new(),
            finished: false,
        }
    }

    /// Read the next batch into the buffer. Returns `false` at end of stream.
    fn fill_buffer(&mut self) -> Result<bool> {
        if self.reader.is_none() {
            let sql = self.sql.as_deref().ok_or_else(|| {
                ExtractorErrorHelper::invalid_state()
                    .message("ArrowRowSource::extract() called before init()")
            })?;
            debug!("Executing metadata query: {}", sql);
            self.reader = Some((self.executor)(sql)?);
        }

        let Some(reader) = self.reader.as_mut() else {
            return Ok(false);
        };
        match reader.next() {
            None => {
                self.reader = None;
                self.finished = true;
                Ok(false)
            }
            Some(Err(e)) => Err(ExtractorErrorHelper::io()
                .message(format!("Failed to read metadata batch: {}", e))),
            Some(Ok(batch)) => {
                debug!("Decoding metadata batch of {} rows", batch.num_rows());
                self.buffered.extend(parse_batch(&batch)?);
                Ok(true)
            }
        }
    }
}

impl Extractor for ArrowRowSource {
    type Item = RawRow;

    fn init(&mut self, conf: &Config) -> Result<()> {
        self.sql = Some(conf.get_string(EXTRACT_SQL_KEY)?);
        self.reader = None;
        self.buffered.clear();
        self.finished = false;
        Ok(())
    }

    fn extract(&mut self) -> Result<Option<RawRow>> {
        loop {
            if let Some(row) = self.buffered.pop_front() {
                return Ok(Some(row));
            }
            if self.finished || !self.fill_buffer()? {
                return Ok(None);
            }
        }
    }

    fn scope(&self) -> &str {
        ARROW_SCOPE
    }
}
