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

//! Extractor interface and the Druid table metadata extractor.
//!
//! An [`Extractor`] is configured once with [`Extractor::init`] and then
//! drained with [`Extractor::extract`], one record per call, until it
//! returns `Ok(None)`.
//!
//! [`DruidMetadataExtractor`] runs the `INFORMATION_SCHEMA.COLUMNS` query
//! through a nested [`RowSource`] and groups the rows into
//! [`TableMetadata`] records.
//!
//! ## Configuration (scope `extractor.druid_metadata`)
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `where_clause_suffix` | `" "` | Text inserted between `FROM` and `ORDER BY` |
//! | `cluster` | `gold` | Cluster label stamped on every table |
//! | `log_level` / `log_file` | unset | Log level (`off` disables) and log file |
//! | `<row source scope>.*` | | Options of the row source, e.g. `druid_sql.broker_url` |

use crate::config::Config;
use crate::error::{ExtractorErrorHelper, Result};
use crate::logging::{init_logging, LogConfig};
use crate::metadata::grouping::TableGrouper;
use crate::metadata::sql::SqlStatementBuilder;
use crate::metadata::types::TableMetadata;
use crate::source::{DruidSqlRowSource, RowIter, RowSource, EXTRACT_SQL_KEY};
use tracing::{debug, error, info};

/// Configuration scope of [`DruidMetadataExtractor`].
pub const DRUID_METADATA_SCOPE: &str = "extractor.druid_metadata";

pub const WHERE_CLAUSE_SUFFIX_KEY: &str = "where_clause_suffix";
pub const CLUSTER_KEY: &str = "cluster";

pub const DEFAULT_WHERE_CLAUSE_SUFFIX: &str = " ";
pub const DEFAULT_CLUSTER: &str = "gold";

/// A configurable, pull-based source of records.
pub trait Extractor {
    type Item;

    /// Configure the extractor from its scoped configuration.
    fn init(&mut self, conf: &Config) -> Result<()>;

    /// Return the next record, or `None` once exhausted.
    fn extract(&mut self) -> Result<Option<Self::Item>>;

    /// Dotted prefix namespacing this extractor's configuration.
    fn scope(&self) -> &str;
}

enum ExtractState<S> {
    /// Constructed, `init()` not yet called.
    Uninitialized(S),
    /// Configured; the query has not run.
    Ready(S),
    Running(TableGrouper<RowIter<S>>),
    /// Drained or failed. Terminal.
    Exhausted,
}

/// Extracts Druid table and column metadata.
///
/// The row source query runs on the first `extract()` call, not at
/// `init()`. Rows must arrive sorted by `(schema, table_name,
/// ordinal_position)`; the bundled query guarantees this through its
/// `ORDER BY`.
///
/// Once `extract()` has returned `Ok(None)` or an error, every later call
/// returns `Ok(None)`.
pub struct DruidMetadataExtractor<S = DruidSqlRowSource> {
    cluster: String,
    sql: String,
    state: ExtractState<S>,
    emitted: usize,
}

impl<S> std::fmt::Debug for DruidMetadataExtractor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            ExtractState::Uninitialized(_) => "uninitialized",
            ExtractState::Ready(_) => "ready",
            ExtractState::Running(_) => "running",
            ExtractState::Exhausted => "exhausted",
        };
        f.debug_struct("DruidMetadataExtractor")
            .field("cluster", &self.cluster)
            .field("state", &state)
            .field("emitted", &self.emitted)
            .finish()
    }
}

impl DruidMetadataExtractor<DruidSqlRowSource> {
    /// Creates an extractor querying Druid over its SQL HTTP API.
    pub fn new() -> Self {
        Self::with_row_source(DruidSqlRowSource::new())
    }
}

impl Default for DruidMetadataExtractor<DruidSqlRowSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RowSource> DruidMetadataExtractor<S> {
    /// Creates an extractor reading rows from `row_source`.
    pub fn with_row_source(row_source: S) -> Self {
        Self {
            cluster: DEFAULT_CLUSTER.to_string(),
            sql: String::new(),
            state: ExtractState::Uninitialized(row_source),
            emitted: 0,
        }
    }

    /// Defaults merged under the caller's configuration at `init()`.
    pub fn default_config() -> Config {
        Config::from_pairs([
            (WHERE_CLAUSE_SUFFIX_KEY, DEFAULT_WHERE_CLAUSE_SUFFIX),
            (CLUSTER_KEY, DEFAULT_CLUSTER),
        ])
    }

    /// Cluster label stamped on extracted tables.
    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    /// The generated metadata query; empty before `init()`.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Number of tables returned so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Iterator over the remaining tables.
    pub fn tables(&mut self) -> Tables<'_, S> {
        Tables { extractor: self }
    }
}

impl<S: RowSource> Extractor for DruidMetadataExtractor<S> {
    type Item = TableMetadata;

    fn init(&mut self, conf: &Config) -> Result<()> {
        if !matches!(
            self.state,
            ExtractState::Uninitialized(_) | ExtractState::Ready(_)
        ) {
            return Err(ExtractorErrorHelper::invalid_state()
                .message("init() called after extraction started"));
        }

        let conf = conf.with_fallback(&Self::default_config());
        init_logging(&LogConfig::from_config(&conf));

        self.cluster = conf.get_string(CLUSTER_KEY)?;
        self.sql = SqlStatementBuilder::new()
            .with_where_clause_suffix(conf.get_optional_string(WHERE_CLAUSE_SUFFIX_KEY))
            .build();

        let (ExtractState::Uninitialized(mut row_source) | ExtractState::Ready(mut row_source)) =
            std::mem::replace(&mut self.state, ExtractState::Exhausted)
        else {
            return Err(ExtractorErrorHelper::invalid_state().message("row source is unavailable"));
        };

        let source_conf = conf
            .scoped(row_source.scope())
            .with_fallback(&Config::new().with(EXTRACT_SQL_KEY, self.sql.clone()));
        if let Err(e) = row_source.init(&source_conf) {
            self.state = ExtractState::Uninitialized(row_source);
            return Err(e);
        }

        debug!(
            "Initialized Druid metadata extractor: cluster={}, row_source={}",
            self.cluster,
            row_source.scope()
        );
        self.state = ExtractState::Ready(row_source);
        Ok(())
    }

    fn extract(&mut self) -> Result<Option<TableMetadata>> {
        let mut grouper = match std::mem::replace(&mut self.state, ExtractState::Exhausted) {
            ExtractState::Uninitialized(source) => {
                self.state = ExtractState::Uninitialized(source);
                return Err(ExtractorErrorHelper::invalid_state()
                    .message("extract() called before init()"));
            }
            ExtractState::Ready(source) => TableGrouper::new(RowIter::new(source), &self.cluster),
            ExtractState::Running(grouper) => grouper,
            ExtractState::Exhausted => return Ok(None),
        };

        match grouper.next() {
            Some(Ok(table)) => {
                self.emitted += 1;
                debug!("Extracted table {} with {} columns", table.key(), table.columns.len());
                self.state = ExtractState::Running(grouper);
                Ok(Some(table))
            }
            Some(Err(e)) => {
                error!("Druid metadata extraction failed after {} tables: {}", self.emitted, e);
                Err(e)
            }
            None => {
                info!("Extracted {} Druid tables", self.emitted);
                Ok(None)
            }
        }
    }

    fn scope(&self) -> &str {
        DRUID_METADATA_SCOPE
    }
}

/// Iterator returned by [`DruidMetadataExtractor::tables`].
pub struct Tables<'a, S> {
    extractor: &'a mut DruidMetadataExtractor<S>,
}

impl<S: RowSource> Iterator for Tables<'_, S> {
    type Item = Result<TableMetadata>;

    fn next(&mut self) -> Option<Self::Item> {
        self.extractor.extract().transpose()
    }
}
