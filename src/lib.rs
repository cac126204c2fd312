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

//! Apache Druid metadata extractor
//!
//! This crate reads table and column metadata from Druid's
//! `INFORMATION_SCHEMA.COLUMNS` view and turns it into
//! [`TableMetadata`] records for a metadata catalog.
//!
//! ## Overview
//!
//! - [`Extractor`] - Configure-then-pull interface shared by all extractors
//! - [`DruidMetadataExtractor`] - Groups column rows into one record per table
//! - [`RowSource`] - Runs the query and yields raw rows
//!   ([`DruidSqlRowSource`] over HTTP, [`ArrowRowSource`] over Arrow batches)
//! - [`Config`] - Dotted-key configuration with scoping and fallback merge
//!
//! ## Example
//!
//! ```ignore
//! use druid_metadata::{Config, DruidMetadataExtractor, Extractor};
//!
//! let conf = Config::from_pairs([
//!     ("extractor.druid_metadata.cluster", "prod"),
//!     ("extractor.druid_metadata.where_clause_suffix", "WHERE TABLE_SCHEMA = 'druid'"),
//!     ("extractor.druid_metadata.druid_sql.broker_url", "http://broker:8082"),
//! ]);
//!
//! let mut extractor = DruidMetadataExtractor::new();
//! extractor.init(&conf.scoped(extractor.scope()))?;
//! while let Some(table) = extractor.extract()? {
//!     println!("{}", table);
//! }
//! ```
//!
//! ## Configuration Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `extractor.druid_metadata.where_clause_suffix` | `" "` | Filter appended to the query |
//! | `extractor.druid_metadata.cluster` | `gold` | Cluster label on every table |
//! | `extractor.druid_metadata.log_level` | unset | Log level (`off` disables) |
//! | `extractor.druid_metadata.log_file` | unset | Log file, stderr if unset |
//! | `extractor.druid_metadata.druid_sql.broker_url` | required | Druid broker/router URL |
//! | `extractor.druid_metadata.druid_sql.username` | unset | Basic auth user |
//! | `extractor.druid_metadata.druid_sql.password` | unset | Basic auth password |
//! | `extractor.druid_metadata.druid_sql.connect_timeout_ms` | 30000 | Connect timeout |
//! | `extractor.druid_metadata.druid_sql.read_timeout_ms` | 60000 | Request timeout |

pub mod client;
pub mod config;
pub mod error;
pub mod extractor;
mod logging;
pub mod metadata;
pub mod source;
pub mod types;

// Re-export main types
pub use config::Config;
pub use error::{Error, ErrorKind, ExtractorErrorHelper, Result};
pub use extractor::{DruidMetadataExtractor, Extractor, Tables};
pub use metadata::{ColumnMetadata, RawRow, TableKey, TableMetadata};
pub use source::{ArrowRowSource, DruidSqlRowSource, RowSource};

// Re-export client types for advanced users
pub use client::{DruidClient, DruidHttpClient, HttpClientConfig};
