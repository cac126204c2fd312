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

//! Clients for executing SQL against a Druid cluster.
//!
//! This module provides:
//! - `DruidClient` trait: abstract interface for running one SQL query
//! - `DruidHttpClient`: implementation over the broker's SQL HTTP API

pub mod http;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

pub use http::{DruidHttpClient, HttpClientConfig};

/// One result row keyed by column alias.
pub type JsonRow = Map<String, Value>;

/// Abstract interface for Druid SQL backends.
#[async_trait]
pub trait DruidClient: Send + Sync + std::fmt::Debug {
    /// Execute `sql` and return every result row.
    ///
    /// Failures are returned as-is; implementations do not retry.
    async fn execute_sql(&self, sql: &str) -> Result<Vec<JsonRow>>;
}
