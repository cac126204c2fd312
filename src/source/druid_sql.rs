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

//! Row source backed by the Druid SQL HTTP API.
//!
//! ## Configuration (scope `druid_sql`)
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `broker_url` | required | Broker or router base URL |
//! | `username` / `password` | unset | Basic auth credentials |
//! | `connect_timeout_ms` | 30000 | Connection timeout |
//! | `read_timeout_ms` | 60000 | Whole-request timeout |
//! | `extract_sql` | set by the caller | Statement to execute |
//!
//! The query runs on a private current-thread Tokio runtime, so
//! `extract()` must not be called from inside another async runtime.

use crate::client::{DruidClient, DruidHttpClient, HttpClientConfig, JsonRow};
use crate::config::Config;
use crate::error::{ExtractorErrorHelper, Result};
use crate::extractor::Extractor;
use crate::metadata::parse::parse_json_row;
use crate::metadata::types::RawRow;
use crate::source::EXTRACT_SQL_KEY;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// Configuration scope of [`DruidSqlRowSource`].
pub const DRUID_SQL_SCOPE: &str = "druid_sql";

/// Pull-based row source over a single Druid SQL query.
#[derive(Debug, Default)]
pub struct DruidSqlRowSource {
    client: Option<Arc<dyn DruidClient>>,
    /// Set when the client came from `with_client` and must survive `init()`.
    client_injected: bool,
    runtime: Option<Runtime>,
    sql: Option<String>,
    rows: Option<std::vec::IntoIter<JsonRow>>,
}

impl DruidSqlRowSource {
    /// Creates a source that builds a [`DruidHttpClient`] from its
    /// configuration at `init()`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source using `client` instead of building one from
    /// configuration. `broker_url` is then not required.
    pub fn with_client(client: Arc<dyn DruidClient>) -> Self {
        Self {
            client: Some(client),
            client_injected: true,
            ..Self::default()
        }
    }

    /// The statement this source executes, once initialized.
    pub fn sql(&self) -> Option<&str> {
        self.sql.as_deref()
    }

    fn fetch_rows(&mut self) -> Result<()> {
        let (Some(client), Some(runtime), Some(sql)) = (&self.client, &self.runtime, &self.sql)
        else {
            return Err(ExtractorErrorHelper::invalid_state()
                .message("DruidSqlRowSource::extract() called before init()"));
        };

        debug!("Executing metadata query: {}", sql);
        let rows = runtime.block_on(client.execute_sql(sql))?;
        debug!("Fetched {} metadata rows", rows.len());
        self.rows = Some(rows.into_iter());
        Ok(())
    }
}

impl Extractor for DruidSqlRowSource {
    type Item = RawRow;

    fn init(&mut self, conf: &Config) -> Result<()> {
        let sql = conf.get_string(EXTRACT_SQL_KEY)?;

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                ExtractorErrorHelper::io().message(format!("Failed to create Tokio runtime: {}", e))
            })?;

        if !self.client_injected {
            let config = HttpClientConfig::from_config(conf)?;
            let _guard = runtime.enter();
            let client = DruidHttpClient::new(config)?;
            debug!("Created Druid HTTP client for {}", client.config().broker_url);
            self.client = Some(Arc::new(client));
        }

        self.sql = Some(sql);
        self.runtime = Some(runtime);
        self.rows = None;
        Ok(())
    }

    fn extract(&mut self) -> Result<Option<RawRow>> {
        if self.rows.is_none() {
            self.fetch_rows()?;
        }

        match self.rows.as_mut().and_then(Iterator::next) {
            Some(row) => parse_json_row(&row).map(Some),
            None => Ok(None),
        }
    }

    fn scope(&self) -> &str {
        DRUID_SQL_SCOPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records executed statements and returns canned rows.
    #[derive(Debug)]
    struct MockClient {
        rows: Vec<serde_json::Value>,
        executed: Mutex<Vec<String>>,
    }

    impl MockClient {
        fn new(rows: Vec<serde_json::Value>) -> Arc<Self> {
            Arc::new(Self {
                rows,
                executed: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl DruidClient for MockClient {
        async fn execute_sql(&self, sql: &str) -> Result<Vec<JsonRow>> {
            self.executed.lock().unwrap().push(sql.to_string());
            Ok(self
                .rows
                .iter()
                .map(|v| v.as_object().unwrap().clone())
                .collect())
        }
    }

    #[derive(Debug)]
    struct FailingClient;

    #[async_trait]
    impl DruidClient for FailingClient {
        async fn execute_sql(&self, _sql: &str) -> Result<Vec<JsonRow>> {
            Err(ExtractorErrorHelper::io().message("connection refused"))
        }
    }

    fn sql_conf() -> Config {
        Config::new().with(EXTRACT_SQL_KEY, "SELECT 1")
    }

    #[test]
    fn test_extract_is_lazy_and_yields_rows_in_order() {
        let client = MockClient::new(vec![
            json!({"schema": "s1", "name": "t1", "col_name": "a", "col_type": "STRING", "col_sort_order": 1}),
            json!({"schema": "s1", "name": "t1", "col_name": "b", "col_type": "LONG", "col_sort_order": "2"}),
        ]);
        let mut source = DruidSqlRowSource::with_client(client.clone());
        source.init(&sql_conf()).unwrap();
        assert_eq!(source.sql(), Some("SELECT 1"));
        assert!(client.executed.lock().unwrap().is_empty());

        let first = source.extract().unwrap().unwrap();
        assert_eq!(first, RawRow::new("s1", "t1", "a", "STRING", 1));
        let second = source.extract().unwrap().unwrap();
        assert_eq!(second.ordinal_position, 2);
        assert!(source.extract().unwrap().is_none());
        assert!(source.extract().unwrap().is_none());

        assert_eq!(*client.executed.lock().unwrap(), vec!["SELECT 1".to_string()]);
    }

    #[test]
    fn test_extract_before_init_is_invalid_state() {
        let mut source = DruidSqlRowSource::with_client(MockClient::new(vec![]));
        let err = source.extract().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn test_init_requires_extract_sql() {
        let mut source = DruidSqlRowSource::with_client(MockClient::new(vec![]));
        let err = source.init(&Config::new()).unwrap_err();
        assert!(err.to_string().contains("extract_sql"));
    }

    #[test]
    fn test_init_requires_broker_url_without_client() {
        let mut source = DruidSqlRowSource::new();
        let err = source.init(&sql_conf()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("broker_url"));
    }

    #[test]
    fn test_init_builds_http_client() {
        let mut source = DruidSqlRowSource::new();
        source
            .init(&sql_conf().with("broker_url", "http://localhost:8082"))
            .unwrap();
        assert!(source.client.is_some());
    }

    #[test]
    fn test_reinit_rebuilds_http_client_for_new_broker() {
        let mut source = DruidSqlRowSource::new();
        source
            .init(&sql_conf().with("broker_url", "http://broker-a:8082"))
            .unwrap();
        source
            .init(&sql_conf().with("broker_url", "http://broker-b:8082"))
            .unwrap();

        let client = format!("{:?}", source.client);
        assert!(client.contains("broker-b"));
        assert!(!client.contains("broker-a"));
    }

    #[test]
    fn test_reinit_keeps_injected_client() {
        let client = MockClient::new(vec![]);
        let mut source = DruidSqlRowSource::with_client(client.clone());
        source.init(&sql_conf()).unwrap();
        source
            .init(&Config::new().with(EXTRACT_SQL_KEY, "SELECT 2"))
            .unwrap();

        assert!(source.extract().unwrap().is_none());
        assert_eq!(*client.executed.lock().unwrap(), vec!["SELECT 2".to_string()]);
    }

    #[test]
    fn test_query_failure_propagates() {
        let mut source = DruidSqlRowSource::with_client(Arc::new(FailingClient));
        source.init(&sql_conf()).unwrap();
        let err = source.extract().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_malformed_row_propagates() {
        let client = MockClient::new(vec![json!({"schema": "s1", "name": "t1"})]);
        let mut source = DruidSqlRowSource::with_client(client);
        source.init(&sql_conf()).unwrap();
        let err = source.extract().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_scope() {
        assert_eq!(DruidSqlRowSource::new().scope(), "druid_sql");
    }
}
