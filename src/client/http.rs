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

//! HTTP client for the Druid SQL API.
//!
//! Posts queries to `{broker_url}/druid/v2/sql` with `resultFormat=object`
//! and optional basic authentication. A failed request is reported
//! immediately; there is no retry.

use crate::client::{DruidClient, JsonRow};
use crate::config::Config;
use crate::error::{ExtractorErrorHelper, Result};
use crate::types::{DruidErrorResponse, SqlQueryRequest};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

pub const BROKER_URL_KEY: &str = "broker_url";
pub const USERNAME_KEY: &str = "username";
pub const PASSWORD_KEY: &str = "password";
pub const CONNECT_TIMEOUT_MS_KEY: &str = "connect_timeout_ms";
pub const READ_TIMEOUT_MS_KEY: &str = "read_timeout_ms";

const SQL_ENDPOINT: &str = "/druid/v2/sql";

/// Configuration for the HTTP client.
#[derive(Clone)]
pub struct HttpClientConfig {
    /// Base URL of the broker or router, e.g. `http://broker:8082`.
    pub broker_url: String,
    /// Connection timeout duration.
    pub connect_timeout: Duration,
    /// Whole-request timeout duration.
    pub read_timeout: Duration,
    /// Basic auth user, if the cluster has authentication enabled.
    pub username: Option<String>,
    pub password: Option<String>,
    /// User agent string.
    pub user_agent: String,
}

impl std::fmt::Debug for HttpClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClientConfig")
            .field("broker_url", &self.broker_url)
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl HttpClientConfig {
    /// Creates a configuration with default timeouts and no authentication.
    pub fn new(broker_url: impl Into<String>) -> Self {
        Self {
            broker_url: broker_url.into(),
            connect_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(60),
            username: None,
            password: None,
            user_agent: format!("druid-metadata/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Reads the client options from a row source scope.
    ///
    /// `broker_url` is required; timeouts must be non-negative integers.
    pub fn from_config(conf: &Config) -> Result<Self> {
        let broker_url = conf.get_string(BROKER_URL_KEY)?;
        if broker_url.trim().is_empty() {
            return Err(ExtractorErrorHelper::invalid_argument()
                .message(format!("option '{}' must not be empty", BROKER_URL_KEY)));
        }

        let mut config = Self::new(broker_url);
        config.connect_timeout =
            Self::duration_option(conf, CONNECT_TIMEOUT_MS_KEY, config.connect_timeout)?;
        config.read_timeout = Self::duration_option(conf, READ_TIMEOUT_MS_KEY, config.read_timeout)?;
        config.username = conf.get_optional_string(USERNAME_KEY).map(str::to_string);
        config.password = conf.get_optional_string(PASSWORD_KEY).map(str::to_string);
        Ok(config)
    }

    fn duration_option(conf: &Config, key: &str, default: Duration) -> Result<Duration> {
        let millis = conf.get_int_or(key, default.as_millis() as i64)?;
        if millis < 0 {
            return Err(ExtractorErrorHelper::invalid_argument()
                .message(format!("option '{}' must not be negative, got {}", key, millis)));
        }
        Ok(Duration::from_millis(millis as u64))
    }
}

/// HTTP client for a Druid broker's SQL endpoint.
#[derive(Debug)]
pub struct DruidHttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl DruidHttpClient {
    /// Creates a new HTTP client with the given configuration.
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ExtractorErrorHelper::io().message(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Full URL of the SQL endpoint.
    pub fn sql_url(&self) -> String {
        format!(
            "{}{}",
            self.config.broker_url.trim_end_matches('/'),
            SQL_ENDPOINT
        )
    }

    /// `Basic` authorization header value, if a username is configured.
    pub fn auth_header(&self) -> Option<String> {
        let username = self.config.username.as_deref()?;
        let password = self.config.password.as_deref().unwrap_or("");
        Some(format!(
            "Basic {}",
            STANDARD.encode(format!("{}:{}", username, password))
        ))
    }

    /// Turn a non-success response into an error message, using Druid's
    /// error body when it can be decoded.
    fn describe_failure(status: StatusCode, body: &str) -> String {
        let detail = serde_json::from_str::<DruidErrorResponse>(body)
            .ok()
            .and_then(|e| e.describe())
            .unwrap_or_else(|| body.trim().to_string());
        format!("Druid SQL query failed with HTTP {} - {}", status.as_u16(), detail)
    }
}

#[async_trait]
impl DruidClient for DruidHttpClient {
    async fn execute_sql(&self, sql: &str) -> Result<Vec<JsonRow>> {
        let url = self.sql_url();
        debug!("Executing POST {}", url);

        let mut request = self.client.post(&url).json(&SqlQueryRequest::new(sql));
        if let Some(auth) = self.auth_header() {
            request = request.header(AUTHORIZATION, auth);
        }

        let response = request.send().await.map_err(|e| {
            ExtractorErrorHelper::io().message(format!("HTTP request to {} failed: {}", url, e))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ExtractorErrorHelper::io().message(format!("Failed to read Druid response: {}", e))
        })?;

        if !status.is_success() {
            return Err(ExtractorErrorHelper::io().message(Self::describe_failure(status, &body)));
        }

        let rows: Vec<JsonRow> = serde_json::from_str(&body).map_err(|e| {
            ExtractorErrorHelper::io().message(format!("Failed to decode Druid SQL response: {}", e))
        })?;
        debug!("Druid returned {} rows", rows.len());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_http_client_config_defaults() {
        let config = HttpClientConfig::new("http://broker:8082");
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert_eq!(config.read_timeout, Duration::from_secs(60));
        assert!(config.username.is_none());
        assert!(config.user_agent.starts_with("druid-metadata/"));
    }

    #[test]
    fn test_http_client_config_from_config() {
        let conf = Config::from_pairs([
            ("broker_url", "http://broker:8082"),
            ("connect_timeout_ms", "500"),
            ("read_timeout_ms", "2500"),
            ("username", "admin"),
            ("password", "secret"),
        ]);
        let config = HttpClientConfig::from_config(&conf).unwrap();
        assert_eq!(config.broker_url, "http://broker:8082");
        assert_eq!(config.connect_timeout, Duration::from_millis(500));
        assert_eq!(config.read_timeout, Duration::from_millis(2500));
        assert_eq!(config.username.as_deref(), Some("admin"));

        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_http_client_config_requires_broker_url() {
        let err = HttpClientConfig::from_config(&Config::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("broker_url"));

        let err = HttpClientConfig::from_config(&Config::new().with("broker_url", " ")).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_http_client_config_rejects_bad_timeouts() {
        let conf = Config::new()
            .with("broker_url", "http://broker:8082")
            .with("read_timeout_ms", "-1");
        assert!(HttpClientConfig::from_config(&conf).is_err());

        let conf = Config::new()
            .with("broker_url", "http://broker:8082")
            .with("connect_timeout_ms", "fast");
        assert!(HttpClientConfig::from_config(&conf).is_err());
    }

    #[tokio::test]
    async fn test_sql_url() {
        let client = DruidHttpClient::new(HttpClientConfig::new("http://broker:8082/")).unwrap();
        assert_eq!(client.sql_url(), "http://broker:8082/druid/v2/sql");
    }

    #[tokio::test]
    async fn test_auth_header() {
        let client = DruidHttpClient::new(HttpClientConfig::new("http://broker:8082")).unwrap();
        assert!(client.auth_header().is_none());

        let mut config = HttpClientConfig::new("http://broker:8082");
        config.username = Some("admin".to_string());
        config.password = Some("secret".to_string());
        let client = DruidHttpClient::new(config).unwrap();
        assert_eq!(client.auth_header().unwrap(), "Basic YWRtaW46c2VjcmV0");
    }

    #[test]
    fn test_describe_failure() {
        let message = DruidHttpClient::describe_failure(
            StatusCode::BAD_REQUEST,
            r#"{"error":"Plan validation failed","errorMessage":"Table 'nope' not found"}"#,
        );
        assert_eq!(
            message,
            "Druid SQL query failed with HTTP 400 - Table 'nope' not found"
        );

        let message =
            DruidHttpClient::describe_failure(StatusCode::BAD_GATEWAY, "upstream unavailable\n");
        assert_eq!(
            message,
            "Druid SQL query failed with HTTP 502 - upstream unavailable"
        );
    }
}
