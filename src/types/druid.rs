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

//! Druid SQL API request/response types.
//!
//! These map to the JSON bodies of `POST /druid/v2/sql` on a Druid broker
//! or router.

use serde::{Deserialize, Serialize};

/// Request body for a SQL query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlQueryRequest {
    pub query: String,
    /// `object` returns each row as a JSON object keyed by column alias.
    pub result_format: String,
}

impl SqlQueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            result_format: "object".to_string(),
        }
    }
}

/// Error body returned by Druid for failed queries.
///
/// Older brokers send `error`/`errorMessage`/`errorClass`; newer ones add
/// `errorCode` and `category`. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DruidErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub error_class: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
}

impl DruidErrorResponse {
    /// Best available description: the message, then the error code, then
    /// the error name.
    pub fn describe(&self) -> Option<String> {
        let message = self
            .error_message
            .as_deref()
            .or(self.error_code.as_deref())
            .or(self.error.as_deref())?;
        match self.error_class.as_deref() {
            Some(class) => Some(format!("{} ({})", message, class)),
            None => Some(message.to_string()),
        }
    }
}
