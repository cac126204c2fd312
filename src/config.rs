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

//! Hierarchical configuration for extractors.
//!
//! A [`Config`] is a flat map of dotted keys (`extractor.druid_metadata.cluster`)
//! to string values. Components read their settings from a *scope*: the
//! sub-tree under a dotted prefix, with the prefix stripped.
//!
//! ## Fallback merge
//!
//! [`Config::with_fallback`] overlays the receiver on a set of defaults:
//! a key supplied by the caller wins, otherwise the default is used.
//!
//! ```ignore
//! let conf = Config::from_pairs([("cluster", "prod")])
//!     .with_fallback(&Config::from_pairs([("cluster", "gold"), ("where_clause_suffix", " ")]));
//! assert_eq!(conf.get_string("cluster")?, "prod");
//! ```

use crate::error::{ExtractorErrorHelper, Result};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// A dotted-key configuration tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    entries: BTreeMap<String, String>,
}

impl Config {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from `(key, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Builds a configuration from a string map.
    pub fn from_map(map: HashMap<String, String>) -> Self {
        Self {
            entries: map.into_iter().collect(),
        }
    }

    /// Parses a JSON object into a configuration.
    ///
    /// Nested objects are flattened into dotted keys; scalars are stored as
    /// their string form. Arrays are rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(|e| {
            ExtractorErrorHelper::invalid_argument()
                .message(format!("Failed to parse configuration JSON: {}", e))
        })?;

        let Value::Object(_) = value else {
            return Err(ExtractorErrorHelper::invalid_argument()
                .message("configuration JSON must be an object"));
        };

        let mut config = Self::new();
        Self::flatten_json("", &value, &mut config.entries)?;
        Ok(config)
    }

    fn flatten_json(prefix: &str, value: &Value, out: &mut BTreeMap<String, String>) -> Result<()> {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    let full_key = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    Self::flatten_json(&full_key, child, out)?;
                }
            }
            Value::String(s) => {
                out.insert(prefix.to_string(), s.clone());
            }
            Value::Number(n) => {
                out.insert(prefix.to_string(), n.to_string());
            }
            Value::Bool(b) => {
                out.insert(prefix.to_string(), b.to_string());
            }
            Value::Null => {}
            Value::Array(_) => {
                return Err(ExtractorErrorHelper::invalid_argument()
                    .message(format!("option '{}' must not be an array", prefix)));
            }
        }
        Ok(())
    }

    /// Returns this configuration with `key` set to `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Overlays `self` on `fallback`: keys present in `self` win.
    pub fn with_fallback(&self, fallback: &Config) -> Config {
        let mut entries = fallback.entries.clone();
        entries.extend(self.entries.iter().map(|(k, v)| (k.clone(), v.clone())));
        Config { entries }
    }

    /// Returns the sub-tree under `scope`, with the `scope.` prefix removed.
    pub fn scoped(&self, scope: &str) -> Config {
        let prefix = format!("{}.", scope);
        Config {
            entries: self
                .entries
                .iter()
                .filter_map(|(k, v)| {
                    k.strip_prefix(&prefix)
                        .filter(|rest| !rest.is_empty())
                        .map(|rest| (rest.to_string(), v.clone()))
                })
                .collect(),
        }
    }

    /// Returns the value for `key`, or an error if it is not set.
    pub fn get_string(&self, key: &str) -> Result<String> {
        self.entries.get(key).cloned().ok_or_else(|| {
            ExtractorErrorHelper::invalid_argument().message(format!("option '{}' is not set", key))
        })
    }

    pub fn get_optional_string(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Parses `key` as an integer, returning `default` when unset.
    pub fn get_int_or(&self, key: &str, default: i64) -> Result<i64> {
        match self.entries.get(key) {
            None => Ok(default),
            Some(v) => v.trim().parse().map_err(|_| {
                ExtractorErrorHelper::invalid_argument()
                    .message(format!("option '{}' must be an integer, got '{}'", key, v))
            }),
        }
    }
}
