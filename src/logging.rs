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

//! Logging configuration for the Druid metadata extractor.
//!
//! Initializes a `tracing-subscriber` with file or stderr output.
//!
//! ## Configuration priority
//!
//! 1. `log_level` / `log_file` options in the extractor scope (highest)
//! 2. `RUST_LOG` environment variable
//! 3. Default: `warn`
//!
//! ```bash
//! RUST_LOG=druid_metadata=debug ./my_pipeline
//! ```

use crate::config::Config;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing_subscriber::{
    fmt::{self, time::SystemTime, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Set once a subscriber install was attempted with a usable writer.
static LOGGING_INITIALIZED: AtomicBool = AtomicBool::new(false);

pub(crate) const LOG_LEVEL_KEY: &str = "log_level";
pub(crate) const LOG_FILE_KEY: &str = "log_file";

/// Logging options read from the extractor configuration.
#[derive(Debug, Clone, Default)]
pub(crate) struct LogConfig {
    /// Log level: "OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE".
    pub level: Option<String>,
    /// Log file path. If unset, logs go to stderr.
    pub file: Option<String>,
}

impl LogConfig {
    pub(crate) fn from_config(conf: &Config) -> Self {
        Self {
            level: conf.get_optional_string(LOG_LEVEL_KEY).map(str::to_string),
            file: conf.get_optional_string(LOG_FILE_KEY).map(str::to_string),
        }
    }

    fn is_off(&self) -> bool {
        self.level
            .as_deref()
            .is_some_and(|level| level.eq_ignore_ascii_case("off"))
    }

    fn filter(&self) -> EnvFilter {
        match self.level.as_deref() {
            Some(level) => EnvFilter::new(format!("druid_metadata={}", level.to_lowercase())),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("druid_metadata=warn")),
        }
    }

    /// Destination for log lines, or `None` when logging is off or the log
    /// file cannot be opened.
    fn writer(&self) -> Option<BoxMakeWriter> {
        if self.is_off() {
            return None;
        }
        let Some(path) = self.file.as_deref() else {
            return Some(BoxMakeWriter::new(std::io::stderr));
        };
        match std::fs::OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(BoxMakeWriter::new(Mutex::new(file))),
            Err(e) => {
                eprintln!("druid-metadata: failed to open log file {}: {}", path, e);
                None
            }
        }
    }
}

/// Initialize the tracing subscriber.
///
/// The first call with a usable writer installs the subscriber; later calls
/// are no-ops. A call with `log_level=off` or an unopenable `log_file`
/// installs nothing and leaves a later extractor free to configure logging.
/// An application that installed its own subscriber keeps it.
pub(crate) fn init_logging(config: &LogConfig) {
    if LOGGING_INITIALIZED.load(Ordering::Acquire) {
        return;
    }
    let Some(writer) = config.writer() else {
        return;
    };
    if LOGGING_INITIALIZED.swap(true, Ordering::AcqRel) {
        return;
    }

    let to_file = config.file.is_some();
    tracing_subscriber::registry()
        .with(config.filter())
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_target(false)
                .with_ansi(!to_file)
                .with_timer(SystemTime),
        )
        .try_init()
        .ok();
}
