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

//! Error types for the Druid metadata extractor.
//!
//! Errors are built through [`ExtractorErrorHelper`], one constructor per
//! error kind, and carry a human readable message:
//!
//! ```ignore
//! return Err(ExtractorErrorHelper::invalid_argument()
//!     .message("option 'broker_url' is not set"));
//! ```
//!
//! Every error can be surfaced to ADBC callers with [`Error::to_adbc`].

use adbc_core::error::Status;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of extractor failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing configuration.
    InvalidArgument,
    /// An operation was called in the wrong lifecycle state.
    InvalidState,
    /// A result row did not have the expected shape.
    InvalidData,
    /// Query execution or transport failure.
    Io,
}

impl ErrorKind {
    fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::InvalidState => "invalid state",
            ErrorKind::InvalidData => "invalid data",
            ErrorKind::Io => "io error",
        }
    }

    fn status(&self) -> Status {
        match self {
            ErrorKind::InvalidArgument => Status::InvalidArguments,
            ErrorKind::InvalidState => Status::InvalidState,
            ErrorKind::InvalidData => Status::InvalidData,
            ErrorKind::Io => Status::IO,
        }
    }
}

/// An extractor error: a kind plus a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", render(.kind, .message))]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: String::new(),
        }
    }

    /// Attach a message to the error.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Convert into an ADBC error with the matching status code.
    pub fn to_adbc(&self) -> adbc_core::error::Error {
        adbc_core::error::Error::with_message_and_status(self.to_string(), self.kind.status())
    }
}

fn render(kind: &ErrorKind, message: &str) -> String {
    if message.is_empty() {
        kind.as_str().to_string()
    } else {
        format!("{}: {}", kind.as_str(), message)
    }
}

impl From<Error> for adbc_core::error::Error {
    fn from(value: Error) -> Self {
        value.to_adbc()
    }
}

/// Constructors for each [`ErrorKind`].
pub struct ExtractorErrorHelper;

impl ExtractorErrorHelper {
    pub fn invalid_argument() -> Error {
        Error::new(ErrorKind::InvalidArgument)
    }

    pub fn invalid_state() -> Error {
        Error::new(ErrorKind::InvalidState)
    }

    pub fn invalid_data() -> Error {
        Error::new(ErrorKind::InvalidData)
    }

    pub fn io() -> Error {
        Error::new(ErrorKind::Io)
    }
}
