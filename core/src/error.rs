// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt;
use thiserror::Error;

/// The error type for gateway operations
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    code: Option<String>,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The gateway answered with a non-success status.
    ///
    /// The vendor error code is available through [`Error::code`].
    Business,

    /// The gateway signature did not validate against the configured public key
    SignatureInvalid,

    /// A verified response carried a payload that could not be decoded
    PayloadInvalid,

    /// Key material could not be parsed or used
    KeyInvalid,

    /// Configuration error (missing fields, invalid values)
    ConfigInvalid,

    /// Request cannot be built (invalid uri, oversized field, etc.)
    RequestInvalid,

    /// Unexpected errors (network, I/O, etc.)
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach the vendor error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the vendor error code, if the gateway returned one.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Get the message without the kind prefix.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this is a business error reported by the gateway
    pub fn is_business(&self) -> bool {
        self.kind == ErrorKind::Business
    }

    /// Check if this is a business error carrying exactly the given vendor code.
    pub fn is_business_code(&self, code: &str) -> bool {
        self.is_business() && self.code() == Some(code)
    }
}

// Convenience constructors
impl Error {
    /// Create a business error with the vendor message and code
    pub fn business(message: impl Into<String>, code: Option<String>) -> Self {
        let mut err = Self::new(ErrorKind::Business, message);
        err.code = code;
        err
    }

    /// Create a signature invalid error
    pub fn signature_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SignatureInvalid, message)
    }

    /// Create a payload invalid error
    pub fn payload_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PayloadInvalid, message)
    }

    /// Create a key invalid error
    pub fn key_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::KeyInvalid, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Business => write!(f, "gateway business error"),
            ErrorKind::SignatureInvalid => write!(f, "invalid signature"),
            ErrorKind::PayloadInvalid => write!(f, "invalid payload"),
            ErrorKind::KeyInvalid => write!(f, "invalid key"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::payload_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::payload_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_code() {
        let err = Error::business("member already exists", Some("30000".to_string()));
        assert!(err.is_business());
        assert!(err.is_business_code("30000"));
        assert!(!err.is_business_code("30001"));
        assert_eq!(err.to_string(), "member already exists");

        let err = Error::signature_invalid("bad sign").with_code("30000");
        assert!(!err.is_business_code("30000"));
        assert_eq!(err.kind(), ErrorKind::SignatureInvalid);
    }
}
