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

//! Core components for the AllinPay gateway envelopes.
//!
//! This crate provides the pieces shared by both gateway families: key
//! handling, RSA signing and verification, selective field encryption, the
//! error taxonomy and the pluggable [`Context`] used to talk to the network.
//!
//! ## Overview
//!
//! - **Context**: A container that holds implementations for file reading, HTTP sending,
//!   environment access and request observation
//! - **Keys**: [`PrivateKey`] and [`PublicKey`] wrap RSA keys and expose the exact
//!   signature and encryption primitives the gateways expect
//! - **Fields**: [`field`] addresses leaves inside a JSON value by dotted path and
//!   encrypts or decrypts them in place
//! - **Exchange**: [`exchange`] performs one observed request/response round trip
//!
//! ## Example
//!
//! ```no_run
//! use allinpay_core::{PrivateKey, Result};
//!
//! # fn example(pem: &str) -> Result<()> {
//! let key = PrivateKey::from_pem(pem)?;
//! let signature = key.sign_sha1(b"a=1&b=2")?;
//! key.public_key().verify_sha1(b"a=1&b=2", &signature)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Traits
//!
//! - [`FileRead`]: For asynchronous file reading
//! - [`HttpSend`]: For sending HTTP requests
//! - [`Env`]: For environment variable access
//! - [`Observe`]: For watching request round trips

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod error;
pub use error::{Error, ErrorKind, Result};

pub mod field;
pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::{Context, Env, FileRead, HttpSend, OsEnv, StaticEnv};
mod exchange;
pub use exchange::{exchange, DEFAULT_TOO_LONG_THRESHOLD};
mod key;
pub use key::{PrivateKey, PublicKey};
mod observe;
pub use observe::{LogObserve, NoopObserve, Observe, RequestTime};

/// Flat parameter object exchanged with the gateways.
///
/// Backed by an insertion ordered map so that serialized payloads keep the
/// caller's field order.
pub type Params = serde_json::Map<String, serde_json::Value>;
