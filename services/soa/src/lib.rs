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

//! Client for the AllinPay SOA gateway.
//!
//! Every call is wrapped into a signed envelope `{sysid, v, timestamp, sign, req}`
//! and sent as a query string. Responses are verified against the gateway
//! public key before their payload is handed back.
//!
//! ```no_run
//! use allinpay_core::Context;
//! use allinpay_soa::{Client, Config, MemberType, Source};
//!
//! # async fn example(ctx: Context) -> allinpay_core::Result<()> {
//! let config = Config::from_env(&ctx).await?;
//! let client = Client::new(ctx, config);
//!
//! let member = client
//!     .member()
//!     .create_member("u-1", MemberType::Person, Source::Mobile, 1)
//!     .await?;
//! println!("user id: {}", member.user_id);
//! # Ok(())
//! # }
//! ```

mod config;
pub use config::Config;

mod client;
pub use client::Client;

mod sign_request;
pub use sign_request::{verify_notify, verify_response, Envelope, RequestSigner};

mod member;
pub use member::*;
mod merchant;
pub use merchant::*;
mod order;
pub use order::*;

mod constants;
pub use constants::*;
