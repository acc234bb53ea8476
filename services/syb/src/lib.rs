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

//! Client for the AllinPay SYB gateway.
//!
//! Requests are flat parameter maps signed over their sorted `key=value`
//! entries and posted as forms.
//!
//! ```no_run
//! use allinpay_core::Context;
//! use allinpay_syb::{Client, Config};
//!
//! # async fn example(ctx: Context) -> allinpay_core::Result<()> {
//! let client = Client::new(ctx.clone(), Config::from_env(&ctx).await?);
//! let complaints = client
//!     .complaint()
//!     .complaint_qry("2024-05-01", "2024-05-20", None, None)
//!     .await?;
//! println!("{complaints}");
//! # Ok(())
//! # }
//! ```

mod config;
pub use config::Config;

mod client;
pub use client::Client;

mod sign_request;
pub use sign_request::{canonical_string, to_form, verify_response, RequestSigner};

mod complaint;
pub use complaint::ComplaintService;

mod constants;
pub use constants::*;
