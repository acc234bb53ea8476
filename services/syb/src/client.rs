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

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use log::debug;
use serde_json::Value;

use super::complaint::ComplaintService;
use super::config::Config;
use super::sign_request::{to_form, verify_response, RequestSigner};
use allinpay_core::{exchange, Context, Params, Result, DEFAULT_TOO_LONG_THRESHOLD};

/// Client for the SYB gateway.
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Context,
    config: Arc<Config>,
    signer: RequestSigner,
    too_long: Duration,
}

impl Client {
    /// Create a new client.
    pub fn new(ctx: Context, config: Config) -> Self {
        Self {
            ctx,
            config: Arc::new(config),
            signer: RequestSigner::new(),
            too_long: DEFAULT_TOO_LONG_THRESHOLD,
        }
    }

    /// Replace the request signer.
    pub fn with_request_signer(mut self, signer: RequestSigner) -> Self {
        self.signer = signer;
        self
    }

    /// Round trips slower than `threshold` are reported as too long.
    pub fn with_too_long_threshold(mut self, threshold: Duration) -> Self {
        self.too_long = threshold;
        self
    }

    /// The config this client signs with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Complaint operations.
    pub fn complaint(&self) -> ComplaintService<'_> {
        ComplaintService::new(self)
    }

    /// Post `params` to `service/method` and return the unwrapped result.
    ///
    /// The context observer sees every round trip, every slow one and every
    /// failure while handling the response.
    pub async fn request(&self, service: &str, method: &str, params: &Params) -> Result<Value> {
        let signed = self.signer.sign(&self.config, params)?;
        let body = to_form(&signed);
        if !self.config.is_prod {
            debug!("request {service}/{method} body: {body}");
        }

        let req = http::Request::post(format!("{}/{}/{}", self.config.endpoint, service, method))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Bytes::from(body))?;

        exchange(&self.ctx, req, &Value::Object(signed), self.too_long, |body| {
            verify_response(&self.config, &body)
        })
        .await
    }
}
