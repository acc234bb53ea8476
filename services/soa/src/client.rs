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
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::config::Config;
use super::constants::*;
use super::member::MemberService;
use super::merchant::MerchantService;
use super::order::OrderService;
use super::sign_request::{verify_notify, verify_response, RequestSigner};
use allinpay_core::field::{self, ALLOW_KEY};
use allinpay_core::{exchange, Context, Error, Params, Result, DEFAULT_TOO_LONG_THRESHOLD};

/// Client for the SOA gateway.
///
/// Cloning is cheap, the config is shared.
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

    /// Member operations.
    pub fn member(&self) -> MemberService<'_> {
        MemberService::new(self)
    }

    /// Merchant operations.
    pub fn merchant(&self) -> MerchantService<'_> {
        MerchantService::new(self)
    }

    /// Order operations.
    pub fn order(&self) -> OrderService<'_> {
        OrderService::new(self)
    }

    /// Call `service.method` and return the verified payload.
    pub async fn service_soa(&self, service: &str, method: &str, param: &Value) -> Result<Value> {
        let envelope = self.signer.sign(&self.config, service, method, param)?;
        if !self.config.is_prod {
            debug!("service_soa {service}.{method} req: {}", envelope.req);
        }

        let uri = format!("{}{}?{}", self.config.endpoint, SOA_PATH, envelope.to_query());
        let req = http::Request::get(uri).body(Bytes::new())?;

        exchange(&self.ctx, req, &envelope.to_value(), self.too_long, |body| {
            verify_response(&self.config, &body)
        })
        .await
    }

    /// Call `service.method`, accepting the business error `allow` as success.
    ///
    /// An accepted error yields `param` overlaid with `defaults` plus the
    /// marker `{"allow": allow}`, so callers can tell the result was
    /// synthesized. Any other error is returned unchanged.
    pub async fn service_soa_allow(
        &self,
        service: &str,
        method: &str,
        param: &Value,
        allow: &str,
        defaults: Value,
    ) -> Result<Value> {
        match self.service_soa(service, method, param).await {
            Err(err) if err.is_business_code(allow) => {
                debug!("{service}.{method} accepted business error {allow}: {err}");

                let mut result = param.as_object().cloned().unwrap_or_default();
                if let Value::Object(defaults) = defaults {
                    result.extend(defaults);
                }
                result.insert(ALLOW_KEY.to_string(), Value::String(allow.to_string()));
                Ok(Value::Object(result))
            }
            res => res,
        }
    }

    /// Build a signed url for a hosted gateway page such as contract signing.
    pub fn gateway_url(&self, path: &str, service: &str, method: &str, param: &Value) -> Result<String> {
        let envelope = self.signer.sign(&self.config, service, method, param)?;
        Ok(format!("{}{}?{}", self.config.endpoint, path, envelope.to_query()))
    }

    /// Verify a notification delivered to the notify url and return its payload.
    pub fn verify_notify(&self, body: &Value) -> Result<Value> {
        self.ctx.observe().on_back_receive(body);
        if !self.config.is_prod {
            debug!("notification received: {body}");
        }
        verify_notify(&self.config, body)
    }

    /// Same as [`Client::verify_notify`] for a raw form encoded body.
    pub fn verify_notify_form(&self, body: &str) -> Result<Value> {
        let params: Params = form_urlencoded::parse(body.as_bytes())
            .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
            .collect();
        self.verify_notify(&Value::Object(params))
    }

    /// Sign a payee instruction with the partner bank key.
    ///
    /// The signed text is the compact JSON of
    /// `{AMOUNT, PAYEE_ACCT_NAME, PAYEE_ACCT_NO, SUMMARY}` in that order.
    pub fn bank_sign(
        &self,
        payee_acct_no: &str,
        payee_acct_name: &str,
        amount: &str,
        summary: &str,
    ) -> Result<String> {
        let key = self
            .config
            .bank_private_key
            .as_ref()
            .ok_or_else(|| Error::config_invalid("bank private key is not configured"))?;

        let content = json!({
            "AMOUNT": amount,
            "PAYEE_ACCT_NAME": payee_acct_name,
            "PAYEE_ACCT_NO": payee_acct_no,
            "SUMMARY": summary,
        })
        .to_string();
        key.sign_sha1(content.as_bytes())
    }

    /// Encrypt the fields at `paths` with the gateway public key.
    pub fn encrypt_fields(&self, value: &mut Value, paths: &[&str]) -> Result<()> {
        field::encrypt_fields(value, paths, &self.config.allin_public_key)
    }

    /// Decrypt the fields at `paths` with the client private key.
    pub fn decrypt_fields(&self, value: &mut Value, paths: &[&str]) -> Result<()> {
        field::decrypt_fields(value, paths, &self.config.private_key)
    }

    /// The notify url for one operation.
    pub(crate) fn notify_url(&self, suffix: &str) -> String {
        format!("{}{}", self.config.notify, suffix)
    }
}

pub(crate) fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| Error::payload_invalid("unexpected gateway payload").with_source(e))
}
