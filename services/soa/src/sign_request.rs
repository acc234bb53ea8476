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

//! Envelope signing and response verification for the SOA gateway.

use log::debug;
use serde_json::{json, Value};

use super::config::Config;
use super::constants::*;
use allinpay_core::hash::base64_md5;
use allinpay_core::time::{format_datetime, now, DateTime};
use allinpay_core::utils::{encode_query, value_to_string};
use allinpay_core::{Error, Result};

/// A signed SOA request envelope.
///
/// Fields keep the wire order `sysid, v, timestamp, sign, req`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Application id.
    pub sysid: String,
    /// Protocol version, always `2.0`.
    pub v: String,
    /// Signing time as `YYYY-MM-DD HH:MM:SS` in gateway time.
    pub timestamp: String,
    /// Base64 RSA-SHA1 signature.
    pub sign: String,
    /// Compact JSON of `{service, method, param}`.
    pub req: String,
}

impl Envelope {
    /// Percent encoded query string of the envelope.
    pub fn to_query(&self) -> String {
        encode_query([
            ("sysid", self.sysid.as_str()),
            ("v", self.v.as_str()),
            ("timestamp", self.timestamp.as_str()),
            ("sign", self.sign.as_str()),
            ("req", self.req.as_str()),
        ])
    }

    /// The envelope as a JSON object, as handed to observers.
    pub fn to_value(&self) -> Value {
        json!({
            "sysid": self.sysid,
            "v": self.v,
            "timestamp": self.timestamp,
            "sign": self.sign,
            "req": self.req,
        })
    }
}

/// RequestSigner builds signed SOA envelopes.
#[derive(Debug, Clone, Default)]
pub struct RequestSigner {
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Sign one `service.method` call.
    ///
    /// The signature covers `base64(md5(sysid + req + timestamp))`, not the
    /// raw concatenation.
    pub fn sign(&self, cfg: &Config, service: &str, method: &str, param: &Value) -> Result<Envelope> {
        let req = serde_json::to_string(&json!({
            "service": service,
            "method": method,
            "param": param,
        }))
        .map_err(|e| Error::request_invalid("failed to serialize request").with_source(e))?;
        let timestamp = format_datetime(self.time.unwrap_or_else(now));

        let digest = base64_md5(format!("{}{}{}", cfg.sys_id, req, timestamp).as_bytes());
        debug!("signing {service}.{method} at {timestamp}, digest: {digest}");
        let sign = cfg.private_key.sign_sha1(digest.as_bytes())?;

        Ok(Envelope {
            sysid: cfg.sys_id.clone(),
            v: SOA_VERSION.to_string(),
            timestamp,
            sign,
            req,
        })
    }
}

/// Verify a synchronous response and return its decoded payload.
///
/// A `status` other than `OK` is a business error carrying `message` and
/// `errorCode`. Otherwise `sign` must validate over `base64(md5(signedValue))`
/// before `signedValue` is parsed.
pub fn verify_response(cfg: &Config, body: &Value) -> Result<Value> {
    if body.get("status").and_then(Value::as_str) != Some("OK") {
        let message = non_null(body, "message").unwrap_or_default();
        let code = non_null(body, "errorCode");
        return Err(Error::business(message, code));
    }

    let signed_value = body
        .get("signedValue")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::signature_invalid("response carries no signedValue"))?;
    let sign = body
        .get("sign")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::signature_invalid("response carries no sign"))?;

    let digest = base64_md5(signed_value.as_bytes());
    cfg.allin_public_key.verify_sha1(digest.as_bytes(), sign)?;

    serde_json::from_str(signed_value)
        .map_err(|e| Error::payload_invalid("failed to parse signedValue").with_source(e))
}

/// Verify an asynchronous notification and return its decoded `rps`.
///
/// The signature covers `base64(md5(sysid + rps + timestamp))`.
pub fn verify_notify(cfg: &Config, body: &Value) -> Result<Value> {
    let field = |key: &str| {
        body.get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| Error::signature_invalid(format!("notification carries no {key}")))
    };
    let sysid = field("sysid")?;
    let rps = field("rps")?;
    let timestamp = field("timestamp")?;
    let sign = field("sign")?;

    let digest = base64_md5(format!("{sysid}{rps}{timestamp}").as_bytes());
    cfg.allin_public_key.verify_sha1(digest.as_bytes(), sign)?;

    serde_json::from_str(rps)
        .map_err(|e| Error::payload_invalid("failed to parse notification rps").with_source(e))
}

fn non_null(body: &Value, key: &str) -> Option<String> {
    body.get(key).filter(|v| !v.is_null()).map(value_to_string)
}
