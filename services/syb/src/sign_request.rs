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

//! Request signing and response verification for the SYB gateway.

use log::debug;
use serde_json::Value;

use super::config::Config;
use super::constants::*;
use allinpay_core::field::is_truthy;
use allinpay_core::hash::base64_decode;
use allinpay_core::time::{now, timestamp_millis, DateTime};
use allinpay_core::utils::{camel_case_keys, encode_query, value_to_string};
use allinpay_core::{Error, Params, Result};

/// Response fields that never reach the caller.
const ENVELOPE_FIELDS: [&str; 6] = ["appid", "cusid", "randomstr", "retcode", "retmsg", "sign"];

/// Build the canonical string of `params`.
///
/// Every entry is rendered as `key=value` and the rendered entries (not the
/// keys) are sorted before joining them with `&`.
pub fn canonical_string(params: &Params) -> String {
    let mut pairs: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{k}={}", value_to_string(v)))
        .collect();
    pairs.sort();
    pairs.join("&")
}

/// Form encode `params` in their map order.
pub fn to_form(params: &Params) -> String {
    let pairs: Vec<(&str, String)> = params
        .iter()
        .map(|(k, v)| (k.as_str(), value_to_string(v)))
        .collect();
    encode_query(pairs.iter().map(|(k, v)| (*k, v.as_str())))
}

/// RequestSigner builds signed SYB parameter maps.
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

    /// Merge the fixed identifiers with `param` and sign the result.
    ///
    /// `param` overrides the fixed identifiers. Values that are exactly `""`
    /// are left out of both the signature and the request.
    pub fn sign(&self, cfg: &Config, param: &Params) -> Result<Params> {
        let randomstr = timestamp_millis(self.time.unwrap_or_else(now)).to_string();

        let mut params = Params::new();
        for (k, v) in [
            ("appid", cfg.app_id.as_str()),
            ("orgid", cfg.org_id.as_str()),
            ("cusid", cfg.cus_id.as_str()),
            ("randomstr", randomstr.as_str()),
            ("version", SYB_VERSION),
            ("signtype", SYB_SIGN_TYPE),
        ] {
            params.insert(k.to_string(), Value::String(v.to_string()));
        }
        for (k, v) in param {
            if v.as_str() != Some("") {
                params.insert(k.clone(), v.clone());
            }
        }
        params.retain(|_, v| v.as_str() != Some(""));

        let canonical = canonical_string(&params);
        debug!("canonical string: {canonical}");
        let sign = cfg.private_key.sign_sha1(canonical.as_bytes())?;
        params.insert("sign".to_string(), Value::String(sign));

        Ok(params)
    }
}

/// Check, verify and unwrap a response.
///
/// Responses without `sign` are accepted unverified; the gateway omits it on
/// some routes.
pub fn verify_response(cfg: &Config, body: &Value) -> Result<Value> {
    let map = body
        .as_object()
        .ok_or_else(|| Error::payload_invalid("response is not a json object"))?;

    let truthy = |key: &str| map.get(key).filter(|v| is_truthy(v));
    let failed = map.get("retcode").and_then(Value::as_str) != Some("SUCCESS")
        || truthy("retmsg").is_some()
        || map.get("handlestate").and_then(Value::as_str) == Some("3999");
    if failed {
        let message = truthy("retmsg")
            .or_else(|| truthy("handlemsg"))
            .map(value_to_string)
            .unwrap_or_default();
        let code = map.get("retcode").filter(|v| !v.is_null()).map(value_to_string);
        return Err(Error::business(message, code));
    }

    match truthy("sign") {
        Some(sign) => {
            let sign = sign
                .as_str()
                .ok_or_else(|| Error::signature_invalid("sign is not a string"))?;
            let mut rest = map.clone();
            rest.remove("sign");
            cfg.public_key
                .verify_sha1(canonical_string(&rest).as_bytes(), sign)?;
        }
        None => debug!("response carries no sign, accepted unverified"),
    }

    unwrap_response(map)
}

fn unwrap_response(map: &Params) -> Result<Value> {
    let mut rest = map.clone();
    for key in ENVELOPE_FIELDS {
        rest.remove(key);
    }
    let rest = camel_case_keys(Value::Object(rest));

    if let Some(records) = rest.get("records").filter(|v| is_truthy(v)) {
        let records = records
            .as_str()
            .ok_or_else(|| Error::payload_invalid("records is not a string"))?;
        let decoded = base64_decode(records)?;
        let records: Value = serde_json::from_slice(&decoded)
            .map_err(|e| Error::payload_invalid("failed to parse records").with_source(e))?;
        return Ok(camel_case_keys(records));
    }
    if let Some(image) = rest.get("imagebase64").filter(|v| is_truthy(v)) {
        return Ok(Value::String(value_to_string(image)));
    }
    Ok(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use allinpay_core::hash::base64_encode;
    use allinpay_core::{ErrorKind, PrivateKey, PublicKey};
    use chrono::TimeZone;
    use once_cell::sync::Lazy;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    static CONFIG: Lazy<Config> = Lazy::new(|| {
        Config::new(
            "https://vsp.test/apiweb",
            "00000051",
            "990440148166000",
            PrivateKey::from_pem(include_str!("../../../testdata/client_private.pem"))
                .expect("client key must be valid"),
            PublicKey::from_pem(include_str!("../../../testdata/gateway_public.pem"))
                .expect("gateway key must be valid"),
        )
    });

    fn params(value: Value) -> Params {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_canonical_string_sorts_entries() {
        assert_eq!(canonical_string(&params(json!({"b": "2", "a": "1"}))), "a=1&b=2");
        assert_eq!(
            canonical_string(&params(json!({"x": {"k": [1, "v"]}, "n": null, "f": false}))),
            r#"f=false&n=null&x={"k":[1,"v"]}"#
        );
        // Whole entries are sorted, so `a=` lands before `a_b=`.
        assert_eq!(
            canonical_string(&params(json!({"a_b": "1", "a": "2"}))),
            "a=2&a_b=1"
        );
    }

    #[test]
    fn test_sign() -> Result<()> {
        let time = chrono::Utc
            .with_ymd_and_hms(2024, 5, 20, 2, 30, 0)
            .single()
            .expect("valid time");
        let signer = RequestSigner::new().with_time(time);

        let signed = signer.sign(
            &CONFIG,
            &params(json!({
                "begin_date": "2024-05-01",
                "end_date": "2024-05-20",
                "offset": 0,
                "limit": 50,
            })),
        )?;

        let mut unsigned = signed.clone();
        unsigned.remove("sign");
        assert_eq!(
            canonical_string(&unsigned),
            "appid=00000051&begin_date=2024-05-01&cusid=990440148166000&end_date=2024-05-20&limit=50&offset=0&randomstr=1716172200000&signtype=RSA&version=11"
        );
        assert_eq!(
            signed["sign"],
            json!("LyxcVzr66mVH6X6Kg8biZS6Uzqae8o4/Ci1Qu2ONd6LVlw1feN9xfGE/fXWjyBtbFeaOqbpvebz5dLgOgUaN1pGq0unuB+7ojSmEybnkYTgGaDAsjMcRBzlxnqz5u/TOhg6ZoY7iz62fU3QjzU9jg9MvUeS+DuS+shFx0G/hXQU=")
        );
        assert!(!signed.contains_key("orgid"));
        Ok(())
    }

    #[test]
    fn test_sign_drops_empty_values_and_lets_caller_override() -> Result<()> {
        let signed = RequestSigner::new().sign(
            &CONFIG,
            &params(json!({"response_images": "", "cusid": "override", "appid": ""})),
        )?;

        assert!(!signed.contains_key("response_images"));
        assert_eq!(signed["cusid"], json!("override"));
        assert_eq!(signed["appid"], json!("00000051"));
        assert!(!to_form(&signed).contains("response_images"));
        Ok(())
    }

    #[test]
    fn test_to_form() {
        let form = to_form(&params(json!({"content": "a b&c", "limit": 50})));
        assert_eq!(form, "content=a%20b%26c&limit=50");
    }

    #[test]
    fn test_verify_response() -> Result<()> {
        let body = json!({
            "appid": "00000051",
            "cusid": "990440148166000",
            "retcode": "SUCCESS",
            "randomstr": "123456",
            "trxid": "T100",
            "trxstatus": "0000",
            "sign": "Tu6dsKobDnsHF6AEVI2+Qb4shj9reMo9yoWAycUqRurmjxTrfU1jmKyHt5kLmi8YJfzYnE2yjjVJzf9001XoBVUMGP/C44e4eFTnvPTdHk9h+9SuOWyvdl4IaWjInhmZWWo7aaqcfJAHa2tDgEtVb4GZIcZA52/RGLH3BJGNkAM=",
        });
        assert_eq!(
            verify_response(&CONFIG, &body)?,
            json!({"trxid": "T100", "trxstatus": "0000"})
        );

        let mut tampered = body.clone();
        tampered["trxstatus"] = json!("3045");
        let err = verify_response(&CONFIG, &tampered).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SignatureInvalid);
        Ok(())
    }

    #[test_case(json!({"retcode": "FAIL", "retmsg": "签名错误"}), "签名错误", Some("FAIL"); "retcode fail")]
    #[test_case(json!({"retcode": "SUCCESS", "retmsg": "商户不存在"}), "商户不存在", Some("SUCCESS"); "retmsg set")]
    #[test_case(json!({"retcode": "SUCCESS", "handlestate": "3999", "handlemsg": "处理失败"}), "处理失败", Some("SUCCESS"); "handlestate 3999")]
    #[test_case(json!({"retmsg": ""}), "", None; "nothing at all")]
    fn test_verify_response_business_error(body: Value, message: &str, code: Option<&str>) {
        let err = verify_response(&CONFIG, &body).unwrap_err();
        assert!(err.is_business());
        assert_eq!(err.message(), message);
        assert_eq!(err.code(), code);
    }

    #[test]
    fn test_numeric_handlestate_is_not_a_failure() -> Result<()> {
        let body = json!({"retcode": "SUCCESS", "handlestate": 3999});
        assert_eq!(verify_response(&CONFIG, &body)?, json!({"handlestate": 3999}));
        Ok(())
    }

    #[test]
    fn test_unsigned_response_is_accepted() -> Result<()> {
        let body = json!({"retcode": "SUCCESS", "complaint_id": "c1", "out_trade_no": "o1"});
        assert_eq!(
            verify_response(&CONFIG, &body)?,
            json!({"complaintId": "c1", "outTradeNo": "o1"})
        );
        Ok(())
    }

    #[test]
    fn test_records_and_images() -> Result<()> {
        let records = base64_encode(br#"[{"complaint_id":"c1","complaint_detail":"slow"}]"#);
        let body = json!({"retcode": "SUCCESS", "records": records, "total": 1});
        assert_eq!(
            verify_response(&CONFIG, &body)?,
            json!([{"complaintId": "c1", "complaintDetail": "slow"}])
        );

        let body = json!({"retcode": "SUCCESS", "imagebase64": "iVBORw0KGgo="});
        assert_eq!(verify_response(&CONFIG, &body)?, json!("iVBORw0KGgo="));

        let body = json!({"retcode": "SUCCESS", "records": "!!not base64!!"});
        let err = verify_response(&CONFIG, &body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PayloadInvalid);
        Ok(())
    }

    #[test_case("eyJhIjoiYmMifQ"; "unpadded")]
    #[test_case("eyJhIjoi\r\nYmMifQ=="; "line wrapped")]
    fn test_records_loosely_encoded(records: &str) -> Result<()> {
        let body = json!({"retcode": "SUCCESS", "records": records});
        assert_eq!(verify_response(&CONFIG, &body)?, json!({"a": "bc"}));
        Ok(())
    }
}
