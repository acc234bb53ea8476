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

//! Runs the SYB client against an in-process gateway.

use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use allinpay_core::hash::base64_encode;
use allinpay_core::{Context, Error, ErrorKind, HttpSend, Observe, Params, PrivateKey, PublicKey, RequestTime, Result};
use allinpay_syb::{canonical_string, Client, Config};
use async_trait::async_trait;
use bytes::Bytes;
use once_cell::sync::Lazy;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

static CLIENT_PUBLIC: Lazy<PublicKey> =
    Lazy::new(|| PublicKey::from_pem(include_str!("../../../testdata/client_public.pem")).unwrap());
static GATEWAY_PRIVATE: Lazy<PrivateKey> =
    Lazy::new(|| PrivateKey::from_pem(include_str!("../../../testdata/gateway_private.pem")).unwrap());

type Handler = Box<dyn Fn(&str, &Params) -> Value + Send + Sync>;

/// Gateway double. Requests are checked and recorded as `(path, form)`.
/// Answers are signed unless they carry a `sign` already, `"sign": false`
/// sends them unsigned.
struct MockGateway {
    handler: Handler,
    calls: Arc<Mutex<Vec<(String, Params)>>>,
}

impl Debug for MockGateway {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockGateway").finish_non_exhaustive()
    }
}

#[async_trait]
impl HttpSend for MockGateway {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        assert_eq!(req.method(), http::Method::POST);
        assert_eq!(
            req.headers()[http::header::CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );

        let mut form: Params = form_urlencoded::parse(req.body())
            .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
            .collect();
        let sign = form
            .remove("sign")
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        CLIENT_PUBLIC.verify_sha1(canonical_string(&form).as_bytes(), &sign)?;

        let path = req.uri().path().to_string();
        self.calls.lock().unwrap().push((path.clone(), form.clone()));

        let mut answer = (self.handler)(&path, &form);
        if let Value::Object(map) = &mut answer {
            match map.get("sign") {
                Some(Value::Bool(false)) => {
                    map.remove("sign");
                }
                Some(Value::String(_)) => {}
                _ => {
                    let sign = GATEWAY_PRIVATE.sign_sha1(canonical_string(map).as_bytes())?;
                    map.insert("sign".to_string(), Value::String(sign));
                }
            }
        }
        Ok(http::Response::new(Bytes::from(answer.to_string())))
    }
}

#[derive(Debug, Default, Clone)]
struct RecordingObserve {
    events: Arc<Mutex<Vec<String>>>,
}

impl Observe for RecordingObserve {
    fn on_request(&self, params: &Value, _response: &Value) {
        let has_sign = params.get("sign").is_some();
        self.events.lock().unwrap().push(format!("request signed={has_sign}"));
    }

    fn on_request_error(&self, _params: &Value, _response: &Value, err: &Error) {
        self.events.lock().unwrap().push(format!("error {}", err.kind()));
    }

    fn on_request_too_long(&self, _params: &Value, _response: &Value, _time: RequestTime) {
        self.events.lock().unwrap().push("too long".to_string());
    }
}

struct Fixture {
    client: Client,
    calls: Arc<Mutex<Vec<(String, Params)>>>,
    events: Arc<Mutex<Vec<String>>>,
}

impl Fixture {
    fn call(&self, i: usize) -> (String, Params) {
        self.calls.lock().unwrap()[i].clone()
    }
}

fn fixture(handler: impl Fn(&str, &Params) -> Value + Send + Sync + 'static) -> Fixture {
    let _ = env_logger::builder().is_test(true).try_init();

    let calls = Arc::new(Mutex::new(Vec::new()));
    let observe = RecordingObserve::default();
    let events = observe.events.clone();
    let ctx = Context::new()
        .with_http_send(MockGateway {
            handler: Box::new(handler),
            calls: calls.clone(),
        })
        .with_observe(observe);

    let cfg = Config::new(
        "https://vsp.test/apiweb",
        "00000051",
        "990440148166000",
        PrivateKey::from_pem(include_str!("../../../testdata/client_private.pem")).unwrap(),
        PublicKey::from_pem(include_str!("../../../testdata/gateway_public.pem")).unwrap(),
    );
    Fixture {
        client: Client::new(ctx, cfg),
        calls,
        events,
    }
}

#[tokio::test]
async fn test_complaint_qry() -> Result<()> {
    let records = base64_encode(
        br#"[{"complaint_id":"c1","complaint_state":"PENDING","payer_phone":"138"}]"#,
    );
    let fx = fixture(move |_, _| {
        json!({
            "appid": "00000051",
            "cusid": "990440148166000",
            "retcode": "SUCCESS",
            "total": 1,
            "records": records,
        })
    });

    let complaints = fx
        .client
        .complaint()
        .complaint_qry("2024-05-01", "2024-05-20", None, None)
        .await?;
    assert_eq!(
        complaints,
        json!([{"complaintId": "c1", "complaintState": "PENDING", "payerPhone": "138"}])
    );

    let (path, form) = fx.call(0);
    assert_eq!(path, "/apiweb/riskfeeback/complaintqry");
    assert_eq!(form["begin_date"], json!("2024-05-01"));
    assert_eq!(form["offset"], json!("0"));
    assert_eq!(form["limit"], json!("50"));
    assert_eq!(form["version"], json!("11"));
    assert_eq!(form["signtype"], json!("RSA"));
    assert!(!form.contains_key("orgid"));
    assert_eq!(*fx.events.lock().unwrap(), vec!["request signed=true"]);
    Ok(())
}

#[tokio::test]
async fn test_complaint_resp_without_images() -> Result<()> {
    let fx = fixture(|_, form| {
        json!({"retcode": "SUCCESS", "complaint_id": form["complaint_id"], "sign": false})
    });

    let result = fx
        .client
        .complaint()
        .complaint_resp("c1", "已退款", None)
        .await?;
    assert_eq!(result, json!({"complaintId": "c1"}));

    let (path, form) = fx.call(0);
    assert_eq!(path, "/apiweb/riskfeeback/complaintsResp");
    assert_eq!(form["response_content"], json!("已退款"));
    assert!(!form.contains_key("response_images"));
    Ok(())
}

#[tokio::test]
async fn test_complaint_history_and_complete() -> Result<()> {
    let fx = fixture(|path, _| match path {
        "/apiweb/riskfeeback/wxcomplainthistory" => json!({
            "retcode": "SUCCESS",
            "data": [{"operate_type": "USER_CREATE_COMPLAINT"}],
        }),
        _ => json!({"retcode": "SUCCESS", "complaint_id": "c1"}),
    });
    let complaint = fx.client.complaint();

    let history = complaint.complaint_history("c1", None, Some(10)).await?;
    assert_eq!(history, json!({"data": [{"operateType": "USER_CREATE_COMPLAINT"}]}));
    assert_eq!(fx.call(0).1["limit"], json!("10"));

    complaint.complaint_complete("c1").await?;
    assert_eq!(fx.call(1).0, "/apiweb/riskfeeback/complaintsComplete");
    Ok(())
}

#[tokio::test]
async fn test_get_merchant_image() -> Result<()> {
    let fx = fixture(|_, _| json!({"retcode": "SUCCESS", "imagebase64": "iVBORw0KGgo="}));

    let image = fx
        .client
        .complaint()
        .get_merchant_image("https://api.mch.weixin.qq.com/v3/merchant-service/images/abc")
        .await?;
    assert_eq!(image, "iVBORw0KGgo=");
    assert_eq!(
        fx.call(0).1["imgurl"],
        json!("https://api.mch.weixin.qq.com/v3/merchant-service/images/abc")
    );
    Ok(())
}

#[tokio::test]
async fn test_business_error_is_observed() {
    let fx = fixture(|_, _| json!({"retcode": "FAIL", "retmsg": "投诉单不存在"}));

    let err = fx
        .client
        .complaint()
        .complaint_detail("c404")
        .await
        .unwrap_err();
    assert!(err.is_business_code("FAIL"));
    assert_eq!(err.message(), "投诉单不存在");
    assert_eq!(
        *fx.events.lock().unwrap(),
        vec!["request signed=true", "error gateway business error"]
    );
}

#[tokio::test]
async fn test_tampered_response_is_rejected() {
    let mut signed = Params::new();
    signed.insert("retcode".to_string(), json!("SUCCESS"));
    signed.insert("complaint_id".to_string(), json!("c1"));
    let sign = GATEWAY_PRIVATE
        .sign_sha1(canonical_string(&signed).as_bytes())
        .unwrap();

    let fx = fixture(move |_, _| json!({"retcode": "SUCCESS", "complaint_id": "c2", "sign": sign}));

    let err = fx
        .client
        .complaint()
        .complaint_detail("c1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureInvalid);
    assert_eq!(
        *fx.events.lock().unwrap(),
        vec!["request signed=true", "error invalid signature"]
    );
}

#[tokio::test]
async fn test_slow_request_is_reported() -> Result<()> {
    let fx = fixture(|_, form| {
        std::thread::sleep(Duration::from_millis(50));
        json!({"retcode": "SUCCESS", "complaint_id": form["complaint_id"]})
    });
    let client = fx.client.with_too_long_threshold(Duration::from_millis(10));

    let detail = client.complaint().complaint_detail("c1").await?;
    assert_eq!(detail, json!({"complaintId": "c1"}));
    assert_eq!(
        *fx.events.lock().unwrap(),
        vec!["request signed=true", "too long"]
    );
    Ok(())
}
