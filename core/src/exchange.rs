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

use crate::observe::RequestTime;
use crate::time::now;
use crate::{Context, Error, Result};
use bytes::Bytes;
use log::debug;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Round trips slower than this are reported through `on_request_too_long`.
pub const DEFAULT_TOO_LONG_THRESHOLD: Duration = Duration::from_secs(2);

/// Perform one observed round trip.
///
/// The request is sent through the context transport and the response body
/// is decoded as JSON before `handle` verifies and unwraps it. The context
/// observer sees the signed `params`, the decoded response, slow round trips
/// and any error raised by `handle`.
pub async fn exchange<T>(
    ctx: &Context,
    req: http::Request<Bytes>,
    params: &Value,
    too_long: Duration,
    handle: impl FnOnce(Value) -> Result<T>,
) -> Result<T> {
    debug!("sending gateway request: {} {}", req.method(), req.uri());

    let start_at = now();
    let started = Instant::now();
    let resp = ctx.http_send(req).await?;
    let elapsed = started.elapsed();
    let end_at = now();

    let status = resp.status();
    if !status.is_success() {
        return Err(Error::unexpected(format!(
            "gateway responded with http status {status}"
        )));
    }

    let body = resp.into_body();
    let decoded = serde_json::from_slice::<Value>(&body);
    let response = match &decoded {
        Ok(v) => v.clone(),
        Err(_) => Value::String(String::from_utf8_lossy(&body).into_owned()),
    };

    let observe = ctx.observe();
    observe.on_request(params, &response);

    let time = RequestTime {
        start_at,
        end_at,
        elapsed,
    };
    if elapsed > too_long {
        observe.on_request_too_long(params, &response, time);
    }

    let result = decoded
        .map_err(|e| Error::payload_invalid("gateway response is not json").with_source(e))
        .and_then(handle);
    if let Err(err) = &result {
        observe.on_request_error(params, &response, err);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HttpSend, Observe};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Debug)]
    struct StaticHttpSend {
        status: u16,
        body: &'static str,
    }

    #[async_trait::async_trait]
    impl HttpSend for StaticHttpSend {
        async fn http_send(&self, _req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            Ok(http::Response::builder()
                .status(self.status)
                .body(Bytes::from_static(self.body.as_bytes()))?)
        }
    }

    #[derive(Debug, Default, Clone)]
    struct RecordingObserve {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl Observe for RecordingObserve {
        fn on_request(&self, _params: &Value, response: &Value) {
            self.events.lock().unwrap().push(format!("request {response}"));
        }

        fn on_request_error(&self, _params: &Value, _response: &Value, err: &Error) {
            self.events.lock().unwrap().push(format!("error {err}"));
        }

        fn on_request_too_long(&self, _params: &Value, _response: &Value, _time: RequestTime) {
            self.events.lock().unwrap().push("too long".to_string());
        }
    }

    fn request() -> http::Request<Bytes> {
        http::Request::get("https://gateway.test/service/soa")
            .body(Bytes::new())
            .unwrap()
    }

    #[tokio::test]
    async fn test_exchange_observes_request_and_error() {
        let observe = RecordingObserve::default();
        let ctx = Context::new()
            .with_http_send(StaticHttpSend {
                status: 200,
                body: r#"{"status":"error"}"#,
            })
            .with_observe(observe.clone());

        let err = exchange(&ctx, request(), &json!({}), Duration::from_secs(60), |_| {
            Err::<(), _>(Error::business("rejected", Some("1".to_string())))
        })
        .await
        .unwrap_err();
        assert!(err.is_business_code("1"));

        assert_eq!(
            *observe.events.lock().unwrap(),
            vec![
                r#"request {"status":"error"}"#.to_string(),
                "error rejected".to_string()
            ]
        );
    }

    #[derive(Debug)]
    struct SlowHttpSend {
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl HttpSend for SlowHttpSend {
        async fn http_send(&self, _req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            tokio::time::sleep(self.delay).await;
            Ok(http::Response::builder()
                .status(200)
                .body(Bytes::from_static(br#"{"ok":true}"#))?)
        }
    }

    #[tokio::test]
    async fn test_exchange_reports_too_long() {
        let observe = RecordingObserve::default();
        let ctx = Context::new()
            .with_http_send(SlowHttpSend {
                delay: Duration::from_millis(50),
            })
            .with_observe(observe.clone());

        let value = exchange(&ctx, request(), &json!({}), Duration::from_millis(10), Ok)
            .await
            .unwrap();
        assert_eq!(value, json!({"ok": true}));
        assert_eq!(
            *observe.events.lock().unwrap(),
            vec![
                r#"request {"ok":true}"#.to_string(),
                "too long".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_exchange_within_threshold_is_not_reported() {
        let observe = RecordingObserve::default();
        let ctx = Context::new()
            .with_http_send(SlowHttpSend {
                delay: Duration::from_millis(50),
            })
            .with_observe(observe.clone());

        exchange(&ctx, request(), &json!({}), Duration::from_secs(60), Ok)
            .await
            .unwrap();
        assert_eq!(
            *observe.events.lock().unwrap(),
            vec![r#"request {"ok":true}"#.to_string()]
        );
    }

    #[tokio::test]
    async fn test_exchange_rejects_non_json_and_http_errors() {
        let ctx = Context::new().with_http_send(StaticHttpSend {
            status: 200,
            body: "<html>bad gateway</html>",
        });
        let err = exchange(&ctx, request(), &json!({}), DEFAULT_TOO_LONG_THRESHOLD, Ok)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::PayloadInvalid);

        let ctx = Context::new().with_http_send(StaticHttpSend {
            status: 502,
            body: "",
        });
        let err = exchange(&ctx, request(), &json!({}), DEFAULT_TOO_LONG_THRESHOLD, Ok)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Unexpected);
    }
}
