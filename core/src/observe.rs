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

use crate::time::DateTime;
use crate::Error;
use log::{debug, warn};
use serde_json::Value;
use std::fmt::Debug;
use std::time::Duration;

/// Start and end of one request round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTime {
    /// When the request was handed to the transport.
    pub start_at: DateTime,
    /// When the response body was fully received.
    pub end_at: DateTime,
    /// Monotonic duration of the round trip.
    ///
    /// `start_at` and `end_at` are wall clock readings for reporting only.
    pub elapsed: Duration,
}

impl RequestTime {
    /// Time spent in the round trip.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Observe is notified about every request the gateway clients perform.
///
/// All methods default to no-ops so implementations only override what they
/// care about. `params` is the signed envelope as sent and `response` is the
/// raw response body (a JSON string value if the body was not JSON).
pub trait Observe: Debug + Send + Sync + 'static {
    /// A response has been received.
    fn on_request(&self, _params: &Value, _response: &Value) {}

    /// Result handling failed for a received response.
    fn on_request_error(&self, _params: &Value, _response: &Value, _err: &Error) {}

    /// The round trip took longer than the client threshold.
    fn on_request_too_long(&self, _params: &Value, _response: &Value, _time: RequestTime) {}

    /// A gateway notification has been received.
    fn on_back_receive(&self, _body: &Value) {}
}

/// NoopObserve ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserve;

impl Observe for NoopObserve {}

/// LogObserve writes every event through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserve;

impl Observe for LogObserve {
    fn on_request(&self, params: &Value, response: &Value) {
        debug!("gateway request: params={params}, response={response}");
    }

    fn on_request_error(&self, params: &Value, response: &Value, err: &Error) {
        warn!("gateway request failed: {err}, params={params}, response={response}");
    }

    fn on_request_too_long(&self, params: &Value, _response: &Value, time: RequestTime) {
        warn!(
            "gateway request took {}ms: params={params}",
            time.elapsed().as_millis()
        );
    }

    fn on_back_receive(&self, body: &Value) {
        debug!("gateway notification: body={body}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_request_time_elapsed_ignores_wall_clock() {
        let start_at = crate::time::now();
        // A wall clock stepped backwards must not hide the measured duration.
        let time = RequestTime {
            start_at,
            end_at: start_at - TimeDelta::try_seconds(60).expect("in bounds"),
            elapsed: Duration::from_millis(2500),
        };
        assert_eq!(time.elapsed(), Duration::from_millis(2500));
    }
}
