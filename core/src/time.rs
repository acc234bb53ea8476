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

//! Time related utils.

use chrono::{NaiveDateTime, TimeDelta, Utc};

/// DateTime is the alias for `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Wall clock of China Standard Time (UTC+8), the zone the gateways run on.
fn gateway_wall_clock(t: DateTime) -> NaiveDateTime {
    t.naive_utc() + TimeDelta::hours(8)
}

/// Format time into gateway datetime: `2022-03-13 15:20:04`
pub fn format_datetime(t: DateTime) -> String {
    gateway_wall_clock(t)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Format time into gateway date: `2022-03-13`
pub fn format_date(t: DateTime) -> String {
    gateway_wall_clock(t)
        .format("%Y-%m-%d")
        .to_string()
}

/// Milliseconds since the Unix epoch.
pub fn timestamp_millis(t: DateTime) -> i64 {
    t.timestamp_millis()
}
