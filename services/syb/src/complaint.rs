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

use serde_json::{json, Value};

use super::client::Client;
use super::constants::RISK_FEEDBACK_SERVICE;
use allinpay_core::{Error, Params, Result};

const QRY_LIMIT: u32 = 50;
const HISTORY_LIMIT: u32 = 100;

/// ComplaintService handles consumer complaints raised through the wallets.
///
/// Results are returned camelCased as the gateway sends them.
#[derive(Debug, Clone, Copy)]
pub struct ComplaintService<'a> {
    client: &'a Client,
}

impl<'a> ComplaintService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    async fn call(&self, method: &str, param: Value) -> Result<Value> {
        let param: Params = match param {
            Value::Object(map) => map,
            _ => Params::new(),
        };
        self.client.request(RISK_FEEDBACK_SERVICE, method, &param).await
    }

    /// List complaints created between two days (`YYYY-MM-DD`).
    ///
    /// Pages default to offset 0 and 50 entries.
    pub async fn complaint_qry(
        &self,
        begin_date: &str,
        end_date: &str,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Value> {
        self.call(
            "complaintqry",
            json!({
                "begin_date": begin_date,
                "end_date": end_date,
                "offset": offset.unwrap_or(0),
                "limit": limit.unwrap_or(QRY_LIMIT),
            }),
        )
        .await
    }

    /// Details of one complaint.
    pub async fn complaint_detail(&self, complaint_id: &str) -> Result<Value> {
        self.call("wxcomplaintdetail", json!({"complaint_id": complaint_id}))
            .await
    }

    /// Negotiation history of one complaint.
    ///
    /// Pages default to offset 0 and 100 entries.
    pub async fn complaint_history(
        &self,
        complaint_id: &str,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Value> {
        self.call(
            "wxcomplainthistory",
            json!({
                "complaint_id": complaint_id,
                "offset": offset.unwrap_or(0),
                "limit": limit.unwrap_or(HISTORY_LIMIT),
            }),
        )
        .await
    }

    /// Reply to a complaint.
    ///
    /// `images` holds at most 4 image ids joined by `#@#`.
    pub async fn complaint_resp(
        &self,
        complaint_id: &str,
        content: &str,
        images: Option<&str>,
    ) -> Result<Value> {
        self.call(
            "complaintsResp",
            json!({
                "complaint_id": complaint_id,
                "response_content": content,
                "response_images": images.unwrap_or_default(),
            }),
        )
        .await
    }

    /// Mark a complaint as handled.
    pub async fn complaint_complete(&self, complaint_id: &str) -> Result<Value> {
        self.call("complaintsComplete", json!({"complaint_id": complaint_id}))
            .await
    }

    /// Download an image attached to a complaint, base64 encoded.
    pub async fn get_merchant_image(&self, img_url: &str) -> Result<String> {
        match self.call("wxgetmerchantimage", json!({"imgurl": img_url})).await? {
            Value::String(image) => Ok(image),
            _ => Err(Error::payload_invalid("response carries no imagebase64")),
        }
    }
}
