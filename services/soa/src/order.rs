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

//! Order operations: withdrawals, refunds, transfers and balances.

use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use super::client::{from_value, Client};
use super::constants::{PLATFORM_BIZ_USER_ID, RESERVE_ACCOUNT_SET_NO};
use allinpay_core::time::{format_date, DateTime};
use allinpay_core::utils::value_to_string;
use allinpay_core::{Error, Result};

const SERVICE: &str = "OrderService";
const WITHDRAW_TYPE: &str = "D0";
const REFUND_TYPE: &str = "D0";
const INDUSTRY_CODE: &str = "1910";
const INDUSTRY_NAME: &str = "其他";

/// A bank withdrawal request.
#[derive(Debug, Clone, Default)]
pub struct Withdraw {
    pub biz_order_no: String,
    pub biz_user_id: String,
    /// Sub account at the partner bank the funds leave from.
    pub sub_acct_no: String,
    /// Payee card number, in plain text.
    pub bank_card_no: String,
    /// Payee name.
    pub name: String,
    /// In cents.
    pub amount: i64,
    /// In cents.
    pub fee: i64,
    pub summary: String,
}

/// Result of [`OrderService::withdraw_apply_ht`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawResult {
    #[serde(default)]
    pub biz_user_id: String,
    pub biz_order_no: String,
    #[serde(default)]
    pub order_no: String,
    pub account_set_no: String,
    pub withdraw_type: String,
    /// `success` or `pending`.
    #[serde(default)]
    pub pay_status: String,
    #[serde(default)]
    pub pay_info: Option<Value>,
}

/// A refund of an earlier order.
#[derive(Debug, Clone, Default)]
pub struct Refund {
    /// Order number of the refund itself.
    pub biz_order_no: String,
    /// Order being refunded.
    pub ori_biz_order_no: String,
    /// Member who paid the original order.
    pub biz_user_id: String,
    /// Total refunded, in cents.
    pub amount: i64,
    /// Fee refunded by the platform, in cents.
    pub fee_amount: i64,
}

/// Amount refunded from one payee of the original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefundItem {
    pub biz_user_id: String,
    /// In cents.
    pub amount: i64,
}

/// One split sub order of a split refund.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitRefundOrder {
    pub split_biz_order_no: String,
    /// In cents.
    pub amount: i64,
    pub biz_user_id: String,
    pub split_refund_list: Vec<SplitRefundItem>,
}

/// Amount refunded from one split receiver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitRefundItem {
    pub biz_user_id: String,
    /// In cents.
    pub amount: i64,
    /// In cents.
    pub fee_amount: i64,
}

/// Result of the refund operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefundResult {
    pub order_no: String,
    pub biz_order_no: String,
    /// `success` or `pending`.
    pub pay_status: String,
    pub amount: i64,
}

/// Result of [`OrderService::application_transfer`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResult {
    #[serde(default)]
    pub transfer_no: String,
    pub biz_transfer_no: String,
    pub amount: i64,
    pub source_account_set_no: String,
    pub target_account_set_no: String,
    pub target_biz_user_id: String,
}

/// Balance of a member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Balance {
    pub all_amount: i64,
    pub freezen_amount: i64,
}

/// Details of one order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderDetail {
    pub biz_order_no: String,
    pub order_no: String,
    pub buyer_biz_user_id: String,
    pub amount: i64,
    pub order_status: i64,
    pub pay_datetime: String,
    pub chnltrxid: Option<String>,
    pub error_message: Option<String>,
}

/// One page of balance movements.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InExpDetailResult {
    pub biz_user_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub total_num: String,
    pub in_exp_detail: Vec<InExpDetail>,
}

/// A balance movement.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InExpDetail {
    pub trade_no: String,
    pub biz_order_no: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub change_time: String,
    pub chg_amount: i64,
    pub ori_amount: i64,
    pub cur_amount: i64,
    pub cur_freezen_amount: i64,
    pub account_set_name: String,
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Null => String::new(),
        v => value_to_string(&v),
    })
}

/// A `payStatus` of `fail` means the gateway accepted the call but the
/// payment itself was refused.
fn check_pay_status(result: &Value, what: &str) -> Result<()> {
    if result.get("payStatus").and_then(Value::as_str) == Some("fail") {
        let message = result
            .get("payFailMessage")
            .and_then(Value::as_str)
            .unwrap_or_default();
        return Err(Error::business(format!("{what} failed: {message}"), None));
    }
    Ok(())
}

/// OrderService wraps the `OrderService` operations.
#[derive(Debug, Clone, Copy)]
pub struct OrderService<'a> {
    client: &'a Client,
}

impl<'a> OrderService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Withdraw to a bank card through the partner bank.
    ///
    /// The payee instruction is signed with the bank key and the card number
    /// is encrypted. A `payStatus` of `fail` is reported as a business error.
    pub async fn withdraw_apply_ht(&self, withdraw: &Withdraw) -> Result<WithdrawResult> {
        let account_set_no = self.client.config().account_set_no.clone();
        let signed_msg = self.client.bank_sign(
            &withdraw.bank_card_no,
            &withdraw.name,
            &withdraw.amount.to_string(),
            "",
        )?;

        let mut param = json!({
            "bizOrderNo": withdraw.biz_order_no,
            "bizUserId": withdraw.biz_user_id,
            "accountSetNo": account_set_no,
            "amount": withdraw.amount,
            "fee": withdraw.fee,
            "validateType": 0,
            "bankCardNo": withdraw.bank_card_no,
            "withdrawType": WITHDRAW_TYPE,
            "payMethod": {
                "WITHDRAW_HTBANK": {
                    "subAcctNo": withdraw.sub_acct_no,
                    "PAYEE_ACCT_NO": withdraw.bank_card_no,
                    "PAYEE_ACCT_NAME": withdraw.name,
                    "AMOUNT": withdraw.amount,
                    "SUMMARY": "",
                    "SIGNED_MSG_MER": signed_msg,
                },
            },
            "source": 1,
            "industryCode": INDUSTRY_CODE,
            "industryName": INDUSTRY_NAME,
            "summary": withdraw.summary,
            "backUrl": self.client.notify_url("withdraw"),
        });
        self.client.encrypt_fields(&mut param, &["bankCardNo"])?;

        let mut result = self.client.service_soa(SERVICE, "withdrawApply", &param).await?;
        check_pay_status(&result, "withdraw")?;

        if let Value::Object(map) = &mut result {
            map.insert("accountSetNo".to_string(), Value::String(account_set_no));
            map.insert("withdrawType".to_string(), Value::String(WITHDRAW_TYPE.to_string()));
        }
        from_value(result)
    }

    /// Refund a consumption order. Each payee in `refund_list` gives back
    /// its share from the configured account set.
    pub async fn trade_refund(&self, refund: &Refund, refund_list: &[RefundItem]) -> Result<RefundResult> {
        let mut param = self.refund_param(refund, "trade_refund");
        if !refund_list.is_empty() {
            let account_set_no = &self.client.config().account_set_no;
            param["refundList"] = refund_list
                .iter()
                .map(|item| {
                    json!({
                        "bizUserId": item.biz_user_id,
                        "amount": item.amount,
                        "accountSetNo": account_set_no,
                    })
                })
                .collect();
        }

        let result = self.client.service_soa(SERVICE, "refund", &param).await?;
        check_pay_status(&result, "refund")?;
        from_value(result)
    }

    /// Refund an order whose funds were split between receivers.
    ///
    /// Split totals are computed from the items. Shares held by the
    /// platform are taken from the reserve account set.
    pub async fn trade_split_refund(
        &self,
        refund: &Refund,
        order_refund_list: &[SplitRefundOrder],
    ) -> Result<RefundResult> {
        let mut param = self.refund_param(refund, "trade_refund");
        param["orderRefundList"] = order_refund_list
            .iter()
            .map(|order| {
                let items: Vec<Value> = order
                    .split_refund_list
                    .iter()
                    .map(|item| {
                        let mut v = json!({
                            "bizUserId": item.biz_user_id,
                            "amount": item.amount,
                            "feeAmount": item.fee_amount,
                        });
                        if item.biz_user_id == PLATFORM_BIZ_USER_ID {
                            v["accountSetNo"] = json!(RESERVE_ACCOUNT_SET_NO);
                        }
                        v
                    })
                    .collect();
                json!({
                    "splitBizOrderNo": order.split_biz_order_no,
                    "amount": order.amount,
                    "bizUserId": order.biz_user_id,
                    "splitRefundList": items,
                    "totalSplitAmount": order.split_refund_list.iter().map(|i| i.amount).sum::<i64>(),
                    "totalSplitfeeAmount": order.split_refund_list.iter().map(|i| i.fee_amount).sum::<i64>(),
                })
            })
            .collect();

        let result = self.client.service_soa(SERVICE, "orderSplitRefund", &param).await?;
        check_pay_status(&result, "refund")?;
        from_value(result)
    }

    /// Refund a platform transfer.
    pub async fn transfer_refund(
        &self,
        biz_order_no: &str,
        ori_biz_order_no: &str,
        biz_user_id: &str,
        amount: i64,
    ) -> Result<RefundResult> {
        let param = json!({
            "bizOrderNo": biz_order_no,
            "oriBizOrderNo": ori_biz_order_no,
            "bizUserId": biz_user_id,
            "amount": amount,
            "refundType": REFUND_TYPE,
            "backUrl": self.client.notify_url("transfer_refund"),
        });

        let result = self.client.service_soa(SERVICE, "refund", &param).await?;
        check_pay_status(&result, "refund")?;
        from_value(result)
    }

    fn refund_param(&self, refund: &Refund, notify: &str) -> Value {
        json!({
            "bizOrderNo": refund.biz_order_no,
            "oriBizOrderNo": refund.ori_biz_order_no,
            "bizUserId": refund.biz_user_id,
            "amount": refund.amount,
            "feeAmount": refund.fee_amount,
            "refundType": REFUND_TYPE,
            "backUrl": self.client.notify_url(notify),
        })
    }

    /// Transfer from the platform reserve account set to a member.
    ///
    /// Fields the gateway omits are filled from the request.
    pub async fn application_transfer(
        &self,
        biz_transfer_no: &str,
        target_biz_user_id: &str,
        amount: i64,
    ) -> Result<TransferResult> {
        let param = json!({
            "bizTransferNo": biz_transfer_no,
            "sourceAccountSetNo": RESERVE_ACCOUNT_SET_NO,
            "targetBizUserId": target_biz_user_id,
            "targetAccountSetNo": self.client.config().account_set_no,
            "amount": amount,
        });
        let mut result = self
            .client
            .service_soa(SERVICE, "applicationTransfer", &param)
            .await?;

        if let (Value::Object(map), Value::Object(defaults)) = (&mut result, param) {
            for (k, v) in defaults {
                map.entry(k).or_insert(v);
            }
        }
        from_value(result)
    }

    /// Query the balance of a member in the configured account set.
    pub async fn query_balance(&self, biz_user_id: &str) -> Result<Balance> {
        let param = json!({
            "bizUserId": biz_user_id,
            "accountSetNo": self.client.config().account_set_no,
        });
        let result = self.client.service_soa(SERVICE, "queryBalance", &param).await?;
        from_value(result)
    }

    /// Query one order.
    pub async fn get_order_detail(&self, biz_order_no: &str) -> Result<OrderDetail> {
        let param = json!({"bizOrderNo": biz_order_no});
        let result = self.client.service_soa(SERVICE, "getOrderDetail", &param).await?;
        from_value(result)
    }

    /// Query balance movements between two days, both inclusive.
    ///
    /// `start_position` is 1 based.
    pub async fn query_in_exp_detail(
        &self,
        biz_user_id: &str,
        date_start: DateTime,
        date_end: DateTime,
        start_position: u32,
        query_num: u32,
    ) -> Result<InExpDetailResult> {
        let param = json!({
            "bizUserId": biz_user_id,
            "startPosition": start_position,
            "queryNum": query_num,
            "dateStart": format_date(date_start),
            "dateEnd": format_date(date_end),
        });
        let result = self.client.service_soa(SERVICE, "queryInExpDetail", &param).await?;
        from_value(result)
    }
}
