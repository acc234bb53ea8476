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

use serde::Deserialize;
use serde_json::json;

use super::client::{from_value, Client};
use allinpay_core::utils::camel_case_keys;
use allinpay_core::Result;

const SERVICE: &str = "MerchantService";

/// Balance of the reserve fund account.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReserveFundBalance {
    pub account_no: String,
    pub account_name: String,
    /// In cents.
    pub balance: i64,
    pub def_clr: i64,
}

/// Balance of an account set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MerchantBalance {
    pub all_amount: i64,
    pub freeze_amount: i64,
}

/// Balance of a bank account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankBalance {
    /// In cents. `-1` when the platform has no bank account configured.
    pub balance: i64,
}

/// Kind of reconciliation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckAccountFileType {
    /// Detail file.
    Detail = 1,
    /// Summary file.
    Summary = 2,
}

/// Download location of a reconciliation file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckAccountFile {
    pub url: String,
}

/// MerchantService wraps the `MerchantService` operations.
#[derive(Debug, Clone, Copy)]
pub struct MerchantService<'a> {
    client: &'a Client,
}

impl<'a> MerchantService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Query the reserve fund balance of this application.
    pub async fn query_reserve_fund_balance(&self) -> Result<ReserveFundBalance> {
        let param = json!({"sysid": self.client.config().sys_id, "fundAcctSys": 1});
        let result = self
            .client
            .service_soa(SERVICE, "queryReserveFundBalance", &param)
            .await?;
        // This operation answers in snake_case.
        from_value(camel_case_keys(result))
    }

    /// Query an account set balance, the configured one if `None`.
    pub async fn query_merchant_balance(&self, account_set_no: Option<&str>) -> Result<MerchantBalance> {
        let account_set_no = account_set_no.unwrap_or(&self.client.config().account_set_no);
        let param = json!({"accountSetNo": account_set_no});
        let result = self
            .client
            .service_soa(SERVICE, "queryMerchantBalance", &param)
            .await?;
        from_value(result)
    }

    /// Query the balance of a bank account held at the partner bank.
    pub async fn query_bank_balance(&self, acct_no: &str, acct_name: &str) -> Result<BankBalance> {
        let param = json!({"acctNo": acct_no, "acctName": acct_name, "acctOrgType": 1});
        let result = self.client.service_soa(SERVICE, "queryBankBalance", &param).await?;
        from_value(result)
    }

    /// Query the balance of the configured platform bank account.
    ///
    /// Returns a balance of `-1` without calling the gateway if no account
    /// is configured.
    pub async fn query_bank_balance_platform(&self) -> Result<BankBalance> {
        let cfg = self.client.config();
        match cfg.bank_acct_no.as_deref().filter(|s| !s.is_empty()) {
            Some(acct_no) => {
                let acct_name = cfg.bank_acct_name.as_deref().unwrap_or_default();
                self.query_bank_balance(acct_no, acct_name).await
            }
            None => Ok(BankBalance { balance: -1 }),
        }
    }

    /// Fetch the reconciliation file of `date` (`YYYY-MM-DD`).
    pub async fn get_check_account_file(
        &self,
        date: &str,
        file_type: CheckAccountFileType,
    ) -> Result<CheckAccountFile> {
        let param = json!({"date": date, "fileType": file_type as i64});
        let result = self
            .client
            .service_soa(SERVICE, "getCheckAccountFile", &param)
            .await?;
        from_value(result)
    }
}
