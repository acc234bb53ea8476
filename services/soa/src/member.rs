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

//! Member onboarding: accounts, phones, real names and bank cards.

use serde::Deserialize;
use serde_json::{json, Value};

use super::client::{from_value, Client};
use super::constants::SIGN_CONTRACT_PATH;
use allinpay_core::field::is_allowed;
use allinpay_core::{Params, Result};

const SERVICE: &str = "MemberService";

/// Kind of member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberType {
    /// Enterprise member.
    Company = 2,
    /// Individual member.
    Person = 3,
}

/// Terminal the member is created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Mobile terminal.
    Mobile = 1,
    /// Desktop terminal.
    Pc = 2,
}

/// Purpose of an SMS verification code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationCodeType {
    /// Unbind a phone.
    Unbind = 6,
    /// Bind a phone.
    Bind = 9,
}

/// Identity details submitted by [`MemberService::set_real_name`].
#[derive(Debug, Clone, Default)]
pub struct RealName {
    /// Name on the identity card.
    pub name: String,
    /// Identity card number, in plain text.
    pub identity_no: String,
    /// Validity start, `YYYY-MM-DD`.
    pub identity_begin_date: String,
    /// Validity end, `YYYY-MM-DD`.
    pub identity_end_date: String,
    /// Home address.
    pub address: String,
    /// Profession code.
    pub profession_no: String,
    /// Contact phone.
    pub telephone: String,
}

/// Enterprise details submitted by [`MemberService::set_company_info`].
///
/// Authentication uses the unified social credit code and the legal
/// representative's identity card.
#[derive(Debug, Clone, Default)]
pub struct CompanyBasicInfo {
    pub company_name: String,
    /// Unified social credit code.
    pub uni_credit: String,
    pub legal_name: String,
    /// Legal representative identity card number, in plain text.
    pub legal_ids: String,
    pub legal_phone: String,
    /// Corporate bank account number, in plain text.
    pub account_no: String,
    pub parent_bank_name: String,
    pub bank_name: String,
    /// Interbank clearing number of the branch.
    pub union_bank: String,
}

/// Result of [`MemberService::set_company_info`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfoResult {
    pub biz_user_id: String,
    /// Online check outcome when requested: `2` passed, `3` failed.
    #[serde(default)]
    pub result: Option<i64>,
    #[serde(default)]
    pub fail_reason: Option<String>,
    #[serde(flatten)]
    pub extra: Params,
}

/// Result of [`MemberService::create_member`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberResult {
    pub biz_user_id: String,
    #[serde(default)]
    pub user_id: String,
    /// Set when the member already existed.
    #[serde(default)]
    pub allow: Option<String>,
}

/// Result of lock and unlock operations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BizUserResult {
    pub biz_user_id: String,
    #[serde(default)]
    pub allow: Option<String>,
}

/// Result of phone operations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneResult {
    pub biz_user_id: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub allow: Option<String>,
}

/// Result of [`MemberService::set_real_name`]. `identity_no` is decrypted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealNameResult {
    pub biz_user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub identity_no: String,
    #[serde(default)]
    pub allow: Option<String>,
    #[serde(flatten)]
    pub extra: Params,
}

/// Result of [`MemberService::get_member_info`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfoResult {
    pub biz_user_id: String,
    pub member_type: i64,
    pub member_info: MemberInfo,
}

/// Member details. Enterprise and individual members carry different
/// extra fields, they are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberInfo {
    pub user_id: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    /// Decrypted identity card number.
    pub identity_card_no: Option<String>,
    pub sub_acct_no: Option<String>,
    pub user_state: Option<i64>,
    pub is_sign_contract: Option<bool>,
    pub is_identity_checked: Option<bool>,
    pub is_phone_checked: Option<bool>,
    #[serde(flatten)]
    pub extra: Params,
}

/// Result of [`MemberService::get_bank_card_bin`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardBinResult {
    pub card_bin_info: CardBinInfo,
}

/// Issuer details of a card number.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardBinInfo {
    pub card_bin: String,
    pub card_name: String,
    /// 1 debit card, 2 credit card.
    pub card_type: i64,
    pub card_state: i64,
    pub bank_code: String,
    pub bank_name: String,
    #[serde(flatten)]
    pub extra: Params,
}

/// Result of [`MemberService::apply_bind_bank_card`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindBankCardResult {
    pub biz_user_id: String,
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub bank_code: String,
    #[serde(default)]
    pub card_type: Option<i64>,
    #[serde(default)]
    pub allow: Option<String>,
}

/// Result of [`MemberService::unbind_bank_card`]. `card_no` is decrypted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnbindBankCardResult {
    pub biz_user_id: String,
    #[serde(default)]
    pub card_no: String,
}

/// Result of [`MemberService::query_bank_card`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryBankCardResult {
    pub bind_card_list: Vec<BankCardInfo>,
}

/// A bound bank card. `bank_card_no` is decrypted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankCardInfo {
    pub bank_card_no: String,
    pub bank_name: String,
    pub card_type: i64,
    pub bind_state: i64,
    pub bind_time: String,
    pub phone: String,
    pub is_safe_card: bool,
    #[serde(flatten)]
    pub extra: Params,
}

/// MemberService wraps the `MemberService` operations.
#[derive(Debug, Clone, Copy)]
pub struct MemberService<'a> {
    client: &'a Client,
}

impl<'a> MemberService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Create a member. An existing member (`30000`) is looked up instead,
    /// so `user_id` is always filled when the gateway knows it.
    pub async fn create_member(
        &self,
        biz_user_id: &str,
        member_type: MemberType,
        source: Source,
        acct_org_type: i64,
    ) -> Result<CreateMemberResult> {
        let param = json!({
            "bizUserId": biz_user_id,
            "memberType": member_type as i64,
            "source": source as i64,
        });
        let mut result = self
            .client
            .service_soa_allow(SERVICE, "createMember", &param, "30000", json!({}))
            .await?;

        if is_allowed(&result) {
            let member = self.get_member_info(biz_user_id, acct_org_type).await?;
            result["userId"] = Value::String(member.member_info.user_id);
        }
        from_value(result)
    }

    /// Lock a member. Already locked (`30022`) counts as success.
    pub async fn lock_member(&self, biz_user_id: &str) -> Result<BizUserResult> {
        let param = json!({"bizUserId": biz_user_id});
        let result = self
            .client
            .service_soa_allow(SERVICE, "lockMember", &param, "30022", json!({}))
            .await?;
        from_value(result)
    }

    /// Unlock a member. Not locked (`9000`) counts as success.
    pub async fn unlock_member(&self, biz_user_id: &str) -> Result<BizUserResult> {
        let param = json!({"bizUserId": biz_user_id});
        let result = self
            .client
            .service_soa_allow(SERVICE, "unlockMember", &param, "9000", json!({}))
            .await?;
        from_value(result)
    }

    /// Send an SMS verification code to `phone`.
    pub async fn send_verification_code(
        &self,
        biz_user_id: &str,
        phone: &str,
        code_type: VerificationCodeType,
    ) -> Result<PhoneResult> {
        let param = json!({
            "bizUserId": biz_user_id,
            "phone": phone,
            "verificationCodeType": code_type as i64,
        });
        let result = self
            .client
            .service_soa(SERVICE, "sendVerificationCode", &param)
            .await?;
        from_value(result)
    }

    /// Bind a phone. Already bound (`30024`) counts as success.
    pub async fn bind_phone(
        &self,
        biz_user_id: &str,
        phone: &str,
        verification_code: &str,
    ) -> Result<PhoneResult> {
        let param = json!({
            "bizUserId": biz_user_id,
            "phone": phone,
            "verificationCode": verification_code,
        });
        let result = self
            .client
            .service_soa_allow(SERVICE, "bindPhone", &param, "30024", json!({}))
            .await?;
        from_value(result)
    }

    /// Unbind a phone.
    pub async fn unbind_phone(
        &self,
        biz_user_id: &str,
        phone: &str,
        verification_code: &str,
    ) -> Result<PhoneResult> {
        let param = json!({
            "bizUserId": biz_user_id,
            "phone": phone,
            "verificationCode": verification_code,
        });
        let result = self.client.service_soa(SERVICE, "unbindPhone", &param).await?;
        from_value(result)
    }

    /// Submit real name details.
    ///
    /// Already verified (`30007`) counts as success and echoes the plain
    /// identity number back.
    pub async fn set_real_name(&self, biz_user_id: &str, real_name: &RealName) -> Result<RealNameResult> {
        let mut param = json!({
            "bizUserId": biz_user_id,
            "name": real_name.name,
            "identityType": 1,
            "identityNo": real_name.identity_no,
            "identityBeginDate": real_name.identity_begin_date,
            "identityEndDate": real_name.identity_end_date,
            "address": real_name.address,
            "professionNo": real_name.profession_no,
            "telephone": real_name.telephone,
        });
        self.client.encrypt_fields(&mut param, &["identityNo"])?;

        let mut result = self
            .client
            .service_soa_allow(
                SERVICE,
                "setRealName",
                &param,
                "30007",
                json!({"identityNo": real_name.identity_no}),
            )
            .await?;
        self.client.decrypt_fields(&mut result, &["identityNo"])?;
        from_value(result)
    }

    /// Submit enterprise details, optionally asking for an online check.
    ///
    /// The account number and the legal representative's identity card are
    /// encrypted inside the nested `companyBasicInfo` object.
    pub async fn set_company_info(
        &self,
        biz_user_id: &str,
        info: &CompanyBasicInfo,
        is_auth: bool,
    ) -> Result<CompanyInfoResult> {
        let mut param = json!({
            "bizUserId": biz_user_id,
            "companyBasicInfo": {
                "companyName": info.company_name,
                "authType": 2,
                "uniCredit": info.uni_credit,
                "identityType": 1,
                "legalName": info.legal_name,
                "legalIds": info.legal_ids,
                "legalPhone": info.legal_phone,
                "accountNo": info.account_no,
                "parentBankName": info.parent_bank_name,
                "bankName": info.bank_name,
                "unionBank": info.union_bank,
            },
            "isAuth": is_auth,
            "backUrl": self.client.notify_url("set_company_info"),
        });
        self.client.encrypt_fields(
            &mut param,
            &["companyBasicInfo.accountNo", "companyBasicInfo.legalIds"],
        )?;

        let result = self.client.service_soa(SERVICE, "setCompanyInfo", &param).await?;
        from_value(result)
    }

    /// Fetch member details with the identity card number decrypted.
    pub async fn get_member_info(&self, biz_user_id: &str, acct_org_type: i64) -> Result<MemberInfoResult> {
        let param = json!({"bizUserId": biz_user_id, "acctOrgType": acct_org_type});
        let mut result = self.client.service_soa(SERVICE, "getMemberInfo", &param).await?;
        self.client
            .decrypt_fields(&mut result, &["memberInfo.identityCardNo"])?;
        from_value(result)
    }

    /// Look up the issuer of a card number.
    pub async fn get_bank_card_bin(&self, card_no: &str) -> Result<CardBinResult> {
        let mut param = json!({"cardNo": card_no});
        self.client.encrypt_fields(&mut param, &["cardNo"])?;
        let result = self.client.service_soa(SERVICE, "getBankCardBin", &param).await?;
        from_value(result)
    }

    /// Bind a bank card after four element verification. Already bound
    /// (`30017`) counts as success.
    pub async fn apply_bind_bank_card(
        &self,
        biz_user_id: &str,
        card_no: &str,
        name: &str,
        identity_no: &str,
    ) -> Result<BindBankCardResult> {
        let mut param = json!({
            "bizUserId": biz_user_id,
            "cardNo": card_no,
            "name": name,
            "identityNo": identity_no,
            "cardCheck": 1,
            "identityType": 1,
        });
        self.client
            .encrypt_fields(&mut param, &["cardNo", "identityNo"])?;
        let result = self
            .client
            .service_soa_allow(SERVICE, "applyBindBankCard", &param, "30017", json!({}))
            .await?;
        from_value(result)
    }

    /// Unbind a bank card.
    pub async fn unbind_bank_card(&self, biz_user_id: &str, card_no: &str) -> Result<UnbindBankCardResult> {
        let mut param = json!({"bizUserId": biz_user_id, "cardNo": card_no});
        self.client.encrypt_fields(&mut param, &["cardNo"])?;
        let mut result = self.client.service_soa(SERVICE, "unbindBankCard", &param).await?;
        self.client.decrypt_fields(&mut result, &["cardNo"])?;
        from_value(result)
    }

    /// List bound bank cards with their numbers decrypted.
    pub async fn query_bank_card(&self, biz_user_id: &str) -> Result<QueryBankCardResult> {
        let param = json!({"bizUserId": biz_user_id});
        let mut result = self.client.service_soa(SERVICE, "queryBankCard", &param).await?;
        if let Some(Value::Array(cards)) = result.get_mut("bindCardList") {
            for card in cards {
                self.client.decrypt_fields(card, &["bankCardNo"])?;
            }
        }
        from_value(result)
    }

    /// Signed url of the hosted contract signing page.
    pub fn sign_contract_url(&self, biz_user_id: &str, jump_url: &str) -> Result<String> {
        let param = json!({
            "bizUserId": biz_user_id,
            "source": Source::Mobile as i64,
            "jumpUrl": jump_url,
            "backUrl": self.client.notify_url("sign_contract"),
        });
        self.client
            .gateway_url(SIGN_CONTRACT_PATH, SERVICE, "signContract", &param)
    }
}
