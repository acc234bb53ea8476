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

/// Protocol version carried in every envelope.
pub const SOA_VERSION: &str = "2.0";
/// Path of the synchronous service endpoint.
pub const SOA_PATH: &str = "/service/soa";
/// Path of the hosted contract signing page.
pub const SIGN_CONTRACT_PATH: &str = "/yungateway/member/signContract.html";
/// Account set that holds the platform's reserve funds.
pub const RESERVE_ACCOUNT_SET_NO: &str = "100001";
/// Member id the gateway uses for the platform itself.
pub const PLATFORM_BIZ_USER_ID: &str = "#yunBizUserId_B2C#";

/// Environment variables for the SOA gateway
pub const ALLINPAY_ENDPOINT: &str = "ALLINPAY_ENDPOINT";
pub const ALLINPAY_NOTIFY: &str = "ALLINPAY_NOTIFY";
pub const ALLINPAY_SYS_ID: &str = "ALLINPAY_SYS_ID";
pub const ALLINPAY_ACCOUNT_SET_NO: &str = "ALLINPAY_ACCOUNT_SET_NO";
pub const ALLINPAY_PRIVATE_KEY: &str = "ALLINPAY_PRIVATE_KEY";
pub const ALLINPAY_PRIVATE_KEY_FILE: &str = "ALLINPAY_PRIVATE_KEY_FILE";
pub const ALLINPAY_PUBLIC_KEY: &str = "ALLINPAY_PUBLIC_KEY";
pub const ALLINPAY_PUBLIC_KEY_FILE: &str = "ALLINPAY_PUBLIC_KEY_FILE";
pub const ALLINPAY_BANK_PRIVATE_KEY: &str = "ALLINPAY_BANK_PRIVATE_KEY";
pub const ALLINPAY_BANK_PRIVATE_KEY_FILE: &str = "ALLINPAY_BANK_PRIVATE_KEY_FILE";
pub const ALLINPAY_BANK_ACCT_NO: &str = "ALLINPAY_BANK_ACCT_NO";
pub const ALLINPAY_BANK_ACCT_NAME: &str = "ALLINPAY_BANK_ACCT_NAME";
pub const ALLINPAY_IS_PROD: &str = "ALLINPAY_IS_PROD";
