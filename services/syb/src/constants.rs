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

/// Protocol version carried in every request.
pub const SYB_VERSION: &str = "11";
/// Signature algorithm name carried in every request.
pub const SYB_SIGN_TYPE: &str = "RSA";
/// Route of the complaint operations.
pub const RISK_FEEDBACK_SERVICE: &str = "riskfeeback";

/// Environment variables for the SYB gateway
pub const ALLINPAY_SYB_ENDPOINT: &str = "ALLINPAY_SYB_ENDPOINT";
pub const ALLINPAY_SYB_APP_ID: &str = "ALLINPAY_SYB_APP_ID";
pub const ALLINPAY_SYB_ORG_ID: &str = "ALLINPAY_SYB_ORG_ID";
pub const ALLINPAY_SYB_CUS_ID: &str = "ALLINPAY_SYB_CUS_ID";
pub const ALLINPAY_SYB_PRIVATE_KEY: &str = "ALLINPAY_SYB_PRIVATE_KEY";
pub const ALLINPAY_SYB_PRIVATE_KEY_FILE: &str = "ALLINPAY_SYB_PRIVATE_KEY_FILE";
pub const ALLINPAY_SYB_PUBLIC_KEY: &str = "ALLINPAY_SYB_PUBLIC_KEY";
pub const ALLINPAY_SYB_PUBLIC_KEY_FILE: &str = "ALLINPAY_SYB_PUBLIC_KEY_FILE";
pub const ALLINPAY_SYB_IS_PROD: &str = "ALLINPAY_SYB_IS_PROD";
