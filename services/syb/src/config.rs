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

use std::fmt::{Debug, Formatter};

use super::constants::*;
use allinpay_core::utils::Redact;
use allinpay_core::{Context, Error, PrivateKey, PublicKey, Result};

/// Config carries everything needed to talk to the SYB gateway.
#[derive(Clone)]
pub struct Config {
    /// Gateway base url, for example `https://vsp.allinpay.com/apiweb`.
    pub endpoint: String,
    pub app_id: String,
    /// Organization id, only assigned to service providers. Empty otherwise.
    pub org_id: String,
    pub cus_id: String,
    /// Client private key, signs requests.
    pub private_key: PrivateKey,
    /// Gateway public key, verifies responses.
    pub public_key: PublicKey,
    pub is_prod: bool,
}

impl Config {
    /// Create a new Config.
    pub fn new(
        endpoint: impl Into<String>,
        app_id: impl Into<String>,
        cus_id: impl Into<String>,
        private_key: PrivateKey,
        public_key: PublicKey,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            app_id: app_id.into(),
            org_id: String::new(),
            cus_id: cus_id.into(),
            private_key,
            public_key,
            is_prod: false,
        }
    }

    /// Set org_id
    pub fn with_org_id(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = org_id.into();
        self
    }

    /// Set is_prod
    pub fn with_is_prod(mut self, is_prod: bool) -> Self {
        self.is_prod = is_prod;
        self
    }

    /// Load config from env.
    pub async fn from_env(ctx: &Context) -> Result<Self> {
        let required = |key: &str| {
            ctx.env_var(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::config_invalid(format!("{key} is not set")))
        };

        let endpoint = required(ALLINPAY_SYB_ENDPOINT)?;
        let app_id = required(ALLINPAY_SYB_APP_ID)?;
        let cus_id = required(ALLINPAY_SYB_CUS_ID)?;

        let private_key = ctx
            .env_pem(ALLINPAY_SYB_PRIVATE_KEY, ALLINPAY_SYB_PRIVATE_KEY_FILE)
            .await?
            .ok_or_else(|| Error::config_invalid(format!("{ALLINPAY_SYB_PRIVATE_KEY} is not set")))?;
        let public_key = ctx
            .env_pem(ALLINPAY_SYB_PUBLIC_KEY, ALLINPAY_SYB_PUBLIC_KEY_FILE)
            .await?
            .ok_or_else(|| Error::config_invalid(format!("{ALLINPAY_SYB_PUBLIC_KEY} is not set")))?;

        let cfg = Self::new(
            endpoint,
            app_id,
            cus_id,
            PrivateKey::from_pem(&private_key)?,
            PublicKey::from_pem(&public_key)?,
        )
        .with_org_id(ctx.env_var(ALLINPAY_SYB_ORG_ID).unwrap_or_default())
        .with_is_prod(
            ctx.env_var(ALLINPAY_SYB_IS_PROD)
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "on"))
                .unwrap_or_default(),
        );
        Ok(cfg)
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("app_id", &self.app_id)
            .field("org_id", &self.org_id)
            .field("cus_id", &Redact::from(&self.cus_id))
            .field("private_key", &self.private_key)
            .field("public_key", &self.public_key)
            .field("is_prod", &self.is_prod)
            .finish()
    }
}
