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

/// Config carries everything needed to talk to the SOA gateway.
#[derive(Clone)]
pub struct Config {
    /// Gateway base url, for example `https://open.allinpay.com/gateway`.
    pub endpoint: String,
    /// Base url notifications are delivered to. Operation suffixes such as
    /// `sign_contract` are appended verbatim.
    pub notify: String,
    /// Application id assigned by the gateway.
    pub sys_id: String,
    /// Account set used by balance, transfer and withdraw operations.
    pub account_set_no: String,
    /// Client private key, signs requests and decrypts response fields.
    pub private_key: PrivateKey,
    /// Gateway public key, verifies responses and encrypts request fields.
    pub allin_public_key: PublicKey,
    /// Partner bank private key, only needed by bank withdrawals.
    pub bank_private_key: Option<PrivateKey>,
    /// Platform bank account number, used by the platform balance query.
    pub bank_acct_no: Option<String>,
    /// Platform bank account name.
    pub bank_acct_name: Option<String>,
    /// Request bodies are only logged outside production.
    pub is_prod: bool,
}

impl Config {
    /// Create a new Config with the mandatory fields.
    pub fn new(
        endpoint: impl Into<String>,
        sys_id: impl Into<String>,
        private_key: PrivateKey,
        allin_public_key: PublicKey,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            notify: String::new(),
            sys_id: sys_id.into(),
            account_set_no: String::new(),
            private_key,
            allin_public_key,
            bank_private_key: None,
            bank_acct_no: None,
            bank_acct_name: None,
            is_prod: false,
        }
    }

    /// Set notify base url
    pub fn with_notify(mut self, notify: impl Into<String>) -> Self {
        self.notify = notify.into();
        self
    }

    /// Set account_set_no
    pub fn with_account_set_no(mut self, account_set_no: impl Into<String>) -> Self {
        self.account_set_no = account_set_no.into();
        self
    }

    /// Set bank_private_key
    pub fn with_bank_private_key(mut self, key: PrivateKey) -> Self {
        self.bank_private_key = Some(key);
        self
    }

    /// Set the platform bank account
    pub fn with_bank_acct(mut self, acct_no: impl Into<String>, acct_name: impl Into<String>) -> Self {
        self.bank_acct_no = Some(acct_no.into());
        self.bank_acct_name = Some(acct_name.into());
        self
    }

    /// Set is_prod
    pub fn with_is_prod(mut self, is_prod: bool) -> Self {
        self.is_prod = is_prod;
        self
    }

    /// Load config from env.
    ///
    /// Keys are read from `ALLINPAY_PRIVATE_KEY` and friends as PEM text, or
    /// from the files named by their `_FILE` variants.
    pub async fn from_env(ctx: &Context) -> Result<Self> {
        let required = |key: &str| {
            ctx.env_var(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::config_invalid(format!("{key} is not set")))
        };

        let endpoint = required(ALLINPAY_ENDPOINT)?;
        let sys_id = required(ALLINPAY_SYS_ID)?;

        let private_key = ctx
            .env_pem(ALLINPAY_PRIVATE_KEY, ALLINPAY_PRIVATE_KEY_FILE)
            .await?
            .ok_or_else(|| Error::config_invalid(format!("{ALLINPAY_PRIVATE_KEY} is not set")))?;
        let allin_public_key = ctx
            .env_pem(ALLINPAY_PUBLIC_KEY, ALLINPAY_PUBLIC_KEY_FILE)
            .await?
            .ok_or_else(|| Error::config_invalid(format!("{ALLINPAY_PUBLIC_KEY} is not set")))?;

        let mut cfg = Self::new(
            endpoint,
            sys_id,
            PrivateKey::from_pem(&private_key)?,
            PublicKey::from_pem(&allin_public_key)?,
        );

        if let Some(v) = ctx.env_var(ALLINPAY_NOTIFY) {
            cfg.notify = v;
        }
        if let Some(v) = ctx.env_var(ALLINPAY_ACCOUNT_SET_NO) {
            cfg.account_set_no = v;
        }
        if let Some(pem) = ctx
            .env_pem(ALLINPAY_BANK_PRIVATE_KEY, ALLINPAY_BANK_PRIVATE_KEY_FILE)
            .await?
        {
            cfg.bank_private_key = Some(PrivateKey::from_pem(&pem)?);
        }
        cfg.bank_acct_no = ctx.env_var(ALLINPAY_BANK_ACCT_NO).filter(|v| !v.is_empty());
        cfg.bank_acct_name = ctx.env_var(ALLINPAY_BANK_ACCT_NAME);
        cfg.is_prod = ctx
            .env_var(ALLINPAY_IS_PROD)
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "on"))
            .unwrap_or_default();

        Ok(cfg)
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("notify", &self.notify)
            .field("sys_id", &self.sys_id)
            .field("account_set_no", &self.account_set_no)
            .field("private_key", &self.private_key)
            .field("allin_public_key", &self.allin_public_key)
            .field("bank_private_key", &self.bank_private_key)
            .field("bank_acct_no", &self.bank_acct_no.as_ref().map(Redact::from))
            .field("bank_acct_name", &self.bank_acct_name)
            .field("is_prod", &self.is_prod)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allinpay_core::{ErrorKind, StaticEnv};
    use std::collections::HashMap;

    const CLIENT_PRIVATE: &str = include_str!("../../../testdata/client_private.pem");
    const GATEWAY_PUBLIC: &str = include_str!("../../../testdata/gateway_public.pem");

    fn ctx(envs: &[(&str, &str)]) -> Context {
        Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: envs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        })
    }

    #[tokio::test]
    async fn test_from_env() -> Result<()> {
        let ctx = ctx(&[
            (ALLINPAY_ENDPOINT, "https://gateway.test/yungateway"),
            (ALLINPAY_SYS_ID, "1902271423530473681"),
            (ALLINPAY_NOTIFY, "https://shop.test/notify/"),
            (ALLINPAY_ACCOUNT_SET_NO, "400142"),
            (ALLINPAY_PRIVATE_KEY, CLIENT_PRIVATE),
            (ALLINPAY_PUBLIC_KEY, GATEWAY_PUBLIC),
            (ALLINPAY_IS_PROD, "true"),
        ]);

        let cfg = Config::from_env(&ctx).await?;
        assert_eq!(cfg.endpoint, "https://gateway.test/yungateway");
        assert_eq!(cfg.sys_id, "1902271423530473681");
        assert_eq!(cfg.notify, "https://shop.test/notify/");
        assert_eq!(cfg.account_set_no, "400142");
        assert!(cfg.bank_private_key.is_none());
        assert!(cfg.bank_acct_no.is_none());
        assert!(cfg.is_prod);
        Ok(())
    }

    #[tokio::test]
    async fn test_from_env_missing() {
        let err = Config::from_env(&ctx(&[(ALLINPAY_SYS_ID, "1")]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

        let err = Config::from_env(&ctx(&[
            (ALLINPAY_ENDPOINT, "https://gateway.test"),
            (ALLINPAY_SYS_ID, "1"),
        ]))
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert!(err.to_string().contains(ALLINPAY_PRIVATE_KEY));
    }

    #[test]
    fn test_debug_hides_keys() -> Result<()> {
        let cfg = Config::new(
            "https://gateway.test",
            "1",
            PrivateKey::from_pem(CLIENT_PRIVATE)?,
            PublicKey::from_pem(GATEWAY_PUBLIC)?,
        )
        .with_bank_acct("6228480000000000000", "platform");

        let debug = format!("{cfg:?}");
        assert!(!debug.contains("MII"));
        assert!(!debug.contains("6228480000000000000"));
        assert!(debug.contains("622***000"));
        Ok(())
    }
}
