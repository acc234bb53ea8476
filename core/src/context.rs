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

use crate::observe::{NoopObserve, Observe};
use crate::{Error, Result};
use bytes::Bytes;
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;

/// Context provides the environment a gateway client runs in.
///
/// ## Important
///
/// allinpay provides NO default implementations here. Users MAY configure components they need.
/// Any unconfigured component will use a no-op implementation that returns errors or empty values when called.
///
/// ## Example
///
/// ```
/// use allinpay_core::{Context, LogObserve, OsEnv};
///
/// let ctx = Context::new()
///     .with_env(OsEnv)
///     .with_observe(LogObserve);
/// ```
#[derive(Clone)]
pub struct Context {
    fs: Arc<dyn FileRead>,
    http: Arc<dyn HttpSend>,
    env: Arc<dyn Env>,
    observe: Arc<dyn Observe>,
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("fs", &self.fs)
            .field("http", &self.http)
            .field("env", &self.env)
            .field("observe", &self.observe)
            .finish()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create a new Context with no-op implementations.
    ///
    /// Use the `with_*` methods to configure the components you need.
    pub fn new() -> Self {
        Self {
            fs: Arc::new(NoopFileRead),
            http: Arc::new(NoopHttpSend),
            env: Arc::new(NoopEnv),
            observe: Arc::new(NoopObserve),
        }
    }

    /// Replace the file reader implementation.
    pub fn with_file_read(mut self, fs: impl FileRead) -> Self {
        self.fs = Arc::new(fs);
        self
    }

    /// Replace the HTTP client implementation.
    pub fn with_http_send(mut self, http: impl HttpSend) -> Self {
        self.http = Arc::new(http);
        self
    }

    /// Replace the environment implementation.
    pub fn with_env(mut self, env: impl Env) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Replace the request observer.
    pub fn with_observe(mut self, observe: impl Observe) -> Self {
        self.observe = Arc::new(observe);
        self
    }

    /// Read the file content entirely in `Vec<u8>`.
    #[inline]
    pub async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        self.fs.file_read(path).await
    }

    /// Read the file content entirely in `String`.
    pub async fn file_read_as_string(&self, path: &str) -> Result<String> {
        let bytes = self.file_read(path).await?;
        Ok(String::from_utf8_lossy(&bytes).to_string())
    }

    /// Load PEM text from the `inline` environment variable, or from the
    /// file named by the `file` environment variable.
    ///
    /// Returns `None` if neither variable is set.
    pub async fn env_pem(&self, inline: &str, file: &str) -> Result<Option<String>> {
        if let Some(pem) = self.env_var(inline).filter(|v| !v.is_empty()) {
            return Ok(Some(pem));
        }
        let Some(path) = self.env_var(file).filter(|v| !v.is_empty()) else {
            return Ok(None);
        };

        let path = self.expand_home_dir(&path).ok_or_else(|| {
            Error::config_invalid(format!("{file} points into an unknown home dir"))
        })?;
        self.file_read_as_string(&path).await.map(Some)
    }

    /// Send http request and return the response.
    #[inline]
    pub async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.http.http_send(req).await
    }

    /// Get the home directory of the current user.
    #[inline]
    pub fn home_dir(&self) -> Option<PathBuf> {
        self.env.home_dir()
    }

    /// Expand `~` in input path.
    ///
    /// - If path not starts with `~/` or `~\\`, returns `Some(path)` directly.
    /// - Otherwise, replace `~` with home dir instead.
    /// - If home_dir is not found, returns `None`.
    pub fn expand_home_dir(&self, path: &str) -> Option<String> {
        if !path.starts_with("~/") && !path.starts_with("~\\") {
            Some(path.to_string())
        } else {
            self.home_dir()
                .map(|home| path.replacen('~', &home.to_string_lossy(), 1))
        }
    }

    /// Get the environment variable.
    ///
    /// - Returns `Some(v)` if the environment variable is found and is valid utf-8.
    /// - Returns `None` if the environment variable is not found or value is invalid.
    #[inline]
    pub fn env_var(&self, key: &str) -> Option<String> {
        self.env.var(key)
    }

    /// The observer notified about every request round trip.
    #[inline]
    pub fn observe(&self) -> &dyn Observe {
        self.observe.as_ref()
    }
}

/// FileRead is used to read the file content entirely in `Vec<u8>`.
///
/// Configuration loaders use it to read key files.
#[async_trait::async_trait]
pub trait FileRead: Debug + Send + Sync + 'static {
    /// Read the file content entirely in `Vec<u8>`.
    async fn file_read(&self, path: &str) -> Result<Vec<u8>>;
}

/// HttpSend is used to send the signed envelope to the gateway.
///
/// This trait is designed especially for the gateway clients, please don't use
/// it as a general http client.
#[async_trait::async_trait]
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Send http request and return the response.
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>>;
}

/// Permits parameterizing the environment lookups.
pub trait Env: Debug + Send + Sync + 'static {
    /// Get an environment variable.
    ///
    /// - Returns `Some(v)` if the environment variable is found and is valid utf-8.
    /// - Returns `None` if the environment variable is not found or value is invalid.
    fn var(&self, key: &str) -> Option<String>;

    /// Return the path to the users home dir, returns `None` if any error occurs.
    fn home_dir(&self) -> Option<PathBuf>;
}

/// Implements Env for the OS context.
#[derive(Debug, Copy, Clone)]
pub struct OsEnv;

impl Env for OsEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key)?.into_string().ok()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        home::home_dir()
    }
}

/// StaticEnv provides a static env environment.
///
/// This is useful for testing or for providing a fixed environment.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    /// The home directory to use.
    pub home_dir: Option<PathBuf>,
    /// The environment variables to use.
    pub envs: HashMap<String, String>,
}

impl Env for StaticEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.envs.get(key).cloned()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home_dir.clone()
    }
}

/// NoopFileRead is a no-op implementation that always returns an error.
#[derive(Debug, Clone, Copy, Default)]
struct NoopFileRead;

#[async_trait::async_trait]
impl FileRead for NoopFileRead {
    async fn file_read(&self, _path: &str) -> Result<Vec<u8>> {
        Err(Error::unexpected(
            "file reading not supported: no file reader configured",
        ))
    }
}

/// NoopHttpSend is a no-op implementation that always returns an error.
#[derive(Debug, Clone, Copy, Default)]
struct NoopHttpSend;

#[async_trait::async_trait]
impl HttpSend for NoopHttpSend {
    async fn http_send(&self, _req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        Err(Error::unexpected(
            "HTTP sending not supported: no HTTP client configured",
        ))
    }
}

/// NoopEnv is a no-op implementation that always returns None/empty.
#[derive(Debug, Clone, Copy, Default)]
struct NoopEnv;

impl Env for NoopEnv {
    fn var(&self, _key: &str) -> Option<String> {
        None
    }

    fn home_dir(&self) -> Option<PathBuf> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_components() {
        let ctx = Context::new();

        assert!(ctx.file_read("/etc/hosts").await.is_err());
        let req = http::Request::get("https://example.com")
            .body(Bytes::new())
            .unwrap();
        assert!(ctx.http_send(req).await.is_err());
        assert_eq!(ctx.env_var("HOME"), None);
    }

    #[test]
    fn test_expand_home_dir() {
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: Some(PathBuf::from("/home/allin")),
            envs: HashMap::new(),
        });

        assert_eq!(
            ctx.expand_home_dir("~/keys/private.pem"),
            Some("/home/allin/keys/private.pem".to_string())
        );
        assert_eq!(
            ctx.expand_home_dir("/etc/keys/private.pem"),
            Some("/etc/keys/private.pem".to_string())
        );
        assert_eq!(Context::new().expand_home_dir("~/private.pem"), None);
    }

    #[derive(Debug)]
    struct OneFile;

    #[async_trait::async_trait]
    impl FileRead for OneFile {
        async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
            match path {
                "/home/allin/key.pem" => Ok(b"from file".to_vec()),
                _ => Err(Error::unexpected(format!("{path} not found"))),
            }
        }
    }

    #[tokio::test]
    async fn test_env_pem() -> Result<()> {
        let env = |pairs: &[(&str, &str)]| StaticEnv {
            home_dir: Some(PathBuf::from("/home/allin")),
            envs: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        };

        let ctx = Context::new()
            .with_file_read(OneFile)
            .with_env(env(&[("KEY", "inline"), ("KEY_FILE", "~/key.pem")]));
        assert_eq!(ctx.env_pem("KEY", "KEY_FILE").await?, Some("inline".to_string()));

        let ctx = ctx.with_env(env(&[("KEY", ""), ("KEY_FILE", "~/key.pem")]));
        assert_eq!(ctx.env_pem("KEY", "KEY_FILE").await?, Some("from file".to_string()));

        let ctx = ctx.with_env(env(&[]));
        assert_eq!(ctx.env_pem("KEY", "KEY_FILE").await?, None);

        let ctx = ctx.with_env(env(&[("KEY_FILE", "/missing.pem")]));
        assert!(ctx.env_pem("KEY", "KEY_FILE").await.is_err());
        Ok(())
    }
}
