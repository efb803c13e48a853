// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the hosted backend (PostgREST RPC + public object storage).
//!
//! Provides [`BackendClient`], which owns the endpoint, the anon key, and one
//! pooled `reqwest::Client` carrying the auth headers and the request timeout.
//! The picker, feedback submitter, and category catalog all share it.

use std::time::Duration;

use motivate_config::model::BackendConfig;
use motivate_core::{MotivateError, RemoteError};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;
use url::Url;

/// `Accept` value asking PostgREST for exactly one row as a JSON object.
pub const SINGLE_OBJECT_ACCEPT: &str = "application/vnd.pgrst.object+json";

/// Connection details for the backend, constructed explicitly and injected.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
    bucket: String,
}

impl BackendClient {
    /// Creates a client for `base_url` authenticated with `anon_key`.
    pub fn new(
        base_url: &str,
        anon_key: &SecretString,
        bucket: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, MotivateError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| MotivateError::Config(format!("invalid backend url `{base_url}`: {e}")))?;
        if base_url.host_str().is_none() {
            return Err(MotivateError::Config(format!(
                "backend url `{base_url}` has no host"
            )));
        }

        let key = anon_key.expose_secret();
        let mut apikey = HeaderValue::from_str(key)
            .map_err(|e| MotivateError::Config(format!("invalid anon key header value: {e}")))?;
        apikey.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| MotivateError::Config(format!("invalid anon key header value: {e}")))?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", apikey);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| MotivateError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            bucket: bucket.into(),
        })
    }

    /// Builds a client from the `[backend]` configuration section.
    ///
    /// Fails when the URL or the anon key is not configured.
    pub fn from_config(config: &BackendConfig) -> Result<Self, MotivateError> {
        if config.url.trim().is_empty() {
            return Err(MotivateError::Config(
                "backend.url is not set (config file or MOTIVATE_BACKEND_URL)".to_string(),
            ));
        }
        let anon_key = config
            .anon_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .ok_or_else(|| {
                MotivateError::Config(
                    "backend.anon_key is not set (config file or MOTIVATE_BACKEND_ANON_KEY)"
                        .to_string(),
                )
            })?;

        Self::new(
            &config.url,
            anon_key,
            config.bucket.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Resolves `path` (no leading slash) against the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path)
            .map_err(|e| RemoteError::network(format!("invalid endpoint `{path}`"), e))
    }

    /// Sends `POST /rest/v1/rpc/<function>` with a JSON body.
    pub(crate) async fn post_rpc<B: Serialize + ?Sized>(
        &self,
        function: &str,
        body: &B,
        single_object: bool,
    ) -> Result<reqwest::Response, RemoteError> {
        let url = self.endpoint(&format!("rest/v1/rpc/{function}"))?;
        let mut request = self.http.post(url).json(body);
        if single_object {
            request = request.header(ACCEPT, SINGLE_OBJECT_ACCEPT);
        }
        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::network(format!("rpc {function} failed"), e))?;
        debug!(function, status = %response.status(), "rpc response received");
        Ok(response)
    }
}

/// Maps a non-success status into [`RemoteError::HttpStatus`].
pub(crate) fn ensure_success(status: StatusCode) -> Result<(), RemoteError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(RemoteError::HttpStatus {
            status: status.as_u16(),
        })
    }
}
