// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote random-image selection and public object download.

use async_trait::async_trait;
use bytes::Bytes;
use motivate_core::{ImagePicker, ImageRecord, RemoteError};
use reqwest::StatusCode;
use tracing::{debug, info};
use url::Url;

use crate::client::{BackendClient, ensure_success};
use crate::wire::{RandomImageParams, decode_image_row};

const RANDOM_IMAGE_RPC: &str = "get_random_image";
const PUBLIC_OBJECT_PATH: &str = "storage/v1/object/public";

/// [`ImagePicker`] backed by the `get_random_image` RPC and the public bucket.
#[derive(Debug, Clone)]
pub struct RemoteImagePicker {
    client: BackendClient,
}

impl RemoteImagePicker {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImagePicker for RemoteImagePicker {
    async fn fetch_random(&self, filter: Option<&[i64]>) -> Result<ImageRecord, RemoteError> {
        let params = RandomImageParams::new(filter);
        let response = self.client.post_rpc(RANDOM_IMAGE_RPC, &params, true).await?;

        let status = response.status();
        // PostgREST rejects a single-object request that matched zero rows with 406.
        if status == StatusCode::NOT_ACCEPTABLE {
            return Err(RemoteError::Empty);
        }
        ensure_success(status)?;

        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::network("reading random image response failed", e))?;
        let record = decode_image_row(&body)?;
        info!(image_id = record.id, filename = %record.image_url, "random image selected");
        Ok(record)
    }

    fn build_public_url(&self, filename: &str) -> Result<Url, RemoteError> {
        public_object_url(self.client.base_url(), self.client.bucket(), filename)
    }

    async fn download_bytes(&self, url: &Url) -> Result<Bytes, RemoteError> {
        let response = self
            .client
            .http()
            .get(url.clone())
            .send()
            .await
            .map_err(|e| RemoteError::network(format!("download of {url} failed"), e))?;

        if response.status() != StatusCode::OK {
            return Err(RemoteError::HttpStatus {
                status: response.status().as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RemoteError::network(format!("reading body of {url} failed"), e))?;
        debug!(size = bytes.len(), "image downloaded");
        Ok(bytes)
    }
}

/// `scheme://host[:port]/storage/v1/object/public/<bucket>//<filename>`.
///
/// The double slash before the filename is part of the public object path
/// and must be kept. The filename is percent-encoded as one segment.
pub fn public_object_url(base: &Url, bucket: &str, filename: &str) -> Result<Url, RemoteError> {
    let host = base
        .host_str()
        .ok_or_else(|| RemoteError::network("backend url has no host", format!("{base}")))?;
    let authority = match base.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    let raw = format!(
        "{}://{authority}/{PUBLIC_OBJECT_PATH}/{bucket}//{}",
        base.scheme(),
        urlencoding::encode(filename)
    );
    Url::parse(&raw).map_err(|e| RemoteError::network(format!("invalid public url `{raw}`"), e))
}
