// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Category catalog listing.

use motivate_core::{Category, RemoteError};
use tracing::debug;

use crate::client::{BackendClient, ensure_success};

/// Reads the `categories` table, ordered by name.
#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    client: BackendClient,
}

impl CategoryCatalog {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub async fn fetch_all(&self) -> Result<Vec<Category>, RemoteError> {
        let mut url = self.client.endpoint("rest/v1/categories")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "name.asc");

        let response = self
            .client
            .http()
            .get(url)
            .send()
            .await
            .map_err(|e| RemoteError::network("category listing failed", e))?;
        ensure_success(response.status())?;

        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::network("reading category listing failed", e))?;
        let categories: Vec<Category> = serde_json::from_str(&body)
            .map_err(|e| RemoteError::decode("category listing has unexpected shape", e))?;
        debug!(count = categories.len(), "categories fetched");
        Ok(categories)
    }
}
