// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `motivate cache` subcommands.

use std::path::PathBuf;

use bytes::Bytes;
use motivate_config::MotivateConfig;
use motivate_core::MotivateError;
use tracing::warn;

use crate::app::AppContext;

/// Seeds the offline cache from local files. Unreadable files are skipped.
pub async fn run_seed(config: &MotivateConfig, files: &[PathBuf]) -> Result<(), MotivateError> {
    let ctx = AppContext::open(config).await?;
    let mut seeded = 0usize;

    for path in files {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable file");
                continue;
            }
        };
        if bytes.len() > config.cache.max_entry_bytes {
            warn!(
                path = %path.display(),
                size = bytes.len(),
                limit = config.cache.max_entry_bytes,
                "skipping file larger than cache.max_entry_bytes"
            );
            continue;
        }
        ctx.cache
            .seed(Bytes::from(bytes))
            .await
            .map_err(|e| MotivateError::Storage { source: e.into() })?;
        seeded += 1;
    }

    let total = ctx
        .cache
        .len()
        .await
        .map_err(|e| MotivateError::Storage { source: e.into() })?;
    println!(
        "seeded {seeded} of {} file(s); cache holds {total} of {} image(s)",
        files.len(),
        ctx.cache.capacity()
    );
    ctx.close().await
}

pub async fn run_stats(config: &MotivateConfig) -> Result<(), MotivateError> {
    let ctx = AppContext::open(config).await?;
    let stats = ctx
        .cache
        .stats()
        .await
        .map_err(|e| MotivateError::Storage { source: e.into() })?;

    println!("entries        {} / {}", stats.entries, ctx.cache.capacity());
    println!("total bytes    {}", stats.total_bytes);
    println!(
        "newest stored  {}",
        stats.newest_stored_at.as_deref().unwrap_or("-")
    );
    println!(
        "last served    {}",
        stats.last_served_at.as_deref().unwrap_or("-")
    );
    ctx.close().await
}

pub async fn run_clear(config: &MotivateConfig) -> Result<(), MotivateError> {
    let ctx = AppContext::open(config).await?;
    let removed = ctx
        .cache
        .clear()
        .await
        .map_err(|e| MotivateError::Storage { source: e.into() })?;
    println!("removed {removed} cached image(s)");
    ctx.close().await
}
