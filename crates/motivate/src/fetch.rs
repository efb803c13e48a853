// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `motivate fetch` (interactive surface) and `motivate widget` (background surface).

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use motivate_acquire::{ReloadBroadcaster, SelectionWatcher};
use motivate_config::MotivateConfig;
use motivate_core::{EntryState, MotivateError, RefreshPolicy, Timeline, TimelineEntry};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::app::AppContext;
use crate::shutdown::install_signal_handler;

/// Runs one interactive request: prints the loading state, then the outcome,
/// and writes resolved bytes to `output`.
pub async fn run_fetch(config: &MotivateConfig, output: &Path) -> Result<(), MotivateError> {
    let ctx = AppContext::open(config).await?;
    let scheduler = ctx.scheduler(config)?;

    let outcome = report_request(scheduler.request(), output).await;
    ctx.close().await?;
    outcome
}

/// Drains one request's updates. Every update is consumed even after an error.
async fn report_request(
    mut updates: mpsc::Receiver<TimelineEntry>,
    output: &Path,
) -> Result<(), MotivateError> {
    let mut outcome = Ok(());
    while let Some(entry) = updates.recv().await {
        match &entry.state {
            EntryState::Loading => println!("loading motivational image..."),
            EntryState::Resolved(image) => match write_image(output, &image.bytes).await {
                Ok(()) => println!(
                    "{} bytes from {} (image id {}) -> {}",
                    image.bytes.len(),
                    image.provenance,
                    format_id(image.image_id),
                    output.display()
                ),
                Err(e) => outcome = Err(e),
            },
            EntryState::Failed(message) => {
                outcome = Err(MotivateError::Internal(message.clone()));
            }
            EntryState::Placeholder => {}
        }
    }
    outcome
}

/// Runs the background surface loop until Ctrl+C / SIGTERM, or once with `--once`.
pub async fn run_widget(
    config: &MotivateConfig,
    output: Option<&Path>,
    once: bool,
) -> Result<(), MotivateError> {
    let ctx = AppContext::open(config).await?;
    let scheduler = ctx.scheduler(config)?;

    print_entry(&scheduler.placeholder(), output).await?;

    if once {
        let timeline = scheduler.timeline().await;
        print_timeline(&timeline, output).await?;
        return ctx.close().await;
    }

    let cancel = install_signal_handler();
    // Toggles happen in other processes; the watcher turns their saves into
    // reloads on this broadcaster.
    let broadcaster = Arc::new(ReloadBroadcaster::new());
    let reloads = broadcaster.subscribe();
    let watcher = SelectionWatcher::new(
        ctx.selections.clone(),
        broadcaster,
        Duration::from_millis(config.timeline.reload_poll_ms),
    );
    let watcher_handle = tokio::spawn(watcher.run(cancel.clone()));
    let (tx, mut rx) = mpsc::channel::<Timeline>(4);

    let loop_handle = tokio::spawn({
        let scheduler = scheduler.clone();
        let cancel = cancel.clone();
        async move { scheduler.run(cancel, reloads, tx).await }
    });

    while let Some(timeline) = rx.recv().await {
        if let Err(e) = print_timeline(&timeline, output).await {
            warn!(error = %e, "could not publish timeline entry");
        }
    }

    if let Err(e) = loop_handle.await {
        warn!(error = %e, "timeline loop task failed");
    }
    // The loop can end on its own when stdout closes; stop the watcher too.
    cancel.cancel();
    if let Err(e) = watcher_handle.await {
        warn!(error = %e, "selection watcher task failed");
    }
    info!("widget stopped");
    ctx.close().await
}

async fn print_timeline(timeline: &Timeline, output: Option<&Path>) -> Result<(), MotivateError> {
    for entry in &timeline.entries {
        print_entry(entry, output).await?;
    }
    let RefreshPolicy::After(at) = timeline.policy;
    println!("  next refresh at {}", at.format("%H:%M:%S"));
    Ok(())
}

async fn print_entry(entry: &TimelineEntry, output: Option<&Path>) -> Result<(), MotivateError> {
    let stamp = entry.date.format("%H:%M:%S");
    match &entry.state {
        EntryState::Placeholder => println!("[{stamp}] placeholder"),
        EntryState::Loading => println!("[{stamp}] loading"),
        EntryState::Resolved(image) => {
            println!(
                "[{stamp}] image {} from {} ({} bytes)",
                format_id(image.image_id),
                image.provenance,
                image.bytes.len()
            );
            if let Some(path) = output {
                write_image(path, &image.bytes).await?;
            }
        }
        EntryState::Failed(message) => println!("[{stamp}] {message}"),
    }
    Ok(())
}

async fn write_image(path: &Path, bytes: &[u8]) -> Result<(), MotivateError> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| MotivateError::Internal(format!("writing {}: {e}", path.display())))
}

fn format_id(id: Option<i64>) -> String {
    id.map_or_else(|| "-".to_string(), |id| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use chrono::Utc;
    use motivate_core::{AcquiredImage, Provenance};

    fn entry(state: EntryState) -> TimelineEntry {
        let now = Utc::now();
        TimelineEntry {
            date: now,
            next_refresh: now,
            state,
        }
    }

    fn resolved(bytes: &'static [u8]) -> EntryState {
        EntryState::Resolved(AcquiredImage {
            bytes: Bytes::from_static(bytes),
            provenance: Provenance::Cache,
            image_id: Some(3),
        })
    }

    #[tokio::test]
    async fn resolved_image_is_written_to_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.img");
        let (tx, rx) = mpsc::channel(2);
        tx.send(entry(EntryState::Loading)).await.unwrap();
        tx.send(entry(resolved(b"jpeg"))).await.unwrap();
        drop(tx);

        report_request(rx, &output).await.unwrap();
        assert_eq!(std::fs::read(&output).unwrap(), b"jpeg");
    }

    #[tokio::test]
    async fn write_failure_is_returned_after_channel_drains() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("missing").join("out.img");
        let (tx, rx) = mpsc::channel(2);
        tx.send(entry(resolved(b"jpeg"))).await.unwrap();
        tx.send(entry(EntryState::Loading)).await.unwrap();
        drop(tx);

        let err = report_request(rx, &output).await.unwrap_err();
        assert!(err.to_string().contains("writing"), "{err}");
    }

    #[tokio::test]
    async fn failed_entry_becomes_error() {
        let (tx, rx) = mpsc::channel(2);
        tx.send(entry(EntryState::Failed("no offline fallback".into())))
            .await
            .unwrap();
        drop(tx);

        let err = report_request(rx, Path::new("unused.img")).await.unwrap_err();
        assert!(err.to_string().contains("no offline fallback"));
    }
}
