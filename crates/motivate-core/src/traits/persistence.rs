// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cross-process persistence of the category selection.

use async_trait::async_trait;

use crate::error::MotivateError;
use crate::types::CategorySelection;

/// Durable home of the category selection, shared by every process.
#[async_trait]
pub trait SelectionPersistence: Send + Sync + 'static {
    /// Reads the persisted selection; an absent entry is the empty selection.
    async fn load(&self) -> Result<CategorySelection, MotivateError>;

    /// Replaces the persisted selection.
    async fn save(&self, selection: &CategorySelection) -> Result<(), MotivateError>;

    /// Change marker for the persisted selection.
    ///
    /// Differs after every committed [`save`](Self::save), whichever process
    /// made it. `None` while nothing has been saved. Stores that cannot track
    /// changes keep the default, which never reports one.
    async fn revision(&self) -> Result<Option<i64>, MotivateError> {
        Ok(None)
    }
}
