// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query functions over the shared store.

pub mod image_cache;
pub mod preferences;
