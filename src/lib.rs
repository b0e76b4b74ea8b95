// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Naiad: transcript utterances in, laid-out diagrams on a shared canvas out.
//!
//! Utterances are buffered as artifacts by the [`queue`], turned into diagram [`model::Change`]s
//! by a [`generate`] service, placed by the deterministic [`layout`] engines, and written onto a
//! [`canvas`] surface by [`apply`]. The [`mcp`] module exposes the buffer to tool integrations.

pub mod apply;
pub mod canvas;
pub mod config;
pub mod generate;
pub mod layout;
pub mod mcp;
pub mod model;
pub mod queue;
pub mod reconcile;
