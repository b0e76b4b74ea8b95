// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Model Context Protocol (MCP) server surface.
//!
//! The MCP layer lets an agent or editor feed utterances, inspect and edit buffered artifacts,
//! apply them to the canvas and preview layouts.

mod server;
mod types;

pub use server::NaiadMcp;
