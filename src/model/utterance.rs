// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::ids::{ArtifactId, IdError};

/// A transcription snippet. Immutable once received.
///
/// Accepts both the transcription wire form (`call_id`, `emitted_at`) and camelCase aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    #[serde(alias = "callId")]
    pub call_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub content: String,
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(alias = "emittedAt")]
    pub emitted_at: i64,
}

impl Utterance {
    /// `"<callId>-<emittedAt>"`, the identity shared with the buffered artifact.
    ///
    /// A negative timestamp renders as `-~<abs>`, so the character before the trailing digits
    /// always tells where the call id ends and the key maps back to exactly one pair.
    pub fn key(&self) -> String {
        if self.emitted_at < 0 {
            format!("{}-~{}", self.call_id, self.emitted_at.unsigned_abs())
        } else {
            format!("{}-{}", self.call_id, self.emitted_at)
        }
    }

    pub fn artifact_id(&self) -> Result<ArtifactId, IdError> {
        ArtifactId::new(self.key())
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}
