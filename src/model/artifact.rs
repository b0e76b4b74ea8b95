// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::change::Change;
use super::ids::ArtifactId;
use super::utterance::Utterance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactStatus {
    Pending,
    Generated,
    Applied,
    Error,
}

impl ArtifactStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactStatus::Pending => "pending",
            ArtifactStatus::Generated => "generated",
            ArtifactStatus::Applied => "applied",
            ArtifactStatus::Error => "error",
        }
    }
}

impl fmt::Display for ArtifactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("artifact cannot move from {from} to {to}")]
    Invalid { from: ArtifactStatus, to: ArtifactStatus },
    #[error("a generation without changes cannot become generated")]
    NoChanges,
}

/// Caller-supplied edit of a buffered artifact.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<Vec<Change>>,
}

/// A generation result buffered until someone applies or discards it.
///
/// Status and changes only move together through the transition methods, so a reader never sees a
/// `generated` artifact without changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferedArtifact {
    id: ArtifactId,
    source: Utterance,
    changes: Vec<Change>,
    generated_at: i64,
    status: ArtifactStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl BufferedArtifact {
    pub fn pending(id: ArtifactId, source: Utterance) -> Self {
        Self {
            id,
            source,
            changes: Vec::new(),
            generated_at: now_millis(),
            status: ArtifactStatus::Pending,
            error: None,
        }
    }

    pub fn id(&self) -> &ArtifactId {
        &self.id
    }

    pub fn source(&self) -> &Utterance {
        &self.source
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Milliseconds since the Unix epoch of the last status change.
    pub fn generated_at(&self) -> i64 {
        self.generated_at
    }

    pub fn status(&self) -> ArtifactStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn mark_generated(&mut self, changes: Vec<Change>) -> Result<(), TransitionError> {
        self.expect_status(ArtifactStatus::Pending, ArtifactStatus::Generated)?;
        if changes.is_empty() {
            return Err(TransitionError::NoChanges);
        }
        self.changes = changes;
        self.status = ArtifactStatus::Generated;
        self.error = None;
        self.generated_at = now_millis();
        Ok(())
    }

    pub fn mark_failed(&mut self, message: impl Into<String>) -> Result<(), TransitionError> {
        self.expect_status(ArtifactStatus::Pending, ArtifactStatus::Error)?;
        self.changes.clear();
        self.status = ArtifactStatus::Error;
        self.error = Some(message.into());
        self.generated_at = now_millis();
        Ok(())
    }

    pub fn mark_applied(&mut self) -> Result<(), TransitionError> {
        self.expect_status(ArtifactStatus::Generated, ArtifactStatus::Applied)?;
        self.status = ArtifactStatus::Applied;
        Ok(())
    }

    /// Replaces the change list of a settled artifact.
    ///
    /// A non-empty replacement turns an `error` artifact into a `generated` one; pending and
    /// applied artifacts are not editable.
    pub fn apply_patch(&mut self, patch: ArtifactPatch) -> Result<(), TransitionError> {
        let Some(changes) = patch.changes else {
            return Ok(());
        };
        match self.status {
            ArtifactStatus::Generated | ArtifactStatus::Error => {}
            from => return Err(TransitionError::Invalid { from, to: ArtifactStatus::Generated }),
        }
        if changes.is_empty() {
            return Err(TransitionError::NoChanges);
        }
        self.changes = changes;
        self.status = ArtifactStatus::Generated;
        self.error = None;
        Ok(())
    }

    fn expect_status(
        &self,
        expected: ArtifactStatus,
        to: ArtifactStatus,
    ) -> Result<(), TransitionError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(TransitionError::Invalid { from: self.status, to })
        }
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::{ArtifactPatch, ArtifactStatus, BufferedArtifact, TransitionError};
    use crate::model::change::Change;
    use crate::model::ids::{ArtifactId, ShapeId};
    use crate::model::utterance::Utterance;

    fn artifact() -> BufferedArtifact {
        let source = Utterance {
            call_id: "call".into(),
            user: None,
            content: "we can do it".into(),
            start: 0.0,
            end: 1.0,
            duration: 1.0,
            emitted_at: 1,
        };
        BufferedArtifact::pending(ArtifactId::new(source.key()).expect("id"), source)
    }

    fn delete_change() -> Change {
        Change::DeleteShape {
            description: "drop".into(),
            shape_id: ShapeId::new("shape:x").expect("shape id"),
        }
    }

    #[test]
    fn empty_generation_never_becomes_generated() {
        let mut artifact = artifact();
        assert_eq!(artifact.mark_generated(Vec::new()), Err(TransitionError::NoChanges));
        assert_eq!(artifact.status(), ArtifactStatus::Pending);
    }

    #[test]
    fn generated_then_applied() {
        let mut artifact = artifact();
        artifact.mark_generated(vec![delete_change()]).expect("generated");
        assert_eq!(artifact.changes().len(), 1);
        artifact.mark_applied().expect("applied");
        assert_eq!(artifact.status(), ArtifactStatus::Applied);
        assert!(artifact.mark_failed("late").is_err());
    }

    #[test]
    fn failed_artifact_keeps_message_and_can_be_repaired_by_patch() {
        let mut artifact = artifact();
        artifact.mark_failed("boom").expect("failed");
        assert_eq!(artifact.error(), Some("boom"));
        assert!(artifact.mark_applied().is_err());

        artifact
            .apply_patch(ArtifactPatch { changes: Some(vec![delete_change()]) })
            .expect("patched");
        assert_eq!(artifact.status(), ArtifactStatus::Generated);
        assert_eq!(artifact.error(), None);
    }

    #[test]
    fn pending_artifact_rejects_patch() {
        let mut artifact = artifact();
        let err = artifact
            .apply_patch(ArtifactPatch { changes: Some(vec![delete_change()]) })
            .unwrap_err();
        assert!(matches!(err, TransitionError::Invalid { from: ArtifactStatus::Pending, .. }));
    }
}
