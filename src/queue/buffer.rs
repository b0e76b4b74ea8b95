// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{ArtifactId, ArtifactPatch, BufferedArtifact, TransitionError};

/// Buffered artifacts in arrival order. At most one artifact per id.
#[derive(Debug, Default, Clone)]
pub struct ArtifactBuffer {
    artifacts: Vec<BufferedArtifact>,
}

impl ArtifactBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn contains(&self, id: &ArtifactId) -> bool {
        self.position(id).is_some()
    }

    /// Appends the artifact unless one with the same id is already buffered.
    pub fn add(&mut self, artifact: BufferedArtifact) -> bool {
        if self.contains(artifact.id()) {
            return false;
        }
        self.artifacts.push(artifact);
        true
    }

    pub fn get(&self, id: &ArtifactId) -> Option<&BufferedArtifact> {
        self.artifacts.iter().find(|artifact| artifact.id() == id)
    }

    /// Runs one transition against the artifact, `None` when it is not buffered.
    pub fn modify<R>(
        &mut self,
        id: &ArtifactId,
        f: impl FnOnce(&mut BufferedArtifact) -> R,
    ) -> Option<R> {
        let index = self.position(id)?;
        Some(f(&mut self.artifacts[index]))
    }

    pub fn update(
        &mut self,
        id: &ArtifactId,
        patch: ArtifactPatch,
    ) -> Option<Result<(), TransitionError>> {
        self.modify(id, |artifact| artifact.apply_patch(patch))
    }

    pub fn remove(&mut self, id: &ArtifactId) -> Option<BufferedArtifact> {
        let index = self.position(id)?;
        Some(self.artifacts.remove(index))
    }

    pub fn clear(&mut self) -> Vec<BufferedArtifact> {
        std::mem::take(&mut self.artifacts)
    }

    pub fn list(&self) -> &[BufferedArtifact] {
        &self.artifacts
    }

    fn position(&self, id: &ArtifactId) -> Option<usize> {
        self.artifacts.iter().position(|artifact| artifact.id() == id)
    }
}
