// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Change applier: places a generated artifact below the existing canvas content.
//!
//! Applying is a pure rewrite pass ([`rewrite()`]) followed by realisation through the
//! [`CanvasSurface`]. Canvas rejections never abort the artifact; each one is logged and recorded
//! in the [`ApplyReport`].

mod realize;
mod rewrite;

use serde::Serialize;

use crate::canvas::{content_bottom, CanvasError, CanvasSurface};
use crate::layout::LayoutWarning;
use crate::model::{ArtifactId, ArtifactStatus, BufferedArtifact, TableSizing};

pub use rewrite::{anchor_y, default_anchor, insertion_offset, min_anchor_y, rewrite};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApplyOptions {
    /// Vertical gap between existing content and the inserted artifact.
    pub gap: f64,
    /// Top edge used when the canvas is empty.
    pub empty_canvas_top: f64,
    /// Left edge for diagrams that carry no start position.
    pub empty_canvas_left: f64,
    /// Table sizing unless the table asks for one itself.
    pub table_sizing: TableSizing,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            gap: 200.0,
            empty_canvas_top: 100.0,
            empty_canvas_left: 100.0,
            table_sizing: TableSizing::Measured,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedOp {
    pub target: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApplyReport {
    pub offset: f64,
    /// Canvas operations that succeeded.
    pub applied: usize,
    pub skipped: Vec<SkippedOp>,
    pub warnings: Vec<LayoutWarning>,
}

impl ApplyReport {
    fn skip(&mut self, target: &str, err: CanvasError) {
        self.skipped.push(SkippedOp { target: target.to_owned(), reason: err.to_string() });
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    #[error("artifact {id} is {status}; only generated artifacts can be applied")]
    NotGenerated { id: ArtifactId, status: ArtifactStatus },
}

/// Lowest rendered bottom edge of the canvas content.
async fn existing_bottom(canvas: &dyn CanvasSurface) -> Option<f64> {
    let mut rendered = Vec::new();
    for shape in canvas.current_shapes().await {
        rendered.push(canvas.shape_bounds(&shape.id).await.unwrap_or_else(|| shape.bounds()));
    }
    content_bottom(rendered)
}

/// Applies a `generated` artifact. The caller owns the buffer transition.
///
/// Structural changes are laid out under the scope `<artifactId>-<index>` so re-applying the same
/// diagram from another artifact never collides on ids.
pub async fn apply_artifact(
    artifact: &BufferedArtifact,
    canvas: &dyn CanvasSurface,
    options: &ApplyOptions,
) -> Result<ApplyReport, ApplyError> {
    if artifact.status() != ArtifactStatus::Generated {
        return Err(ApplyError::NotGenerated {
            id: artifact.id().clone(),
            status: artifact.status(),
        });
    }

    let mut changes = artifact.changes().to_vec();
    for change in &mut changes {
        default_anchor(change, options.empty_canvas_left);
    }
    let bottom = existing_bottom(canvas).await;
    let offset =
        insertion_offset(bottom, min_anchor_y(&changes), options.gap, options.empty_canvas_top);

    let mut report = ApplyReport { offset, ..ApplyReport::default() };
    for (index, change) in changes.into_iter().enumerate() {
        let change = rewrite(change, offset);
        let scope = format!("{}-{index}", artifact.id());
        tracing::debug!(artifact = %artifact.id(), kind = change.kind(), %scope, "applying change");
        realize::realize_change(canvas, &change, &scope, options.table_sizing, &mut report).await;
    }

    tracing::info!(
        artifact = %artifact.id(),
        offset,
        applied = report.applied,
        skipped = report.skipped.len(),
        "artifact applied"
    );
    Ok(report)
}

#[cfg(test)]
mod tests;
