// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::diagram::{DecisionMatrixSpec, LinearDiagramSpec, TableSpec, TimelineSpec};
use super::ids::{BindingId, ShapeId};
use super::shape::{BindingPatch, BindingSpec, ShapePatch, ShapeSpec};

/// One diagram change, as emitted by the generation service.
///
/// Wire form is an internally tagged JSON object: `{"type": "createShape", "description": ..., ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Change {
    CreateShape {
        #[serde(default)]
        description: String,
        shape: ShapeSpec,
    },
    UpdateShape {
        #[serde(default)]
        description: String,
        shape: ShapePatch,
    },
    DeleteShape {
        #[serde(default)]
        description: String,
        shape_id: ShapeId,
    },
    CreateBinding {
        #[serde(default)]
        description: String,
        binding: BindingSpec,
    },
    UpdateBinding {
        #[serde(default)]
        description: String,
        binding: BindingPatch,
    },
    DeleteBinding {
        #[serde(default)]
        description: String,
        binding_id: BindingId,
    },
    CreateLinearDiagram(LinearDiagramSpec),
    CreateDecisionMatrix(DecisionMatrixSpec),
    CreateTable(TableSpec),
    CreateTimeline(TimelineSpec),
}

impl Change {
    pub fn description(&self) -> &str {
        match self {
            Change::CreateShape { description, .. }
            | Change::UpdateShape { description, .. }
            | Change::DeleteShape { description, .. }
            | Change::CreateBinding { description, .. }
            | Change::UpdateBinding { description, .. }
            | Change::DeleteBinding { description, .. } => description,
            Change::CreateLinearDiagram(spec) => &spec.description,
            Change::CreateDecisionMatrix(spec) => &spec.description,
            Change::CreateTable(spec) => &spec.description,
            Change::CreateTimeline(spec) => &spec.description,
        }
    }

    /// Wire name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Change::CreateShape { .. } => "createShape",
            Change::UpdateShape { .. } => "updateShape",
            Change::DeleteShape { .. } => "deleteShape",
            Change::CreateBinding { .. } => "createBinding",
            Change::UpdateBinding { .. } => "updateBinding",
            Change::DeleteBinding { .. } => "deleteBinding",
            Change::CreateLinearDiagram(_) => "createLinearDiagram",
            Change::CreateDecisionMatrix(_) => "createDecisionMatrix",
            Change::CreateTable(_) => "createTable",
            Change::CreateTimeline(_) => "createTimeline",
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Change::CreateLinearDiagram(_)
                | Change::CreateDecisionMatrix(_)
                | Change::CreateTable(_)
                | Change::CreateTimeline(_)
        )
    }
}
