// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::canvas::CanvasContext;
use crate::model::Rect;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArtifactSummary {
    pub artifact_id: String,
    pub status: String,
    pub change_count: u64,
    pub generated_at: i64,
    pub speaker: Option<String>,
    pub content: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArtifactListResponse {
    pub artifacts: Vec<ArtifactSummary>,
    pub revision: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ArtifactIdParams {
    pub artifact_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpArtifact {
    pub artifact_id: String,
    pub status: String,
    pub call_id: String,
    pub speaker: Option<String>,
    pub content: String,
    pub generated_at: i64,
    pub error: Option<String>,
    /// Changes in their wire form (`{"type": "createShape", ...}`).
    pub changes: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArtifactGetResponse {
    pub artifact: McpArtifact,
    pub revision: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ArtifactEnqueueParams {
    pub call_id: String,
    pub user: Option<String>,
    pub content: String,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub duration: Option<f64>,
    /// Emission time in milliseconds; together with `call_id` it identifies the utterance.
    pub emitted_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArtifactEnqueueResponse {
    /// `accepted`, `duplicate` or `skipped`.
    pub outcome: String,
    pub artifact_id: Option<String>,
    pub words: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ArtifactUpdateParams {
    pub artifact_id: String,
    pub changes: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArtifactRemoveResponse {
    pub artifact_id: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArtifactClearResponse {
    pub cleared: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SkippedOpSummary {
    pub target: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArtifactApplyResponse {
    pub artifact_id: String,
    pub offset: f64,
    pub applied: u64,
    pub skipped: Vec<SkippedOpSummary>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArtifactStateResponse {
    pub artifact_id: String,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CanvasReadResponse {
    pub context: CanvasContext,
    pub shape_count: u64,
    pub binding_count: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LayoutPreviewParams {
    /// A structural change in wire form (`createLinearDiagram`, `createDecisionMatrix`, ...).
    pub change: serde_json::Value,
    /// Id scope for the placed shapes; defaults to `preview`.
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PlacedShape {
    pub shape_id: String,
    pub kind: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub label: Option<String>,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PlacedConnector {
    pub connector_id: String,
    pub from_shape_id: String,
    pub to_shape_id: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LayoutPreviewResponse {
    pub kind: String,
    pub shapes: Vec<PlacedShape>,
    pub connectors: Vec<PlacedConnector>,
    pub bounds: Option<Rect>,
    pub warnings: Vec<String>,
    /// Reconciled `[option][criterion]` scores, decision matrices only.
    pub matrix: Option<Vec<Vec<f64>>>,
}
