// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};

use crate::apply::ApplyError;
use crate::canvas::summarize;
use crate::layout::{layout_change, ConnectorPlacement, ShapePlacement};
use crate::model::{ArtifactId, ArtifactPatch, BufferedArtifact, Change, Utterance};
use crate::queue::{EnqueueOutcome, GenerationQueue, QueueError};
use crate::reconcile::reconcile_spec;

use super::types::*;

const DEFAULT_PREVIEW_SCOPE: &str = "preview";

#[derive(Clone)]
pub struct NaiadMcp {
    queue: GenerationQueue,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl NaiadMcp {
    pub fn new(queue: GenerationQueue) -> Self {
        Self { queue, tool_router: Self::tool_router() }
    }

    pub fn queue(&self) -> &GenerationQueue {
        &self.queue
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    async fn artifact_response(&self, id: &ArtifactId) -> Result<ArtifactGetResponse, ErrorData> {
        let artifact = self
            .queue
            .artifact(id)
            .await
            .ok_or_else(|| map_queue_error(QueueError::NotFound(id.clone())))?;
        Ok(ArtifactGetResponse { artifact: mcp_artifact(&artifact)?, revision: self.queue.revision() })
    }

    /// List buffered artifacts in arrival order; start here, then `artifact.get` or
    /// `artifact.apply`.
    #[tool(name = "artifact.list")]
    async fn artifact_list(&self) -> Result<Json<ArtifactListResponse>, ErrorData> {
        let artifacts = self.queue.artifacts().await.iter().map(summary_for_artifact).collect();
        Ok(Json(ArtifactListResponse { artifacts, revision: self.queue.revision() }))
    }

    /// Read one artifact including its changes in wire form.
    #[tool(name = "artifact.get")]
    async fn artifact_get(
        &self,
        params: Parameters<ArtifactIdParams>,
    ) -> Result<Json<ArtifactGetResponse>, ErrorData> {
        let id = parse_artifact_id(&params.0.artifact_id)?;
        Ok(Json(self.artifact_response(&id).await?))
    }

    /// Feed one transcription utterance; generation runs in the background.
    #[tool(name = "artifact.enqueue")]
    async fn artifact_enqueue(
        &self,
        params: Parameters<ArtifactEnqueueParams>,
    ) -> Result<Json<ArtifactEnqueueResponse>, ErrorData> {
        let params = params.0;
        let start = params.start.unwrap_or(0.0);
        let end = params.end.unwrap_or(start);
        let utterance = Utterance {
            call_id: params.call_id,
            user: params.user,
            content: params.content,
            start,
            end,
            duration: params.duration.unwrap_or(end - start),
            emitted_at: params.emitted_at,
        };
        let outcome = self.queue.enqueue(utterance).await.map_err(map_queue_error)?;
        let response = match outcome {
            EnqueueOutcome::Accepted(id) => ArtifactEnqueueResponse {
                outcome: "accepted".to_owned(),
                artifact_id: Some(id.into_string()),
                words: None,
            },
            EnqueueOutcome::Duplicate(id) => ArtifactEnqueueResponse {
                outcome: "duplicate".to_owned(),
                artifact_id: Some(id.into_string()),
                words: None,
            },
            EnqueueOutcome::Skipped { words } => ArtifactEnqueueResponse {
                outcome: "skipped".to_owned(),
                artifact_id: None,
                words: Some(words as u64),
            },
        };
        Ok(Json(response))
    }

    /// Replace the changes of a `generated` or `error` artifact.
    #[tool(name = "artifact.update")]
    async fn artifact_update(
        &self,
        params: Parameters<ArtifactUpdateParams>,
    ) -> Result<Json<ArtifactGetResponse>, ErrorData> {
        let id = parse_artifact_id(&params.0.artifact_id)?;
        let changes = params
            .0
            .changes
            .into_iter()
            .enumerate()
            .map(|(index, value)| parse_change(value, index))
            .collect::<Result<Vec<_>, _>>()?;
        let updated = self
            .queue
            .update_diagram(&id, ArtifactPatch { changes: Some(changes) })
            .await
            .map_err(map_queue_error)?;
        Ok(Json(ArtifactGetResponse {
            artifact: mcp_artifact(&updated)?,
            revision: self.queue.revision(),
        }))
    }

    /// Discard an artifact in any status.
    #[tool(name = "artifact.remove")]
    async fn artifact_remove(
        &self,
        params: Parameters<ArtifactIdParams>,
    ) -> Result<Json<ArtifactRemoveResponse>, ErrorData> {
        let id = parse_artifact_id(&params.0.artifact_id)?;
        let removed = self.queue.remove_diagram(&id).await.map_err(map_queue_error)?;
        Ok(Json(ArtifactRemoveResponse {
            artifact_id: removed.id().to_string(),
            status: removed.status().to_string(),
        }))
    }

    /// Discard every buffered artifact.
    #[tool(name = "artifact.clear")]
    async fn artifact_clear(&self) -> Result<Json<ArtifactClearResponse>, ErrorData> {
        let cleared = self.queue.clear_diagrams().await;
        Ok(Json(ArtifactClearResponse { cleared: cleared as u64 }))
    }

    /// Place a `generated` artifact below the current canvas content.
    #[tool(name = "artifact.apply")]
    async fn artifact_apply(
        &self,
        params: Parameters<ArtifactIdParams>,
    ) -> Result<Json<ArtifactApplyResponse>, ErrorData> {
        let id = parse_artifact_id(&params.0.artifact_id)?;
        let report = self.queue.apply(&id).await.map_err(map_queue_error)?;
        Ok(Json(ArtifactApplyResponse {
            artifact_id: id.into_string(),
            offset: report.offset,
            applied: report.applied as u64,
            skipped: report
                .skipped
                .into_iter()
                .map(|op| SkippedOpSummary { target: op.target, reason: op.reason })
                .collect(),
            warnings: report.warnings.iter().map(ToString::to_string).collect(),
        }))
    }

    /// Abort a pending generation; the artifact is dropped.
    #[tool(name = "artifact.cancel")]
    async fn artifact_cancel(
        &self,
        params: Parameters<ArtifactIdParams>,
    ) -> Result<Json<ArtifactStateResponse>, ErrorData> {
        let id = parse_artifact_id(&params.0.artifact_id)?;
        self.queue.cancel(&id).await.map_err(map_queue_error)?;
        Ok(Json(ArtifactStateResponse { artifact_id: id.into_string(), status: None }))
    }

    /// Run the generation of an `error` artifact again.
    #[tool(name = "artifact.retry")]
    async fn artifact_retry(
        &self,
        params: Parameters<ArtifactIdParams>,
    ) -> Result<Json<ArtifactStateResponse>, ErrorData> {
        let id = parse_artifact_id(&params.0.artifact_id)?;
        self.queue.retry(&id).await.map_err(map_queue_error)?;
        let status = self.queue.artifact(&id).await.map(|artifact| artifact.status().to_string());
        Ok(Json(ArtifactStateResponse { artifact_id: id.into_string(), status }))
    }

    /// Simplified canvas summary, as sent to the generation service.
    #[tool(name = "canvas.read")]
    async fn canvas_read(&self) -> Result<Json<CanvasReadResponse>, ErrorData> {
        let canvas = self.queue.canvas();
        let shapes = canvas.current_shapes().await;
        let bindings = canvas.current_bindings().await;
        Ok(Json(CanvasReadResponse {
            context: summarize(&shapes, &bindings),
            shape_count: shapes.len() as u64,
            binding_count: bindings.len() as u64,
        }))
    }

    /// Lay out a structural change without touching the canvas (tables use static sizing).
    #[tool(name = "layout.preview")]
    async fn layout_preview(
        &self,
        params: Parameters<LayoutPreviewParams>,
    ) -> Result<Json<LayoutPreviewResponse>, ErrorData> {
        let change = parse_change(params.0.change, 0)?;
        let scope = params.0.scope.unwrap_or_else(|| DEFAULT_PREVIEW_SCOPE.to_owned());
        let plan = layout_change(&change, &scope).ok_or_else(|| {
            ErrorData::invalid_params(
                format!("{} is not a structural change", change.kind()),
                Some(serde_json::json!({ "type": change.kind() })),
            )
        })?;
        let matrix = match &change {
            Change::CreateDecisionMatrix(spec) => Some(reconcile_spec(spec).to_rows()),
            _ => None,
        };
        Ok(Json(LayoutPreviewResponse {
            kind: change.kind().to_owned(),
            shapes: plan.shapes().map(placed_shape).collect(),
            connectors: plan.connectors().map(placed_connector).collect(),
            bounds: plan.bounds(),
            warnings: plan.warnings().iter().map(ToString::to_string).collect(),
            matrix,
        }))
    }
}

#[tool_handler]
impl ServerHandler for NaiadMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Naiad transcript-to-diagram server (tools: artifact.list, artifact.get, artifact.enqueue, artifact.update, artifact.remove, artifact.clear, artifact.apply, artifact.cancel, artifact.retry, canvas.read, layout.preview)"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// Extracted mapping/parsing helpers for MCP tool handlers.
include!("server/helpers.rs");
