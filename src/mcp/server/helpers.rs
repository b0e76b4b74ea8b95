// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// MCP server helper functions:
/// artifact mapping, id and change parsing, and queue error translation.
fn parse_artifact_id(raw: &str) -> Result<ArtifactId, ErrorData> {
    ArtifactId::new(raw.to_owned()).map_err(|err| {
        ErrorData::invalid_params(
            format!("invalid artifact_id: {err}"),
            Some(serde_json::json!({ "artifact_id": raw })),
        )
    })
}

fn parse_change(value: serde_json::Value, index: usize) -> Result<Change, ErrorData> {
    serde_json::from_value(value).map_err(|err| {
        ErrorData::invalid_params(
            format!("change {index} is not a valid diagram change: {err}"),
            Some(serde_json::json!({ "index": index })),
        )
    })
}

fn change_to_value(change: &Change) -> Result<serde_json::Value, ErrorData> {
    serde_json::to_value(change).map_err(|err| {
        ErrorData::internal_error(format!("failed to encode change: {err}"), None)
    })
}

fn summary_for_artifact(artifact: &BufferedArtifact) -> ArtifactSummary {
    ArtifactSummary {
        artifact_id: artifact.id().to_string(),
        status: artifact.status().to_string(),
        change_count: artifact.changes().len() as u64,
        generated_at: artifact.generated_at(),
        speaker: artifact.source().user.clone(),
        content: artifact.source().content.clone(),
        error: artifact.error().map(str::to_owned),
    }
}

fn mcp_artifact(artifact: &BufferedArtifact) -> Result<McpArtifact, ErrorData> {
    let changes = artifact.changes().iter().map(change_to_value).collect::<Result<Vec<_>, _>>()?;
    Ok(McpArtifact {
        artifact_id: artifact.id().to_string(),
        status: artifact.status().to_string(),
        call_id: artifact.source().call_id.clone(),
        speaker: artifact.source().user.clone(),
        content: artifact.source().content.clone(),
        generated_at: artifact.generated_at(),
        error: artifact.error().map(str::to_owned),
        changes,
    })
}

fn map_queue_error(err: QueueError) -> ErrorData {
    let message = err.to_string();
    match err {
        QueueError::NotFound(id) => ErrorData::resource_not_found(
            message,
            Some(serde_json::json!({ "artifact_id": id.as_str() })),
        ),
        QueueError::InvalidState { id, status, .. } => ErrorData::invalid_request(
            message,
            Some(serde_json::json!({ "artifact_id": id.as_str(), "status": status.as_str() })),
        ),
        QueueError::Apply(ApplyError::NotGenerated { id, status }) => ErrorData::invalid_request(
            message,
            Some(serde_json::json!({ "artifact_id": id.as_str(), "status": status.as_str() })),
        ),
        QueueError::Transition(_) => ErrorData::invalid_request(message, None),
        QueueError::Identity(_) => ErrorData::invalid_params(message, None),
        QueueError::Closed => ErrorData::internal_error(message, None),
    }
}

fn placed_shape(shape: &ShapePlacement) -> PlacedShape {
    PlacedShape {
        shape_id: shape.id.to_string(),
        kind: shape.kind.as_str().to_owned(),
        x: shape.rect.x,
        y: shape.rect.y,
        w: shape.rect.w,
        h: shape.rect.h,
        label: shape.label.clone(),
        color: shape.color.to_string(),
    }
}

fn placed_connector(connector: &ConnectorPlacement) -> PlacedConnector {
    PlacedConnector {
        connector_id: connector.id.to_string(),
        from_shape_id: connector.from.to_string(),
        to_shape_id: connector.to.to_string(),
        x1: connector.start.x,
        y1: connector.start.y,
        x2: connector.end.x,
        y2: connector.end.y,
    }
}
