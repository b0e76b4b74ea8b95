// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{apply_artifact, ApplyError, ApplyOptions};
use crate::canvas::{CanvasSurface, MemoryCanvas};
use crate::model::{
    ArtifactStatus, BufferedArtifact, Change, ShapeId, ShapeKind, ShapeSpec, Utterance,
};

fn utterance() -> Utterance {
    Utterance {
        call_id: "call".into(),
        user: Some("ana".into()),
        content: "let us sketch it".into(),
        start: 0.0,
        end: 2.0,
        duration: 2.0,
        emitted_at: 1,
    }
}

fn generated(changes: Vec<serde_json::Value>) -> BufferedArtifact {
    let source = utterance();
    let mut artifact = BufferedArtifact::pending(source.artifact_id().expect("id"), source);
    let changes = changes
        .into_iter()
        .map(|value| serde_json::from_value::<Change>(value).expect("change"))
        .collect();
    artifact.mark_generated(changes).expect("generated");
    artifact
}

fn linear(start_y: f64) -> serde_json::Value {
    serde_json::json!({
        "type": "createLinearDiagram",
        "description": "three steps",
        "steps": [
            { "id": "a", "title": "Plan" },
            { "id": "b", "title": "Build" },
            { "id": "c", "title": "Ship" }
        ],
        "startPosition": { "x": 0, "y": start_y }
    })
}

fn table(sizing: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "createTable",
        "description": "notes",
        "rows": [
            { "id": "h", "cells": [{ "id": "h0", "content": "Name" }, { "id": "h1", "content": "Notes" }] },
            { "id": "r", "cells": [
                { "id": "r0", "content": "x" },
                { "id": "r1", "content": "abcdefghijabcdefghijabcdefghijabcdefghij" }
            ] }
        ],
        "metadata": { "sizing": sizing }
    })
}

fn cell(row: usize, col: usize) -> ShapeId {
    ShapeId::namespaced(format!("call-1-0-table-cell-{row}-{col}"))
}

#[tokio::test]
async fn empty_canvas_places_linear_diagram_at_fixed_top() {
    let canvas = MemoryCanvas::new();
    let report = apply_artifact(&generated(vec![linear(0.0)]), &canvas, &ApplyOptions::default())
        .await
        .expect("apply");

    assert!(report.skipped.is_empty());
    let shapes = canvas.current_shapes().await;
    let boxes = shapes.iter().filter(|s| s.kind == ShapeKind::Rectangle).count();
    let arrows = shapes.iter().filter(|s| s.kind == ShapeKind::Arrow).count();
    assert_eq!((boxes, arrows), (3, 2));
    assert_eq!(canvas.current_bindings().await.len(), 4);

    let top = shapes.iter().map(|s| s.bounds().y).fold(f64::INFINITY, f64::min);
    assert_eq!(top, 100.0);
}

#[tokio::test]
async fn content_lands_a_gap_below_existing_shapes() {
    let canvas = MemoryCanvas::new();
    let mut existing =
        ShapeSpec::new(ShapeId::namespaced("existing"), ShapeKind::Rectangle, 0.0, 0.0);
    existing.props.h = Some(100.0);
    canvas.create_shape(existing).await.expect("seed");

    let report = apply_artifact(&generated(vec![linear(50.0)]), &canvas, &ApplyOptions::default())
        .await
        .expect("apply");
    assert_eq!(report.offset, 250.0);

    let placed_top = canvas
        .current_shapes()
        .await
        .iter()
        .filter(|s| s.id.as_str() != "shape:existing")
        .map(|s| s.bounds().y)
        .fold(f64::INFINITY, f64::min);
    assert!(placed_top >= 300.0, "placed at {placed_top}");
}

#[tokio::test]
async fn measured_table_rows_fit_their_tallest_cell() {
    let canvas = MemoryCanvas::new();
    apply_artifact(&generated(vec![table("measured")]), &canvas, &ApplyOptions::default())
        .await
        .expect("apply");

    let header = canvas.shape(&cell(0, 0)).await.expect("header cell");
    assert_eq!((header.x, header.y), (100.0, 100.0));
    assert_eq!(header.props.h, Some(80.0));

    let short = canvas.shape(&cell(1, 0)).await.expect("short cell");
    let long = canvas.shape(&cell(1, 1)).await.expect("long cell");
    assert_eq!(short.y, 186.0);
    assert_eq!(short.props.h, Some(96.0));
    assert_eq!(long.props.h, Some(96.0));

    let measured = canvas.measure(&long).await.expect("measure");
    assert!(long.props.h.unwrap_or_default() >= measured.h);
}

#[tokio::test]
async fn static_table_keeps_provisional_heights() {
    let canvas = MemoryCanvas::new();
    apply_artifact(&generated(vec![table("static")]), &canvas, &ApplyOptions::default())
        .await
        .expect("apply");
    let long = canvas.shape(&cell(1, 1)).await.expect("long cell");
    assert_eq!(long.props.h, Some(80.0));
}

#[tokio::test]
async fn rejected_operations_are_skipped_not_fatal() {
    let canvas = MemoryCanvas::new();
    let artifact = generated(vec![
        serde_json::json!({
            "type": "createShape", "description": "box",
            "shape": { "id": "a", "type": "rectangle", "x": 0, "y": 0 }
        }),
        serde_json::json!({
            "type": "createBinding", "description": "dangling",
            "binding": { "id": "b", "fromId": "missing", "toId": "a" }
        }),
        serde_json::json!({
            "type": "createShape", "description": "second box",
            "shape": { "id": "c", "type": "ellipse", "x": 200, "y": 0 }
        }),
    ]);
    let report =
        apply_artifact(&artifact, &canvas, &ApplyOptions::default()).await.expect("apply");
    assert_eq!(report.applied, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].target, "binding:b");
    assert_eq!(canvas.len().await, 2);
}

#[tokio::test]
async fn only_generated_artifacts_apply() {
    let canvas = MemoryCanvas::new();
    let source = utterance();
    let pending = BufferedArtifact::pending(source.artifact_id().expect("id"), source);
    let err = apply_artifact(&pending, &canvas, &ApplyOptions::default()).await.unwrap_err();
    assert!(matches!(err, ApplyError::NotGenerated { status: ArtifactStatus::Pending, .. }));
    assert!(canvas.is_empty().await);
}
