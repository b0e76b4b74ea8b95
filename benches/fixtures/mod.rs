// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Deterministic diagram specs for the layout benchmarks, built through the wire format so the
//! fixtures stay valid when optional fields are added.

use naiad::model::{DecisionMatrixSpec, LinearDiagramSpec, TableSpec, TimelineSpec};
use serde_json::{json, Value};

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).expect("fixture decodes")
}

pub fn linear(steps: usize) -> LinearDiagramSpec {
    let steps: Vec<Value> = (0..steps)
        .map(|i| json!({ "id": format!("s{i}"), "title": format!("Step {i} of the rollout") }))
        .collect();
    decode(json!({ "description": "bench", "steps": steps }))
}

/// Every third cell is given sparsely by title, the rest come from the dense grid.
pub fn matrix(options: usize, criteria: usize) -> DecisionMatrixSpec {
    let option_list: Vec<Value> =
        (0..options).map(|i| json!({ "id": format!("o{i}"), "title": format!("Option {i}") })).collect();
    let criterion_list: Vec<Value> = (0..criteria)
        .map(|j| json!({ "id": format!("c{j}"), "title": format!("Criterion {j}"), "weight": 1 + j % 3 }))
        .collect();
    let scores: Vec<Vec<f64>> =
        (0..options).map(|i| (0..criteria).map(|j| ((i * 7 + j * 3) % 6) as f64).collect()).collect();
    let cells: Vec<Value> = (0..options)
        .flat_map(|i| (0..criteria).map(move |j| (i, j)))
        .filter(|(i, j)| (i + j) % 3 == 0)
        .map(|(i, j)| {
            json!({
                "optionTitle": format!("option {i}"),
                "criterionTitle": format!("CRITERION {j}"),
                "value": ((i + j) % 5) as f64 + 0.5,
                "max": 5
            })
        })
        .collect();
    decode(json!({
        "description": "bench",
        "options": option_list,
        "criteria": criterion_list,
        "scores": scores,
        "scoreCells": cells,
        "metadata": { "title": "Benchmark matrix" }
    }))
}

pub fn table(rows: usize, cols: usize) -> TableSpec {
    let rows: Vec<Value> = (0..rows)
        .map(|r| {
            let cells: Vec<Value> = (0..cols)
                .map(|c| {
                    let content = "word ".repeat(1 + (r * cols + c) % 9);
                    json!({ "id": format!("r{r}c{c}"), "content": content.trim_end() })
                })
                .collect();
            json!({ "id": format!("r{r}"), "cells": cells })
        })
        .collect();
    decode(json!({ "description": "bench", "rows": rows, "metadata": { "sizing": "static" } }))
}

pub fn timeline(items: usize, lanes: usize) -> TimelineSpec {
    let items: Vec<Value> = (0..items)
        .map(|i| {
            let month = 1 + i % 12;
            let day = 1 + (i * 5) % 27;
            let mut item = json!({
                "id": format!("t{i}"),
                "title": format!("Milestone {i}"),
                "start": format!("2025-{month:02}-{day:02}"),
                "lane": format!("lane {}", i % lanes.max(1)),
            });
            if i % 2 == 0 {
                item["end"] = json!(format!("2025-{month:02}-{:02}", (day + 1).min(28)));
            }
            item
        })
        .collect();
    decode(json!({ "description": "bench", "items": items }))
}
