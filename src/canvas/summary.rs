// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{BindingSpec, Point, Rect, ShapeKind, ShapeSpec, Terminal};

/// Viewport assumed when the canvas is empty.
const DEFAULT_VIEWPORT: Rect = Rect { x: 0.0, y: 0.0, w: 1920.0, h: 1080.0 };

/// Compact shape description handed to the generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SimpleShape {
    #[serde(rename_all = "camelCase")]
    Rectangle { shape_id: String, x: f64, y: f64, w: f64, h: f64, color: String, text: Option<String> },
    #[serde(rename_all = "camelCase")]
    Ellipse { shape_id: String, x: f64, y: f64, w: f64, h: f64, color: String, text: Option<String> },
    #[serde(rename_all = "camelCase")]
    Note { shape_id: String, x: f64, y: f64, color: String, text: Option<String> },
    #[serde(rename_all = "camelCase")]
    Text { shape_id: String, x: f64, y: f64, color: String, text: String },
    #[serde(rename_all = "camelCase")]
    Arrow {
        shape_id: String,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: String,
        from_id: Option<String>,
        to_id: Option<String>,
        text: Option<String>,
    },
}

/// What the generation service gets to see of the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CanvasContext {
    pub bounds: Rect,
    pub shapes: Vec<SimpleShape>,
}

fn simplify(shape: &ShapeSpec, arrow_ends: &HashMap<&str, (Option<String>, Option<String>)>) -> SimpleShape {
    let shape_id = shape.id.to_string();
    let color = shape.props.color.unwrap_or_default().to_string();
    let text = shape.props.text.clone().filter(|t| !t.trim().is_empty());
    let bounds = shape.bounds();
    match shape.kind {
        ShapeKind::Rectangle => SimpleShape::Rectangle {
            shape_id,
            x: bounds.x,
            y: bounds.y,
            w: bounds.w,
            h: bounds.h,
            color,
            text,
        },
        ShapeKind::Ellipse => SimpleShape::Ellipse {
            shape_id,
            x: bounds.x,
            y: bounds.y,
            w: bounds.w,
            h: bounds.h,
            color,
            text,
        },
        ShapeKind::Note => SimpleShape::Note { shape_id, x: shape.x, y: shape.y, color, text },
        ShapeKind::Text => SimpleShape::Text {
            shape_id,
            x: shape.x,
            y: shape.y,
            color,
            text: text.unwrap_or_default(),
        },
        ShapeKind::Arrow => {
            let origin = Point::new(shape.x, shape.y);
            let start = shape.props.start.unwrap_or(Point::ORIGIN);
            let end = shape.props.end.unwrap_or(Point::ORIGIN);
            let (from_id, to_id) =
                arrow_ends.get(shape.id.as_str()).cloned().unwrap_or((None, None));
            SimpleShape::Arrow {
                shape_id,
                x1: origin.x + start.x,
                y1: origin.y + start.y,
                x2: origin.x + end.x,
                y2: origin.y + end.y,
                color,
                from_id,
                to_id,
                text,
            }
        }
    }
}

/// Simplified shapes plus the bounds of the current content (a default viewport when empty).
pub fn summarize(shapes: &[ShapeSpec], bindings: &[BindingSpec]) -> CanvasContext {
    let mut arrow_ends: HashMap<&str, (Option<String>, Option<String>)> = HashMap::new();
    for binding in bindings {
        let entry = arrow_ends.entry(binding.from_id.as_str()).or_default();
        match binding.terminal {
            Terminal::Start => entry.0 = Some(binding.to_id.to_string()),
            Terminal::End => entry.1 = Some(binding.to_id.to_string()),
        }
    }

    let bounds = shapes
        .iter()
        .map(ShapeSpec::bounds)
        .reduce(|acc, rect| acc.union(&rect))
        .unwrap_or(DEFAULT_VIEWPORT);

    CanvasContext { bounds, shapes: shapes.iter().map(|s| simplify(s, &arrow_ends)).collect() }
}
