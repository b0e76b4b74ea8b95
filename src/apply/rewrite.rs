// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pure pre-apply passes over a change list: anchoring, vertical offset and id namespacing.

use crate::model::{Change, Point};

/// Vertical position new content is anchored at, per change.
///
/// `createShape` contributes the top of its declared bounds (an arrow may reach above its origin),
/// structural diagrams their start position. Updates, deletes and bindings have no anchor.
pub fn anchor_y(change: &Change) -> Option<f64> {
    match change {
        Change::CreateShape { shape, .. } => Some(shape.bounds().y),
        Change::CreateLinearDiagram(spec) => Some(spec.start_position.unwrap_or(Point::ORIGIN).y),
        Change::CreateDecisionMatrix(spec) => {
            Some(spec.start_position.unwrap_or(Point::ORIGIN).y)
        }
        Change::CreateTable(spec) => Some(spec.start_position.unwrap_or(Point::ORIGIN).y),
        Change::CreateTimeline(spec) => Some(spec.start_position.unwrap_or(Point::ORIGIN).y),
        Change::UpdateShape { .. }
        | Change::DeleteShape { .. }
        | Change::CreateBinding { .. }
        | Change::UpdateBinding { .. }
        | Change::DeleteBinding { .. } => None,
    }
}

pub fn min_anchor_y(changes: &[Change]) -> Option<f64> {
    changes.iter().filter_map(anchor_y).filter(|y| y.is_finite()).reduce(f64::min)
}

/// Offset that moves the topmost anchor to `existing_bottom + gap`, or to `empty_top` on an empty
/// canvas. Zero when nothing in the artifact has an anchor.
pub fn insertion_offset(
    existing_bottom: Option<f64>,
    min_anchor: Option<f64>,
    gap: f64,
    empty_top: f64,
) -> f64 {
    let Some(min_anchor) = min_anchor else {
        return 0.0;
    };
    let target_top = existing_bottom.map_or(empty_top, |bottom| bottom + gap);
    target_top - min_anchor
}

/// Gives structural diagrams without a start position one at `(left, 0)`.
pub fn default_anchor(change: &mut Change, left: f64) {
    let start = match change {
        Change::CreateLinearDiagram(spec) => &mut spec.start_position,
        Change::CreateDecisionMatrix(spec) => &mut spec.start_position,
        Change::CreateTable(spec) => &mut spec.start_position,
        Change::CreateTimeline(spec) => &mut spec.start_position,
        _ => return,
    };
    start.get_or_insert(Point::new(left, 0.0));
}

fn shift_start(start: &mut Option<Point>, dy: f64) {
    if let Some(point) = start {
        *point = point.offset(0.0, dy);
    }
}

/// Shifts every vertical coordinate by `dy` and namespaces every shape and binding id.
///
/// Arrow `start`/`end` props are relative to the shape, so only the shape origin moves.
pub fn rewrite(change: Change, dy: f64) -> Change {
    match change {
        Change::CreateShape { description, mut shape } => {
            shape.id = shape.id.with_namespace();
            shape.y += dy;
            Change::CreateShape { description, shape }
        }
        Change::UpdateShape { description, mut shape } => {
            shape.id = shape.id.with_namespace();
            shape.y = shape.y.map(|y| y + dy);
            Change::UpdateShape { description, shape }
        }
        Change::DeleteShape { description, shape_id } => {
            Change::DeleteShape { description, shape_id: shape_id.with_namespace() }
        }
        Change::CreateBinding { description, mut binding } => {
            binding.id = binding.id.with_namespace();
            binding.from_id = binding.from_id.with_namespace();
            binding.to_id = binding.to_id.with_namespace();
            Change::CreateBinding { description, binding }
        }
        Change::UpdateBinding { description, mut binding } => {
            binding.id = binding.id.with_namespace();
            binding.from_id = binding.from_id.map(|id| id.with_namespace());
            binding.to_id = binding.to_id.map(|id| id.with_namespace());
            Change::UpdateBinding { description, binding }
        }
        Change::DeleteBinding { description, binding_id } => {
            Change::DeleteBinding { description, binding_id: binding_id.with_namespace() }
        }
        Change::CreateLinearDiagram(mut spec) => {
            shift_start(&mut spec.start_position, dy);
            Change::CreateLinearDiagram(spec)
        }
        Change::CreateDecisionMatrix(mut spec) => {
            shift_start(&mut spec.start_position, dy);
            Change::CreateDecisionMatrix(spec)
        }
        Change::CreateTable(mut spec) => {
            shift_start(&mut spec.start_position, dy);
            Change::CreateTable(spec)
        }
        Change::CreateTimeline(mut spec) => {
            shift_start(&mut spec.start_position, dy);
            Change::CreateTimeline(spec)
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{default_anchor, insertion_offset, min_anchor_y, rewrite};
    use crate::model::{Change, Point};

    fn change(value: serde_json::Value) -> Change {
        serde_json::from_value(value).expect("change")
    }

    #[rstest]
    #[case(None, Some(0.0), 100.0)]
    #[case(Some(500.0), Some(0.0), 700.0)]
    #[case(Some(500.0), Some(300.0), 400.0)]
    #[case(Some(500.0), None, 0.0)]
    fn offset_targets_gap_below_content(
        #[case] bottom: Option<f64>,
        #[case] anchor: Option<f64>,
        #[case] expected: f64,
    ) {
        assert_eq!(insertion_offset(bottom, anchor, 200.0, 100.0), expected);
    }

    #[test]
    fn anchors_cover_shapes_and_diagrams_only() {
        let changes = vec![
            change(serde_json::json!({
                "type": "createShape", "description": "box",
                "shape": { "id": "a", "type": "rectangle", "x": 0, "y": 40 }
            })),
            change(serde_json::json!({
                "type": "createTable", "description": "t",
                "rows": [], "startPosition": { "x": 0, "y": 25 }
            })),
            change(serde_json::json!({
                "type": "updateShape", "description": "move",
                "shape": { "id": "a", "y": -900 }
            })),
        ];
        assert_eq!(min_anchor_y(&changes), Some(25.0));
    }

    #[test]
    fn rewrite_namespaces_ids_and_shifts_y() {
        let rewritten = rewrite(
            change(serde_json::json!({
                "type": "createShape", "description": "box",
                "shape": { "id": "a", "type": "rectangle", "x": 3, "y": 40 }
            })),
            100.0,
        );
        let Change::CreateShape { shape, .. } = rewritten else {
            panic!("variant changed");
        };
        assert_eq!(shape.id.as_str(), "shape:a");
        assert_eq!((shape.x, shape.y), (3.0, 140.0));

        let rewritten = rewrite(
            change(serde_json::json!({
                "type": "createBinding", "description": "link",
                "binding": { "id": "b", "fromId": "arrow", "toId": "shape:box" }
            })),
            100.0,
        );
        let Change::CreateBinding { binding, .. } = rewritten else {
            panic!("variant changed");
        };
        assert_eq!(binding.id.as_str(), "binding:b");
        assert_eq!(binding.from_id.as_str(), "shape:arrow");
        assert_eq!(binding.to_id.as_str(), "shape:box");
    }

    #[test]
    fn missing_start_is_anchored_then_shifted() {
        let mut table = change(serde_json::json!({
            "type": "createTable", "description": "t", "rows": []
        }));
        default_anchor(&mut table, 100.0);
        let Change::CreateTable(spec) = rewrite(table, 50.0) else {
            panic!("variant changed");
        };
        assert_eq!(spec.start_position, Some(Point::new(100.0, 50.0)));
    }
}
