// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{Color, Direction, LinearDiagramSpec, Point, Rect, ShapeKind, Size};

use super::{ConnectorPlacement, IdScope, LayoutPlan, ShapePlacement};

/// Places steps in input order along one axis and chains them with arrows.
///
/// Step `i` sits at `start + i * spacing`; each arrow runs from the trailing edge midpoint of step
/// `i` to the leading edge midpoint of step `i + 1`. Overlaps are not avoided.
pub fn layout_linear(spec: &LinearDiagramSpec, scope: IdScope<'_>) -> LayoutPlan {
    let start = spec.start_position.unwrap_or(Point::ORIGIN);
    let spacing = spec.metadata.spacing();
    let box_w = spec.metadata.box_width();
    let box_h = spec.metadata.box_height();

    let mut plan = LayoutPlan::new();
    let mut boxes = Vec::with_capacity(spec.steps.len());

    for (idx, step) in spec.steps.iter().enumerate() {
        let along = idx as f64 * spacing;
        let origin = match spec.direction {
            Direction::Horizontal => start.offset(along, 0.0),
            Direction::Vertical => start.offset(0.0, along),
        };
        let rect = Rect::from_origin_size(origin, Size::new(box_w, box_h));
        let id = scope.shape(&format!("linear-step-{}", step.id));
        plan.push_shape(
            ShapePlacement::solid(
                id.clone(),
                ShapeKind::Rectangle,
                rect,
                step.color.unwrap_or(Color::Blue),
            )
            .with_label(step.title.clone()),
        );
        boxes.push((id, rect));
    }

    for (pair, steps) in boxes.windows(2).zip(spec.steps.windows(2)) {
        let [(from_id, from), (to_id, to)] = pair else {
            continue;
        };
        let (start, end) = match spec.direction {
            Direction::Horizontal => (
                Point::new(from.right(), from.y + from.h / 2.0),
                Point::new(to.x, to.y + to.h / 2.0),
            ),
            Direction::Vertical => (
                Point::new(from.x + from.w / 2.0, from.bottom()),
                Point::new(to.x + to.w / 2.0, to.y),
            ),
        };
        plan.push_connector(ConnectorPlacement {
            id: scope.shape(&format!("linear-arrow-{}-{}", steps[0].id, steps[1].id)),
            from: from_id.clone(),
            to: to_id.clone(),
            start,
            end,
            color: Color::Black,
        });
    }

    plan
}
