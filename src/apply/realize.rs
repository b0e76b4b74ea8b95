// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::canvas::{CanvasError, CanvasSurface};
use crate::layout::{
    fitted_row_height, layout_change, ConnectorPlacement, IdScope, LayoutPlan, PlacementOp,
    ShapePlacement, TableLayout,
};
use crate::model::{
    BindingId, BindingSpec, Change, Point, ShapeKind, ShapePatch, ShapeProps, ShapeSpec, TableSizing,
    TableSpec, Terminal,
};

use super::ApplyReport;

pub(super) fn placement_to_spec(placement: &ShapePlacement) -> ShapeSpec {
    let rect = placement.rect;
    ShapeSpec {
        id: placement.id.clone(),
        kind: placement.kind,
        x: rect.x,
        y: rect.y,
        props: ShapeProps {
            w: Some(rect.w),
            h: Some(rect.h),
            color: Some(placement.color),
            fill: Some(placement.fill),
            text: placement.label.clone(),
            size: Some(placement.size),
            start: None,
            end: None,
        },
    }
}

/// Arrow shape anchored at the connector start plus one binding per end.
fn connector_to_specs(connector: &ConnectorPlacement) -> (ShapeSpec, [BindingSpec; 2]) {
    let mut arrow =
        ShapeSpec::new(connector.id.clone(), ShapeKind::Arrow, connector.start.x, connector.start.y);
    arrow.props.color = Some(connector.color);
    arrow.props.start = Some(Point::ORIGIN);
    arrow.props.end =
        Some(Point::new(connector.end.x - connector.start.x, connector.end.y - connector.start.y));

    let local = connector.id.local_part();
    let bindings = [
        BindingSpec {
            id: BindingId::namespaced(format!("{local}-start")),
            from_id: connector.id.clone(),
            to_id: connector.from.clone(),
            terminal: Terminal::Start,
        },
        BindingSpec {
            id: BindingId::namespaced(format!("{local}-end")),
            from_id: connector.id.clone(),
            to_id: connector.to.clone(),
            terminal: Terminal::End,
        },
    ];
    (arrow, bindings)
}

fn record(report: &mut ApplyReport, target: &str, result: Result<(), CanvasError>) -> bool {
    match result {
        Ok(()) => {
            report.applied += 1;
            true
        }
        Err(err) => {
            tracing::warn!(op = target, error = %err, "canvas operation skipped");
            report.skip(target, err);
            false
        }
    }
}

async fn realize_shape(canvas: &dyn CanvasSurface, shape: ShapeSpec, report: &mut ApplyReport) -> bool {
    let target = shape.id.to_string();
    record(report, &target, canvas.create_shape(shape).await)
}

async fn realize_plan(canvas: &dyn CanvasSurface, plan: LayoutPlan, report: &mut ApplyReport) {
    let (ops, warnings) = plan.into_parts();
    report.warnings.extend(warnings);
    for op in ops {
        match op {
            PlacementOp::Shape(placement) => {
                realize_shape(canvas, placement_to_spec(&placement), report).await;
            }
            PlacementOp::Connector(connector) => {
                let (arrow, bindings) = connector_to_specs(&connector);
                if !realize_shape(canvas, arrow, report).await {
                    continue;
                }
                for binding in bindings {
                    let target = binding.id.to_string();
                    let result = canvas.create_binding(binding).await;
                    record(report, &target, result);
                }
            }
        }
    }
}

/// Two-pass sizing: place each row at its provisional height, measure what the canvas made of
/// it, grow the row to its tallest cell and start the next row below.
async fn realize_measured_table(
    canvas: &dyn CanvasSurface,
    spec: &TableSpec,
    scope: &str,
    report: &mut ApplyReport,
) {
    let layout = TableLayout::new(spec, IdScope::new(scope));
    report.warnings.extend(layout.warnings().iter().cloned());

    let mut y = layout.origin().y;
    for row in layout.rows() {
        let mut placed = Vec::with_capacity(row.cells.len());
        for placement in layout.place_row(row, y, row.provisional_height) {
            let shape = placement_to_spec(&placement);
            if !realize_shape(canvas, shape.clone(), report).await {
                continue;
            }
            let measured = match canvas.measure(&shape).await {
                Ok(size) => Some(size.h),
                Err(err) => {
                    tracing::debug!(shape = %shape.id, error = %err, "measure failed; keeping provisional height");
                    None
                }
            };
            placed.push((shape.id, measured));
        }

        let height =
            fitted_row_height(row.provisional_height, placed.iter().filter_map(|(_, h)| *h));
        if height > row.provisional_height {
            for (id, _) in &placed {
                let mut patch = ShapePatch::new(id.clone());
                patch.props.h = Some(height);
                let result = canvas.update_shape(patch).await;
                record(report, id.as_str(), result);
            }
        }
        y += height + layout.spacing();
    }
}

/// Realises one already rewritten change.
pub(super) async fn realize_change(
    canvas: &dyn CanvasSurface,
    change: &Change,
    scope: &str,
    table_sizing: TableSizing,
    report: &mut ApplyReport,
) {
    match change {
        Change::CreateShape { shape, .. } => {
            realize_shape(canvas, shape.clone(), report).await;
        }
        Change::UpdateShape { shape, .. } => {
            let result = canvas.update_shape(shape.clone()).await;
            record(report, shape.id.as_str(), result);
        }
        Change::DeleteShape { shape_id, .. } => {
            let result = canvas.delete_shape(shape_id).await;
            record(report, shape_id.as_str(), result);
        }
        Change::CreateBinding { binding, .. } => {
            let result = canvas.create_binding(binding.clone()).await;
            record(report, binding.id.as_str(), result);
        }
        Change::UpdateBinding { binding, .. } => {
            let result = canvas.update_binding(binding.clone()).await;
            record(report, binding.id.as_str(), result);
        }
        Change::DeleteBinding { binding_id, .. } => {
            let result = canvas.delete_binding(binding_id).await;
            record(report, binding_id.as_str(), result);
        }
        Change::CreateTable(spec)
            if spec.metadata.sizing.unwrap_or(table_sizing) == TableSizing::Measured =>
        {
            realize_measured_table(canvas, spec, scope, report).await;
        }
        Change::CreateLinearDiagram(_)
        | Change::CreateDecisionMatrix(_)
        | Change::CreateTable(_)
        | Change::CreateTimeline(_) => {
            if let Some(plan) = layout_change(change, scope) {
                realize_plan(canvas, plan, report).await;
            }
        }
    }
}
