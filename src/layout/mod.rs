// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layout engines for structural diagram changes.
//!
//! Each engine is a pure function from a diagram spec to a [`LayoutPlan`]: an ordered list of shape
//! and connector placements in absolute canvas coordinates. Engines never touch the canvas; the
//! applier realises plans (and drives the measured table pass, see [`table::TableLayout`]).

pub mod linear;
pub mod matrix;
pub mod table;
pub mod timeline;

use crate::model::{Change, Color, Fill, LabelSize, Point, Rect, ShapeId, ShapeKind};

pub use linear::layout_linear;
pub use matrix::layout_matrix;
pub use table::{fitted_row_height, layout_table, TableLayout, TableRowLayout};
pub use timeline::{layout_timeline, TimeScale};

#[derive(Debug, Clone, PartialEq)]
pub struct ShapePlacement {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub rect: Rect,
    pub label: Option<String>,
    pub color: Color,
    pub fill: Fill,
    pub size: LabelSize,
}

impl ShapePlacement {
    pub fn solid(id: ShapeId, kind: ShapeKind, rect: Rect, color: Color) -> Self {
        Self { id, kind, rect, label: None, color, fill: Fill::Solid, size: LabelSize::M }
    }

    pub fn text(id: ShapeId, origin: Point, text: impl Into<String>, size: LabelSize) -> Self {
        let text = text.into();
        let estimate = crate::model::shape::estimate_text(&text, None);
        Self {
            id,
            kind: ShapeKind::Text,
            rect: Rect::from_origin_size(origin, estimate),
            label: Some(text),
            color: Color::Black,
            fill: Fill::None,
            size,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_size(mut self, size: LabelSize) -> Self {
        self.size = size;
        self
    }
}

/// An arrow between two placed shapes, in absolute coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorPlacement {
    pub id: ShapeId,
    pub from: ShapeId,
    pub to: ShapeId,
    pub start: Point,
    pub end: Point,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlacementOp {
    Shape(ShapePlacement),
    Connector(ConnectorPlacement),
}

impl PlacementOp {
    pub fn id(&self) -> &ShapeId {
        match self {
            PlacementOp::Shape(shape) => &shape.id,
            PlacementOp::Connector(connector) => &connector.id,
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            PlacementOp::Shape(shape) => shape.rect,
            PlacementOp::Connector(connector) => Rect::spanning(connector.start, connector.end),
        }
    }

    fn shift(&mut self, dx: f64, dy: f64) {
        match self {
            PlacementOp::Shape(shape) => {
                shape.rect.x += dx;
                shape.rect.y += dy;
            }
            PlacementOp::Connector(connector) => {
                connector.start = connector.start.offset(dx, dy);
                connector.end = connector.end.offset(dx, dy);
            }
        }
    }
}

/// Input problems an engine recovered from by skipping part of the spec.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutWarning {
    #[error("table row '{row_id}' has {found} cells, expected {expected}; row skipped")]
    RaggedTableRow { row_id: String, expected: usize, found: usize },
    #[error("timeline item '{item_id}' has an unparseable date '{value}'; item skipped")]
    UnparseableDate { item_id: String, value: String },
    #[error("timeline bound '{value}' is unparseable; using the item range")]
    UnparseableBound { value: String },
    #[error("{count} score cell(s) matched no option or criterion")]
    UnresolvedScoreCells { count: usize },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutPlan {
    ops: Vec<PlacementOp>,
    warnings: Vec<LayoutWarning>,
}

impl LayoutPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[PlacementOp] {
        &self.ops
    }

    pub fn warnings(&self) -> &[LayoutWarning] {
        &self.warnings
    }

    pub fn into_parts(self) -> (Vec<PlacementOp>, Vec<LayoutWarning>) {
        (self.ops, self.warnings)
    }

    pub fn shapes(&self) -> impl Iterator<Item = &ShapePlacement> {
        self.ops.iter().filter_map(|op| match op {
            PlacementOp::Shape(shape) => Some(shape),
            PlacementOp::Connector(_) => None,
        })
    }

    pub fn connectors(&self) -> impl Iterator<Item = &ConnectorPlacement> {
        self.ops.iter().filter_map(|op| match op {
            PlacementOp::Connector(connector) => Some(connector),
            PlacementOp::Shape(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Union of every placement's bounds.
    pub fn bounds(&self) -> Option<Rect> {
        self.ops.iter().map(PlacementOp::bounds).reduce(|acc, rect| acc.union(&rect))
    }

    pub(crate) fn push_shape(&mut self, shape: ShapePlacement) {
        self.ops.push(PlacementOp::Shape(shape));
    }

    pub(crate) fn push_connector(&mut self, connector: ConnectorPlacement) {
        self.ops.push(PlacementOp::Connector(connector));
    }

    pub(crate) fn warn(&mut self, warning: LayoutWarning) {
        tracing::debug!(%warning, "layout input skipped");
        self.warnings.push(warning);
    }

    /// Moves the whole plan down so nothing sits above `top`.
    pub(crate) fn keep_below(&mut self, top: f64) {
        let Some(bounds) = self.bounds() else {
            return;
        };
        if bounds.y < top {
            let dy = top - bounds.y;
            for op in &mut self.ops {
                op.shift(0.0, dy);
            }
        }
    }
}

/// Builds scoped shape ids: `shape:<scope>-<local>`, or `shape:<local>` for an empty scope.
///
/// Scoping keeps two applications of the same diagram from colliding on the canvas.
#[derive(Debug, Clone, Copy)]
pub struct IdScope<'a> {
    scope: &'a str,
}

impl<'a> IdScope<'a> {
    pub fn new(scope: &'a str) -> Self {
        Self { scope }
    }

    pub fn shape(&self, local: &str) -> ShapeId {
        if self.scope.is_empty() {
            ShapeId::namespaced(local)
        } else {
            ShapeId::namespaced(format!("{}-{local}", self.scope))
        }
    }
}

/// Lays out a structural change; `None` for shape/binding-level changes.
///
/// Tables come out statically sized here; the applier re-sizes rows against the canvas when
/// measured sizing is requested.
pub fn layout_change(change: &Change, scope: &str) -> Option<LayoutPlan> {
    let scope = IdScope::new(scope);
    match change {
        Change::CreateLinearDiagram(spec) => Some(layout_linear(spec, scope)),
        Change::CreateDecisionMatrix(spec) => Some(layout_matrix(spec, scope)),
        Change::CreateTable(spec) => Some(layout_table(spec, scope)),
        Change::CreateTimeline(spec) => Some(layout_timeline(spec, scope)),
        Change::CreateShape { .. }
        | Change::UpdateShape { .. }
        | Change::DeleteShape { .. }
        | Change::CreateBinding { .. }
        | Change::UpdateBinding { .. }
        | Change::DeleteBinding { .. } => None,
    }
}
