// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smallvec::SmallVec;

use crate::model::{Color, LabelSize, Point, Rect, ShapeId, ShapeKind, TableSpec};

use super::{IdScope, LayoutPlan, LayoutWarning, ShapePlacement};

const LINE_HEIGHT: f64 = 24.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TableCellLayout {
    pub id: ShapeId,
    pub x: f64,
    pub width: f64,
    pub label: String,
    pub color: Color,
    pub size: LabelSize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRowLayout {
    /// Index in the input (ragged rows are dropped, so indices may skip).
    pub row_index: usize,
    pub provisional_height: f64,
    pub cells: Vec<TableCellLayout>,
}

/// Column widths and per-row cell geometry, independent of the final row heights.
///
/// The static plan stacks rows at their provisional heights. The measured pass places one row at
/// a time with [`TableLayout::place_row`], measures it on the canvas and advances by
/// [`fitted_row_height`].
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    origin: Point,
    spacing: f64,
    column_widths: SmallVec<[f64; 8]>,
    rows: Vec<TableRowLayout>,
    warnings: Vec<LayoutWarning>,
}

fn band_color(row_index: usize) -> Color {
    if row_index == 0 {
        Color::LightBlue
    } else if row_index % 2 == 0 {
        Color::LightGreen
    } else {
        Color::LightRed
    }
}

impl TableLayout {
    pub fn new(spec: &TableSpec, scope: IdScope<'_>) -> Self {
        let meta = &spec.metadata;
        let origin = spec.start_position.unwrap_or(Point::ORIGIN);
        let base_width = meta.col_width();
        let base_height = meta.row_height();
        let columns = spec.rows.first().map_or(0, |row| row.cells.len());

        let mut warnings = Vec::new();
        let rows_in_shape: Vec<(usize, &crate::model::TableRow)> = spec
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                if row.cells.len() == columns {
                    true
                } else {
                    warnings.push(LayoutWarning::RaggedTableRow {
                        row_id: row.id.clone(),
                        expected: columns,
                        found: row.cells.len(),
                    });
                    false
                }
            })
            .collect();

        let mut column_widths: SmallVec<[f64; 8]> = SmallVec::from_elem(base_width, columns);
        for (_, row) in &rows_in_shape {
            for (width, cell) in column_widths.iter_mut().zip(&row.cells) {
                let len = cell.content.trim().chars().count() as f64;
                *width = width.max(40.0 + 10.0 * len);
            }
        }

        let rows = rows_in_shape
            .into_iter()
            .map(|(row_index, row)| {
                let lines = row
                    .cells
                    .iter()
                    .map(|cell| cell.content.split('\n').count())
                    .max()
                    .unwrap_or(1);
                let mut x = origin.x;
                let cells = row
                    .cells
                    .iter()
                    .zip(&column_widths)
                    .enumerate()
                    .map(|(col_index, (cell, width))| {
                        let layout = TableCellLayout {
                            id: scope.shape(&format!("table-cell-{row_index}-{col_index}")),
                            x,
                            width: *width,
                            label: cell.content.clone(),
                            color: cell.color.unwrap_or_else(|| band_color(row_index)),
                            size: if row_index == 0 { LabelSize::L } else { LabelSize::M },
                        };
                        x += width + meta.spacing();
                        layout
                    })
                    .collect();
                TableRowLayout {
                    row_index,
                    provisional_height: base_height.max(LINE_HEIGHT * lines as f64),
                    cells,
                }
            })
            .collect();

        Self { origin, spacing: meta.spacing(), column_widths, rows, warnings }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn column_widths(&self) -> &[f64] {
        &self.column_widths
    }

    pub fn rows(&self) -> &[TableRowLayout] {
        &self.rows
    }

    pub fn warnings(&self) -> &[LayoutWarning] {
        &self.warnings
    }

    /// Shape placements for one row with its top edge at `y`.
    pub fn place_row(&self, row: &TableRowLayout, y: f64, height: f64) -> Vec<ShapePlacement> {
        row.cells
            .iter()
            .map(|cell| {
                ShapePlacement::solid(
                    cell.id.clone(),
                    ShapeKind::Rectangle,
                    Rect::new(cell.x, y, cell.width, height),
                    cell.color,
                )
                .with_label(cell.label.clone())
                .with_size(cell.size)
            })
            .collect()
    }

    /// Statically sized plan: every row at its provisional height.
    pub fn plan(&self) -> LayoutPlan {
        let mut plan = LayoutPlan::new();
        for warning in &self.warnings {
            plan.warn(warning.clone());
        }
        let mut y = self.origin.y;
        for row in &self.rows {
            for shape in self.place_row(row, y, row.provisional_height) {
                plan.push_shape(shape);
            }
            y += row.provisional_height + self.spacing;
        }
        plan
    }
}

/// Final height of a measured row: the tallest observed cell, never below the provisional height.
pub fn fitted_row_height(provisional: f64, measured: impl IntoIterator<Item = f64>) -> f64 {
    measured
        .into_iter()
        .filter(|h| h.is_finite())
        .fold(provisional, f64::max)
}

pub fn layout_table(spec: &TableSpec, scope: IdScope<'_>) -> LayoutPlan {
    TableLayout::new(spec, scope).plan()
}

#[cfg(test)]
mod tests {
    use super::{fitted_row_height, layout_table, TableLayout};
    use crate::layout::{IdScope, LayoutWarning};
    use crate::model::{Color, LabelSize, TableSpec};

    fn spec() -> TableSpec {
        serde_json::from_value(serde_json::json!({
            "description": "plan",
            "rows": [
                { "id": "h", "cells": [{ "id": "h0", "content": "Task" }, { "id": "h1", "content": "Owner" }] },
                { "id": "r1", "cells": [{ "id": "a", "content": "Write the migration guide" }, { "id": "b", "content": "Ana" }] },
                { "id": "bad", "cells": [{ "id": "x", "content": "ragged" }] },
                { "id": "r3", "cells": [{ "id": "c", "content": "a\nb\nc\nd" }, { "id": "d", "content": "Bo", "color": "violet" }] }
            ],
            "startPosition": { "x": 10, "y": 20 }
        }))
        .expect("table spec")
    }

    #[test]
    fn column_width_tracks_longest_trimmed_text() {
        let layout = TableLayout::new(&spec(), IdScope::new(""));
        // "Write the migration guide" = 25 chars → 40 + 250
        assert_eq!(layout.column_widths(), &[290.0, 120.0]);
    }

    #[test]
    fn ragged_rows_are_skipped_with_a_warning() {
        let layout = TableLayout::new(&spec(), IdScope::new(""));
        let indices: Vec<usize> = layout.rows().iter().map(|row| row.row_index).collect();
        assert_eq!(indices, vec![0, 1, 3]);
        assert_eq!(
            layout.warnings(),
            &[LayoutWarning::RaggedTableRow { row_id: "bad".into(), expected: 2, found: 1 }]
        );
    }

    #[test]
    fn static_plan_stacks_rows_and_bands_colours() {
        let plan = layout_table(&spec(), IdScope::new(""));
        let shapes: Vec<_> = plan.shapes().collect();
        assert_eq!(shapes.len(), 6);

        assert_eq!(shapes[0].id.as_str(), "shape:table-cell-0-0");
        assert_eq!(shapes[0].color, Color::LightBlue);
        assert_eq!(shapes[0].size, LabelSize::L);
        assert_eq!(shapes[1].rect.x, 10.0 + 290.0 + 6.0);

        assert_eq!(shapes[2].rect.y, 20.0 + 80.0 + 6.0);
        assert_eq!(shapes[2].color, Color::LightRed);

        // four lines → 96px
        assert_eq!(shapes[4].id.as_str(), "shape:table-cell-3-0");
        assert_eq!(shapes[4].rect.h, 96.0);
        assert_eq!(shapes[5].color, Color::Violet);
    }

    #[test]
    fn fitted_height_never_shrinks() {
        assert_eq!(fitted_row_height(80.0, [40.0, 60.0]), 80.0);
        assert_eq!(fitted_row_height(80.0, [40.0, 130.0]), 130.0);
        assert_eq!(fitted_row_height(80.0, [f64::NAN]), 80.0);
        assert_eq!(fitted_row_height(80.0, std::iter::empty()), 80.0);
    }

    #[test]
    fn empty_table_has_empty_plan() {
        let spec: TableSpec =
            serde_json::from_value(serde_json::json!({ "rows": [] })).expect("table spec");
        assert!(layout_table(&spec, IdScope::new("")).is_empty());
    }
}
