// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{
    Color, Criterion, DecisionMatrixSpec, LabelSize, MatrixOption, Point, Rect, ShapeKind,
};
use crate::reconcile::{reconcile_spec, ScoreMatrix};

use super::{IdScope, LayoutPlan, LayoutWarning, ShapePlacement};

const TITLE_BAND: f64 = 40.0;
const BLOCK_GAP: f64 = 20.0;

/// Colour band for a score relative to the matrix maximum.
pub fn score_color(score: f64, max_score: f64) -> Color {
    if score >= 0.8 * max_score {
        Color::Green
    } else if score >= 0.6 * max_score {
        Color::Yellow
    } else if score >= 0.4 * max_score {
        Color::Orange
    } else if score >= 1.0 {
        Color::Red
    } else {
        Color::Grey
    }
}

/// `Σ(score·weight) / Σ(weight)` for one option row, 0 when the weights sum to 0.
pub fn weighted_total(row: &[f64], criteria: &[Criterion]) -> f64 {
    let (sum, weight) = row
        .iter()
        .zip(criteria)
        .fold((0.0, 0.0), |(sum, weight), (score, criterion)| {
            let w = criterion.weight();
            (sum + score * w, weight + w)
        });
    if weight > 0.0 {
        sum / weight
    } else {
        0.0
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_owned()
    }
}

fn criterion_label(criterion: &Criterion) -> String {
    match criterion.weight {
        Some(weight) => format!("{}\n(W: {})", criterion.title, format_number(weight)),
        None => criterion.title.clone(),
    }
}

fn option_label(option: &MatrixOption) -> String {
    match option.description.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(description) => format!("{}\n{description}", option.title),
        None => option.title.clone(),
    }
}

/// Pros/cons are keyed by option id or, failing that, by title.
fn remarks_for<'a>(
    map: &'a std::collections::BTreeMap<String, Vec<String>>,
    option: &MatrixOption,
) -> Option<&'a Vec<String>> {
    map.get(&option.id)
        .or_else(|| map.get(&option.title))
        .filter(|items| !items.is_empty())
}

/// Grid of criterion headers, option headers, reconciled score cells and a weighted "Total"
/// column, with an optional title above and pros/cons/notes text blocks below.
pub fn layout_matrix(spec: &DecisionMatrixSpec, scope: IdScope<'_>) -> LayoutPlan {
    let meta = &spec.metadata;
    let start = spec.start_position.unwrap_or(Point::ORIGIN);
    let (cell_w, cell_h) = (meta.cell_width(), meta.cell_height());
    let (gap_x, gap_y) = (meta.spacing_x(), meta.spacing_y());
    let (header_w, header_h) = (meta.header_width(), meta.header_height());
    let max_score = meta.max_score();

    let scores: ScoreMatrix = reconcile_spec(spec);
    let mut plan = LayoutPlan::new();
    if scores.skipped_cells() > 0 {
        plan.warn(LayoutWarning::UnresolvedScoreCells { count: scores.skipped_cells() });
    }

    let mut grid_top = start.y;
    if let Some(title) = meta.title.as_deref().filter(|t| !t.trim().is_empty()) {
        plan.push_shape(ShapePlacement::text(
            scope.shape("decision-matrix-title"),
            start,
            title,
            LabelSize::L,
        ));
        grid_top += TITLE_BAND;
    }

    let column_x = |j: usize| start.x + header_w + j as f64 * (cell_w + gap_x);
    let row_y = |i: usize| grid_top + header_h + i as f64 * (cell_h + gap_y);

    for (j, criterion) in spec.criteria.iter().enumerate() {
        plan.push_shape(
            ShapePlacement::solid(
                scope.shape(&format!("decision-matrix-criterion-{}", criterion.id)),
                ShapeKind::Rectangle,
                Rect::new(column_x(j), grid_top, cell_w, header_h),
                Color::Blue,
            )
            .with_label(criterion_label(criterion)),
        );
    }

    for (i, option) in spec.options.iter().enumerate() {
        plan.push_shape(
            ShapePlacement::solid(
                scope.shape(&format!("decision-matrix-option-{}", option.id)),
                ShapeKind::Rectangle,
                Rect::new(start.x, row_y(i), header_w, cell_h),
                option.color.unwrap_or(Color::Green),
            )
            .with_label(option_label(option)),
        );
    }

    for (i, option) in spec.options.iter().enumerate() {
        for (j, criterion) in spec.criteria.iter().enumerate() {
            let score = scores.get(i, j).unwrap_or(0.0);
            plan.push_shape(
                ShapePlacement::solid(
                    scope.shape(&format!("decision-matrix-score-{}-{}", option.id, criterion.id)),
                    ShapeKind::Rectangle,
                    Rect::new(column_x(j), row_y(i), cell_w, cell_h),
                    score_color(score, max_score),
                )
                .with_label(format_number(score)),
            );
        }
    }

    let total_x = column_x(spec.criteria.len());
    plan.push_shape(
        ShapePlacement::solid(
            scope.shape("decision-matrix-total-header"),
            ShapeKind::Rectangle,
            Rect::new(total_x, grid_top, cell_w, header_h),
            Color::Violet,
        )
        .with_label("Total"),
    );
    for (i, option) in spec.options.iter().enumerate() {
        let total = scores.row(i).map(|row| weighted_total(row, &spec.criteria)).unwrap_or(0.0);
        plan.push_shape(
            ShapePlacement::solid(
                scope.shape(&format!("decision-matrix-total-{}", option.id)),
                ShapeKind::Rectangle,
                Rect::new(total_x, row_y(i), cell_w, cell_h),
                Color::Violet,
            )
            .with_label(format!("{total:.1}")),
        );
    }

    let grid_bottom = if spec.options.is_empty() {
        grid_top + header_h
    } else {
        row_y(spec.options.len() - 1) + cell_h
    };
    let mut cursor = grid_bottom + BLOCK_GAP * 2.0;
    let mut push_block = |plan: &mut LayoutPlan, local: String, text: String| {
        let block =
            ShapePlacement::text(scope.shape(&local), Point::new(start.x, cursor), text, LabelSize::S);
        cursor += block.rect.h + BLOCK_GAP;
        plan.push_shape(block);
    };

    for option in &spec.options {
        if let Some(pros) = remarks_for(&spec.advantages, option) {
            let lines: Vec<String> = pros.iter().map(|p| format!("+ {p}")).collect();
            push_block(
                &mut plan,
                format!("decision-matrix-pros-{}", option.id),
                format!("{} pros:\n{}", option.title, lines.join("\n")),
            );
        }
        if let Some(cons) = remarks_for(&spec.disadvantages, option) {
            let lines: Vec<String> = cons.iter().map(|c| format!("- {c}")).collect();
            push_block(
                &mut plan,
                format!("decision-matrix-cons-{}", option.id),
                format!("{} cons:\n{}", option.title, lines.join("\n")),
            );
        }
    }

    let notes: Vec<&str> =
        spec.notes.iter().map(|n| n.trim()).filter(|n| !n.is_empty()).collect();
    if !notes.is_empty() {
        let lines: Vec<String> = notes.iter().map(|n| format!("• {n}")).collect();
        push_block(
            &mut plan,
            "decision-matrix-notes".to_owned(),
            format!("Notes:\n{}", lines.join("\n")),
        );
    }

    plan
}
