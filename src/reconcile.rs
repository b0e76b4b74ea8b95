// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Decision-matrix score reconciliation.
//!
//! Merges a dense score grid (in either index convention) with sparse, name-addressed score
//! observations into one canonical `options × criteria` matrix. Pure and total: unresolvable
//! observations are skipped, never reported as errors.

use std::collections::HashMap;

use crate::model::{Criterion, DecisionMatrixSpec, IndexConvention, MatrixOption, ScoreCell};

/// Canonical dense scores; row = option, column = criterion.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
    skipped_cells: usize,
}

impl ScoreMatrix {
    fn zeroed(rows: usize, cols: usize) -> Self {
        Self { rows, cols, values: vec![0.0; rows * cols], skipped_cells: 0 }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, option: usize, criterion: usize) -> Option<f64> {
        if option < self.rows && criterion < self.cols {
            self.values.get(option * self.cols + criterion).copied()
        } else {
            None
        }
    }

    pub fn row(&self, option: usize) -> Option<&[f64]> {
        if option < self.rows {
            Some(&self.values[option * self.cols..(option + 1) * self.cols])
        } else {
            None
        }
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).filter_map(|i| self.row(i).map(<[f64]>::to_vec)).collect()
    }

    /// Sparse observations that did not resolve on both axes.
    pub fn skipped_cells(&self) -> usize {
        self.skipped_cells
    }

    fn set(&mut self, option: usize, criterion: usize, value: f64) {
        self.values[option * self.cols + criterion] = value;
    }
}

fn clamp_score(value: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.min(max).max(0.0)
    } else {
        0.0
    }
}

fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Id lookup first, then case-insensitive trimmed title. Duplicate keys resolve to the last entry.
struct AxisIndex<'a> {
    by_id: HashMap<&'a str, usize>,
    by_title: HashMap<String, usize>,
}

impl<'a> AxisIndex<'a> {
    fn new(entries: impl Iterator<Item = (&'a str, &'a str)>) -> Self {
        let mut by_id = HashMap::new();
        let mut by_title = HashMap::new();
        for (idx, (id, title)) in entries.enumerate() {
            by_id.insert(id, idx);
            by_title.insert(title_key(title), idx);
        }
        Self { by_id, by_title }
    }

    fn resolve(&self, id: Option<&str>, title: Option<&str>) -> Option<usize> {
        id.and_then(|id| self.by_id.get(id).copied())
            .or_else(|| title.and_then(|title| self.by_title.get(&title_key(title)).copied()))
    }
}

/// Builds the `options.len() × criteria.len()` matrix.
///
/// Dense values are copied positionally (transposed first under
/// [`IndexConvention::RowsAreCriteria`]) and clamped into `[0, max_score]`; sparse cells then
/// overwrite in input order, each clamped into `[0, cell.max]`. Only a missing or non-finite
/// `cell.max` falls back to `max_score`.
pub fn reconcile(
    options: &[MatrixOption],
    criteria: &[Criterion],
    scores: Option<&[Vec<f64>]>,
    score_cells: &[ScoreCell],
    max_score: f64,
    convention: IndexConvention,
) -> ScoreMatrix {
    let rows = options.len();
    let cols = criteria.len();
    if rows == 0 || cols == 0 {
        return ScoreMatrix::zeroed(0, 0);
    }
    let mut matrix = ScoreMatrix::zeroed(rows, cols);

    if let Some(grid) = scores {
        for i in 0..rows {
            for j in 0..cols {
                let raw = match convention {
                    IndexConvention::RowsAreOptions => grid.get(i).and_then(|row| row.get(j)),
                    IndexConvention::RowsAreCriteria => grid.get(j).and_then(|row| row.get(i)),
                };
                if let Some(value) = raw {
                    matrix.set(i, j, clamp_score(*value, max_score));
                }
            }
        }
    }

    if !score_cells.is_empty() {
        let option_index = AxisIndex::new(options.iter().map(|o| (o.id.as_str(), o.title.as_str())));
        let criterion_index =
            AxisIndex::new(criteria.iter().map(|c| (c.id.as_str(), c.title.as_str())));

        for cell in score_cells {
            let option = option_index.resolve(cell.option_id.as_deref(), cell.option_title.as_deref());
            let criterion =
                criterion_index.resolve(cell.criterion_id.as_deref(), cell.criterion_title.as_deref());
            let (Some(i), Some(j)) = (option, criterion) else {
                matrix.skipped_cells += 1;
                continue;
            };
            let denom = match cell.max {
                Some(max) if max.is_finite() => max.max(0.0),
                _ => max_score,
            };
            matrix.set(i, j, clamp_score(cell.value, denom));
        }
    }

    matrix
}

pub fn reconcile_spec(spec: &DecisionMatrixSpec) -> ScoreMatrix {
    reconcile(
        &spec.options,
        &spec.criteria,
        spec.scores.as_deref(),
        &spec.score_cells,
        spec.metadata.max_score(),
        spec.index_convention(),
    )
}
