// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Structural diagram descriptions: linear chains, decision matrices, tables and timelines.
//!
//! Specs are decoded leniently: metadata values are optional and non-positive sizes fall back to
//! their defaults, numeric score inputs that are not numbers decode as `NaN` and are dropped by the
//! reconciler instead of failing the whole change.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::geometry::Point;
use super::shape::Color;

fn positive_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => default,
    }
}

fn non_negative_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => default,
    }
}

fn lenient_number(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

fn de_lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(lenient_number(&raw))
}

fn de_lenient_grid<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<Vec<f64>>>, D::Error> {
    let raw = Option::<Vec<Vec<serde_json::Value>>>::deserialize(deserializer)?;
    Ok(raw.map(|rows| rows.iter().map(|row| row.iter().map(lenient_number).collect()).collect()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Horizontal,
    Vertical,
}

// ---------------------------------------------------------------------------------------------
// Linear diagram

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearStep {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_height: Option<f64>,
}

impl LinearMetadata {
    pub fn spacing(&self) -> f64 {
        positive_or(self.spacing, 180.0)
    }

    pub fn box_width(&self) -> f64 {
        positive_or(self.box_width, 120.0)
    }

    pub fn box_height(&self) -> f64 {
        positive_or(self.box_height, 80.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearDiagramSpec {
    #[serde(default)]
    pub description: String,
    pub steps: Vec<LinearStep>,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_position: Option<Point>,
    #[serde(default)]
    pub metadata: LinearMetadata,
}

// ---------------------------------------------------------------------------------------------
// Decision matrix

/// Orientation of a dense `scores` grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndexConvention {
    /// `scores[criterion][option]`; transposed before use.
    RowsAreCriteria,
    /// `scores[option][criterion]`.
    #[default]
    RowsAreOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixOption {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl Criterion {
    /// Effective weight: missing or non-finite is 1, negative is 0.
    pub fn weight(&self) -> f64 {
        match self.weight {
            Some(w) if w.is_finite() => w.max(0.0),
            _ => 1.0,
        }
    }
}

/// A sparse score observation addressed by id or by title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criterion_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criterion_title: Option<String>,
    #[serde(deserialize_with = "de_lenient_number")]
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_convention: Option<IndexConvention>,
}

impl MatrixMetadata {
    pub fn cell_width(&self) -> f64 {
        positive_or(self.cell_width, 100.0)
    }

    pub fn cell_height(&self) -> f64 {
        positive_or(self.cell_height, 60.0)
    }

    pub fn spacing_x(&self) -> f64 {
        non_negative_or(self.spacing_x, 20.0)
    }

    pub fn spacing_y(&self) -> f64 {
        non_negative_or(self.spacing_y, 20.0)
    }

    pub fn header_height(&self) -> f64 {
        positive_or(self.header_height, 40.0)
    }

    pub fn header_width(&self) -> f64 {
        positive_or(self.header_width, 120.0)
    }

    pub fn max_score(&self) -> f64 {
        positive_or(self.max_score, 5.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionMatrixSpec {
    #[serde(default)]
    pub description: String,
    pub options: Vec<MatrixOption>,
    pub criteria: Vec<Criterion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub score_cells: Vec<ScoreCell>,
    #[serde(default, deserialize_with = "de_lenient_grid", skip_serializing_if = "Option::is_none")]
    pub scores: Option<Vec<Vec<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_convention: Option<IndexConvention>,
    /// Option id or title → pros.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub advantages: BTreeMap<String, Vec<String>>,
    /// Option id or title → cons.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub disadvantages: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_position: Option<Point>,
    #[serde(default)]
    pub metadata: MatrixMetadata,
}

impl DecisionMatrixSpec {
    /// The top-level convention wins over the metadata one.
    pub fn index_convention(&self) -> IndexConvention {
        self.index_convention.or(self.metadata.index_convention).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------------------------
// Table

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableSizing {
    Static,
    #[default]
    Measured,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub id: String,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizing: Option<TableSizing>,
}

impl TableMetadata {
    pub fn col_width(&self) -> f64 {
        positive_or(self.col_width, 120.0)
    }

    pub fn row_height(&self) -> f64 {
        positive_or(self.row_height, 80.0)
    }

    pub fn spacing(&self) -> f64 {
        non_negative_or(self.spacing, 6.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSpec {
    #[serde(default)]
    pub description: String,
    pub rows: Vec<TableRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_position: Option<Point>,
    #[serde(default)]
    pub metadata: TableMetadata,
}

// ---------------------------------------------------------------------------------------------
// Timeline

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeScaleSetting {
    #[default]
    Auto,
    Days,
    Weeks,
    Months,
    Years,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineItem {
    pub id: String,
    pub title: String,
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lane: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineMetadata {
    #[serde(default)]
    pub scale: TimeScaleSetting,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v_spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lane_spacing: Option<f64>,
}

impl TimelineMetadata {
    pub fn item_height(&self) -> f64 {
        positive_or(self.item_height, 40.0)
    }

    /// Bar thickness across the time axis.
    pub fn item_width(&self, layout: Direction) -> f64 {
        let default = match layout {
            Direction::Horizontal => self.item_height(),
            Direction::Vertical => 16.0,
        };
        positive_or(self.item_width, default)
    }

    pub fn v_spacing(&self) -> f64 {
        non_negative_or(self.v_spacing, 120.0)
    }

    pub fn lane_spacing(&self) -> f64 {
        non_negative_or(self.lane_spacing, 60.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSpec {
    #[serde(default)]
    pub description: String,
    pub items: Vec<TimelineItem>,
    #[serde(default)]
    pub layout: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_position: Option<Point>,
    #[serde(default)]
    pub metadata: TimelineMetadata,
}
