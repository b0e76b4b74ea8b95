// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Canvas-level shape and binding records as they travel inside changes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::{Point, Rect, Size};
use super::ids::{BindingId, ShapeId};

/// Approximate glyph advance used for text estimates.
pub const CHAR_WIDTH: f64 = 12.0;
/// Approximate line height used for text estimates.
pub const LINE_HEIGHT: f64 = 32.0;

/// Palette colour. Unknown names decode to [`Color::Black`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Color {
    #[default]
    Black,
    Grey,
    LightViolet,
    Violet,
    Blue,
    LightBlue,
    Yellow,
    Orange,
    Green,
    LightGreen,
    LightRed,
    Red,
    White,
}

impl Color {
    pub const ALL: [Color; 13] = [
        Color::Black,
        Color::Grey,
        Color::LightViolet,
        Color::Violet,
        Color::Blue,
        Color::LightBlue,
        Color::Yellow,
        Color::Orange,
        Color::Green,
        Color::LightGreen,
        Color::LightRed,
        Color::Red,
        Color::White,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::Grey => "grey",
            Color::LightViolet => "light-violet",
            Color::Violet => "violet",
            Color::Blue => "blue",
            Color::LightBlue => "light-blue",
            Color::Yellow => "yellow",
            Color::Orange => "orange",
            Color::Green => "green",
            Color::LightGreen => "light-green",
            Color::LightRed => "light-red",
            Color::Red => "red",
            Color::White => "white",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|color| color.as_str().eq_ignore_ascii_case(name))
    }
}

impl From<String> for Color {
    fn from(value: String) -> Self {
        Self::parse(&value).unwrap_or_default()
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fill {
    #[default]
    None,
    Semi,
    Solid,
    Pattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelSize {
    S,
    #[default]
    M,
    L,
    Xl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Text,
    Note,
    Arrow,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Text => "text",
            ShapeKind::Note => "note",
            ShapeKind::Arrow => "arrow",
        }
    }
}

/// Shape properties. Every field is optional so the same record serves as a patch.
///
/// Arrow `start`/`end` are relative to the shape's `x`/`y`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<LabelSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Point>,
}

impl ShapeProps {
    /// Overlays every field set in `patch`.
    pub fn merge(&mut self, patch: &ShapeProps) {
        if patch.w.is_some() {
            self.w = patch.w;
        }
        if patch.h.is_some() {
            self.h = patch.h;
        }
        if patch.color.is_some() {
            self.color = patch.color;
        }
        if patch.fill.is_some() {
            self.fill = patch.fill;
        }
        if patch.text.is_some() {
            self.text.clone_from(&patch.text);
        }
        if patch.size.is_some() {
            self.size = patch.size;
        }
        if patch.start.is_some() {
            self.start = patch.start;
        }
        if patch.end.is_some() {
            self.end = patch.end;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeSpec {
    pub id: ShapeId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub props: ShapeProps,
}

impl ShapeSpec {
    pub fn new(id: ShapeId, kind: ShapeKind, x: f64, y: f64) -> Self {
        Self { id, kind, x, y, props: ShapeProps::default() }
    }

    /// Declared bounds, falling back to per-kind defaults and a text estimate for text shapes.
    pub fn bounds(&self) -> Rect {
        match self.kind {
            ShapeKind::Arrow => {
                let origin = Point::new(self.x, self.y);
                let start = self.props.start.unwrap_or(Point::ORIGIN);
                let end = self.props.end.unwrap_or(Point::ORIGIN);
                Rect::spanning(origin.offset(start.x, start.y), origin.offset(end.x, end.y))
            }
            ShapeKind::Text => {
                let estimate = estimate_text(self.props.text.as_deref().unwrap_or_default(), None);
                let w = self.props.w.unwrap_or(estimate.w);
                Rect::new(self.x, self.y, w, self.props.h.unwrap_or(estimate.h))
            }
            ShapeKind::Note => Rect::new(
                self.x,
                self.y,
                self.props.w.unwrap_or(200.0),
                self.props.h.unwrap_or(200.0),
            ),
            ShapeKind::Rectangle | ShapeKind::Ellipse => Rect::new(
                self.x,
                self.y,
                self.props.w.unwrap_or(100.0),
                self.props.h.unwrap_or(100.0),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapePatch {
    pub id: ShapeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default)]
    pub props: ShapeProps,
}

impl ShapePatch {
    pub fn new(id: ShapeId) -> Self {
        Self { id, x: None, y: None, props: ShapeProps::default() }
    }

    pub fn apply_to(&self, shape: &mut ShapeSpec) {
        if let Some(x) = self.x {
            shape.x = x;
        }
        if let Some(y) = self.y {
            shape.y = y;
        }
        shape.props.merge(&self.props);
    }
}

/// Which end of an arrow a binding attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terminal {
    Start,
    #[default]
    End,
}

/// Attaches an arrow (`from_id`) to a target shape (`to_id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingSpec {
    pub id: BindingId,
    pub from_id: ShapeId,
    pub to_id: ShapeId,
    #[serde(default)]
    pub terminal: Terminal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingPatch {
    pub id: BindingId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_id: Option<ShapeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_id: Option<ShapeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<Terminal>,
}

impl BindingPatch {
    pub fn apply_to(&self, binding: &mut BindingSpec) {
        if let Some(from_id) = &self.from_id {
            binding.from_id = from_id.clone();
        }
        if let Some(to_id) = &self.to_id {
            binding.to_id = to_id.clone();
        }
        if let Some(terminal) = self.terminal {
            binding.terminal = terminal;
        }
    }
}

/// Estimated rendered size of `text`, optionally wrapped at `wrap_width` pixels.
pub fn estimate_text(text: &str, wrap_width: Option<f64>) -> Size {
    let max_chars = wrap_width
        .filter(|w| w.is_finite() && *w >= CHAR_WIDTH)
        .map(|w| (w / CHAR_WIDTH).floor() as usize);

    let mut lines = 0usize;
    let mut widest = 0usize;
    for line in text.split('\n') {
        let len = line.chars().count();
        match max_chars {
            Some(max) if len > max => {
                lines += len.div_ceil(max);
                widest = widest.max(max);
            }
            _ => {
                lines += 1;
                widest = widest.max(len);
            }
        }
    }

    Size::new(widest as f64 * CHAR_WIDTH, lines.max(1) as f64 * LINE_HEIGHT)
}
