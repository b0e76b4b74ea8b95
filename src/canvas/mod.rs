// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The canvas surface seam.
//!
//! Naiad never owns the editor document. Everything it writes goes through [`CanvasSurface`];
//! [`MemoryCanvas`] is the in-process implementation used by the binary and the tests.

mod memory;
mod summary;

use async_trait::async_trait;

use crate::model::{BindingId, BindingPatch, BindingSpec, Rect, ShapeId, ShapePatch, ShapeSpec, Size};

pub use memory::MemoryCanvas;
pub use summary::{summarize, CanvasContext, SimpleShape};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanvasError {
    #[error("canvas rejected the operation: {0}")]
    Rejected(String),
    #[error("'{0}' does not exist on the canvas")]
    NotFound(String),
    #[error("'{0}' already exists on the canvas")]
    Duplicate(String),
    #[error("canvas unavailable: {0}")]
    Unavailable(String),
}

/// Narrow editor interface: read the current content, write shapes and bindings, measure.
#[async_trait]
pub trait CanvasSurface: Send + Sync {
    async fn current_shapes(&self) -> Vec<ShapeSpec>;

    async fn current_bindings(&self) -> Vec<BindingSpec> {
        Vec::new()
    }

    /// Rendered bounds of a placed shape (may differ from its declared size once text wraps).
    async fn shape_bounds(&self, id: &ShapeId) -> Option<Rect>;

    async fn create_shape(&self, shape: ShapeSpec) -> Result<(), CanvasError>;

    async fn update_shape(&self, patch: ShapePatch) -> Result<(), CanvasError>;

    async fn delete_shape(&self, id: &ShapeId) -> Result<(), CanvasError>;

    async fn create_binding(&self, binding: BindingSpec) -> Result<(), CanvasError>;

    async fn update_binding(&self, patch: BindingPatch) -> Result<(), CanvasError>;

    async fn delete_binding(&self, id: &BindingId) -> Result<(), CanvasError>;

    /// Size the shape would render at, text included.
    async fn measure(&self, shape: &ShapeSpec) -> Result<Size, CanvasError>;
}

/// Lowest finite bottom edge among the given bounds, `None` for an empty canvas.
pub fn content_bottom(bounds: impl IntoIterator<Item = Rect>) -> Option<f64> {
    bounds.into_iter().map(|rect| rect.bottom()).filter(|edge| edge.is_finite()).reduce(f64::max)
}

#[cfg(test)]
mod tests {
    use super::content_bottom;
    use crate::model::{Rect, ShapeId, ShapeKind, ShapeSpec};

    #[test]
    fn content_bottom_takes_the_lowest_edge() {
        let a = ShapeSpec::new(ShapeId::new("shape:a").expect("id"), ShapeKind::Rectangle, 0.0, 0.0);
        let b = ShapeSpec::new(ShapeId::new("shape:b").expect("id"), ShapeKind::Note, 0.0, 50.0);
        assert_eq!(content_bottom([a.bounds(), b.bounds()]), Some(250.0));
        assert_eq!(content_bottom(Vec::new()), None);
    }

    #[test]
    fn content_bottom_ignores_non_finite_edges() {
        let broken = Rect { x: 0.0, y: f64::NAN, w: 10.0, h: 10.0 };
        let fine = Rect { x: 0.0, y: 40.0, w: 10.0, h: 20.0 };
        assert_eq!(content_bottom([broken, fine]), Some(60.0));
        assert_eq!(content_bottom([broken]), None);
    }
}
