// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::model::shape::{estimate_text, LINE_HEIGHT};
use crate::model::{
    BindingId, BindingPatch, BindingSpec, Rect, ShapeId, ShapeKind, ShapePatch, ShapeSpec, Size,
};

use super::{CanvasError, CanvasSurface};

/// Inner padding of geometric shapes around their label.
const LABEL_PADDING: f64 = 16.0;

#[derive(Debug, Default)]
struct CanvasState {
    shapes: BTreeMap<ShapeId, ShapeSpec>,
    bindings: BTreeMap<BindingId, BindingSpec>,
    /// Creation order, so reads come back in paint order.
    order: Vec<ShapeId>,
}

/// In-process canvas with estimated text metrics.
///
/// Labels wrap inside their shape, so a rectangle holding long text measures taller than declared.
/// Deleting a shape drops every binding attached to it.
#[derive(Debug, Default)]
pub struct MemoryCanvas {
    state: Mutex<CanvasState>,
}

impl MemoryCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn shape(&self, id: &ShapeId) -> Option<ShapeSpec> {
        self.state.lock().await.shapes.get(id).cloned()
    }

    pub async fn binding(&self, id: &BindingId) -> Option<BindingSpec> {
        self.state.lock().await.bindings.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.shapes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn measure_shape(shape: &ShapeSpec) -> Size {
    let declared = shape.bounds();
    let text = shape.props.text.as_deref().unwrap_or_default();
    match shape.kind {
        ShapeKind::Arrow => declared.size(),
        ShapeKind::Text => {
            let measured = estimate_text(text, shape.props.w);
            Size::new(shape.props.w.unwrap_or(measured.w), measured.h.max(LINE_HEIGHT))
        }
        ShapeKind::Rectangle | ShapeKind::Ellipse | ShapeKind::Note => {
            if text.trim().is_empty() {
                return declared.size();
            }
            let inner = (declared.w - 2.0 * LABEL_PADDING).max(LINE_HEIGHT);
            let label = estimate_text(text, Some(inner));
            Size::new(declared.w, declared.h.max(label.h + 2.0 * LABEL_PADDING))
        }
    }
}

fn check_endpoints(state: &CanvasState, binding: &BindingSpec) -> Result<(), CanvasError> {
    for endpoint in [&binding.from_id, &binding.to_id] {
        if !state.shapes.contains_key(endpoint) {
            return Err(CanvasError::Rejected(format!(
                "binding {} references missing shape {endpoint}",
                binding.id
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl CanvasSurface for MemoryCanvas {
    async fn current_shapes(&self) -> Vec<ShapeSpec> {
        let state = self.state.lock().await;
        state.order.iter().filter_map(|id| state.shapes.get(id).cloned()).collect()
    }

    async fn current_bindings(&self) -> Vec<BindingSpec> {
        self.state.lock().await.bindings.values().cloned().collect()
    }

    async fn shape_bounds(&self, id: &ShapeId) -> Option<Rect> {
        let state = self.state.lock().await;
        let shape = state.shapes.get(id)?;
        let size = measure_shape(shape);
        let declared = shape.bounds();
        Some(Rect::new(declared.x, declared.y, size.w, size.h))
    }

    async fn create_shape(&self, shape: ShapeSpec) -> Result<(), CanvasError> {
        if !shape.id.has_namespace() {
            return Err(CanvasError::Rejected(format!("shape id {} lacks its namespace", shape.id)));
        }
        let mut state = self.state.lock().await;
        if state.shapes.contains_key(&shape.id) {
            return Err(CanvasError::Duplicate(shape.id.to_string()));
        }
        state.order.push(shape.id.clone());
        state.shapes.insert(shape.id.clone(), shape);
        Ok(())
    }

    async fn update_shape(&self, patch: ShapePatch) -> Result<(), CanvasError> {
        let mut state = self.state.lock().await;
        let shape = state
            .shapes
            .get_mut(&patch.id)
            .ok_or_else(|| CanvasError::NotFound(patch.id.to_string()))?;
        patch.apply_to(shape);
        Ok(())
    }

    async fn delete_shape(&self, id: &ShapeId) -> Result<(), CanvasError> {
        let mut state = self.state.lock().await;
        if state.shapes.remove(id).is_none() {
            return Err(CanvasError::NotFound(id.to_string()));
        }
        state.order.retain(|existing| existing != id);
        state.bindings.retain(|_, binding| binding.from_id != *id && binding.to_id != *id);
        Ok(())
    }

    async fn create_binding(&self, binding: BindingSpec) -> Result<(), CanvasError> {
        let mut state = self.state.lock().await;
        if state.bindings.contains_key(&binding.id) {
            return Err(CanvasError::Duplicate(binding.id.to_string()));
        }
        check_endpoints(&state, &binding)?;
        state.bindings.insert(binding.id.clone(), binding);
        Ok(())
    }

    async fn update_binding(&self, patch: BindingPatch) -> Result<(), CanvasError> {
        let mut state = self.state.lock().await;
        let mut updated = state
            .bindings
            .get(&patch.id)
            .cloned()
            .ok_or_else(|| CanvasError::NotFound(patch.id.to_string()))?;
        patch.apply_to(&mut updated);
        check_endpoints(&state, &updated)?;
        state.bindings.insert(updated.id.clone(), updated);
        Ok(())
    }

    async fn delete_binding(&self, id: &BindingId) -> Result<(), CanvasError> {
        let mut state = self.state.lock().await;
        state
            .bindings
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CanvasError::NotFound(id.to_string()))
    }

    async fn measure(&self, shape: &ShapeSpec) -> Result<Size, CanvasError> {
        Ok(measure_shape(shape))
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryCanvas;
    use crate::canvas::{CanvasError, CanvasSurface};
    use crate::model::{
        BindingId, BindingSpec, ShapeId, ShapeKind, ShapePatch, ShapeSpec, Terminal,
    };

    fn id(value: &str) -> ShapeId {
        ShapeId::new(value).expect("shape id")
    }

    fn rect(value: &str, y: f64) -> ShapeSpec {
        let mut shape = ShapeSpec::new(id(value), ShapeKind::Rectangle, 0.0, y);
        shape.props.w = Some(120.0);
        shape.props.h = Some(80.0);
        shape
    }

    #[tokio::test]
    async fn shapes_come_back_in_creation_order() {
        let canvas = MemoryCanvas::new();
        canvas.create_shape(rect("shape:b", 0.0)).await.expect("create b");
        canvas.create_shape(rect("shape:a", 0.0)).await.expect("create a");
        let ids: Vec<String> =
            canvas.current_shapes().await.into_iter().map(|s| s.id.into_string()).collect();
        assert_eq!(ids, vec!["shape:b", "shape:a"]);
    }

    #[tokio::test]
    async fn rejects_duplicates_and_unprefixed_ids() {
        let canvas = MemoryCanvas::new();
        canvas.create_shape(rect("shape:a", 0.0)).await.expect("create");
        assert!(matches!(
            canvas.create_shape(rect("shape:a", 0.0)).await,
            Err(CanvasError::Duplicate(_))
        ));
        assert!(matches!(canvas.create_shape(rect("a", 0.0)).await, Err(CanvasError::Rejected(_))));
    }

    #[tokio::test]
    async fn long_labels_grow_measured_height() {
        let canvas = MemoryCanvas::new();
        let mut shape = rect("shape:a", 10.0);
        shape.props.text = Some("a label that is far too long for one line".into());
        let size = canvas.measure(&shape).await.expect("measure");
        assert_eq!(size.w, 120.0);
        assert!(size.h > 80.0);

        canvas.create_shape(shape).await.expect("create");
        let bounds = canvas.shape_bounds(&id("shape:a")).await.expect("bounds");
        assert_eq!(bounds.h, size.h);
        assert_eq!(bounds.y, 10.0);
    }

    #[tokio::test]
    async fn bindings_require_both_endpoints_and_die_with_them() {
        let canvas = MemoryCanvas::new();
        canvas.create_shape(rect("shape:a", 0.0)).await.expect("a");
        let binding = BindingSpec {
            id: BindingId::new("binding:x").expect("binding id"),
            from_id: id("shape:a"),
            to_id: id("shape:b"),
            terminal: Terminal::End,
        };
        assert!(matches!(
            canvas.create_binding(binding.clone()).await,
            Err(CanvasError::Rejected(_))
        ));

        canvas.create_shape(rect("shape:b", 0.0)).await.expect("b");
        canvas.create_binding(binding.clone()).await.expect("binding");
        canvas.delete_shape(&id("shape:b")).await.expect("delete");
        assert!(canvas.binding(&binding.id).await.is_none());
    }

    #[tokio::test]
    async fn update_missing_shape_is_not_found() {
        let canvas = MemoryCanvas::new();
        let err = canvas.update_shape(ShapePatch::new(id("shape:zz"))).await.unwrap_err();
        assert_eq!(err, CanvasError::NotFound("shape:zz".into()));
    }
}
