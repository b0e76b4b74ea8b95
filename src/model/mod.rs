// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model: utterances, buffered artifacts and the diagram change schema.

pub mod artifact;
pub mod change;
pub mod diagram;
pub mod geometry;
pub mod ids;
pub mod session;
pub mod shape;
pub mod utterance;

pub use artifact::{ArtifactPatch, ArtifactStatus, BufferedArtifact, TransitionError};
pub use change::Change;
pub use diagram::{
    Criterion, DecisionMatrixSpec, Direction, IndexConvention, LinearDiagramSpec, LinearStep,
    MatrixOption, ScoreCell, TableCell, TableRow, TableSizing, TableSpec, TimeScaleSetting,
    TimelineItem, TimelineSpec,
};
pub use geometry::{Point, Rect, Size};
pub use ids::{ArtifactId, BindingId, Id, IdError, ShapeId};
pub use session::SessionIdentity;
pub use shape::{
    BindingPatch, BindingSpec, Color, Fill, LabelSize, ShapeKind, ShapePatch, ShapeProps,
    ShapeSpec, Terminal,
};
pub use utterance::Utterance;
