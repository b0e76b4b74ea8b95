// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Generation services: turn a prompt plus canvas context into a stream of changes.

mod event_stream;
mod heuristic;
mod http;
mod prompt;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::Serialize;

use crate::canvas::CanvasContext;
use crate::model::{ArtifactId, Change, SessionIdentity, Utterance};

pub use event_stream::{decode_stream, DecodeError, EventLineDecoder};
pub use heuristic::HeuristicGenerationService;
pub use http::HttpGenerationService;
pub use prompt::{derive_prompt, qualifies};

/// Incremental change events; ends when the service closes the stream.
pub type ChangeStream = BoxStream<'static, Result<Change, GenerationError>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub artifact_id: ArtifactId,
    pub prompt: String,
    pub utterance: Utterance,
    pub canvas: CanvasContext,
    pub session: SessionIdentity,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("generation service answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("generation service failed: {0}")]
    Service(String),
}

impl GenerationError {
    /// A single undecodable event; the rest of the stream is still usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GenerationError::Decode(_))
    }
}

#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<ChangeStream, GenerationError>;
}
