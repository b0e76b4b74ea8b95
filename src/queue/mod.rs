// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Generation queue: turns utterances into buffered artifacts without blocking the caller.
//!
//! `enqueue` only records a `pending` artifact and hands a job to the dispatcher. The dispatcher
//! starts jobs in arrival order, at most `concurrency` at a time; each worker asks the
//! [`GenerationService`] for a change stream and settles the artifact as `generated`, `error`, or
//! drops it when nothing came back. Applying is a separate, explicit step ([`GenerationQueue::apply`]).
//!
//! The artifact buffer is the only shared mutable state. Every transition happens under its lock,
//! and every mutation bumps the revision published through [`GenerationQueue::subscribe`].

mod buffer;

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use futures::StreamExt;
use tokio::sync::{mpsc, watch, Mutex, Semaphore};
use tokio_util::sync::CancellationToken;

use crate::apply::{apply_artifact, ApplyError, ApplyOptions, ApplyReport};
use crate::canvas::{summarize, CanvasSurface};
use crate::generate::{derive_prompt, qualifies, GenerationError, GenerationRequest, GenerationService};
use crate::model::{
    ArtifactId, ArtifactPatch, ArtifactStatus, BufferedArtifact, Change, IdError, SessionIdentity,
    TransitionError, Utterance,
};

pub use buffer::ArtifactBuffer;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueConfig {
    /// Generations allowed in flight at once.
    pub concurrency: usize,
    /// Utterances with fewer words are not enqueued.
    pub min_words: usize,
    pub apply: ApplyOptions,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { concurrency: 1, min_words: 3, apply: ApplyOptions::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Accepted(ArtifactId),
    /// An artifact for this utterance is already buffered.
    Duplicate(ArtifactId),
    /// Too short to be worth a generation.
    Skipped { words: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("artifact {0} is not buffered")]
    NotFound(ArtifactId),
    #[error("cannot {action} artifact {id} while it is {status}")]
    InvalidState { id: ArtifactId, status: ArtifactStatus, action: &'static str },
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Apply(#[from] ApplyError),
    #[error("utterance has no usable identity: {0}")]
    Identity(#[from] IdError),
    #[error("generation queue is shut down")]
    Closed,
}

struct Job {
    id: ArtifactId,
    utterance: Utterance,
    token: CancellationToken,
}

#[derive(Default)]
struct Shared {
    buffer: ArtifactBuffer,
    /// Cancellation handles of jobs that have not settled yet.
    inflight: HashMap<ArtifactId, CancellationToken>,
}

struct Inner {
    state: Mutex<Shared>,
    service: Arc<dyn GenerationService>,
    canvas: Arc<dyn CanvasSurface>,
    session: SessionIdentity,
    config: QueueConfig,
    jobs: mpsc::UnboundedSender<Job>,
    revision: watch::Sender<u64>,
}

#[derive(Clone)]
pub struct GenerationQueue {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for GenerationQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationQueue")
            .field("session", &self.inner.session.id)
            .field("config", &self.inner.config)
            .field("revision", &*self.inner.revision.borrow())
            .finish_non_exhaustive()
    }
}

impl GenerationQueue {
    /// Starts the dispatcher; must be called from within a tokio runtime.
    ///
    /// The dispatcher stops once the last handle is dropped.
    pub fn new(
        service: Arc<dyn GenerationService>,
        canvas: Arc<dyn CanvasSurface>,
        session: SessionIdentity,
        config: QueueConfig,
    ) -> Self {
        let (jobs, receiver) = mpsc::unbounded_channel();
        let (revision, _) = watch::channel(0);
        let permits = Arc::new(Semaphore::new(config.concurrency.max(1)));
        let inner = Arc::new(Inner {
            state: Mutex::new(Shared::default()),
            service,
            canvas,
            session,
            config,
            jobs,
            revision,
        });
        tokio::spawn(dispatch(Arc::downgrade(&inner), receiver, permits));
        Self { inner }
    }

    pub fn session(&self) -> &SessionIdentity {
        &self.inner.session
    }

    pub fn config(&self) -> &QueueConfig {
        &self.inner.config
    }

    pub fn canvas(&self) -> &Arc<dyn CanvasSurface> {
        &self.inner.canvas
    }

    /// Revision counter, bumped on every buffer mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.inner.revision.borrow()
    }

    /// Records a `pending` artifact for the utterance and schedules its generation.
    pub async fn enqueue(&self, utterance: Utterance) -> Result<EnqueueOutcome, QueueError> {
        if !qualifies(&utterance, self.inner.config.min_words) {
            let words = utterance.word_count();
            tracing::debug!(call = %utterance.call_id, words, "utterance too short; skipped");
            return Ok(EnqueueOutcome::Skipped { words });
        }
        let id = utterance.artifact_id()?;
        let mut state = self.inner.state.lock().await;
        if state.buffer.contains(&id) {
            tracing::debug!(artifact = %id, "utterance redelivered; ignored");
            return Ok(EnqueueOutcome::Duplicate(id));
        }
        self.inner.submit(&mut state, id.clone(), utterance)?;
        drop(state);
        self.inner.bump();
        Ok(EnqueueOutcome::Accepted(id))
    }

    /// Aborts a waiting or running generation and drops its artifact.
    pub async fn cancel(&self, id: &ArtifactId) -> Result<(), QueueError> {
        let mut state = self.inner.state.lock().await;
        let status = state.buffer.get(id).map(BufferedArtifact::status);
        match status {
            None => return Err(QueueError::NotFound(id.clone())),
            Some(ArtifactStatus::Pending) => {}
            Some(status) => {
                return Err(QueueError::InvalidState { id: id.clone(), status, action: "cancel" })
            }
        }
        if let Some(token) = state.inflight.remove(id) {
            token.cancel();
        }
        state.buffer.remove(id);
        drop(state);
        tracing::info!(artifact = %id, "generation cancelled");
        self.inner.bump();
        Ok(())
    }

    /// Re-runs the generation of a failed artifact.
    pub async fn retry(&self, id: &ArtifactId) -> Result<(), QueueError> {
        let mut state = self.inner.state.lock().await;
        let artifact = state.buffer.get(id).ok_or_else(|| QueueError::NotFound(id.clone()))?;
        if artifact.status() != ArtifactStatus::Error {
            return Err(QueueError::InvalidState {
                id: id.clone(),
                status: artifact.status(),
                action: "retry",
            });
        }
        let source = artifact.source().clone();
        state.buffer.remove(id);
        self.inner.submit(&mut state, id.clone(), source)?;
        drop(state);
        tracing::info!(artifact = %id, "generation retried");
        self.inner.bump();
        Ok(())
    }

    /// Snapshot of the buffer in arrival order.
    pub async fn artifacts(&self) -> Vec<BufferedArtifact> {
        self.inner.state.lock().await.buffer.list().to_vec()
    }

    pub async fn artifact(&self, id: &ArtifactId) -> Option<BufferedArtifact> {
        self.inner.state.lock().await.buffer.get(id).cloned()
    }

    pub async fn update_diagram(
        &self,
        id: &ArtifactId,
        patch: ArtifactPatch,
    ) -> Result<BufferedArtifact, QueueError> {
        let mut state = self.inner.state.lock().await;
        match state.buffer.update(id, patch) {
            None => return Err(QueueError::NotFound(id.clone())),
            Some(result) => result?,
        }
        let updated = state.buffer.get(id).cloned().ok_or_else(|| QueueError::NotFound(id.clone()))?;
        drop(state);
        self.inner.bump();
        Ok(updated)
    }

    /// Discards an artifact in any status, cancelling its generation if one is running.
    pub async fn remove_diagram(&self, id: &ArtifactId) -> Result<BufferedArtifact, QueueError> {
        let mut state = self.inner.state.lock().await;
        let removed = state.buffer.remove(id).ok_or_else(|| QueueError::NotFound(id.clone()))?;
        if let Some(token) = state.inflight.remove(id) {
            token.cancel();
        }
        drop(state);
        tracing::debug!(artifact = %id, status = %removed.status(), "artifact discarded");
        self.inner.bump();
        Ok(removed)
    }

    /// Discards every artifact; returns how many were buffered.
    pub async fn clear_diagrams(&self) -> usize {
        let mut state = self.inner.state.lock().await;
        for (_, token) in state.inflight.drain() {
            token.cancel();
        }
        let cleared = state.buffer.clear().len();
        drop(state);
        tracing::debug!(cleared, "artifact buffer cleared");
        self.inner.bump();
        cleared
    }

    /// Applies a `generated` artifact to the canvas and removes it from the buffer.
    pub async fn apply(&self, id: &ArtifactId) -> Result<ApplyReport, QueueError> {
        let snapshot = {
            let mut state = self.inner.state.lock().await;
            let artifact = state.buffer.get(id).ok_or_else(|| QueueError::NotFound(id.clone()))?;
            if artifact.status() != ArtifactStatus::Generated {
                return Err(ApplyError::NotGenerated { id: id.clone(), status: artifact.status() }
                    .into());
            }
            let snapshot = artifact.clone();
            // Claim it so a concurrent apply sees `applied`.
            if let Some(result) = state.buffer.modify(id, BufferedArtifact::mark_applied) {
                result?;
            }
            snapshot
        };
        self.inner.bump();

        let report =
            apply_artifact(&snapshot, self.inner.canvas.as_ref(), &self.inner.config.apply).await;

        self.inner.state.lock().await.buffer.remove(id);
        self.inner.bump();
        Ok(report?)
    }
}

impl Inner {
    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    fn submit(
        &self,
        state: &mut Shared,
        id: ArtifactId,
        utterance: Utterance,
    ) -> Result<(), QueueError> {
        let token = CancellationToken::new();
        let job = Job { id: id.clone(), utterance: utterance.clone(), token: token.clone() };
        if self.jobs.send(job).is_err() {
            return Err(QueueError::Closed);
        }
        state.buffer.add(BufferedArtifact::pending(id.clone(), utterance));
        state.inflight.insert(id.clone(), token);
        tracing::info!(artifact = %id, "generation queued");
        Ok(())
    }

    async fn request(&self, job: &Job) -> GenerationRequest {
        let shapes = self.canvas.current_shapes().await;
        let bindings = self.canvas.current_bindings().await;
        GenerationRequest {
            artifact_id: job.id.clone(),
            prompt: derive_prompt(&job.utterance),
            utterance: job.utterance.clone(),
            canvas: summarize(&shapes, &bindings),
            session: self.session.clone(),
        }
    }

    async fn generate(&self, job: &Job) -> Result<Vec<Change>, GenerationError> {
        let request = self.request(job).await;
        let mut stream = self.service.generate(request).await?;
        let mut changes = Vec::new();
        while let Some(event) = stream.next().await {
            match event {
                Ok(change) => changes.push(change),
                Err(err) if err.is_recoverable() => {
                    tracing::warn!(artifact = %job.id, error = %err, "skipping undecodable change event");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(changes)
    }

    async fn run(&self, job: Job) {
        tracing::debug!(artifact = %job.id, "generation started");
        let outcome = tokio::select! {
            () = job.token.cancelled() => {
                tracing::debug!(artifact = %job.id, "generation abandoned");
                return;
            }
            outcome = self.generate(&job) => outcome,
        };
        self.settle(job, outcome).await;
    }

    async fn settle(&self, job: Job, outcome: Result<Vec<Change>, GenerationError>) {
        let mut state = self.state.lock().await;
        if job.token.is_cancelled() {
            return;
        }
        state.inflight.remove(&job.id);

        let id = &job.id;
        let settled = match outcome {
            Ok(changes) if changes.is_empty() => {
                tracing::info!(artifact = %id, "generation produced no changes; discarded");
                state.buffer.remove(id).map(|_| Ok(()))
            }
            Ok(changes) => {
                let count = changes.len();
                let result = state.buffer.modify(id, |artifact| artifact.mark_generated(changes));
                if matches!(result, Some(Ok(()))) {
                    tracing::info!(artifact = %id, changes = count, "generation finished");
                }
                result
            }
            Err(err) => {
                tracing::warn!(artifact = %id, error = %err, "generation failed");
                state.buffer.modify(id, |artifact| artifact.mark_failed(err.to_string()))
            }
        };
        drop(state);

        match settled {
            Some(Ok(())) => self.bump(),
            Some(Err(err)) => tracing::debug!(artifact = %id, error = %err, "late result dropped"),
            None => tracing::debug!(artifact = %id, "artifact gone before generation settled"),
        }
    }
}

/// Starts jobs strictly in arrival order, each once a concurrency permit is free.
async fn dispatch(
    inner: Weak<Inner>,
    mut jobs: mpsc::UnboundedReceiver<Job>,
    permits: Arc<Semaphore>,
) {
    while let Some(job) = jobs.recv().await {
        let permit = tokio::select! {
            () = job.token.cancelled() => continue,
            permit = Arc::clone(&permits).acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => break,
            },
        };
        let Some(inner) = inner.upgrade() else {
            break;
        };
        tokio::spawn(async move {
            inner.run(job).await;
            drop(permit);
        });
    }
}
