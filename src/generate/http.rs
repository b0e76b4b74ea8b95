// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use async_trait::async_trait;
use reqwest::header::ACCEPT;

use super::{decode_stream, ChangeStream, GenerationError, GenerationRequest, GenerationService};

/// POSTs the request as JSON and reads the response body as a `data:` event stream.
#[derive(Debug, Clone)]
pub struct HttpGenerationService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGenerationService {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self { client, endpoint: endpoint.into() }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GenerationService for HttpGenerationService {
    async fn generate(&self, request: GenerationRequest) -> Result<ChangeStream, GenerationError> {
        tracing::debug!(endpoint = %self.endpoint, artifact = %request.artifact_id, "requesting generation");
        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "text/event-stream")
            .json(&request)
            .send()
            .await
            .map_err(|err| GenerationError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status { status: status.as_u16(), body });
        }
        Ok(decode_stream(response.bytes_stream()))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use futures::StreamExt;

    use super::HttpGenerationService;
    use crate::canvas::summarize;
    use crate::generate::{GenerationError, GenerationRequest, GenerationService};
    use crate::model::{SessionIdentity, Utterance};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{addr}/generate")
    }

    fn request() -> GenerationRequest {
        let utterance = Utterance {
            call_id: "call".into(),
            user: Some("ana".into()),
            content: "we can ship it".into(),
            start: 0.0,
            end: 1.0,
            duration: 1.0,
            emitted_at: 1,
        };
        GenerationRequest {
            artifact_id: utterance.artifact_id().expect("id"),
            prompt: "ana: we can ship it".into(),
            utterance,
            canvas: summarize(&[], &[]),
            session: SessionIdentity::generate(None),
        }
    }

    #[tokio::test]
    async fn streams_changes_from_event_body() {
        let router = Router::new().route(
            "/generate",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["artifactId"], "call-1");
                concat!(
                    "data: {\"type\":\"deleteShape\",\"description\":\"a\",\"shapeId\":\"shape:a\"}\n\n",
                    "data: {\"type\":\"deleteShape\",\"description\":\"b\",\"shapeId\":\"shape:b\"}\n\n",
                    "data: [DONE]\n\n"
                )
            }),
        );
        let service = HttpGenerationService::new(serve(router).await);
        let stream = service.generate(request()).await.expect("stream");
        let changes: Vec<_> = stream.collect().await;
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[1].as_ref().expect("change").description(), "b");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let router = Router::new()
            .route("/generate", post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }));
        let service = HttpGenerationService::new(serve(router).await);
        let err = service.generate(request()).await.err().expect("status error");
        assert!(matches!(err, GenerationError::Status { status: 502, ref body } if body == "upstream down"));
    }
}
