// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! reqwest implementation of [`BackendApi`].
//!
//! Evidence goes up as multipart/form-data (photo part + coordinate
//! fields); everything else is JSON. Error bodies are expected to carry
//! a `message` field, with field-level detail under `errors` for
//! validation failures.

use crate::backend::{BackendApi, EvidencePayload, RemoteError};
use async_trait::async_trait;
use fw_core::{
    BreakRecordId, CancelReason, Coordinates, ExecutionId, LocationSample, OrderExecution,
    OrderId, ShiftRecord, ShiftRecordId, TrajectoryId, UserId,
};
use serde::Deserialize;

/// Bearer-token client for the workforce backend.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Deserialize)]
struct IdResponse {
    id: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.header("Authorization", format!("Bearer {}", self.token))
    }

    fn evidence_form(evidence: &EvidencePayload) -> Result<reqwest::multipart::Form, RemoteError> {
        let part = reqwest::multipart::Part::bytes(evidence.photo.bytes.clone())
            .file_name(evidence.photo.file_name.clone())
            .mime_str("image/jpeg")
            .map_err(|e| RemoteError::network(e.to_string()))?;
        Ok(reqwest::multipart::Form::new()
            .part("photo", part)
            .text("latitude", evidence.coordinates.latitude.clone())
            .text("longitude", evidence.coordinates.longitude.clone())
            .text("captured_at", evidence.captured_at.clone()))
    }

    /// Turn a settled response into the payload or a [`RemoteError`]
    /// carrying the server's message.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::http(status.as_u16(), extract_message(&body)))
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, RemoteError> {
        let response = self
            .authed(builder)
            .send()
            .await
            .map_err(|e| RemoteError::network(e.to_string()))?;
        Self::check(response).await
    }

    async fn json<T: serde::de::DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, RemoteError> {
        self.send(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|e| RemoteError::network(format!("malformed response: {e}")))
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"message": …}`, `{"error": …}`, or a validation shape
/// `{"errors": {"field": ["problem", …]}}` (joined field-by-field);
/// anything else comes back as the raw body text.
fn extract_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };
    if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
        return message.to_string();
    }
    if let Some(message) = value.get("error").and_then(|m| m.as_str()) {
        return message.to_string();
    }
    if let Some(errors) = value.get("errors").and_then(|e| e.as_object()) {
        let mut parts = Vec::new();
        for (field, problems) in errors {
            let joined = match problems.as_array() {
                Some(list) => list
                    .iter()
                    .filter_map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                None => problems.to_string(),
            };
            parts.push(format!("{field}: {joined}"));
        }
        if !parts.is_empty() {
            return parts.join("; ");
        }
    }
    body.trim().to_string()
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn start_shift(
        &self,
        user_id: &UserId,
        evidence: &EvidencePayload,
    ) -> Result<ShiftRecordId, RemoteError> {
        let form = Self::evidence_form(evidence)?.text("user_id", user_id.to_string());
        let response: IdResponse = self
            .json(self.client.post(self.url("shifts")).multipart(form))
            .await?;
        Ok(ShiftRecordId::new(response.id))
    }

    async fn start_break(
        &self,
        shift_record_id: &ShiftRecordId,
        coordinates: &Coordinates,
    ) -> Result<BreakRecordId, RemoteError> {
        let response: IdResponse = self
            .json(
                self.client
                    .post(self.url(&format!("shifts/{shift_record_id}/breaks")))
                    .json(coordinates),
            )
            .await?;
        Ok(BreakRecordId::new(response.id))
    }

    async fn end_break(
        &self,
        break_record_id: &BreakRecordId,
        coordinates: &Coordinates,
    ) -> Result<(), RemoteError> {
        self.send(
            self.client
                .put(self.url(&format!("breaks/{break_record_id}/end")))
                .json(coordinates),
        )
        .await
        .map(|_| ())
    }

    async fn end_shift(
        &self,
        shift_record_id: &ShiftRecordId,
        evidence: &EvidencePayload,
    ) -> Result<(), RemoteError> {
        let form = Self::evidence_form(evidence)?;
        self.send(
            self.client
                .put(self.url(&format!("shifts/{shift_record_id}/end")))
                .multipart(form),
        )
        .await
        .map(|_| ())
    }

    async fn fetch_shift(&self, user_id: &UserId) -> Result<Option<ShiftRecord>, RemoteError> {
        let result = self
            .json(
                self.client
                    .get(self.url("shifts/today"))
                    .query(&[("user_id", user_id.as_str())]),
            )
            .await;
        match result {
            Ok(shift) => Ok(Some(shift)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn latest_execution(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<OrderExecution>, RemoteError> {
        let result = self
            .json(
                self.client
                    .get(self.url(&format!("orders/{order_id}/executions/latest"))),
            )
            .await;
        match result {
            Ok(execution) => Ok(Some(execution)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn finish_trajectory(
        &self,
        trajectory_id: &TrajectoryId,
        coordinates: &Coordinates,
    ) -> Result<(), RemoteError> {
        self.send(
            self.client
                .put(self.url(&format!("trajectories/{trajectory_id}/finish")))
                .json(coordinates),
        )
        .await
        .map(|_| ())
    }

    async fn begin_execution(
        &self,
        order_id: &OrderId,
        trajectory_id: &TrajectoryId,
        evidence: &EvidencePayload,
    ) -> Result<OrderExecution, RemoteError> {
        let form =
            Self::evidence_form(evidence)?.text("trajectory_id", trajectory_id.to_string());
        self.json(
            self.client
                .post(self.url(&format!("orders/{order_id}/executions")))
                .multipart(form),
        )
        .await
    }

    async fn cancel_execution(
        &self,
        execution_id: &ExecutionId,
        reason: &CancelReason,
        evidence: &EvidencePayload,
    ) -> Result<(), RemoteError> {
        let reason_json = serde_json::to_string(reason)
            .map_err(|e| RemoteError::network(format!("unencodable reason: {e}")))?;
        let form = Self::evidence_form(evidence)?.text("reason", reason_json);
        self.send(
            self.client
                .put(self.url(&format!("executions/{execution_id}/cancel")))
                .multipart(form),
        )
        .await
        .map(|_| ())
    }

    async fn finish_execution(
        &self,
        execution_id: &ExecutionId,
        evidence: &EvidencePayload,
    ) -> Result<(), RemoteError> {
        let form = Self::evidence_form(evidence)?;
        self.send(
            self.client
                .put(self.url(&format!("executions/{execution_id}/finish")))
                .multipart(form),
        )
        .await
        .map(|_| ())
    }

    async fn reopen_execution(
        &self,
        order_id: &OrderId,
        previous: &ExecutionId,
        coordinates: &Coordinates,
    ) -> Result<OrderExecution, RemoteError> {
        self.json(
            self.client
                .post(self.url(&format!("orders/{order_id}/executions/reopen")))
                .json(&serde_json::json!({
                    "previous_execution_id": previous,
                    "coordinates": coordinates,
                })),
        )
        .await
    }

    async fn push_location(
        &self,
        user_id: &UserId,
        sample: &LocationSample,
    ) -> Result<(), RemoteError> {
        self.send(self.client.post(self.url("locations")).json(&serde_json::json!({
            "user_id": user_id,
            "sample": sample,
        })))
        .await
        .map(|_| ())
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
