//! crates/recall_core/src/protocol.rs
//!
//! Request and reply payloads of the study API, plus the `{ ok, ... }` envelope
//! every reply is wrapped in once it leaves the service.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AnswerAnalysis, Chunk, EmbeddingVector, ReviewQueueItem, SimilarPair, StudySet, StudyStats,
    TextChunk, UserSession,
};
use crate::ports::StudyResult;

//=========================================================================================
// Requests
//=========================================================================================

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Defaults to the part of the email before the `@`.
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateSetRequest {
    pub title: String,
    /// Raw study material the questions are generated from.
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPdfRequest {
    pub file_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct GenerateEmbeddingsRequest {
    pub chunks: Vec<Chunk>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrepareTextRequest {
    pub text: String,
    #[serde(default)]
    pub max_chars: Option<usize>,
}

/// A student's free-text answer about one concept.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AnalyzeAnswerRequest {
    pub concept: String,
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ExtractConceptsRequest {
    pub text: String,
}

//=========================================================================================
// Replies
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthReply {
    pub token: String,
    pub user_id: String,
    pub user: UserSession,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CurrentUserReply {
    pub authenticated: bool,
    pub user: Option<UserSession>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSet {
    pub set_id: String,
    pub set: StudySet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SetList {
    pub sets: Vec<StudySet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReviewQueue {
    pub items: Vec<ReviewQueueItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSaved {
    pub new_interval: u32,
    pub next_review_date: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PdfProcessed {
    pub chunks: Vec<Chunk>,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmbeddingsGenerated {
    pub vectors: Vec<EmbeddingVector>,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TextPrepared {
    pub chunks: Vec<TextChunk>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SimilarChunks {
    pub pairs: Vec<SimilarPair>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatsReply {
    pub stats: StudyStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnswerAnalyzed {
    pub analysis: AnswerAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConceptsExtracted {
    pub concepts: Vec<String>,
}

//=========================================================================================
// Envelope
//=========================================================================================

/// The uniform reply shape: `{ "ok": true, ...payload }` or `{ "ok": false, "error": "..." }`.
///
/// The payload must serialize as a map (a struct or `()`), since its fields are
/// flattened next to `ok`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub ok: bool,
    #[serde(flatten)]
    pub payload: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn success(payload: T) -> Self {
        Self {
            ok: true,
            payload: Some(payload),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            payload: None,
            error: Some(message.into()),
        }
    }
}

impl<T> From<StudyResult<T>> for Envelope<T> {
    fn from(result: StudyResult<T>) -> Self {
        match result {
            Ok(payload) => Self::success(payload),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::StudyError;
    use serde_json::json;

    #[test]
    fn success_flattens_payload_next_to_ok() {
        let envelope = Envelope::success(SetList { sets: vec![] });
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value, json!({ "ok": true, "sets": [] }));
    }

    #[test]
    fn failure_carries_only_the_message() {
        let envelope: Envelope<SetList> = Err(StudyError::InvalidCredentials).into();
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value, json!({ "ok": false, "error": "Invalid credentials" }));
    }

    #[test]
    fn unit_payload_serializes_as_bare_ok() {
        let value = serde_json::to_value(Envelope::success(())).unwrap();
        assert_eq!(value, json!({ "ok": true }));
    }
}
