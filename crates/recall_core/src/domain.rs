//! crates/recall_core/src/domain.rs
//!
//! Defines the core records of the study backend.
//! Every record is persisted as part of a JSON document, so the structs carry
//! serde derives with the camelCase field names the stored documents use.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

//=========================================================================================
// Accounts
//=========================================================================================

/// A registered account. The password is kept in plaintext; this backend is a mock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// The logged-in view of a `User`: everything except the password, plus the token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub token: String,
    pub login_at: DateTime<Utc>,
}

impl UserSession {
    /// Derives a session from a user, dropping the password.
    pub fn for_user(user: &User, token: String, login_at: DateTime<Utc>) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            created_at: user.created_at,
            token,
            login_at,
        }
    }
}

//=========================================================================================
// Study Material
//=========================================================================================

/// A single flashcard. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub question: String,
    pub answer: String,
    /// 1 (easy) to 3 (hard).
    pub difficulty: u8,
}

/// A named collection of questions owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudySet {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}

//=========================================================================================
// Reviews
//=========================================================================================

/// A scored answer to one question, as submitted by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmission {
    pub question_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_id: Option<String>,
    /// 1 = poor, 2 = fair, 3 = good, 4 = excellent. Other values leave the interval alone.
    pub score: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_interval: Option<u32>,
}

/// The latest review of one question. Overwritten on every submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewProgress {
    pub question_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_id: Option<String>,
    pub score: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_interval: Option<u32>,
    pub new_interval: u32,
    pub next_review_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Overdue,
    Today,
    Bonus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewPriority {
    Urgent,
    Normal,
    Optional,
}

/// An entry of the "due today" review queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQueueItem {
    pub id: String,
    pub set_id: String,
    pub set_title: String,
    pub questions_count: u32,
    pub status: ReviewStatus,
    /// Negative when the review is not due yet.
    pub days_overdue: i32,
    pub last_score: f64,
    pub current_interval: u32,
    pub priority: ReviewPriority,
    pub next_review: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudyStats {
    pub total_sets: usize,
    pub total_questions: usize,
    pub reviews_completed: usize,
    pub average_score: f64,
    pub study_streak: u32,
    pub weekly_progress: Vec<f64>,
}

//=========================================================================================
// Active Recall
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnswerLevel {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

/// How a free-text answer to a concept question was judged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerAnalysis {
    pub concept: String,
    /// 0 to 100.
    pub score: u8,
    pub level: AnswerLevel,
    /// One line per criterion, in the order they were checked.
    pub feedback: Vec<String>,
    pub mentions_concept: bool,
    pub shows_understanding: bool,
    pub detailed_enough: bool,
}

//=========================================================================================
// Document Ingestion
//=========================================================================================

/// A span of source text with its page and character offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub id: String,
    pub content: String,
    pub page: u32,
    pub start_char: usize,
    pub end_char: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingMetadata {
    pub content: String,
    pub page: u32,
    pub chunk_id: String,
    pub length: usize,
}

/// A fixed-length feature vector tied back to the chunk it was computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingVector {
    pub id: String,
    pub vector: Vec<f32>,
    pub metadata: EmbeddingMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TextChunkKind {
    /// A whole paragraph that fit within the size limit.
    Paragraph,
    /// A piece of a paragraph that had to be split on sentence boundaries.
    SplitParagraph,
}

/// A chunk produced from raw text by the paragraph chunker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TextChunk {
    pub id: String,
    pub content: String,
    pub length: usize,
    pub kind: TextChunkKind,
}

/// Two stored embeddings and how close they are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimilarPair {
    pub first_chunk: String,
    pub second_chunk: String,
    pub similarity: f32,
    pub first_preview: String,
    pub second_preview: String,
}
