//! crates/recall_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture: storage, time and
//! simulated network latency are injected, and the whole API is itself a trait so
//! the mock can be swapped for a real backend client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Chunk, ReviewSubmission, UserSession};
use crate::protocol::{
    AnalyzeAnswerRequest, AnswerAnalyzed, AuthReply, ConceptsExtracted, CreateSetRequest,
    CreatedSet, EmbeddingsGenerated, ExtractConceptsRequest, LoginRequest, PdfProcessed,
    PrepareTextRequest, RegisterRequest, ReviewQueue, ReviewSaved, SetList, SimilarChunks,
    StatsReply, TextPrepared,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors of the backing store.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Stored document '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// The failures an API operation reports back to its caller.
///
/// The `Display` text is the human-readable message of the failure envelope.
#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    /// Returned for both unknown emails and wrong passwords.
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Email already registered")]
    EmailTaken,
    #[error("User not authenticated")]
    NotAuthenticated,
    #[error("{0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(#[from] PortError),
}

pub type StudyResult<T> = Result<T, StudyError>;

//=========================================================================================
// Infrastructure Ports
//=========================================================================================

/// A string key-value store holding one JSON document per key.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the raw document, or `None` when the key was never written.
    async fn get(&self, key: &str) -> PortResult<Option<String>>;

    async fn put(&self, key: &str, value: String) -> PortResult<()>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> PortResult<()>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The API operations that simulate network latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    Register,
    CreateSet,
    ListSets,
    TodayReviews,
    SaveReview,
    ProcessPdf,
    GenerateEmbeddings,
    Stats,
    PrepareText,
    SimilarChunks,
    AnalyzeAnswer,
    ExtractConcepts,
}

impl Operation {
    /// The artificial round-trip time a real backend would plausibly need.
    pub fn simulated_delay(self) -> Duration {
        let millis = match self {
            Operation::Login => 500,
            Operation::Register => 700,
            Operation::CreateSet => 800,
            Operation::ListSets => 300,
            Operation::TodayReviews => 400,
            Operation::SaveReview => 200,
            Operation::ProcessPdf => 1500,
            Operation::GenerateEmbeddings => 1000,
            Operation::Stats => 300,
            Operation::PrepareText => 300,
            Operation::SimilarChunks => 200,
            Operation::AnalyzeAnswer => 600,
            Operation::ExtractConcepts => 300,
        };
        Duration::from_millis(millis)
    }
}

#[async_trait]
pub trait Latency: Send + Sync {
    /// Waits before `operation` does its work.
    async fn pause(&self, operation: Operation);
}

//=========================================================================================
// The Study API
//=========================================================================================

/// The request/response surface the front end talks to.
#[async_trait]
pub trait StudyApi: Send + Sync {
    // --- Auth ---
    async fn login(&self, request: LoginRequest) -> StudyResult<AuthReply>;

    /// Creates the account and logs it in.
    async fn register(&self, request: RegisterRequest) -> StudyResult<AuthReply>;

    async fn logout(&self) -> StudyResult<()>;

    /// The persisted session, if any. A corrupt session document reads as `None`.
    async fn current_user(&self) -> StudyResult<Option<UserSession>>;

    async fn is_authenticated(&self) -> StudyResult<bool>;

    // --- Study sets ---
    async fn create_set(&self, request: CreateSetRequest) -> StudyResult<CreatedSet>;

    async fn list_sets(&self, user_id: &str) -> StudyResult<SetList>;

    // --- Reviews ---
    async fn load_today_reviews(&self, user_id: &str) -> StudyResult<ReviewQueue>;

    async fn save_review_result(&self, submission: ReviewSubmission) -> StudyResult<ReviewSaved>;

    async fn study_stats(&self, user_id: &str) -> StudyResult<StatsReply>;

    // --- Active recall ---
    /// Scores a free-text answer about a concept. Nothing is persisted.
    async fn analyze_answer(&self, request: AnalyzeAnswerRequest) -> StudyResult<AnswerAnalyzed>;

    async fn extract_concepts(
        &self,
        request: ExtractConceptsRequest,
    ) -> StudyResult<ConceptsExtracted>;

    // --- Document ingestion ---
    async fn process_pdf(&self, file_name: &str) -> StudyResult<PdfProcessed>;

    async fn generate_embeddings(&self, chunks: Vec<Chunk>) -> StudyResult<EmbeddingsGenerated>;

    async fn prepare_text(&self, request: PrepareTextRequest) -> StudyResult<TextPrepared>;

    async fn similar_chunks(&self, limit: usize) -> StudyResult<SimilarChunks>;
}
