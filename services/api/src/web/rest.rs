//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the study, review and ingestion endpoints and
//! the master definition for the OpenAPI specification.

use crate::web::protocol::{json_body, query_params, Reply};
use crate::web::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query, State,
    },
    Json,
};
use recall_core::chunking::DEFAULT_SIMILAR_PAIRS;
use recall_core::domain::{
    AnswerAnalysis, AnswerLevel, Chunk, EmbeddingMetadata, EmbeddingVector, Question,
    ReviewPriority, ReviewQueueItem, ReviewStatus, ReviewSubmission, SimilarPair, StudySet,
    StudyStats, TextChunk, TextChunkKind, UserSession,
};
use recall_core::protocol::{
    AnalyzeAnswerRequest, AnswerAnalyzed, AuthReply, ConceptsExtracted, CreateSetRequest,
    CreatedSet, CurrentUserReply, EmbeddingsGenerated, ExtractConceptsRequest,
    GenerateEmbeddingsRequest, LoginRequest, PdfProcessed, PrepareTextRequest, ProcessPdfRequest,
    RegisterRequest, ReviewQueue, ReviewSaved, SetList, SimilarChunks, StatsReply, TextPrepared,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::{IntoParams, OpenApi};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::login_handler,
        crate::web::auth::register_handler,
        crate::web::auth::logout_handler,
        crate::web::auth::me_handler,
        create_set_handler,
        list_sets_handler,
        today_reviews_handler,
        save_review_handler,
        stats_handler,
        analyze_answer_handler,
        extract_concepts_handler,
        process_pdf_handler,
        generate_embeddings_handler,
        prepare_text_handler,
        similar_chunks_handler,
    ),
    components(
        schemas(
            LoginRequest, RegisterRequest, AuthReply, CurrentUserReply, UserSession,
            CreateSetRequest, CreatedSet, SetList, StudySet, Question,
            ReviewSubmission, ReviewSaved, ReviewQueue, ReviewQueueItem, ReviewStatus,
            ReviewPriority, StatsReply, StudyStats,
            AnalyzeAnswerRequest, AnswerAnalyzed, AnswerAnalysis, AnswerLevel,
            ExtractConceptsRequest, ConceptsExtracted,
            ProcessPdfRequest, PdfProcessed, Chunk, GenerateEmbeddingsRequest,
            EmbeddingsGenerated, EmbeddingVector, EmbeddingMetadata,
            PrepareTextRequest, TextPrepared, TextChunk, TextChunkKind,
            SimilarChunks, SimilarPair
        )
    ),
    tags(
        (name = "Recall Study API", description = "Mock backend for the flashcard and spaced-repetition client.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Query Parameters
//=========================================================================================

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SimilarQuery {
    /// How many pairs to return (default 3).
    pub limit: Option<usize>,
}

//=========================================================================================
// Study Sets
//=========================================================================================

/// Create a study set from raw material for the logged-in user.
///
/// Requires `Authorization: Bearer <token>` matching the current session.
#[utoipa::path(
    post,
    path = "/sets",
    request_body = CreateSetRequest,
    responses(
        (status = 200, description = "Study set created", body = CreatedSet),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "User not authenticated"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_set_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<UserSession>,
    payload: Result<Json<CreateSetRequest>, JsonRejection>,
) -> Reply<CreatedSet> {
    info!(user_id = %session.id, "Creating a study set.");
    Reply(async { state.api.create_set(json_body(payload)?).await }.await)
}

/// List the study sets owned by a user.
#[utoipa::path(
    get,
    path = "/users/{user_id}/sets",
    params(("user_id" = String, Path, description = "Owner of the sets.")),
    responses(
        (status = 200, description = "The user's sets", body = SetList),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_sets_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Reply<SetList> {
    Reply(state.api.list_sets(&user_id).await)
}

//=========================================================================================
// Reviews
//=========================================================================================

/// The reviews due today for a user.
#[utoipa::path(
    get,
    path = "/users/{user_id}/reviews/today",
    params(("user_id" = String, Path, description = "The reviewing user.")),
    responses(
        (status = 200, description = "Review queue", body = ReviewQueue)
    )
)]
pub async fn today_reviews_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Reply<ReviewQueue> {
    Reply(state.api.load_today_reviews(&user_id).await)
}

/// Record a scored review and schedule the question's next review.
#[utoipa::path(
    post,
    path = "/reviews",
    request_body = ReviewSubmission,
    responses(
        (status = 200, description = "Review saved", body = ReviewSaved),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn save_review_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReviewSubmission>, JsonRejection>,
) -> Reply<ReviewSaved> {
    Reply(async { state.api.save_review_result(json_body(payload)?).await }.await)
}

/// Aggregate study statistics for a user.
#[utoipa::path(
    get,
    path = "/users/{user_id}/stats",
    params(("user_id" = String, Path, description = "The studying user.")),
    responses(
        (status = 200, description = "Statistics", body = StatsReply),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn stats_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Reply<StatsReply> {
    Reply(state.api.study_stats(&user_id).await)
}

//=========================================================================================
// Active Recall
//=========================================================================================

/// Score a free-text answer about a key concept.
#[utoipa::path(
    post,
    path = "/reviews/analyze",
    request_body = AnalyzeAnswerRequest,
    responses(
        (status = 200, description = "Answer analysis", body = AnswerAnalyzed),
        (status = 400, description = "Missing concept or answer")
    )
)]
pub async fn analyze_answer_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeAnswerRequest>, JsonRejection>,
) -> Reply<AnswerAnalyzed> {
    Reply(async { state.api.analyze_answer(json_body(payload)?).await }.await)
}

/// The key concepts of some study material.
#[utoipa::path(
    post,
    path = "/concepts",
    request_body = ExtractConceptsRequest,
    responses(
        (status = 200, description = "Extracted concepts", body = ConceptsExtracted),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn extract_concepts_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExtractConceptsRequest>, JsonRejection>,
) -> Reply<ConceptsExtracted> {
    Reply(async { state.api.extract_concepts(json_body(payload)?).await }.await)
}

//=========================================================================================
// Document Ingestion
//=========================================================================================

/// "Process" a PDF. Always yields the same canned chunks.
#[utoipa::path(
    post,
    path = "/pdf",
    request_body = ProcessPdfRequest,
    responses(
        (status = 200, description = "Chunks prepared", body = PdfProcessed),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn process_pdf_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProcessPdfRequest>, JsonRejection>,
) -> Reply<PdfProcessed> {
    Reply(async { state.api.process_pdf(&json_body(payload)?.file_name).await }.await)
}

/// Attach random embedding vectors to chunks.
#[utoipa::path(
    post,
    path = "/embeddings",
    request_body = GenerateEmbeddingsRequest,
    responses(
        (status = 200, description = "Vectors generated", body = EmbeddingsGenerated),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn generate_embeddings_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateEmbeddingsRequest>, JsonRejection>,
) -> Reply<EmbeddingsGenerated> {
    Reply(async { state.api.generate_embeddings(json_body(payload)?.chunks).await }.await)
}

/// Split raw text into paragraph chunks and store them as the prepared chunks.
#[utoipa::path(
    post,
    path = "/chunks/text",
    request_body = PrepareTextRequest,
    responses(
        (status = 200, description = "Chunks prepared", body = TextPrepared),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn prepare_text_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PrepareTextRequest>, JsonRejection>,
) -> Reply<TextPrepared> {
    Reply(async { state.api.prepare_text(json_body(payload)?).await }.await)
}

/// The most similar pairs among the stored embeddings.
#[utoipa::path(
    get,
    path = "/embeddings/similar",
    params(SimilarQuery),
    responses(
        (status = 200, description = "Ranked pairs", body = SimilarChunks),
        (status = 400, description = "Invalid query")
    )
)]
pub async fn similar_chunks_handler(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SimilarQuery>, QueryRejection>,
) -> Reply<SimilarChunks> {
    Reply(
        async {
            let query = query_params(params)?;
            state
                .api
                .similar_chunks(query.limit.unwrap_or(DEFAULT_SIMILAR_PAIRS))
                .await
        }
        .await,
    )
}
