//! crates/recall_core/src/service.rs
//!
//! `StudyService` is the mock backend: it implements every `StudyApi` operation on
//! top of the injected document store, clock, latency and random source.
//!
//! Every mutation is a read-whole-document, modify, write-whole-document cycle with
//! no locking. Two interleaved callers can lose an update; the last write wins.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::active_recall;
use crate::chunking::{self, DEFAULT_MAX_CHUNK_CHARS};
use crate::collections::{keys, Collections};
use crate::domain::{
    Chunk, EmbeddingMetadata, EmbeddingVector, ReviewProgress, ReviewSubmission, StudySet,
    StudyStats, User, UserSession,
};
use crate::fixtures::{self, EMBEDDING_DIMENSION, EMBEDDING_MODEL, WEEKLY_PROGRESS};
use crate::generator;
use crate::ports::{
    Clock, DocumentStore, Latency, Operation, PortError, PortResult, StudyApi, StudyError,
    StudyResult,
};
use crate::protocol::{
    AnalyzeAnswerRequest, AnswerAnalyzed, AuthReply, ConceptsExtracted, CreateSetRequest,
    CreatedSet, EmbeddingsGenerated, ExtractConceptsRequest, LoginRequest, PdfProcessed,
    PrepareTextRequest, RegisterRequest, ReviewQueue, ReviewSaved, SetList, SimilarChunks,
    StatsReply, TextPrepared,
};
use crate::scheduling;

type ProgressMap = BTreeMap<String, ReviewProgress>;

pub struct StudyService {
    docs: Collections,
    clock: Arc<dyn Clock>,
    latency: Arc<dyn Latency>,
    rng: Mutex<StdRng>,
}

impl StudyService {
    /// Creates the service. Nothing is written until `seed` runs.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
        latency: Arc<dyn Latency>,
        rng: StdRng,
    ) -> Self {
        Self {
            docs: Collections::new(store),
            clock,
            latency,
            rng: Mutex::new(rng),
        }
    }

    /// Writes the demo data into every document that does not exist yet.
    /// Existing documents are left untouched.
    pub async fn seed(&self) -> PortResult<()> {
        if !self.docs.contains(keys::USERS).await? {
            self.docs.put(keys::USERS, &fixtures::seed_users()).await?;
        }
        if !self.docs.contains(keys::STUDY_SETS).await? {
            self.docs
                .put(keys::STUDY_SETS, &fixtures::seed_study_sets())
                .await?;
        }
        if !self.docs.contains(keys::REVIEW_PROGRESS).await? {
            self.docs.put(keys::REVIEW_PROGRESS, &ProgressMap::new()).await?;
        }
        if !self.docs.contains(keys::PREPARED_CHUNKS).await? {
            self.docs.put(keys::PREPARED_CHUNKS, &Vec::<Chunk>::new()).await?;
        }
        if !self.docs.contains(keys::EMBEDDINGS).await? {
            self.docs
                .put(keys::EMBEDDINGS, &Vec::<EmbeddingVector>::new())
                .await?;
        }
        info!("Seed data in place.");
        Ok(())
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }

    /// Persists a fresh session for `user`, replacing any previous one.
    async fn start_session(&self, user: &User) -> PortResult<AuthReply> {
        let token = format!("mock_token_{}", Uuid::new_v4().simple());
        let session = UserSession::for_user(user, token.clone(), self.clock.now());
        self.docs.put(keys::CURRENT_USER, &session).await?;
        Ok(AuthReply {
            token,
            user_id: user.id.clone(),
            user: session,
        })
    }
}

#[async_trait]
impl StudyApi for StudyService {
    async fn login(&self, request: LoginRequest) -> StudyResult<AuthReply> {
        self.latency.pause(Operation::Login).await;

        let users: Vec<User> = self.docs.list(keys::USERS).await?;
        let Some(user) = users
            .iter()
            .find(|u| u.email == request.email && u.password == request.password)
        else {
            warn!(email = %request.email, "Rejected login attempt.");
            return Err(StudyError::InvalidCredentials);
        };

        let reply = self.start_session(user).await?;
        info!(user_id = %user.id, "User logged in.");
        Ok(reply)
    }

    async fn register(&self, request: RegisterRequest) -> StudyResult<AuthReply> {
        self.latency.pause(Operation::Register).await;

        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(StudyError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let mut users: Vec<User> = self.docs.list(keys::USERS).await?;
        if users.iter().any(|u| u.email == request.email) {
            warn!(email = %request.email, "Registration rejected, email already in use.");
            return Err(StudyError::EmailTaken);
        }

        let name = match request.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => request
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string(),
        };
        let user = User {
            id: format!("u_{}", Uuid::new_v4().simple()),
            email: request.email,
            password: request.password,
            name,
            created_at: self.clock.now(),
        };
        users.push(user.clone());
        self.docs.put(keys::USERS, &users).await?;

        let reply = self.start_session(&user).await?;
        info!(user_id = %user.id, "User registered.");
        Ok(reply)
    }

    async fn logout(&self) -> StudyResult<()> {
        self.docs.remove(keys::CURRENT_USER).await?;
        info!("Session cleared.");
        Ok(())
    }

    async fn current_user(&self) -> StudyResult<Option<UserSession>> {
        match self.docs.get::<UserSession>(keys::CURRENT_USER).await {
            Ok(session) => Ok(session),
            Err(PortError::Corrupt { reason, .. }) => {
                warn!(%reason, "Ignoring unreadable session document.");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn is_authenticated(&self) -> StudyResult<bool> {
        let session = self.current_user().await?;
        Ok(session.is_some_and(|s| !s.token.is_empty()))
    }

    async fn create_set(&self, request: CreateSetRequest) -> StudyResult<CreatedSet> {
        self.latency.pause(Operation::CreateSet).await;

        let Some(session) = self.current_user().await? else {
            return Err(StudyError::NotAuthenticated);
        };
        if request.title.trim().is_empty() {
            return Err(StudyError::Validation("Title is required".to_string()));
        }

        let mut sets: Vec<StudySet> = self.docs.list(keys::STUDY_SETS).await?;
        let batch = Uuid::new_v4().simple().to_string();
        let questions =
            self.with_rng(|rng| generator::generate_questions(&request.content, &batch, rng));
        let set = StudySet {
            id: format!("set_{batch}"),
            user_id: session.id,
            title: request.title,
            questions,
            created_at: self.clock.now(),
        };

        sets.push(set.clone());
        self.docs.put(keys::STUDY_SETS, &sets).await?;
        self.docs.put(keys::CURRENT_STUDY_SET, &set).await?;

        info!(set_id = %set.id, questions = set.questions.len(), "Study set created.");
        Ok(CreatedSet {
            set_id: set.id.clone(),
            set,
        })
    }

    async fn list_sets(&self, user_id: &str) -> StudyResult<SetList> {
        self.latency.pause(Operation::ListSets).await;

        let sets: Vec<StudySet> = self.docs.list(keys::STUDY_SETS).await?;
        let sets = sets.into_iter().filter(|s| s.user_id == user_id).collect();
        Ok(SetList { sets })
    }

    async fn load_today_reviews(&self, user_id: &str) -> StudyResult<ReviewQueue> {
        self.latency.pause(Operation::TodayReviews).await;
        debug!(user_id, "Serving the canned review queue.");
        Ok(ReviewQueue {
            items: fixtures::canned_review_queue(),
        })
    }

    async fn save_review_result(&self, submission: ReviewSubmission) -> StudyResult<ReviewSaved> {
        self.latency.pause(Operation::SaveReview).await;

        if submission.question_id.trim().is_empty() {
            return Err(StudyError::Validation("questionId is required".to_string()));
        }

        let now = self.clock.now();
        let outcome = scheduling::schedule(submission.current_interval, submission.score, now);

        let mut progress: ProgressMap = self
            .docs
            .get(keys::REVIEW_PROGRESS)
            .await?
            .unwrap_or_default();
        let record = ReviewProgress {
            question_id: submission.question_id.clone(),
            set_id: submission.set_id,
            score: submission.score,
            current_interval: submission.current_interval,
            new_interval: outcome.new_interval,
            next_review_date: outcome.next_review_date,
            updated_at: now,
        };
        progress.insert(submission.question_id, record);
        self.docs.put(keys::REVIEW_PROGRESS, &progress).await?;

        info!(new_interval = outcome.new_interval, "Review result saved.");
        Ok(ReviewSaved {
            new_interval: outcome.new_interval,
            next_review_date: outcome.next_review_date,
        })
    }

    async fn study_stats(&self, user_id: &str) -> StudyResult<StatsReply> {
        self.latency.pause(Operation::Stats).await;

        let sets: Vec<StudySet> = self.docs.list(keys::STUDY_SETS).await?;
        let user_sets: Vec<&StudySet> = sets.iter().filter(|s| s.user_id == user_id).collect();
        let progress: ProgressMap = self
            .docs
            .get(keys::REVIEW_PROGRESS)
            .await?
            .unwrap_or_default();

        let reviews_completed = progress.len();
        let average_score = if reviews_completed > 0 {
            let total: i64 = progress.values().map(|p| p.score).sum();
            total as f64 / reviews_completed as f64
        } else {
            0.0
        };

        let stats = StudyStats {
            total_sets: user_sets.len(),
            total_questions: user_sets.iter().map(|s| s.questions.len()).sum(),
            reviews_completed,
            average_score: (average_score * 100.0).round() / 100.0,
            study_streak: self.with_rng(|rng| rng.gen_range(1..=7)),
            weekly_progress: WEEKLY_PROGRESS.to_vec(),
        };
        Ok(StatsReply { stats })
    }

    async fn analyze_answer(&self, request: AnalyzeAnswerRequest) -> StudyResult<AnswerAnalyzed> {
        self.latency.pause(Operation::AnalyzeAnswer).await;

        if request.concept.trim().is_empty() {
            return Err(StudyError::Validation("concept is required".to_string()));
        }
        if request.answer.trim().is_empty() {
            return Err(StudyError::Validation("answer is required".to_string()));
        }

        let analysis = active_recall::analyze_answer(&request.concept, &request.answer);
        info!(concept = %analysis.concept, score = analysis.score, "Answer analyzed.");
        Ok(AnswerAnalyzed { analysis })
    }

    async fn extract_concepts(
        &self,
        request: ExtractConceptsRequest,
    ) -> StudyResult<ConceptsExtracted> {
        self.latency.pause(Operation::ExtractConcepts).await;

        let concepts = active_recall::extract_key_concepts(&request.text);
        debug!(count = concepts.len(), "Key concepts extracted.");
        Ok(ConceptsExtracted { concepts })
    }

    async fn process_pdf(&self, file_name: &str) -> StudyResult<PdfProcessed> {
        self.latency.pause(Operation::ProcessPdf).await;

        let chunks = fixtures::canned_pdf_chunks();
        self.docs.put(keys::PREPARED_CHUNKS, &chunks).await?;

        info!(file_name, chunks = chunks.len(), "PDF processed.");
        Ok(PdfProcessed {
            chunks,
            file_name: file_name.to_string(),
        })
    }

    async fn generate_embeddings(&self, chunks: Vec<Chunk>) -> StudyResult<EmbeddingsGenerated> {
        self.latency.pause(Operation::GenerateEmbeddings).await;

        let vectors: Vec<EmbeddingVector> = self.with_rng(|rng| {
            chunks
                .iter()
                .map(|chunk| EmbeddingVector {
                    id: chunk.id.clone(),
                    vector: (0..EMBEDDING_DIMENSION)
                        .map(|_| rng.gen_range(-1.0f32..=1.0))
                        .collect(),
                    metadata: EmbeddingMetadata {
                        content: chunk.content.clone(),
                        page: chunk.page,
                        chunk_id: chunk.id.clone(),
                        length: chunk.content.chars().count(),
                    },
                })
                .collect()
        });
        self.docs.put(keys::EMBEDDINGS, &vectors).await?;

        info!(vectors = vectors.len(), model = EMBEDDING_MODEL, "Embeddings generated.");
        Ok(EmbeddingsGenerated {
            vectors,
            model: EMBEDDING_MODEL.to_string(),
        })
    }

    async fn prepare_text(&self, request: PrepareTextRequest) -> StudyResult<TextPrepared> {
        self.latency.pause(Operation::PrepareText).await;

        let max_chars = request.max_chars.unwrap_or(DEFAULT_MAX_CHUNK_CHARS);
        if max_chars == 0 {
            return Err(StudyError::Validation("maxChars must be positive".to_string()));
        }

        let chunks = chunking::split_into_chunks(&request.text, max_chars);
        self.docs
            .put(keys::PREPARED_CHUNKS, &chunking::to_page_chunks(&chunks))
            .await?;

        info!(chunks = chunks.len(), "Text prepared.");
        Ok(TextPrepared { chunks })
    }

    async fn similar_chunks(&self, limit: usize) -> StudyResult<SimilarChunks> {
        self.latency.pause(Operation::SimilarChunks).await;

        let vectors: Vec<EmbeddingVector> = self.docs.list(keys::EMBEDDINGS).await?;
        Ok(SimilarChunks {
            pairs: chunking::most_similar_pairs(&vectors, limit),
        })
    }
}
