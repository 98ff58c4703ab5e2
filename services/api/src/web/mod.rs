pub mod auth;
pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub use auth::{login_handler, logout_handler, me_handler, register_handler};
pub use middleware::require_session;
pub use rest::{
    analyze_answer_handler, create_set_handler, extract_concepts_handler,
    generate_embeddings_handler, list_sets_handler, prepare_text_handler, process_pdf_handler,
    save_review_handler, similar_chunks_handler, stats_handler, today_reviews_handler,
};
use state::AppState;

/// Builds the API router. CORS, body limits and the Swagger UI are layered on by
/// the binary.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/auth/login", post(login_handler))
        .route("/auth/register", post(register_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/auth/me", get(me_handler))
        .route("/users/{user_id}/sets", get(list_sets_handler))
        .route("/users/{user_id}/reviews/today", get(today_reviews_handler))
        .route("/users/{user_id}/stats", get(stats_handler))
        .route("/reviews", post(save_review_handler))
        .route("/reviews/analyze", post(analyze_answer_handler))
        .route("/concepts", post(extract_concepts_handler))
        .route("/pdf", post(process_pdf_handler))
        .route("/embeddings", post(generate_embeddings_handler))
        .route("/embeddings/similar", get(similar_chunks_handler))
        .route("/chunks/text", post(prepare_text_handler));

    // Protected routes (bearer token of the current session required)
    let protected_routes = Router::new()
        .route("/sets", post(create_set_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::SystemClock;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use recall_core::fakes::{MemoryStore, NoLatency};
    use recall_core::StudyService;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn test_app() -> Router {
        let service = StudyService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(SystemClock),
            Arc::new(NoLatency),
            StdRng::seed_from_u64(3),
        );
        service.seed().await.unwrap();
        let state = Arc::new(AppState {
            api: Arc::new(service),
        });
        router(state)
    }

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn login_demo(app: &Router) -> String {
        let (status, body) = call(
            app,
            post_json(
                "/auth/login",
                json!({ "email": "demo@recall.app", "password": "demo123" }),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn login_replies_with_the_success_envelope() {
        let app = test_app().await;
        let (status, body) = call(
            &app,
            post_json(
                "/auth/login",
                json!({ "email": "demo@recall.app", "password": "demo123" }),
                None,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["userId"], "u1");
        assert_eq!(body["user"]["email"], "demo@recall.app");
        assert!(body["user"].get("password").is_none());
        assert_eq!(body["user"]["token"], body["token"]);
    }

    #[tokio::test]
    async fn bad_credentials_reply_with_the_generic_failure() {
        let app = test_app().await;
        let (status, body) = call(
            &app,
            post_json(
                "/auth/login",
                json!({ "email": "demo@recall.app", "password": "wrong" }),
                None,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "ok": false, "error": "Invalid credentials" }));
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let app = test_app().await;
        let (status, body) = call(
            &app,
            post_json(
                "/auth/register",
                json!({ "email": "demo@recall.app", "password": "x" }),
                None,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Email already registered");
    }

    #[tokio::test]
    async fn malformed_bodies_become_validation_failures() {
        let app = test_app().await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/reviews")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"questionId\": "))
            .unwrap();
        let (status, body) = call(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn creating_a_set_needs_the_session_token() {
        let app = test_app().await;
        let set = json!({
            "title": "Immunology",
            "content": "Antibodies are produced by plasma cells. T cells mature in the thymus gland."
        });

        let (status, body) = call(&app, post_json("/sets", set.clone(), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "User not authenticated");

        let (status, _) = call(&app, post_json("/sets", set.clone(), Some("mock_token_bogus"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let token = login_demo(&app).await;
        let (status, created) = call(&app, post_json("/sets", set, Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["set"]["questions"].as_array().unwrap().len(), 2);

        let (status, listed) = call(&app, get_req("/users/u1/sets")).await;
        assert_eq!(status, StatusCode::OK);
        let sets = listed["sets"].as_array().unwrap();
        assert_eq!(sets.len(), 3);
        assert_eq!(sets[2], created["set"]);
    }

    #[tokio::test]
    async fn review_submission_reports_the_new_interval() {
        let app = test_app().await;
        let (status, body) = call(
            &app,
            post_json(
                "/reviews",
                json!({ "questionId": "q6", "setId": "set_2", "score": 4, "currentInterval": 10 }),
                None,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["newInterval"], 13);
        assert!(body["nextReviewDate"].is_string());

        let (_, stats) = call(&app, get_req("/users/u1/stats")).await;
        assert_eq!(stats["stats"]["reviewsCompleted"], 1);
        assert_eq!(stats["stats"]["averageScore"], 4.0);
    }

    #[tokio::test]
    async fn answer_analysis_reports_score_level_and_feedback() {
        let app = test_app().await;
        let (status, body) = call(
            &app,
            post_json(
                "/reviews/analyze",
                json!({ "concept": "Interleaving", "answer": "Interleaving means mixing topics" }),
                None,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analysis"]["score"], 70);
        assert_eq!(body["analysis"]["level"], "good");
        assert_eq!(body["analysis"]["feedback"].as_array().unwrap().len(), 3);
        assert_eq!(body["analysis"]["detailedEnough"], false);

        let (status, body) = call(
            &app,
            post_json("/reviews/analyze", json!({ "concept": "x", "answer": "" }), None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "answer is required");
    }

    #[tokio::test]
    async fn concepts_endpoint_lists_key_concepts() {
        let app = test_app().await;
        let (status, body) = call(
            &app,
            post_json(
                "/concepts",
                json!({ "text": "Active recall and metacognition support long-term memory." }),
                None,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["concepts"],
            json!(["active recall", "metacognition", "long-term memory", "memory"])
        );
    }

    #[tokio::test]
    async fn ingestion_pipeline_runs_end_to_end() {
        let app = test_app().await;

        let (_, processed) = call(&app, post_json("/pdf", json!({ "fileName": "pulp.pdf" }), None)).await;
        assert_eq!(processed["fileName"], "pulp.pdf");
        let chunks = processed["chunks"].clone();
        assert_eq!(chunks.as_array().unwrap().len(), 4);

        let (status, embedded) =
            call(&app, post_json("/embeddings", json!({ "chunks": chunks }), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(embedded["model"], "sentence-transformers/all-MiniLM-L6-v2");
        assert_eq!(embedded["vectors"][0]["vector"].as_array().unwrap().len(), 384);

        let (status, similar) = call(&app, get_req("/embeddings/similar?limit=2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(similar["pairs"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn today_reviews_and_session_lookup() {
        let app = test_app().await;

        let (_, queue) = call(&app, get_req("/users/u1/reviews/today")).await;
        assert_eq!(queue["items"].as_array().unwrap().len(), 3);
        assert_eq!(queue["items"][0]["status"], "overdue");

        let (_, me) = call(&app, get_req("/auth/me")).await;
        assert_eq!(me["authenticated"], false);

        login_demo(&app).await;
        let (_, me) = call(&app, get_req("/auth/me")).await;
        assert_eq!(me["authenticated"], true);

        let (status, out) = call(&app, post_json("/auth/logout", json!({}), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(out, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn text_chunks_endpoint_splits_paragraphs() {
        let app = test_app().await;
        let (status, body) = call(
            &app,
            post_json("/chunks/text", json!({ "text": "One line.\nAnother line." }), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chunks"][1]["id"], "chunk_002");
        assert_eq!(body["chunks"][0]["kind"], "paragraph");
    }
}
