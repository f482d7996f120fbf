// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{completions, questions, users},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Question, completion and user routes.
/// * Global middleware: request tracing, CORS, body size limit.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(state.config.cors_allow_origins.as_deref());
    let body_limit = state.config.body_limit_bytes;

    let question_routes = Router::new()
        .route("/questions", get(questions::list_questions))
        .route("/questions/{id}", delete(questions::delete_question))
        .route("/random-questions", get(questions::random_questions))
        .route("/add-question", post(questions::add_question))
        .route(
            "/bulk-upload-questions",
            post(questions::bulk_upload_questions),
        )
        .route("/question/{id}/image", get(questions::question_image));

    let completion_routes = Router::new()
        .route("/complete-question", post(completions::complete_question))
        .route(
            "/user/{id}/completed-questions",
            get(completions::completed_questions),
        );

    let user_routes = Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/{id}", delete(users::delete_user));

    Router::new()
        .merge(question_routes)
        .merge(completion_routes)
        .merge(user_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

/// `None` allows any origin.
fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let allow_origin = match origins {
        None => AllowOrigin::from(Any),
        Some(origins) => {
            let parsed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                        None
                    }
                })
                .collect();
            AllowOrigin::list(parsed)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}
