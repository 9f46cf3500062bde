mod courses;
mod enrollments;
mod history;
mod students;

use axum::Json;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .merge(courses::routes())
        .merge(students::routes())
        .merge(enrollments::routes())
        .merge(history::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn welcome() -> Json<Value> {
    Json(json!({ "message": "Welcome to the university registrar" }))
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

/// List endpoints answer 404 when nothing matches.
fn non_empty<T>(items: Vec<T>, message: &str) -> Result<Json<Vec<T>>, AppError> {
    if items.is_empty() {
        return Err(AppError::not_found(message));
    }
    Ok(Json(items))
}
