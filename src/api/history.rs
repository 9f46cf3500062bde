use axum::Json;
use axum::extract::State;
use axum::routing::get;
use axum::Router;

use crate::error::AppError;
use crate::models::{CourseHistory, EnrollmentHistory, StudentHistory};
use crate::state::AppState;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/history/courses", get(course_history))
        .route("/history/students", get(student_history))
        .route("/history/enrollments", get(enrollment_history))
}

async fn course_history(State(state): State<AppState>) -> Result<Json<Vec<CourseHistory>>, AppError> {
    Ok(Json(state.registrar.course_history().await?))
}

async fn student_history(State(state): State<AppState>) -> Result<Json<Vec<StudentHistory>>, AppError> {
    Ok(Json(state.registrar.student_history().await?))
}

async fn enrollment_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<EnrollmentHistory>>, AppError> {
    Ok(Json(state.registrar.enrollment_history().await?))
}
