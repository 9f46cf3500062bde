use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::Router;

use super::non_empty;
use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/enrollments", get(list_active).post(enroll))
        .route("/enrollments/withdraw", patch(withdraw))
        .route("/enrollments/complete", patch(complete))
        .route("/enrollments/reenroll", patch(reenroll))
        .route("/enrollments/student/{id}", get(enrollments_of_student))
        .route("/enrollments/course/{code}", get(enrollments_of_course))
        .route("/enrollments/{id}", get(enrollment_by_id).patch(update_enrollment))
}

async fn enroll(
    State(state): State<AppState>,
    Json(req): Json<EnrollmentRequest>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    let enrollment = state.registrar.enroll(req).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

async fn list_active(State(state): State<AppState>) -> Result<Json<Vec<Enrollment>>, AppError> {
    let enrollments = state.registrar.list_active_enrollments().await?;
    non_empty(enrollments, "no active enrollments")
}

async fn enrollment_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Enrollment>, AppError> {
    Ok(Json(state.registrar.enrollment_by_id(&id).await?))
}

async fn update_enrollment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateEnrollmentRequest>,
) -> Result<Json<Enrollment>, AppError> {
    Ok(Json(state.registrar.update_enrollment(&id, req).await?))
}

async fn enrollments_of_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Enrollment>>, AppError> {
    let enrollments = state.registrar.enrollments_of_student(&id).await?;
    non_empty(enrollments, "student has no enrollments")
}

async fn enrollments_of_course(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Vec<Enrollment>>, AppError> {
    let enrollments = state.registrar.enrollments_of_course(&code).await?;
    non_empty(enrollments, "no students enrolled in this course")
}

async fn withdraw(
    State(state): State<AppState>,
    Json(req): Json<EnrollmentRequest>,
) -> Result<Json<Enrollment>, AppError> {
    Ok(Json(state.registrar.withdraw(req).await?))
}

async fn complete(
    State(state): State<AppState>,
    Json(req): Json<EnrollmentRequest>,
) -> Result<Json<Enrollment>, AppError> {
    Ok(Json(state.registrar.complete(req).await?))
}

async fn reenroll(
    State(state): State<AppState>,
    Json(req): Json<EnrollmentRequest>,
) -> Result<Json<Enrollment>, AppError> {
    Ok(Json(state.registrar.reenroll(req).await?))
}
