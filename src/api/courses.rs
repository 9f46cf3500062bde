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
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/code/{code}", get(course_by_code))
        .route("/courses/name/{name}", get(course_by_name))
        .route("/courses/credits/{credits}", get(courses_by_credits))
        .route("/courses/credits/{credits}/{code}", get(course_by_credits_and_code))
        .route("/courses/schedule/{schedule}", get(courses_by_schedule))
        .route("/courses/{code}/students", get(students_in_course))
        .route("/courses/{code}/schedule", patch(update_schedule))
        .route("/courses/{code}", axum::routing::delete(delete_course))
}

async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<NewCourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = state.registrar.create_course(req).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    let courses = state.registrar.list_courses().await?;
    non_empty(courses, "no courses registered")
}

async fn course_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Course>, AppError> {
    Ok(Json(state.registrar.course_by_code(&code).await?))
}

async fn course_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Course>, AppError> {
    Ok(Json(state.registrar.course_by_name(&name).await?))
}

async fn courses_by_credits(
    State(state): State<AppState>,
    Path(credits): Path<Credits>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = state.registrar.courses_by_credits(credits).await?;
    non_empty(courses, "no courses with that many credits")
}

async fn course_by_credits_and_code(
    State(state): State<AppState>,
    Path((credits, code)): Path<(Credits, String)>,
) -> Result<Json<Course>, AppError> {
    Ok(Json(state.registrar.course_by_credits_and_code(credits, &code).await?))
}

async fn courses_by_schedule(
    State(state): State<AppState>,
    Path(schedule): Path<ScheduleSlot>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = state.registrar.courses_by_schedule(schedule).await?;
    non_empty(courses, "no courses in that schedule slot")
}

async fn students_in_course(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Vec<Student>>, AppError> {
    let students = state.registrar.students_in_course(&code).await?;
    non_empty(students, "no students enrolled in this course")
}

async fn update_schedule(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<UpdateScheduleRequest>,
) -> Result<Json<Course>, AppError> {
    let course = state.registrar.update_course_schedule(&code, req.schedule).await?;
    Ok(Json(course))
}

async fn delete_course(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<CourseDeletion>, AppError> {
    Ok(Json(state.registrar.delete_course(&code).await?))
}
