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
        .route("/students", get(list_students).post(create_student))
        .route("/students/id/{id}", get(student_by_id))
        .route("/students/email/{email}", get(student_by_email))
        .route("/students/name/{name}", get(student_by_name))
        .route("/students/semester/{semester}", get(students_by_semester))
        .route("/students/semester/{semester}/{email}", get(student_by_semester_and_email))
        .route("/students/{id}/courses", get(courses_of_student))
        .route("/students/{id}/semester", patch(update_semester))
        .route("/students/{id}", axum::routing::delete(delete_student))
}

async fn create_student(
    State(state): State<AppState>,
    Json(req): Json<NewStudentRequest>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = state.registrar.create_student(req).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<Student>>, AppError> {
    let students = state.registrar.list_students().await?;
    non_empty(students, "no students registered")
}

async fn student_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Student>, AppError> {
    Ok(Json(state.registrar.student_by_id(&id).await?))
}

async fn student_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Student>, AppError> {
    Ok(Json(state.registrar.student_by_email(&email).await?))
}

async fn student_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Student>, AppError> {
    Ok(Json(state.registrar.student_by_name(&name).await?))
}

async fn students_by_semester(
    State(state): State<AppState>,
    Path(semester): Path<Semester>,
) -> Result<Json<Vec<Student>>, AppError> {
    let students = state.registrar.students_by_semester(semester).await?;
    non_empty(students, "no students in that semester")
}

async fn student_by_semester_and_email(
    State(state): State<AppState>,
    Path((semester, email)): Path<(Semester, String)>,
) -> Result<Json<Student>, AppError> {
    Ok(Json(state.registrar.student_by_semester_and_email(semester, &email).await?))
}

async fn courses_of_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = state.registrar.courses_of_student(&id).await?;
    non_empty(courses, "student has no courses")
}

async fn update_semester(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateSemesterRequest>,
) -> Result<Json<Student>, AppError> {
    let student = state.registrar.update_student_semester(&id, req.semester).await?;
    Ok(Json(student))
}

async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StudentDeletion>, AppError> {
    Ok(Json(state.registrar.delete_student(&id).await?))
}
