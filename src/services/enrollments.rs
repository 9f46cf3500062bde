use chrono::Utc;
use sqlx::{Sqlite, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use super::transitions::{self, EnrollAction};
use super::{Registrar, require_course, require_student};
use crate::db::repository;
use crate::error::AppError;
use crate::models::{Enrollment, EnrollmentRequest, EnrollmentStatus, UpdateEnrollmentRequest};
use crate::normalize;

/// Normalized (student, course) pair, both confirmed to exist.
struct Pair {
    student_id: String,
    course_code: String,
}

impl Registrar {
    /// Opens the transaction for an operation on a pair. Both keys are checked
    /// before the store is touched; the course is looked up before the student.
    async fn begin_for_pair(
        &self,
        student_id: &str,
        course_code: &str,
    ) -> Result<(Transaction<'static, Sqlite>, Pair), AppError> {
        let course_code = normalize::course_code(course_code)?;
        let student_id = normalize::student_id(student_id)?;

        let mut tx = self.begin_write().await?;
        require_course(&mut tx, &course_code).await?;
        require_student(&mut tx, &student_id).await?;

        Ok((tx, Pair { student_id, course_code }))
    }

    pub async fn enroll(&self, req: EnrollmentRequest) -> Result<Enrollment, AppError> {
        let (mut tx, pair) = self.begin_for_pair(&req.student_id, &req.course_code).await?;

        let existing =
            repository::find_enrollment_for_pair(&mut *tx, &pair.student_id, &pair.course_code).await?;
        let active = repository::find_active_enrollment(&mut *tx, &pair.student_id).await?;

        let action = transitions::plan_enroll(existing.as_ref(), active.as_ref()).inspect_err(|e| {
            debug!(student = %pair.student_id, course = %pair.course_code, "enroll rejected: {}", e)
        })?;

        let enrollment = match action {
            EnrollAction::Reactivate(mut row) => {
                repository::set_enrollment_status(&mut *tx, &row.id, EnrollmentStatus::Enrolled).await?;
                row.status = EnrollmentStatus::Enrolled;
                info!(id = %row.id, student = %pair.student_id, course = %pair.course_code, "enrollment reactivated");
                row
            }
            EnrollAction::Insert => {
                let row = Enrollment {
                    id: Uuid::new_v4().to_string(),
                    student_id: pair.student_id,
                    course_code: pair.course_code,
                    enrolled_at: Utc::now(),
                    status: EnrollmentStatus::Enrolled,
                };
                repository::insert_enrollment(&mut *tx, &row).await?;
                info!(id = %row.id, student = %row.student_id, course = %row.course_code, "student enrolled");
                row
            }
        };
        tx.commit().await?;

        Ok(enrollment)
    }

    pub async fn reenroll(&self, req: EnrollmentRequest) -> Result<Enrollment, AppError> {
        let (mut tx, pair) = self.begin_for_pair(&req.student_id, &req.course_code).await?;

        let existing =
            repository::find_enrollment_for_pair(&mut *tx, &pair.student_id, &pair.course_code).await?;
        let active = repository::find_active_enrollment(&mut *tx, &pair.student_id).await?;

        let mut row = transitions::check_reenroll(existing.as_ref(), active.as_ref())?.clone();
        repository::set_enrollment_status(&mut *tx, &row.id, EnrollmentStatus::Enrolled).await?;
        tx.commit().await?;

        info!(id = %row.id, student = %pair.student_id, course = %pair.course_code, "student re-enrolled");
        row.status = EnrollmentStatus::Enrolled;
        Ok(row)
    }

    pub async fn withdraw(&self, req: EnrollmentRequest) -> Result<Enrollment, AppError> {
        self.close_enrollment(req, EnrollmentStatus::Withdrawn).await
    }

    pub async fn complete(&self, req: EnrollmentRequest) -> Result<Enrollment, AppError> {
        self.close_enrollment(req, EnrollmentStatus::Completed).await
    }

    /// Moves an ENROLLED row to `status`.
    async fn close_enrollment(
        &self,
        req: EnrollmentRequest,
        status: EnrollmentStatus,
    ) -> Result<Enrollment, AppError> {
        let (mut tx, pair) = self.begin_for_pair(&req.student_id, &req.course_code).await?;

        let existing =
            repository::find_enrollment_for_pair(&mut *tx, &pair.student_id, &pair.course_code).await?;
        let mut row = transitions::require_active(existing.as_ref())?.clone();
        repository::set_enrollment_status(&mut *tx, &row.id, status).await?;
        tx.commit().await?;

        info!(id = %row.id, student = %pair.student_id, course = %pair.course_code, to = %status, "enrollment closed");
        row.status = status;
        Ok(row)
    }

    /// Rewrites the student and course of an existing row in place.
    pub async fn update_enrollment(
        &self,
        id: &str,
        req: UpdateEnrollmentRequest,
    ) -> Result<Enrollment, AppError> {
        let (mut tx, pair) = self.begin_for_pair(&req.student_id, &req.course_code).await?;

        let current = repository::find_enrollment(&mut *tx, id).await?;
        let target_pair =
            repository::find_enrollment_for_pair(&mut *tx, &pair.student_id, &pair.course_code).await?;
        let target_active = repository::find_active_enrollment(&mut *tx, &pair.student_id).await?;

        let mut row =
            transitions::check_reassign(current.as_ref(), target_pair.as_ref(), target_active.as_ref())?
                .clone();
        repository::reassign_enrollment(&mut *tx, &row.id, &pair.student_id, &pair.course_code).await?;
        tx.commit().await?;

        info!(
            id = %row.id,
            student = %pair.student_id,
            course = %pair.course_code,
            "enrollment reassigned"
        );
        row.student_id = pair.student_id;
        row.course_code = pair.course_code;
        Ok(row)
    }

    pub async fn list_active_enrollments(&self) -> Result<Vec<Enrollment>, AppError> {
        Ok(repository::fetch_active_enrollments(&self.db).await?)
    }

    pub async fn enrollment_by_id(&self, id: &str) -> Result<Enrollment, AppError> {
        repository::find_enrollment(&self.db, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("enrollment {} not found", id)))
    }

    /// Every row of the student, whatever its status. A student whose rows are
    /// all WITHDRAWN (or who has none) has no enrollment record to show.
    pub async fn enrollments_of_student(&self, student_id: &str) -> Result<Vec<Enrollment>, AppError> {
        let student_id = normalize::student_id(student_id)?;
        let mut conn = self.db.acquire().await?;
        require_student(&mut conn, &student_id).await?;

        let rows = repository::fetch_enrollments_of_student(&mut *conn, &student_id).await?;
        if !rows.iter().any(|row| row.status != EnrollmentStatus::Withdrawn) {
            return Err(AppError::not_found(format!(
                "student {} has no active or completed enrollments",
                student_id
            )));
        }
        Ok(rows)
    }

    /// ENROLLED rows of the course.
    pub async fn enrollments_of_course(&self, course_code: &str) -> Result<Vec<Enrollment>, AppError> {
        let course_code = normalize::course_code(course_code)?;
        let mut conn = self.db.acquire().await?;
        require_course(&mut conn, &course_code).await?;
        Ok(repository::fetch_active_enrollments_of_course(&mut *conn, &course_code).await?)
    }
}
