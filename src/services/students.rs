use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use super::{Registrar, require_student};
use crate::db::repository;
use crate::error::AppError;
use crate::models::history::student_deleted_reason;
use crate::models::{
    Course, EnrollmentHistory, EnrollmentStatus, NewStudentRequest, Semester, Student,
    StudentDeletion, StudentHistory,
};
use crate::normalize;

impl Registrar {
    pub async fn create_student(&self, req: NewStudentRequest) -> Result<Student, AppError> {
        let student = Student {
            id: normalize::student_id(&req.id)?,
            name: normalize::name(&req.name)?,
            email: normalize::email(&req.email, self.email_domain())?,
            semester: req.semester,
        };

        let mut tx = self.begin_write().await?;
        if repository::find_student(&mut *tx, &student.id).await?.is_some() {
            debug!(id = %student.id, "student id already taken");
            return Err(AppError::conflict(format!(
                "a student with id {} already exists",
                student.id
            )));
        }
        if repository::find_student_by_email(&mut *tx, &student.email).await?.is_some() {
            debug!(email = %student.email, "student email already taken");
            return Err(AppError::conflict(format!(
                "a student with email {} already exists",
                student.email
            )));
        }
        repository::insert_student(&mut *tx, &student).await?;
        tx.commit().await?;

        info!(id = %student.id, "student created");
        Ok(student)
    }

    pub async fn list_students(&self) -> Result<Vec<Student>, AppError> {
        Ok(repository::fetch_students(&self.db).await?)
    }

    pub async fn student_by_id(&self, id: &str) -> Result<Student, AppError> {
        let id = normalize::student_id(id)?;
        repository::find_student(&self.db, &id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("student {} not found", id)))
    }

    pub async fn student_by_email(&self, email: &str) -> Result<Student, AppError> {
        let email = normalize::email(email, self.email_domain())?;
        repository::find_student_by_email(&self.db, &email)
            .await?
            .ok_or_else(|| AppError::not_found(format!("no student with email {}", email)))
    }

    pub async fn student_by_name(&self, name: &str) -> Result<Student, AppError> {
        let name = normalize::name(name)?;
        repository::find_student_by_name(&self.db, &name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("no student named {}", name)))
    }

    pub async fn students_by_semester(&self, semester: Semester) -> Result<Vec<Student>, AppError> {
        Ok(repository::fetch_students_by_semester(&self.db, semester).await?)
    }

    /// Looks a student up by email and insists they are in `semester`.
    pub async fn student_by_semester_and_email(
        &self,
        semester: Semester,
        email: &str,
    ) -> Result<Student, AppError> {
        let student = self.student_by_email(email).await?;
        if student.semester != semester {
            return Err(AppError::not_found(format!(
                "student with email {} is not in semester {}",
                student.email, semester
            )));
        }
        Ok(student)
    }

    /// Courses the student is taking or has completed.
    pub async fn courses_of_student(&self, id: &str) -> Result<Vec<Course>, AppError> {
        let id = normalize::student_id(id)?;
        let mut conn = self.db.acquire().await?;
        require_student(&mut conn, &id).await?;
        Ok(repository::fetch_courses_of_student(&mut *conn, &id).await?)
    }

    pub async fn update_student_semester(
        &self,
        id: &str,
        semester: Semester,
    ) -> Result<Student, AppError> {
        let id = normalize::student_id(id)?;

        let mut tx = self.begin_write().await?;
        let mut student = require_student(&mut tx, &id).await?;
        repository::update_student_semester(&mut *tx, &id, semester).await?;
        tx.commit().await?;

        info!(id = %id, from = %student.semester, to = %semester, "student semester updated");
        student.semester = semester;
        Ok(student)
    }

    /// Archives the student's enrollments with a reason derived from each
    /// row's status, archives the student, then removes the live row.
    pub async fn delete_student(&self, id: &str) -> Result<StudentDeletion, AppError> {
        let id = normalize::student_id(id)?;
        let deleted_at = Utc::now();

        let mut tx = self.begin_write().await?;
        let student = require_student(&mut tx, &id).await?;

        let snapshots = repository::fetch_snapshots_of_student(&mut *tx, &id).await?;
        let mut enrollments = Vec::with_capacity(snapshots.len());
        for snapshot in snapshots {
            let status = snapshot.status.parse::<EnrollmentStatus>().ok();
            let record = EnrollmentHistory {
                id: Uuid::new_v4().to_string(),
                enrollment_id: snapshot.id,
                student_id: snapshot.student_id,
                course_code: snapshot.course_code,
                status: snapshot.status,
                enrolled_at: snapshot.enrolled_at,
                deleted_at,
                reason: Some(student_deleted_reason(status).to_string()),
            };
            repository::insert_enrollment_history(&mut *tx, &record).await?;
            enrollments.push(record);
        }

        let record = StudentHistory {
            id: Uuid::new_v4().to_string(),
            student_id: student.id,
            name: student.name,
            email: student.email,
            semester: student.semester,
            deleted_at,
        };
        repository::insert_student_history(&mut *tx, &record).await?;
        repository::delete_student(&mut *tx, &id).await?;
        tx.commit().await?;

        info!(
            id = %id,
            archived_enrollments = enrollments.len(),
            "student deleted"
        );
        Ok(StudentDeletion {
            student: record,
            enrollments,
        })
    }
}
