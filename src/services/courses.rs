use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use super::{Registrar, require_course};
use crate::db::repository;
use crate::error::AppError;
use crate::models::history::COURSE_DELETED_REASON;
use crate::models::{
    Course, CourseDeletion, CourseHistory, Credits, EnrollmentHistory, NewCourseRequest,
    ScheduleSlot, Student,
};
use crate::normalize;

impl Registrar {
    pub async fn create_course(&self, req: NewCourseRequest) -> Result<Course, AppError> {
        let course = Course {
            code: normalize::course_code(&req.code)?,
            name: normalize::name(&req.name)?,
            credits: req.credits,
            schedule: req.schedule,
        };

        let mut tx = self.begin_write().await?;
        if repository::find_course(&mut *tx, &course.code).await?.is_some() {
            debug!(code = %course.code, "course code already taken");
            return Err(AppError::conflict(format!(
                "a course with code {} already exists",
                course.code
            )));
        }
        repository::insert_course(&mut *tx, &course).await?;
        tx.commit().await?;

        info!(code = %course.code, "course created");
        Ok(course)
    }

    pub async fn list_courses(&self) -> Result<Vec<Course>, AppError> {
        Ok(repository::fetch_courses(&self.db).await?)
    }

    pub async fn course_by_code(&self, code: &str) -> Result<Course, AppError> {
        let code = normalize::course_code(code)?;
        repository::find_course(&self.db, &code)
            .await?
            .ok_or_else(|| AppError::not_found(format!("course {} not found", code)))
    }

    pub async fn course_by_name(&self, name: &str) -> Result<Course, AppError> {
        let name = normalize::name(name)?;
        repository::find_course_by_name(&self.db, &name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("no course named {}", name)))
    }

    pub async fn courses_by_credits(&self, credits: Credits) -> Result<Vec<Course>, AppError> {
        Ok(repository::fetch_courses_by_credits(&self.db, credits).await?)
    }

    pub async fn courses_by_schedule(&self, schedule: ScheduleSlot) -> Result<Vec<Course>, AppError> {
        Ok(repository::fetch_courses_by_schedule(&self.db, schedule).await?)
    }

    /// Looks a course up by code and insists it carries `credits`.
    pub async fn course_by_credits_and_code(
        &self,
        credits: Credits,
        code: &str,
    ) -> Result<Course, AppError> {
        let course = self.course_by_code(code).await?;
        if course.credits != credits {
            return Err(AppError::not_found(format!(
                "course {} does not have {} credits",
                course.code, credits
            )));
        }
        Ok(course)
    }

    /// Students with an ENROLLED row in the course.
    pub async fn students_in_course(&self, code: &str) -> Result<Vec<Student>, AppError> {
        let code = normalize::course_code(code)?;
        let mut conn = self.db.acquire().await?;
        require_course(&mut conn, &code).await?;
        Ok(repository::fetch_students_in_course(&mut *conn, &code).await?)
    }

    pub async fn update_course_schedule(
        &self,
        code: &str,
        schedule: ScheduleSlot,
    ) -> Result<Course, AppError> {
        let code = normalize::course_code(code)?;

        let mut tx = self.begin_write().await?;
        let mut course = require_course(&mut tx, &code).await?;
        if course.schedule == schedule {
            return Err(AppError::conflict(format!(
                "course {} is already scheduled at {}",
                code, schedule
            )));
        }
        repository::update_course_schedule(&mut *tx, &code, schedule).await?;
        tx.commit().await?;

        info!(code = %code, from = %course.schedule, to = %schedule, "course rescheduled");
        course.schedule = schedule;
        Ok(course)
    }

    /// Archives every enrollment of the course, then the course itself, then
    /// removes the live row. All of it commits or none of it does.
    pub async fn delete_course(&self, code: &str) -> Result<CourseDeletion, AppError> {
        let code = normalize::course_code(code)?;
        let deleted_at = Utc::now();

        let mut tx = self.begin_write().await?;
        let course = require_course(&mut tx, &code).await?;

        let snapshots = repository::fetch_snapshots_of_course(&mut *tx, &code).await?;
        let mut enrollments = Vec::with_capacity(snapshots.len());
        for snapshot in snapshots {
            let record = EnrollmentHistory {
                id: Uuid::new_v4().to_string(),
                enrollment_id: snapshot.id,
                student_id: snapshot.student_id,
                course_code: snapshot.course_code,
                status: snapshot.status,
                enrolled_at: snapshot.enrolled_at,
                deleted_at,
                reason: Some(COURSE_DELETED_REASON.to_string()),
            };
            repository::insert_enrollment_history(&mut *tx, &record).await?;
            enrollments.push(record);
        }

        let record = CourseHistory {
            id: Uuid::new_v4().to_string(),
            code: course.code,
            name: course.name,
            credits: course.credits,
            schedule: course.schedule,
            deleted_at,
        };
        repository::insert_course_history(&mut *tx, &record).await?;
        repository::delete_course(&mut *tx, &code).await?;
        tx.commit().await?;

        info!(
            code = %code,
            archived_enrollments = enrollments.len(),
            "course deleted"
        );
        Ok(CourseDeletion {
            course: record,
            enrollments,
        })
    }
}
