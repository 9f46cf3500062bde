use super::Registrar;
use crate::db::repository;
use crate::error::AppError;
use crate::models::{CourseHistory, EnrollmentHistory, StudentHistory};

impl Registrar {
    pub async fn course_history(&self) -> Result<Vec<CourseHistory>, AppError> {
        Ok(repository::fetch_course_history(&self.db).await?)
    }

    pub async fn student_history(&self) -> Result<Vec<StudentHistory>, AppError> {
        Ok(repository::fetch_student_history(&self.db).await?)
    }

    pub async fn enrollment_history(&self) -> Result<Vec<EnrollmentHistory>, AppError> {
        Ok(repository::fetch_enrollment_history(&self.db).await?)
    }
}
