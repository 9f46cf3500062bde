use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::EnrollmentStatus;

/// Link between one student and one course. A (student, course) pair owns
/// at most one row for its whole life.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Enrollment {
    pub id: String,
    pub student_id: String,
    pub course_code: String,
    pub enrolled_at: DateTime<Utc>,
    pub status: EnrollmentStatus,
}

impl Enrollment {
    pub fn is_active(&self) -> bool {
        self.status == EnrollmentStatus::Enrolled
    }
}

/// Names a (student, course) pair for the status transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentRequest {
    pub student_id: String,
    pub course_code: String,
}

/// New foreign keys for an existing enrollment row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEnrollmentRequest {
    pub student_id: String,
    pub course_code: String,
}
