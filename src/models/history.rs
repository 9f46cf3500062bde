use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Credits, EnrollmentStatus, ScheduleSlot, Semester};

pub const COURSE_DELETED_REASON: &str = "course deleted";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CourseHistory {
    pub id: String,
    pub code: String,
    pub name: String,
    pub credits: Credits,
    pub schedule: ScheduleSlot,
    pub deleted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StudentHistory {
    pub id: String,
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub semester: Semester,
    pub deleted_at: DateTime<Utc>,
}

/// Archived copy of an enrollment. `status` is kept as the raw stored text
/// so that rows with an unrecognized status can still be archived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct EnrollmentHistory {
    pub id: String,
    pub enrollment_id: String,
    pub student_id: String,
    pub course_code: String,
    pub status: String,
    pub enrolled_at: DateTime<Utc>,
    pub deleted_at: DateTime<Utc>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseDeletion {
    pub course: CourseHistory,
    pub enrollments: Vec<EnrollmentHistory>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentDeletion {
    pub student: StudentHistory,
    pub enrollments: Vec<EnrollmentHistory>,
}

/// Archival reason for an enrollment whose student is being deleted.
pub fn student_deleted_reason(status: Option<EnrollmentStatus>) -> &'static str {
    match status {
        Some(EnrollmentStatus::Completed) => "course completed - student deleted",
        Some(EnrollmentStatus::Withdrawn) => "course withdrawn - student deleted",
        Some(EnrollmentStatus::Enrolled) => "course in progress - student deleted",
        None => "unknown status - student deleted",
    }
}
