use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Semester;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub semester: Semester,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudentRequest {
    pub id: String,
    pub name: String,
    pub email: String,
    pub semester: Semester,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSemesterRequest {
    pub semester: Semester,
}
