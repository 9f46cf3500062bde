use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Credits, ScheduleSlot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub code: String,
    pub name: String,
    pub credits: Credits,
    pub schedule: ScheduleSlot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourseRequest {
    pub code: String,
    pub name: String,
    pub credits: Credits,
    pub schedule: ScheduleSlot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateScheduleRequest {
    pub schedule: ScheduleSlot,
}
