pub mod courses;
pub mod enrollments;
pub mod history;
pub mod students;
pub mod transitions;

use std::sync::Arc;

use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

use crate::db::repository;
use crate::error::AppError;
use crate::models::{Course, Student};

/// Academic-records core. Cheap to clone; every clone shares the pool.
///
/// Each mutating operation runs its lookups, guards and writes inside one
/// transaction and commits at the end, so an early return rolls back.
#[derive(Clone)]
pub struct Registrar {
    db: SqlitePool,
    email_domain: Arc<str>,
}

impl Registrar {
    pub fn new(db: SqlitePool, email_domain: &str) -> Self {
        Self {
            db,
            email_domain: Arc::from(email_domain),
        }
    }

    pub fn email_domain(&self) -> &str {
        &self.email_domain
    }

    /// Write transaction that takes the database lock up front, so its guards
    /// read the state left by any concurrent writer that committed first.
    async fn begin_write(&self) -> Result<Transaction<'static, Sqlite>, AppError> {
        Ok(self.db.begin_with("BEGIN IMMEDIATE").await?)
    }
}

async fn require_course(conn: &mut SqliteConnection, code: &str) -> Result<Course, AppError> {
    repository::find_course(conn, code)
        .await?
        .ok_or_else(|| AppError::not_found(format!("course {} not found", code)))
}

async fn require_student(conn: &mut SqliteConnection, id: &str) -> Result<Student, AppError> {
    repository::find_student(conn, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("student {} not found", id)))
}
