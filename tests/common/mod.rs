#![allow(dead_code)]

use registrar::db;
use registrar::models::{
    Course, Credits, EnrollmentRequest, NewCourseRequest, NewStudentRequest, ScheduleSlot,
    Semester, Student,
};
use registrar::services::Registrar;
use sqlx::SqlitePool;
use std::path::PathBuf;
use uuid::Uuid;

pub const DOMAIN: &str = "ucatolica.edu.co";

pub async fn setup_test_db() -> SqlitePool {
    let pool = db::connect_in_memory()
        .await
        .expect("Failed to create database");

    db::migrate(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// A migrated database in a fresh temp file, served by a pool of
/// `max_connections`. Callers remove the file with `remove_db_file`.
pub async fn setup_file_db(max_connections: u32) -> (SqlitePool, PathBuf) {
    let path = std::env::temp_dir().join(format!("registrar-test-{}.db", Uuid::new_v4()));
    let url = format!("sqlite://{}", path.display());

    let pool = db::connect(&url, max_connections)
        .await
        .expect("Failed to create database file");

    db::migrate(&pool)
        .await
        .expect("Failed to run migrations");

    (pool, path)
}

pub async fn remove_db_file(pool: SqlitePool, path: PathBuf) {
    pool.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
    }
}

pub async fn setup_registrar() -> Registrar {
    Registrar::new(setup_test_db().await, DOMAIN)
}

pub async fn add_course(registrar: &Registrar, code: &str, name: &str) -> Course {
    registrar
        .create_course(NewCourseRequest {
            code: code.to_string(),
            name: name.to_string(),
            credits: Credits::Three,
            schedule: ScheduleSlot::SevenToNine,
        })
        .await
        .expect("Failed to create course")
}

pub async fn add_student(registrar: &Registrar, id: &str, name: &str) -> Student {
    registrar
        .create_student(NewStudentRequest {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@{}", name.to_lowercase(), DOMAIN),
            semester: Semester::First,
        })
        .await
        .expect("Failed to create student")
}

pub fn pair(student_id: &str, course_code: &str) -> EnrollmentRequest {
    EnrollmentRequest {
        student_id: student_id.to_string(),
        course_code: course_code.to_string(),
    }
}
