use sqlx::FromRow;
use sqlx::sqlite::SqliteExecutor;

use crate::models::{
    Course, CourseHistory, Credits, Enrollment, EnrollmentHistory, EnrollmentStatus, ScheduleSlot,
    Semester, Student, StudentHistory,
};

/// Enrollment row read for archival, with the status left as stored text.
#[derive(Debug, Clone, FromRow)]
pub struct EnrollmentSnapshot {
    pub id: String,
    pub student_id: String,
    pub course_code: String,
    pub status: String,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

// courses

pub async fn fetch_courses<'e>(db: impl SqliteExecutor<'e>) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>("SELECT code, name, credits, schedule FROM courses ORDER BY code")
        .fetch_all(db)
        .await
}

pub async fn find_course<'e>(
    db: impl SqliteExecutor<'e>,
    code: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>("SELECT code, name, credits, schedule FROM courses WHERE code = ?")
        .bind(code)
        .fetch_optional(db)
        .await
}

pub async fn find_course_by_name<'e>(
    db: impl SqliteExecutor<'e>,
    name: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        "SELECT code, name, credits, schedule FROM courses WHERE name = ? ORDER BY code LIMIT 1",
    )
    .bind(name)
    .fetch_optional(db)
    .await
}

pub async fn fetch_courses_by_credits<'e>(
    db: impl SqliteExecutor<'e>,
    credits: Credits,
) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        "SELECT code, name, credits, schedule FROM courses WHERE credits = ? ORDER BY code",
    )
    .bind(credits)
    .fetch_all(db)
    .await
}

pub async fn fetch_courses_by_schedule<'e>(
    db: impl SqliteExecutor<'e>,
    schedule: ScheduleSlot,
) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        "SELECT code, name, credits, schedule FROM courses WHERE schedule = ? ORDER BY code",
    )
    .bind(schedule)
    .fetch_all(db)
    .await
}

pub async fn insert_course<'e>(db: impl SqliteExecutor<'e>, course: &Course) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO courses (code, name, credits, schedule) VALUES (?, ?, ?, ?)")
        .bind(&course.code)
        .bind(&course.name)
        .bind(course.credits)
        .bind(course.schedule)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn update_course_schedule<'e>(
    db: impl SqliteExecutor<'e>,
    code: &str,
    schedule: ScheduleSlot,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE courses SET schedule = ? WHERE code = ?")
        .bind(schedule)
        .bind(code)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

/// Removes the course row. Live enrollments go with it through the
/// `ON DELETE CASCADE` foreign key.
pub async fn delete_course<'e>(db: impl SqliteExecutor<'e>, code: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM courses WHERE code = ?")
        .bind(code)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

/// Courses a student is taking or has finished.
pub async fn fetch_courses_of_student<'e>(
    db: impl SqliteExecutor<'e>,
    student_id: &str,
) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        r#"
        SELECT c.code, c.name, c.credits, c.schedule
        FROM courses c
        JOIN enrollments e ON e.course_code = c.code
        WHERE e.student_id = ?
          AND e.status IN ('ENROLLED', 'COMPLETED')
        ORDER BY c.code
        "#,
    )
    .bind(student_id)
    .fetch_all(db)
    .await
}

// students

pub async fn fetch_students<'e>(db: impl SqliteExecutor<'e>) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>("SELECT id, name, email, semester FROM students ORDER BY id")
        .fetch_all(db)
        .await
}

pub async fn find_student<'e>(
    db: impl SqliteExecutor<'e>,
    id: &str,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>("SELECT id, name, email, semester FROM students WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_student_by_email<'e>(
    db: impl SqliteExecutor<'e>,
    email: &str,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>("SELECT id, name, email, semester FROM students WHERE email = ?")
        .bind(email)
        .fetch_optional(db)
        .await
}

pub async fn find_student_by_name<'e>(
    db: impl SqliteExecutor<'e>,
    name: &str,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "SELECT id, name, email, semester FROM students WHERE name = ? ORDER BY id LIMIT 1",
    )
    .bind(name)
    .fetch_optional(db)
    .await
}

pub async fn fetch_students_by_semester<'e>(
    db: impl SqliteExecutor<'e>,
    semester: Semester,
) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "SELECT id, name, email, semester FROM students WHERE semester = ? ORDER BY id",
    )
    .bind(semester)
    .fetch_all(db)
    .await
}

pub async fn insert_student<'e>(db: impl SqliteExecutor<'e>, student: &Student) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO students (id, name, email, semester) VALUES (?, ?, ?, ?)")
        .bind(&student.id)
        .bind(&student.name)
        .bind(&student.email)
        .bind(student.semester)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn update_student_semester<'e>(
    db: impl SqliteExecutor<'e>,
    id: &str,
    semester: Semester,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE students SET semester = ? WHERE id = ?")
        .bind(semester)
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn delete_student<'e>(db: impl SqliteExecutor<'e>, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM students WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

/// Students actively enrolled in a course.
pub async fn fetch_students_in_course<'e>(
    db: impl SqliteExecutor<'e>,
    course_code: &str,
) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        r#"
        SELECT s.id, s.name, s.email, s.semester
        FROM students s
        JOIN enrollments e ON e.student_id = s.id
        WHERE e.course_code = ?
          AND e.status = 'ENROLLED'
        ORDER BY s.id
        "#,
    )
    .bind(course_code)
    .fetch_all(db)
    .await
}

// enrollments

pub async fn find_enrollment<'e>(
    db: impl SqliteExecutor<'e>,
    id: &str,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(
        "SELECT id, student_id, course_code, enrolled_at, status FROM enrollments WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn find_enrollment_for_pair<'e>(
    db: impl SqliteExecutor<'e>,
    student_id: &str,
    course_code: &str,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(
        r#"
        SELECT id, student_id, course_code, enrolled_at, status
        FROM enrollments
        WHERE student_id = ? AND course_code = ?
        "#,
    )
    .bind(student_id)
    .bind(course_code)
    .fetch_optional(db)
    .await
}

/// The one ENROLLED row of a student, if any.
pub async fn find_active_enrollment<'e>(
    db: impl SqliteExecutor<'e>,
    student_id: &str,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(
        r#"
        SELECT id, student_id, course_code, enrolled_at, status
        FROM enrollments
        WHERE student_id = ? AND status = 'ENROLLED'
        LIMIT 1
        "#,
    )
    .bind(student_id)
    .fetch_optional(db)
    .await
}

pub async fn insert_enrollment<'e>(
    db: impl SqliteExecutor<'e>,
    enrollment: &Enrollment,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO enrollments (id, student_id, course_code, enrolled_at, status)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&enrollment.id)
    .bind(&enrollment.student_id)
    .bind(&enrollment.course_code)
    .bind(enrollment.enrolled_at)
    .bind(enrollment.status)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn set_enrollment_status<'e>(
    db: impl SqliteExecutor<'e>,
    id: &str,
    status: EnrollmentStatus,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE enrollments SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

/// Points an existing row at another (student, course) pair.
pub async fn reassign_enrollment<'e>(
    db: impl SqliteExecutor<'e>,
    id: &str,
    student_id: &str,
    course_code: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE enrollments SET student_id = ?, course_code = ? WHERE id = ?")
        .bind(student_id)
        .bind(course_code)
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn fetch_active_enrollments<'e>(
    db: impl SqliteExecutor<'e>,
) -> Result<Vec<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(
        r#"
        SELECT id, student_id, course_code, enrolled_at, status
        FROM enrollments
        WHERE status = 'ENROLLED'
        ORDER BY enrolled_at, id
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn fetch_enrollments_of_student<'e>(
    db: impl SqliteExecutor<'e>,
    student_id: &str,
) -> Result<Vec<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(
        r#"
        SELECT id, student_id, course_code, enrolled_at, status
        FROM enrollments
        WHERE student_id = ?
        ORDER BY enrolled_at, id
        "#,
    )
    .bind(student_id)
    .fetch_all(db)
    .await
}

pub async fn fetch_active_enrollments_of_course<'e>(
    db: impl SqliteExecutor<'e>,
    course_code: &str,
) -> Result<Vec<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(
        r#"
        SELECT id, student_id, course_code, enrolled_at, status
        FROM enrollments
        WHERE course_code = ? AND status = 'ENROLLED'
        ORDER BY enrolled_at, id
        "#,
    )
    .bind(course_code)
    .fetch_all(db)
    .await
}

pub async fn fetch_snapshots_of_course<'e>(
    db: impl SqliteExecutor<'e>,
    course_code: &str,
) -> Result<Vec<EnrollmentSnapshot>, sqlx::Error> {
    sqlx::query_as::<_, EnrollmentSnapshot>(
        r#"
        SELECT id, student_id, course_code, status, enrolled_at
        FROM enrollments
        WHERE course_code = ?
        ORDER BY enrolled_at, id
        "#,
    )
    .bind(course_code)
    .fetch_all(db)
    .await
}

pub async fn fetch_snapshots_of_student<'e>(
    db: impl SqliteExecutor<'e>,
    student_id: &str,
) -> Result<Vec<EnrollmentSnapshot>, sqlx::Error> {
    sqlx::query_as::<_, EnrollmentSnapshot>(
        r#"
        SELECT id, student_id, course_code, status, enrolled_at
        FROM enrollments
        WHERE student_id = ?
        ORDER BY enrolled_at, id
        "#,
    )
    .bind(student_id)
    .fetch_all(db)
    .await
}

// history

pub async fn insert_course_history<'e>(
    db: impl SqliteExecutor<'e>,
    record: &CourseHistory,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO course_history (id, code, name, credits, schedule, deleted_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.id)
    .bind(&record.code)
    .bind(&record.name)
    .bind(record.credits)
    .bind(record.schedule)
    .bind(record.deleted_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn insert_student_history<'e>(
    db: impl SqliteExecutor<'e>,
    record: &StudentHistory,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO student_history (id, student_id, name, email, semester, deleted_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.id)
    .bind(&record.student_id)
    .bind(&record.name)
    .bind(&record.email)
    .bind(record.semester)
    .bind(record.deleted_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn insert_enrollment_history<'e>(
    db: impl SqliteExecutor<'e>,
    record: &EnrollmentHistory,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO enrollment_history
            (id, enrollment_id, student_id, course_code, status, enrolled_at, deleted_at, reason)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.id)
    .bind(&record.enrollment_id)
    .bind(&record.student_id)
    .bind(&record.course_code)
    .bind(&record.status)
    .bind(record.enrolled_at)
    .bind(record.deleted_at)
    .bind(&record.reason)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn fetch_course_history<'e>(
    db: impl SqliteExecutor<'e>,
) -> Result<Vec<CourseHistory>, sqlx::Error> {
    sqlx::query_as::<_, CourseHistory>(
        "SELECT id, code, name, credits, schedule, deleted_at FROM course_history ORDER BY deleted_at, id",
    )
    .fetch_all(db)
    .await
}

pub async fn fetch_student_history<'e>(
    db: impl SqliteExecutor<'e>,
) -> Result<Vec<StudentHistory>, sqlx::Error> {
    sqlx::query_as::<_, StudentHistory>(
        "SELECT id, student_id, name, email, semester, deleted_at FROM student_history ORDER BY deleted_at, id",
    )
    .fetch_all(db)
    .await
}

pub async fn fetch_enrollment_history<'e>(
    db: impl SqliteExecutor<'e>,
) -> Result<Vec<EnrollmentHistory>, sqlx::Error> {
    sqlx::query_as::<_, EnrollmentHistory>(
        r#"
        SELECT id, enrollment_id, student_id, course_code, status, enrolled_at, deleted_at, reason
        FROM enrollment_history
        ORDER BY deleted_at, id
        "#,
    )
    .fetch_all(db)
    .await
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sqlx::SqlitePool;
    use uuid::Uuid;

    use super::*;

    async fn setup_test_db() -> SqlitePool {
        let pool = crate::db::connect_in_memory()
            .await
            .expect("Failed to create test db");

        crate::db::migrate(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    fn course(code: &str) -> Course {
        Course {
            code: code.to_string(),
            name: "ALGORITMOS".to_string(),
            credits: Credits::Three,
            schedule: ScheduleSlot::SevenToNine,
        }
    }

    fn student(id: &str) -> Student {
        Student {
            id: id.to_string(),
            name: "ANA".to_string(),
            email: format!("{}@ucatolica.edu.co", id),
            semester: Semester::First,
        }
    }

    fn enrollment(student_id: &str, course_code: &str, status: EnrollmentStatus) -> Enrollment {
        Enrollment {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            course_code: course_code.to_string(),
            enrolled_at: Utc::now(),
            status,
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_course() {
        let pool = setup_test_db().await;

        insert_course(&pool, &course("INGS001")).await.expect("Failed to insert course");

        let courses = fetch_courses(&pool).await.expect("Failed to fetch courses");
        assert_eq!(courses, vec![course("INGS001")]);

        let by_credits = fetch_courses_by_credits(&pool, Credits::Three).await.unwrap();
        assert_eq!(by_credits.len(), 1);
        let by_other_credits = fetch_courses_by_credits(&pool, Credits::One).await.unwrap();
        assert!(by_other_credits.is_empty());
    }

    #[tokio::test]
    async fn test_update_course_schedule() {
        let pool = setup_test_db().await;
        insert_course(&pool, &course("INGS001")).await.unwrap();

        assert!(update_course_schedule(&pool, "INGS001", ScheduleSlot::FourToSix).await.unwrap());
        assert!(!update_course_schedule(&pool, "NOPE000", ScheduleSlot::FourToSix).await.unwrap());

        let found = find_course(&pool, "INGS001").await.unwrap().expect("Course not found");
        assert_eq!(found.schedule, ScheduleSlot::FourToSix);
        assert_eq!(fetch_courses_by_schedule(&pool, ScheduleSlot::FourToSix).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected_by_store() {
        let pool = setup_test_db().await;
        insert_student(&pool, &student("1020304050")).await.unwrap();

        let mut other = student("1111111");
        other.email = "1020304050@ucatolica.edu.co".to_string();
        let err = insert_student(&pool, &other).await.expect_err("duplicate email accepted");
        assert!(err.as_database_error().is_some_and(|e| e.is_unique_violation()));
    }

    #[tokio::test]
    async fn test_second_active_enrollment_is_rejected_by_store() {
        let pool = setup_test_db().await;
        insert_course(&pool, &course("INGS001")).await.unwrap();
        insert_course(&pool, &course("INGS002")).await.unwrap();
        insert_student(&pool, &student("1020304050")).await.unwrap();

        insert_enrollment(&pool, &enrollment("1020304050", "INGS001", EnrollmentStatus::Enrolled))
            .await
            .unwrap();
        let err = insert_enrollment(&pool, &enrollment("1020304050", "INGS002", EnrollmentStatus::Enrolled))
            .await
            .expect_err("second active enrollment accepted");
        assert!(err.as_database_error().is_some_and(|e| e.is_unique_violation()));

        // a withdrawn row next to the active one is fine
        insert_enrollment(&pool, &enrollment("1020304050", "INGS002", EnrollmentStatus::Withdrawn))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_course_cascades_enrollments() {
        let pool = setup_test_db().await;
        insert_course(&pool, &course("INGS001")).await.unwrap();
        insert_student(&pool, &student("1020304050")).await.unwrap();
        let row = enrollment("1020304050", "INGS001", EnrollmentStatus::Enrolled);
        insert_enrollment(&pool, &row).await.unwrap();

        assert!(delete_course(&pool, "INGS001").await.unwrap());

        assert!(find_enrollment(&pool, &row.id).await.unwrap().is_none());
        assert!(find_student(&pool, "1020304050").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_join_filters() {
        let pool = setup_test_db().await;
        for code in ["INGS001", "INGS002", "INGS003"] {
            insert_course(&pool, &course(code)).await.unwrap();
        }
        insert_student(&pool, &student("1020304050")).await.unwrap();
        insert_enrollment(&pool, &enrollment("1020304050", "INGS001", EnrollmentStatus::Completed))
            .await
            .unwrap();
        insert_enrollment(&pool, &enrollment("1020304050", "INGS002", EnrollmentStatus::Withdrawn))
            .await
            .unwrap();
        insert_enrollment(&pool, &enrollment("1020304050", "INGS003", EnrollmentStatus::Enrolled))
            .await
            .unwrap();

        let codes: Vec<String> = fetch_courses_of_student(&pool, "1020304050")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.code)
            .collect();
        assert_eq!(codes, vec!["INGS001", "INGS003"]);

        assert!(fetch_students_in_course(&pool, "INGS001").await.unwrap().is_empty());
        assert_eq!(fetch_students_in_course(&pool, "INGS003").await.unwrap().len(), 1);
        assert_eq!(fetch_active_enrollments(&pool).await.unwrap().len(), 1);
        assert_eq!(fetch_enrollments_of_student(&pool, "1020304050").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_status_round_trips_through_store() {
        let pool = setup_test_db().await;
        insert_course(&pool, &course("INGS001")).await.unwrap();
        insert_student(&pool, &student("1020304050")).await.unwrap();
        let row = enrollment("1020304050", "INGS001", EnrollmentStatus::Enrolled);
        insert_enrollment(&pool, &row).await.unwrap();

        assert!(set_enrollment_status(&pool, &row.id, EnrollmentStatus::Withdrawn).await.unwrap());

        let found = find_enrollment_for_pair(&pool, "1020304050", "INGS001")
            .await
            .unwrap()
            .expect("Enrollment not found");
        assert_eq!(found.id, row.id);
        assert_eq!(found.status, EnrollmentStatus::Withdrawn);
        assert!(find_active_enrollment(&pool, "1020304050").await.unwrap().is_none());

        let snapshots = fetch_snapshots_of_student(&pool, "1020304050").await.unwrap();
        assert_eq!(snapshots[0].status, "WITHDRAWN");
    }
}
