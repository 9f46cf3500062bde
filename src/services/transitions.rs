//! Enrollment state machine.
//!
//! States are `ENROLLED`, `WITHDRAWN` and `COMPLETED`; a missing row is its own
//! condition. The guards here are pure: callers load the rows involved inside
//! a transaction, ask for a decision, then apply it on the same transaction.
//!
//! ```text
//!   (none) --enroll--> ENROLLED --withdraw--> WITHDRAWN
//!                         |  ^                   |
//!                 complete|  +--enroll/reenroll--+
//!                         v
//!                     COMPLETED   (terminal, immutable)
//! ```

use crate::error::AppError;
use crate::models::{Enrollment, EnrollmentStatus};

const ALREADY_ENROLLED: &str = "student is already enrolled in this course";
const ACTIVE_ELSEWHERE: &str = "student cannot be enrolled in more than one course at a time";
const ALREADY_COMPLETED: &str = "student already completed this course and cannot repeat it";

/// What an enroll request does to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollAction {
    /// Flip the existing withdrawn row back to ENROLLED, keeping its id.
    Reactivate(Enrollment),
    /// No row exists for the pair yet.
    Insert,
}

/// `pair` is the student's row for the requested course, `active` the
/// student's current ENROLLED row for any course.
pub fn plan_enroll(
    pair: Option<&Enrollment>,
    active: Option<&Enrollment>,
) -> Result<EnrollAction, AppError> {
    if pair.is_some_and(Enrollment::is_active) {
        return Err(AppError::conflict(ALREADY_ENROLLED));
    }
    if active.is_some() {
        return Err(AppError::conflict(ACTIVE_ELSEWHERE));
    }

    match pair {
        None => Ok(EnrollAction::Insert),
        Some(row) => match row.status {
            EnrollmentStatus::Withdrawn => Ok(EnrollAction::Reactivate(row.clone())),
            EnrollmentStatus::Completed => Err(AppError::conflict(ALREADY_COMPLETED)),
            EnrollmentStatus::Enrolled => Err(AppError::conflict(ALREADY_ENROLLED)),
        },
    }
}

/// Re-enrollment only revives an existing withdrawn row.
pub fn check_reenroll<'a>(
    pair: Option<&'a Enrollment>,
    active: Option<&Enrollment>,
) -> Result<&'a Enrollment, AppError> {
    let row = pair.ok_or_else(|| AppError::not_found("enrollment not found"))?;

    if active.is_some_and(|a| a.id != row.id) {
        return Err(AppError::conflict(ACTIVE_ELSEWHERE));
    }
    match row.status {
        EnrollmentStatus::Enrolled => Err(AppError::conflict(ALREADY_ENROLLED)),
        EnrollmentStatus::Completed => Err(AppError::conflict(ALREADY_COMPLETED)),
        EnrollmentStatus::Withdrawn => Ok(row),
    }
}

/// Withdraw and complete both start from an ENROLLED row.
pub fn require_active(pair: Option<&Enrollment>) -> Result<&Enrollment, AppError> {
    pair.filter(|row| row.is_active())
        .ok_or_else(|| AppError::not_found("no active enrollment for this student and course"))
}

/// Guards for moving row `current` onto the (student, course) pair whose
/// existing row is `target_pair`. `target_active` is the new student's
/// ENROLLED row, if any.
pub fn check_reassign<'a>(
    current: Option<&'a Enrollment>,
    target_pair: Option<&Enrollment>,
    target_active: Option<&Enrollment>,
) -> Result<&'a Enrollment, AppError> {
    let row = current.ok_or_else(|| AppError::not_found("enrollment not found"))?;

    if row.status == EnrollmentStatus::Completed {
        return Err(AppError::conflict("completed enrollments cannot be modified"));
    }
    if let Some(existing) = target_pair {
        if existing.is_active() {
            return Err(AppError::conflict(
                "an active enrollment already exists for that student and course",
            ));
        }
        if existing.id != row.id {
            return Err(AppError::conflict(
                "an enrollment already exists for that student and course",
            ));
        }
    }
    if row.is_active() && target_active.is_some_and(|a| a.id != row.id) {
        return Err(AppError::conflict(ACTIVE_ELSEWHERE));
    }

    Ok(row)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn row(id: &str, course: &str, status: EnrollmentStatus) -> Enrollment {
        Enrollment {
            id: id.to_string(),
            student_id: "1020304050".to_string(),
            course_code: course.to_string(),
            enrolled_at: Utc::now(),
            status,
        }
    }

    fn is_conflict<T: std::fmt::Debug>(result: Result<T, AppError>) -> bool {
        matches!(result, Err(AppError::Conflict(_)))
    }

    fn is_not_found<T: std::fmt::Debug>(result: Result<T, AppError>) -> bool {
        matches!(result, Err(AppError::NotFound(_)))
    }

    #[test]
    fn test_enroll_fresh_pair_inserts() {
        assert_eq!(plan_enroll(None, None).unwrap(), EnrollAction::Insert);
    }

    #[test]
    fn test_enroll_twice_in_same_course_conflicts() {
        let active = row("e1", "INGS001", EnrollmentStatus::Enrolled);
        assert!(is_conflict(plan_enroll(Some(&active), Some(&active))));
    }

    #[test]
    fn test_enroll_while_active_elsewhere_conflicts() {
        let elsewhere = row("e1", "INGS001", EnrollmentStatus::Enrolled);
        assert!(is_conflict(plan_enroll(None, Some(&elsewhere))));

        let withdrawn = row("e2", "INGS002", EnrollmentStatus::Withdrawn);
        assert!(is_conflict(plan_enroll(Some(&withdrawn), Some(&elsewhere))));
    }

    #[test]
    fn test_enroll_after_withdraw_reactivates_same_row() {
        let withdrawn = row("e1", "INGS001", EnrollmentStatus::Withdrawn);
        match plan_enroll(Some(&withdrawn), None).unwrap() {
            EnrollAction::Reactivate(r) => assert_eq!(r.id, "e1"),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_enroll_after_complete_conflicts() {
        let completed = row("e1", "INGS001", EnrollmentStatus::Completed);
        assert!(is_conflict(plan_enroll(Some(&completed), None)));
    }

    #[test]
    fn test_reenroll_guards() {
        assert!(is_not_found(check_reenroll(None, None)));

        let completed = row("e1", "INGS001", EnrollmentStatus::Completed);
        assert!(is_conflict(check_reenroll(Some(&completed), None)));

        let active = row("e1", "INGS001", EnrollmentStatus::Enrolled);
        assert!(is_conflict(check_reenroll(Some(&active), Some(&active))));

        let withdrawn = row("e2", "INGS002", EnrollmentStatus::Withdrawn);
        assert!(is_conflict(check_reenroll(Some(&withdrawn), Some(&active))));
        assert_eq!(check_reenroll(Some(&withdrawn), None).unwrap().id, "e2");
    }

    #[test]
    fn test_withdraw_and_complete_need_active_row() {
        assert!(is_not_found(require_active(None)));

        let withdrawn = row("e1", "INGS001", EnrollmentStatus::Withdrawn);
        assert!(is_not_found(require_active(Some(&withdrawn))));

        let completed = row("e1", "INGS001", EnrollmentStatus::Completed);
        assert!(is_not_found(require_active(Some(&completed))));

        let active = row("e1", "INGS001", EnrollmentStatus::Enrolled);
        assert_eq!(require_active(Some(&active)).unwrap().id, "e1");
    }

    #[test]
    fn test_reassign_guards() {
        assert!(is_not_found(check_reassign(None, None, None)));

        let completed = row("e1", "INGS001", EnrollmentStatus::Completed);
        assert!(is_conflict(check_reassign(Some(&completed), None, None)));

        let withdrawn = row("e1", "INGS001", EnrollmentStatus::Withdrawn);
        let taken = row("e2", "INGS002", EnrollmentStatus::Enrolled);
        assert!(is_conflict(check_reassign(Some(&withdrawn), Some(&taken), None)));

        let other_withdrawn = row("e3", "INGS002", EnrollmentStatus::Withdrawn);
        assert!(is_conflict(check_reassign(Some(&withdrawn), Some(&other_withdrawn), None)));

        assert_eq!(check_reassign(Some(&withdrawn), None, Some(&taken)).unwrap().id, "e1");
    }

    #[test]
    fn test_reassign_active_row_respects_single_active_rule() {
        let active = row("e1", "INGS001", EnrollmentStatus::Enrolled);
        let new_student_active = row("e9", "INGS005", EnrollmentStatus::Enrolled);
        assert!(is_conflict(check_reassign(Some(&active), None, Some(&new_student_active))));
        assert_eq!(check_reassign(Some(&active), None, None).unwrap().id, "e1");
    }
}
