//! Canonical forms of the natural keys.
//!
//! Every service operation runs its arguments through these functions before
//! touching the store, so a malformed key is reported as an invalid argument
//! and never as a missing record.

use crate::error::AppError;

pub const COURSE_CODE_LEN: usize = 7;
pub const STUDENT_ID_MIN_LEN: usize = 7;
pub const STUDENT_ID_MAX_LEN: usize = 10;

/// Uppercases a course code and checks it is exactly seven characters long.
pub fn course_code(raw: &str) -> Result<String, AppError> {
    let code = raw.trim().to_uppercase();
    if code.chars().count() != COURSE_CODE_LEN {
        return Err(AppError::invalid(format!(
            "course code must be exactly {} characters",
            COURSE_CODE_LEN
        )));
    }
    Ok(code)
}

/// Checks a national ID is numeric with 7 to 10 digits.
pub fn student_id(raw: &str) -> Result<String, AppError> {
    let id = raw.trim();
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::invalid("student id must be numeric"));
    }
    if !(STUDENT_ID_MIN_LEN..=STUDENT_ID_MAX_LEN).contains(&id.len()) {
        return Err(AppError::invalid(format!(
            "student id must have between {} and {} digits",
            STUDENT_ID_MIN_LEN, STUDENT_ID_MAX_LEN
        )));
    }
    Ok(id.to_string())
}

/// Lowercases an email and requires it to belong to `domain`.
pub fn email(raw: &str, domain: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    let suffix = format!("@{}", domain.to_lowercase());
    match email.strip_suffix(&suffix) {
        Some(local) if !local.is_empty() && !local.contains('@') => Ok(email),
        _ => Err(AppError::invalid(format!("email must belong to the {} domain", domain))),
    }
}

/// Collapses runs of whitespace and uppercases. Used for storage and lookups.
pub fn name(raw: &str) -> Result<String, AppError> {
    let name = raw.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
    if name.is_empty() {
        return Err(AppError::invalid("name must not be empty"));
    }
    Ok(name)
}
