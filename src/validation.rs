//! Field checks applied to student payloads before they reach the store.

use std::str::FromStr;

use email_address::EmailAddress;
use thiserror::Error;

use crate::students::NewStudent;

/// First field check that rejected a student payload.
///
/// The display strings are returned verbatim to HTTP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Name was empty or missing.
    #[error("Name is required")]
    MissingName,
    /// Age was zero, negative, or missing.
    #[error("Age must be a positive integer")]
    InvalidAge,
    /// Email did not parse as a single mailbox.
    #[error("Invalid email format")]
    InvalidEmail,
}

/// Returns `true` when the name is non-empty.
pub fn validate_name(name: &str) -> bool {
    !name.is_empty()
}

/// Returns `true` when the age is strictly positive.
pub fn validate_age(age: i64) -> bool {
    age > 0
}

/// Returns `true` when the input parses as one RFC 5322 address: a plain or quoted
/// `local@domain` addr-spec, optionally inside angle brackets with or without a display name.
/// Surrounding whitespace is ignored. Rejections are logged.
pub fn validate_email(email: &str) -> bool {
    let candidate = email.trim();
    let candidate = candidate
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(candidate);
    match EmailAddress::from_str(candidate) {
        Ok(_) => true,
        Err(error) => {
            tracing::warn!(email, %error, "Invalid email");
            false
        }
    }
}

/// Run name, age, and email checks in that order and report the first failure.
pub fn validate_student(student: &NewStudent) -> Result<(), ValidationError> {
    if !validate_name(&student.name) {
        return Err(ValidationError::MissingName);
    }
    if !validate_age(student.age) {
        return Err(ValidationError::InvalidAge);
    }
    if !validate_email(&student.email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(name: &str, age: i64, email: &str) -> NewStudent {
        NewStudent {
            name: name.into(),
            age,
            email: email.into(),
        }
    }

    #[test]
    fn name_must_be_non_empty() {
        assert!(validate_name("Rahul"));
        assert!(!validate_name(""));
    }

    #[test]
    fn age_must_be_strictly_positive() {
        assert!(validate_age(1));
        assert!(!validate_age(0));
        assert!(!validate_age(-3));
    }

    #[test]
    fn email_accepts_plain_and_named_mailboxes() {
        assert!(validate_email("rahul@gmail.com"));
        assert!(validate_email("first.last+tag@sub.example.org"));
        assert!(validate_email("Alice <alice@example.com>"));
        assert!(validate_email("<alice@example.com>"));
        assert!(validate_email(" rahul@gmail.com "));
    }

    #[test]
    fn email_accepts_quoted_local_parts() {
        assert!(validate_email("\"quoted local\"@example.com"));
        assert!(validate_email("\"a@b\"@example.com"));
        assert!(validate_email("Quoted <\"john doe\"@example.com>"));
        assert!(!validate_email("unquoted local@example.com"));
    }

    #[test]
    fn email_rejects_malformed_input() {
        assert!(!validate_email("not-an-email"));
        assert!(!validate_email(""));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("alice@"));
    }

    #[test]
    fn student_checks_run_in_order() {
        assert_eq!(
            validate_student(&student("", 0, "bad")),
            Err(ValidationError::MissingName)
        );
        assert_eq!(
            validate_student(&student("Rob", 0, "bad")),
            Err(ValidationError::InvalidAge)
        );
        assert_eq!(
            validate_student(&student("Rob", 24, "bad")),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(validate_student(&student("Rob", 24, "rob@gmail.com")), Ok(()));
    }

    #[test]
    fn messages_match_client_contract() {
        assert_eq!(ValidationError::MissingName.to_string(), "Name is required");
        assert_eq!(
            ValidationError::InvalidAge.to_string(),
            "Age must be a positive integer"
        );
        assert_eq!(ValidationError::InvalidEmail.to_string(), "Invalid email format");
    }
}
