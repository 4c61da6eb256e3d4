//! Credential sanitization for operator-supplied input.
//!
//! Each field validator checks emptiness before anything else, so a missing
//! value is always reported as [`CredentialError::EmptyInput`]. The
//! blocked-character check is shared by both fields and is applied to values
//! that already passed their emptiness check.
//!
//! The blocked-character check is defense in depth. It rejects characters
//! common in SQL, template and shell injection payloads; the database client
//! still binds every value as a parameter.

use super::{Credential, RawCredentials};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Field label used in errors about the username.
pub const USERNAME_FIELD: &str = "username";
/// Field label used in errors about the password.
pub const PASSWORD_FIELD: &str = "password";

/// Characters rejected in both username and password.
pub const BLOCKED_CHARACTERS: &[char] = &['{', '}', '(', ')', '[', ']', '\'', '"', '`', ';', '\\'];

#[allow(clippy::expect_used)]
static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("username pattern is a valid literal"));

#[allow(clippy::expect_used)]
static BLOCKED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[{}()\[\]'"`;\\]"#).expect("blocked character pattern is a valid literal")
});

/// Credential validation errors.
///
/// # Security
/// The rejected input is never included in the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// The value is empty or was not provided
    #[error("The {field} cannot be empty")]
    EmptyInput { field: &'static str },

    /// The username contains characters outside `[A-Za-z0-9_]`
    #[error("The {field} may only contain letters, digits and underscores")]
    InvalidFormat { field: &'static str },

    /// The value contains a blocked character
    #[error("The {field} contains disallowed characters")]
    InjectionAttempt { field: &'static str },
}

impl CredentialError {
    /// Name of the rejected field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyInput { field }
            | Self::InvalidFormat { field }
            | Self::InjectionAttempt { field } => field,
        }
    }
}

/// Validates a username: present, non-empty and made of `[A-Za-z0-9_]` only.
///
/// # Errors
/// - [`CredentialError::EmptyInput`] if absent or empty
/// - [`CredentialError::InvalidFormat`] on any other character
pub fn validate_username(username: Option<&str>) -> Result<&str, CredentialError> {
    let username = non_empty(username, USERNAME_FIELD)?;

    if !USERNAME_PATTERN.is_match(username) {
        return Err(CredentialError::InvalidFormat {
            field: USERNAME_FIELD,
        });
    }

    Ok(username)
}

/// Validates a password: present and non-empty. No character-set restriction.
///
/// # Errors
/// Returns [`CredentialError::EmptyInput`] if absent or empty.
pub fn validate_password(password: Option<&str>) -> Result<&str, CredentialError> {
    non_empty(password, PASSWORD_FIELD)
}

/// Rejects input containing any of [`BLOCKED_CHARACTERS`].
///
/// `field` only labels the error.
///
/// # Errors
/// Returns [`CredentialError::InjectionAttempt`] if a blocked character is found.
///
/// # Example
/// ```rust
/// use dbprobe_core::security::validate_no_injection_attempt;
///
/// assert!(validate_no_injection_attempt("alice_01", "username").is_ok());
/// assert!(validate_no_injection_attempt("bob;drop", "username").is_err());
/// ```
pub fn validate_no_injection_attempt<'a>(
    input: &'a str,
    field: &'static str,
) -> Result<&'a str, CredentialError> {
    if BLOCKED_PATTERN.is_match(input) {
        return Err(CredentialError::InjectionAttempt { field });
    }
    Ok(input)
}

/// Runs every check on a raw username/password pair.
///
/// The username is fully checked before the password. For each field an
/// empty value is reported first; a blocked character is then reported as
/// [`CredentialError::InjectionAttempt`] even when the username format check
/// would also reject it, so dangerous input is never reported as a mere
/// format problem.
///
/// # Errors
/// Returns the first [`CredentialError`] encountered.
pub fn sanitize_credentials(raw: &RawCredentials) -> Result<Credential, CredentialError> {
    let username = non_empty(raw.username.as_deref(), USERNAME_FIELD)?;
    let username = validate_username(Some(validate_no_injection_attempt(
        username,
        USERNAME_FIELD,
    )?))?;

    let password = validate_no_injection_attempt(
        validate_password(raw.password.as_deref())?,
        PASSWORD_FIELD,
    )?;

    Ok(Credential::new(username.to_string(), password.to_string()))
}

fn non_empty<'a>(input: Option<&'a str>, field: &'static str) -> Result<&'a str, CredentialError> {
    match input {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(CredentialError::EmptyInput { field }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn raw(username: Option<&str>, password: Option<&str>) -> RawCredentials {
        RawCredentials {
            username: username.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    #[test]
    fn test_username_accepts_word_characters() {
        for name in ["alice_01", "A", "_", "postgres", "USER_2024"] {
            assert_eq!(validate_username(Some(name)), Ok(name));
        }
    }

    #[test]
    fn test_username_empty_or_absent() {
        for input in [None, Some("")] {
            assert_eq!(
                validate_username(input),
                Err(CredentialError::EmptyInput {
                    field: USERNAME_FIELD
                })
            );
        }
    }

    #[test]
    fn test_username_rejects_other_characters() {
        for name in ["bob-smith", "bob.smith", "bob smith", "bob@host", "jos\u{e9}", " alice"] {
            assert_eq!(
                validate_username(Some(name)),
                Err(CredentialError::InvalidFormat {
                    field: USERNAME_FIELD
                }),
                "{name}"
            );
        }
    }

    #[test]
    fn test_username_rejects_trailing_newline() {
        assert!(validate_username(Some("alice\n")).is_err());
    }

    #[test]
    fn test_password_accepts_anything_non_empty() {
        for password in ["s3cret", "pa ss-word.!", "\u{1f512}", "x"] {
            assert_eq!(validate_password(Some(password)), Ok(password));
        }
    }

    #[test]
    fn test_password_empty_or_absent() {
        for input in [None, Some("")] {
            assert_eq!(
                validate_password(input),
                Err(CredentialError::EmptyInput {
                    field: PASSWORD_FIELD
                })
            );
        }
    }

    #[test]
    fn test_injection_each_blocked_character() {
        for &c in BLOCKED_CHARACTERS {
            let input = format!("abc{c}def");
            assert_eq!(
                validate_no_injection_attempt(&input, PASSWORD_FIELD),
                Err(CredentialError::InjectionAttempt {
                    field: PASSWORD_FIELD
                }),
                "character {c:?} was not blocked"
            );
        }
    }

    #[test]
    fn test_injection_allows_other_punctuation() {
        let input = "p@ss-w0rd!#$%^&*+=.,<>?/|~:";
        assert_eq!(validate_no_injection_attempt(input, PASSWORD_FIELD), Ok(input));
    }

    #[test]
    fn test_sanitize_success() {
        let credential = sanitize_credentials(&raw(Some("alice_01"), Some("s3cret"))).unwrap();
        assert_eq!(credential.username(), "alice_01");
        assert_eq!(credential.expose_password(), "s3cret");
    }

    #[test]
    fn test_sanitize_username_before_password() {
        let err = sanitize_credentials(&raw(Some("bad-name"), Some(""))).unwrap_err();
        assert_eq!(err.field(), USERNAME_FIELD);
    }

    #[test]
    fn test_sanitize_blocks_injection_in_username() {
        let err = sanitize_credentials(&raw(Some("bob;drop"), Some("s3cret"))).unwrap_err();
        assert_eq!(
            err,
            CredentialError::InjectionAttempt {
                field: USERNAME_FIELD
            }
        );

        // Called on its own, the format check still reports the character set
        assert_eq!(
            validate_username(Some("bob;drop")),
            Err(CredentialError::InvalidFormat {
                field: USERNAME_FIELD
            })
        );
    }

    #[test]
    fn test_sanitize_empty_username_is_not_injection() {
        for username in [None, Some("")] {
            let err = sanitize_credentials(&raw(username, Some("s3cret;"))).unwrap_err();
            assert_eq!(
                err,
                CredentialError::EmptyInput {
                    field: USERNAME_FIELD
                }
            );
        }
    }

    #[test]
    fn test_sanitize_malformed_username() {
        let err = sanitize_credentials(&raw(Some("bob.smith"), Some("s3cret"))).unwrap_err();
        assert_eq!(
            err,
            CredentialError::InvalidFormat {
                field: USERNAME_FIELD
            }
        );
    }

    #[test]
    fn test_sanitize_blocks_injection_in_password() {
        let err = sanitize_credentials(&raw(Some("alice"), Some("x' OR '1'='1"))).unwrap_err();
        assert_eq!(
            err,
            CredentialError::InjectionAttempt {
                field: PASSWORD_FIELD
            }
        );
    }

    #[test]
    fn test_error_messages_do_not_echo_input() {
        let err = sanitize_credentials(&raw(Some("alice"), Some("hunter2;"))).unwrap_err();
        assert!(!err.to_string().contains("hunter2"));
    }

    proptest! {
        #[test]
        fn prop_valid_usernames_round_trip(name in "[A-Za-z0-9_]{1,64}") {
            let checked = validate_username(Some(&name))
                .and_then(|n| validate_no_injection_attempt(n, USERNAME_FIELD));
            prop_assert_eq!(checked, Ok(name.as_str()));
        }

        #[test]
        fn prop_blocked_character_always_rejected(
            prefix in "[A-Za-z0-9_]{0,16}",
            blocked in prop::sample::select(BLOCKED_CHARACTERS.to_vec()),
            suffix in ".{0,16}",
        ) {
            let input = format!("{prefix}{blocked}{suffix}");
            prop_assert_eq!(
                validate_no_injection_attempt(&input, PASSWORD_FIELD),
                Err(CredentialError::InjectionAttempt { field: PASSWORD_FIELD })
            );
        }

        #[test]
        fn prop_passwords_without_blocked_characters_pass(password in "[^{}()\\[\\]'\"`;\\\\]{1,64}") {
            let checked = validate_password(Some(&password))
                .and_then(|p| validate_no_injection_attempt(p, PASSWORD_FIELD));
            prop_assert_eq!(checked, Ok(password.as_str()));
        }
    }
}
