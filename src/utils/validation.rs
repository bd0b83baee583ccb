use std::sync::LazyLock;

use regex::Regex;

use crate::post::post_model::PostInput;
use crate::utils::error::CustomError;

pub const MIN_PASSWORD_LENGTH: usize = 5;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$").unwrap()
});

/// Trims title and content and rejects the input if either ends up empty.
pub fn validate_post_input(input: PostInput) -> Result<PostInput, CustomError> {
    let title = input.title.trim();
    let content = input.content.trim();

    if title.is_empty() || content.is_empty() {
        return Err(CustomError::ValidationError(
            "Validation failed, entered data is incorrect!".into(),
        ));
    }

    Ok(PostInput {
        title: title.to_string(),
        content: content.to_string(),
    })
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_password(password: &str) -> Result<(), CustomError> {
    if password.trim().chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CustomError::ValidationError(format!(
            "Password must be at least {} characters long.",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, content: &str) -> PostInput {
        PostInput {
            title: title.into(),
            content: content.into(),
        }
    }

    #[test]
    fn post_input_is_trimmed() {
        let valid = validate_post_input(input("  A ", "B\n")).unwrap();
        assert_eq!(valid.title, "A");
        assert_eq!(valid.content, "B");
    }

    #[test]
    fn blank_title_or_content_fails() {
        assert!(matches!(
            validate_post_input(input("   ", "B")),
            Err(CustomError::ValidationError(_))
        ));
        assert!(matches!(
            validate_post_input(input("A", "")),
            Err(CustomError::ValidationError(_))
        ));
    }

    #[test]
    fn email_check() {
        assert!(is_valid_email("max@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("max@"));
        assert!(!is_valid_email("not an email"));
    }

    #[test]
    fn password_length_ignores_surrounding_whitespace() {
        assert!(validate_password("12345").is_ok());
        assert!(validate_password("  1234  ").is_err());
    }
}
