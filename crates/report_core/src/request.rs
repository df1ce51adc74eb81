use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern"));

/// Fixed report parameters sent with every submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDefaults {
    pub language: String,
    pub time_range: String,
    pub count_hint: String,
}

impl Default for ReportDefaults {
    fn default() -> Self {
        Self {
            language: "Chinese".to_string(),
            time_range: "最近7天內".to_string(),
            count_hint: "5-10篇".to_string(),
        }
    }
}

/// Local input problems, detected before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a search requirement")]
    MissingPrompt,
    #[error("Please enter an email address")]
    MissingEmail,
    #[error("Please enter a valid email address")]
    InvalidEmail,
}

/// A validated report request. Built once per submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub user_prompt: String,
    pub email: String,
    pub language: String,
    pub time_range: String,
    pub count_hint: String,
}

impl SubmissionRequest {
    /// Checks prompt, then email presence, then email shape. First failure wins.
    ///
    /// The prompt is sent trimmed. The email must match the shape exactly as entered.
    pub fn validate(
        prompt: &str,
        email: &str,
        defaults: &ReportDefaults,
    ) -> Result<Self, ValidationError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ValidationError::MissingPrompt);
        }
        if email.trim().is_empty() {
            return Err(ValidationError::MissingEmail);
        }
        // Shape is checked on the field as typed; padding is not stripped.
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(Self {
            user_prompt: prompt.to_string(),
            email: email.to_string(),
            language: defaults.language.clone(),
            time_range: defaults.time_range.clone(),
            count_hint: defaults.count_hint.clone(),
        })
    }
}

/// Basic `local@domain.tld` shape check, case-insensitive.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(&email.to_lowercase())
}
