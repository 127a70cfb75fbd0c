// Validation of submitted input lines
// Every failure here is recoverable: the caller re-prompts

use thiserror::Error;

use crate::xtm_session::Action;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid input. Enter a number between {min} and {max}.")]
    OutOfRange { min: i64, max: i64 },
    #[error("Invalid action!")]
    InvalidAction,
    #[error("Please enter a single word without spaces.")]
    NotAToken,
}

/// Parse an integer in `min..=max`
pub fn parse_bounded(text: &str, min: i64, max: i64) -> Result<i64, InputError> {
    match text.trim().parse::<i64>() {
        Ok(v) if (min..=max).contains(&v) => Ok(v),
        _ => Err(InputError::OutOfRange { min, max }),
    }
}

/// Parse a reveal/flag action; only the first character counts, case-insensitive
pub fn parse_action(text: &str) -> Result<Action, InputError> {
    match text.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('r') => Ok(Action::Reveal),
        Some('f') => Ok(Action::Flag),
        _ => Err(InputError::InvalidAction),
    }
}

/// Accept a non-empty, whitespace-free word (names and difficulty filters)
pub fn parse_token(text: &str) -> Result<String, InputError> {
    let t = text.trim();
    if t.is_empty() || t.chars().any(char::is_whitespace) {
        return Err(InputError::NotAToken);
    }
    Ok(t.to_string())
}
