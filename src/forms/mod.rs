use std::borrow::Cow;

use validator::ValidationErrors;

use crate::services::errors::FieldError;

pub mod ingredients;
pub mod recipes;
pub mod tags;
pub mod users;

/// Flatten `validator` output into field-attributed errors, sorted by field.
pub fn validation_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut result: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            let field = field.to_string();
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .clone()
                    .unwrap_or_else(|| Cow::Owned(format!("invalid value ({})", error.code)));
                FieldError::new(field.clone(), message)
            })
        })
        .collect();
    result.sort_by(|a, b| a.field.cmp(&b.field));
    result
}

/// Collapse runs of whitespace into single spaces and drop control characters.
pub fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}
