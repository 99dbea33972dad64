//! Request validation glue for `validator`-derived input structs.

use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// Run `validator` rules on `input`, mapping failures to [`CoreError::Validation`].
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(describe(&errors)))
}

/// Flatten field errors into a stable `field: message; field: message` string.
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let messages: Vec<String> = errs
                .iter()
                .map(|e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => e.code.to_string(),
                })
                .collect();
            format!("{field}: {}", messages.join(", "))
        })
        .collect();
    parts.sort();
    parts.join("; ")
}
