//! Request-body and query extractors that report failures in the standard
//! error envelope.
//!
//! Axum's own `Json` and `Query` reject with plain-text bodies. These
//! wrappers turn every malformed body, unknown enum literal, missing field
//! and `validator` failure into `CoreError::Validation` (HTTP 400,
//! `VALIDATION_ERROR`) before the handler runs.

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use shootbook_core::error::CoreError;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::AppError;

/// JSON body that has been deserialized and passed `Validate::validate`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| CoreError::Validation(rejection.body_text()))?;
        value
            .validate()
            .map_err(|errors| CoreError::Validation(describe(&errors)))?;
        Ok(Self(value))
    }
}

/// Query string parameters, rejected in the standard envelope.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| CoreError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Flatten `validator` errors (including nested structs and lists) into one
/// message, sorted so the output is stable.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect(errors, &mut messages);
    if messages.is_empty() {
        return errors.to_string();
    }
    messages.sort();
    messages.dedup();
    messages.join("; ")
}

fn collect(errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    out.push(match &err.message {
                        Some(msg) => msg.to_string(),
                        None => format!("{field} is invalid"),
                    });
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, out),
            ValidationErrorsKind::List(items) => {
                for inner in items.values() {
                    collect(inner, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shootbook_db::models::project::ProjectInput;

    use super::*;

    fn errors_for(value: serde_json::Value) -> ValidationErrors {
        let input: ProjectInput = serde_json::from_value(value).unwrap();
        input.validate().unwrap_err()
    }

    #[test]
    fn describes_field_and_schema_errors() {
        let errors = errors_for(json!({
            "name": "Ad",
            "client": "Acme",
            "shoot_type": "Studio",
            "shoot_base": "Local",
            "resources": ["Extras"],
        }));
        let message = describe(&errors);
        assert!(message.contains("name must be at least 3 characters"));
        assert!(message.contains("extras_count"));
    }

    #[test]
    fn describes_nested_list_errors() {
        let errors = errors_for(json!({
            "name": "Launch Ad",
            "client": "Acme",
            "shoot_type": "Studio",
            "shoot_base": "Local",
            "script_files": [{ "name": "draft.pdf", "url": "nope" }],
        }));
        assert_eq!(describe(&errors), "script file url must be a valid URL");
    }
}
