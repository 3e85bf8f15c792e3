//! Error taxonomy of the client.
//!
//! Nothing here is fatal: every variant degrades a single action or UI region
//! and maps to a translated message through [`ApiError::message_key`] or
//! [`FormError::message_key`].

use thiserror::Error;

use crate::i18n::{Language, LocaleStore};

/// Failure of a single API call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The server answered with a non-success status
    #[error("request failed with status {status}")]
    Http {
        status: u16,
        /// `error` field of the response body, when the server sent one
        message: Option<String>,
    },
    /// The request never completed
    #[error("network error: {0}")]
    Network(String),
    /// The response body did not match the expected shape
    #[error("failed to decode response: {0}")]
    Decode(String),
    /// The request body could not be serialised
    #[error("failed to encode request: {0}")]
    Encode(String),
}

impl ApiError {
    /// The session cookie is missing or expired
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Http { status: 401, .. })
    }

    /// Translation key describing this failure when no server text applies
    pub fn message_key<'a>(&self, action_key: &'a str) -> &'a str {
        match self {
            ApiError::Network(_) => "messages.network_error",
            _ => action_key,
        }
    }

    /// Text shown to the user for this failure.
    ///
    /// The server's own (already localised) `error` text wins; otherwise the
    /// translation of `action_key`, or the generic network message.
    pub fn user_message(&self, store: &LocaleStore, language: Language, action_key: &str) -> String {
        match self {
            ApiError::Http { message: Some(message), .. } if !message.trim().is_empty() => {
                message.clone()
            }
            other => store.resolve(language, other.message_key(action_key)),
        }
    }
}

/// Client-side rejection of form input before anything reaches the network
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("amount must be positive")]
    AmountNotPositive,
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("invalid transaction type: {0}")]
    InvalidType(String),
}

impl FormError {
    pub fn message_key(&self) -> &'static str {
        match self {
            FormError::Required("category") => "errors.category_required",
            FormError::Required(_) => "errors.field_required",
            FormError::InvalidAmount(_) => "errors.invalid_amount",
            FormError::AmountNotPositive => "errors.amount_not_positive",
            FormError::InvalidDate(_) => "errors.invalid_date",
            FormError::InvalidType(_) => "errors.invalid_type",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_wins() {
        let store = LocaleStore::with_baseline();
        let err = ApiError::Http {
            status: 401,
            message: Some("Invalid username or password".to_string()),
        };
        assert!(err.is_unauthorized());
        assert_eq!(
            err.user_message(&store, Language::En, "messages.login_failed"),
            "Invalid username or password"
        );
    }

    #[test]
    fn test_network_error_uses_generic_message() {
        let store = LocaleStore::with_baseline();
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(err.message_key("messages.login_failed"), "messages.network_error");
        assert_eq!(
            err.user_message(&store, Language::En, "messages.login_failed"),
            "Network error, please try again"
        );
    }

    #[test]
    fn test_status_without_body_uses_action_message() {
        let store = LocaleStore::with_baseline();
        let err = ApiError::Http { status: 500, message: None };
        assert!(!err.is_unauthorized());
        assert_eq!(
            err.user_message(&store, Language::Zh, "messages.load_failed"),
            "加载数据失败"
        );
    }

    #[test]
    fn test_form_error_keys() {
        assert_eq!(FormError::Required("category").message_key(), "errors.category_required");
        assert_eq!(FormError::Required("amount").message_key(), "errors.field_required");
        assert_eq!(FormError::AmountNotPositive.message_key(), "errors.amount_not_positive");
    }
}
