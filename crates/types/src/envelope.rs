//! Uniform response envelope applied to every outbound payload

use std::fmt::Display;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Transport-level wrapper. Exactly one of `data` and `error` is set, and
/// `success` is true iff `error` is null. The fields are private so the only
/// way to build one is through the constructors below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
    timestamp: String,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: now_iso8601(),
        }
    }

    /// Failed response carrying an error message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            timestamp: now_iso8601(),
        }
    }

    /// Wrap an operation outcome
    pub fn from_result<E: Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::error(err.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Envelope invariant, useful when deserializing untrusted bodies
    pub fn is_well_formed(&self) -> bool {
        self.success == self.error.is_none() && self.data.is_some() != self.error.is_some()
    }
}

fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope() {
        let response = ApiResponse::ok(vec![1, 2, 3]);
        assert!(response.is_success());
        assert!(response.is_well_formed());
        assert_eq!(response.data(), Some(&vec![1, 2, 3]));
        assert!(response.error_message().is_none());
        assert!(response.timestamp().ends_with('Z'));
    }

    #[test]
    fn test_error_envelope_serializes_null_data() {
        let response: ApiResponse<u32> = ApiResponse::error("boom");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], false);
        assert!(json["data"].is_null());
        assert_eq!(json["error"], "boom");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_from_result() {
        let ok: ApiResponse<&str> = ApiResponse::from_result(Ok::<_, String>("fine"));
        assert!(ok.is_success());

        let failed: ApiResponse<&str> = ApiResponse::from_result(Err("nope"));
        assert!(!failed.is_success());
        assert_eq!(failed.error_message(), Some("nope"));
        assert!(failed.is_well_formed());
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let response = ApiResponse::ok(());
        assert!(chrono::DateTime::parse_from_rfc3339(response.timestamp()).is_ok());
    }
}
