//! # Errors
//!
//! VaListo uses a small set of structured errors for anything a client
//! can observe. Core goals:
//! - consistent status codes + class names
//! - can be carried through anyhow::Error (handlers stay `Result`-shaped)
//! - transport-agnostic (the axum crate decides how to serialize)

use std::fmt;

use anyhow::Error as AnyError;

/// A convenience result type for VaListo core APIs.
pub type ValistoResult<T> = std::result::Result<T, AnyError>;

/// Error class names + status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,       // 400
    NotAuthenticated, // 401
    Forbidden,        // 403
    NotFound,         // 404
    Unprocessable,    // 422
    GeneralError,     // 500
    Unavailable,      // 503
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::NotAuthenticated => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Unprocessable => 422,
            ErrorKind::GeneralError => 500,
            ErrorKind::Unavailable => 503,
        }
    }

    /// Error `name` (e.g. "NotFound")
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::NotAuthenticated => "NotAuthenticated",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Unprocessable => "Unprocessable",
            ErrorKind::GeneralError => "GeneralError",
            ErrorKind::Unavailable => "Unavailable",
        }
    }

    /// Error `className` (kebab-cased)
    pub fn class_name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad-request",
            ErrorKind::NotAuthenticated => "not-authenticated",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Unprocessable => "unprocessable",
            ErrorKind::GeneralError => "general-error",
            ErrorKind::Unavailable => "unavailable",
        }
    }
}

/// A structured VaListo error that can live inside `anyhow::Error`.
///
/// Fields:
/// - name
/// - message
/// - code (HTTP status)
/// - class_name
/// - data (optional)
/// - errors (optional)
#[derive(Debug)]
pub struct ValistoError {
    pub kind: ErrorKind,
    pub message: String,
    pub data: Option<serde_json::Value>,
    pub errors: Option<serde_json::Value>,
    pub source: Option<AnyError>,
}

impl ValistoError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            data: None,
            errors: None,
            source: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_errors(mut self, errors: serde_json::Value) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_source(mut self, source: AnyError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }

    /// Convert into `anyhow::Error` so it flows through handler pipelines.
    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    /// Downcast an `anyhow::Error` to a `ValistoError` if possible.
    pub fn from_anyhow(err: &AnyError) -> Option<&ValistoError> {
        err.downcast_ref::<ValistoError>()
    }

    /// Turn any error into a ValistoError:
    /// - if it's already a ValistoError, keep it (lossless)
    /// - otherwise wrap as GeneralError
    pub fn normalize(err: AnyError) -> ValistoError {
        match err.downcast::<ValistoError>() {
            Ok(valisto) => valisto,
            Err(other) => {
                ValistoError::new(ErrorKind::GeneralError, other.to_string()).with_source(other)
            }
        }
    }

    /// A "safe" version suitable for returning to clients:
    /// - keep kind/message/code/class_name/data/errors
    /// - drop the inner `source` (stack/secret details)
    pub fn sanitize_for_client(&self) -> ValistoError {
        ValistoError {
            kind: self.kind,
            message: self.message.clone(),
            data: self.data.clone(),
            errors: self.errors.clone(),
            source: None,
        }
    }

    /// JSON payload as serialized over the wire.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let mut base = json!({
            "name": self.name(),
            "message": self.message,
            "code": self.code(),
            "className": self.class_name(),
        });

        if let Some(d) = &self.data {
            base["data"] = d.clone();
        }
        if let Some(e) = &self.errors {
            base["errors"] = e.clone();
        }
        base
    }

    // ---- Constructors ----

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, msg)
    }
    pub fn not_authenticated(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAuthenticated, msg)
    }
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, msg)
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }
    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unprocessable, msg)
    }
    pub fn general_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::GeneralError, msg)
    }
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, msg)
    }
}

impl fmt::Display for ValistoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.code(), self.message)
    }
}

impl std::error::Error for ValistoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn to_json_carries_name_code_and_class() {
        let err = ValistoError::not_found("tenant missing")
            .with_errors(json!({"tenantId": ["unknown"]}));
        let body = err.to_json();
        assert_eq!(body["name"], "NotFound");
        assert_eq!(body["code"], 404);
        assert_eq!(body["className"], "not-found");
        assert_eq!(body["errors"], json!({"tenantId": ["unknown"]}));
    }

    #[test]
    fn normalize_keeps_structured_errors_lossless() {
        let original = ValistoError::forbidden("nope").into_anyhow();
        let normalized = ValistoError::normalize(original);
        assert_eq!(normalized.kind, ErrorKind::Forbidden);
        assert_eq!(normalized.message, "nope");
    }

    #[test]
    fn normalize_wraps_plain_errors_as_general() {
        let normalized = ValistoError::normalize(anyhow::anyhow!("boom"));
        assert_eq!(normalized.kind, ErrorKind::GeneralError);
        assert!(normalized.source.is_some());
    }

    #[test]
    fn sanitize_drops_the_source() {
        let err = ValistoError::general_error("sync failed")
            .with_source(anyhow::anyhow!("connection reset"));
        assert!(err.sanitize_for_client().source.is_none());
    }
}
