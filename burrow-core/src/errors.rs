//! Structured errors for Burrow.
//!
//! Burrow errors carry an HTTP-shaped kind plus a message and optional JSON
//! payload, and they travel inside `anyhow::Error` so collaborator traits can
//! stay on `anyhow::Result` while the HTTP layer still recovers status and
//! body shape at the edge.

use std::fmt;

use anyhow::Error as AnyError;

/// Convenience result type for Burrow core APIs.
pub type BurrowResult<T> = std::result::Result<T, AnyError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,   // 400
    NotFound,     // 404
    Conflict,     // 409
    GeneralError, // 500
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::GeneralError => 500,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::GeneralError => "GeneralError",
        }
    }
}

/// A structured Burrow error that can live inside `anyhow::Error`.
#[derive(Debug)]
pub struct BurrowError {
    pub kind: ErrorKind,
    pub message: String,
    pub data: Option<serde_json::Value>,
    pub source: Option<AnyError>,
}

impl BurrowError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            data: None,
            source: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
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

    /// Convert into `anyhow::Error` so it flows through `?` chains.
    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    /// Downcast an `anyhow::Error` to a `BurrowError` if possible.
    pub fn from_anyhow(err: &AnyError) -> Option<&BurrowError> {
        err.downcast_ref::<BurrowError>()
    }

    /// Turn any error into a BurrowError, wrapping unknowns as GeneralError.
    pub fn normalize(err: AnyError) -> BurrowError {
        match err.downcast::<BurrowError>() {
            Ok(burrow) => burrow,
            Err(other) => {
                BurrowError::new(ErrorKind::GeneralError, other.to_string()).with_source(other)
            }
        }
    }

    /// A version safe to return to clients: keeps kind/message/data, drops
    /// the inner source chain.
    pub fn sanitize_for_client(&self) -> BurrowError {
        BurrowError {
            kind: self.kind,
            message: self.message.clone(),
            data: self.data.clone(),
            source: None,
        }
    }

    /// JSON payload for HTTP responses.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let mut base = json!({
            "name": self.name(),
            "message": self.message,
            "code": self.code(),
        });

        if let Some(d) = &self.data {
            base["data"] = d.clone();
        }
        base
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, msg)
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, msg)
    }
    pub fn general_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::GeneralError, msg)
    }
}

impl fmt::Display for BurrowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.code(), self.message)
    }
}

impl std::error::Error for BurrowError {
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
    fn travels_through_anyhow() {
        let err = BurrowError::not_found("no tenant named acme").into_anyhow();
        let burrow = BurrowError::from_anyhow(&err).unwrap();
        assert_eq!(burrow.code(), 404);
        assert_eq!(burrow.name(), "NotFound");
    }

    #[test]
    fn normalize_wraps_unknown_errors() {
        let err = anyhow::anyhow!("boom");
        let burrow = BurrowError::normalize(err);
        assert_eq!(burrow.kind, ErrorKind::GeneralError);
        assert!(burrow.message.contains("boom"));
    }

    #[test]
    fn to_json_includes_data_when_present() {
        let err = BurrowError::bad_request("bad claim").with_data(json!({"claim": "x"}));
        let body = err.to_json();
        assert_eq!(body["name"], "BadRequest");
        assert_eq!(body["code"], 400);
        assert_eq!(body["data"], json!({"claim": "x"}));
    }
}
