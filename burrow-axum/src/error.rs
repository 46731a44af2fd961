use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use burrow_core::BurrowError;

/// Error wrapper handlers can bubble into with `?`. Structured burrow errors
/// (even wrapped by anyhow contexts) keep their status and JSON shape;
/// anything else becomes a sanitized 500.
#[derive(Debug)]
pub struct BurrowAxumError(pub anyhow::Error);

impl From<anyhow::Error> for BurrowAxumError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for BurrowAxumError {
    fn into_response(self) -> Response {
        if let Some(err) = self.0.chain().find_map(|e| e.downcast_ref::<BurrowError>()) {
            let safe = err.sanitize_for_client();
            let status =
                StatusCode::from_u16(safe.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return (status, Json(safe.to_json())).into_response();
        }

        let err = BurrowError::general_error(self.0.to_string());
        let safe = err.sanitize_for_client();
        let status =
            StatusCode::from_u16(safe.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(safe.to_json())).into_response()
    }
}
