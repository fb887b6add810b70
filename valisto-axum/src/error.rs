use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use valisto_core::ValistoError;

#[derive(Debug)]
pub struct ValistoAxumError(pub anyhow::Error);

impl From<anyhow::Error> for ValistoAxumError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ValistoAxumError {
    fn into_response(self) -> Response {
        // If it's a ValistoError (even wrapped in anyhow contexts), preserve the structured fields
        if let Some(err) = self.0.chain().find_map(|e| e.downcast_ref::<ValistoError>()) {
            let safe = err.sanitize_for_client();
            let status =
                StatusCode::from_u16(safe.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return (status, Json(safe.to_json())).into_response();
        }

        // Fallback: wrap any other error as a GeneralError
        let err = ValistoError::general_error(self.0.to_string());
        let safe = err.sanitize_for_client();
        let status =
            StatusCode::from_u16(safe.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(safe.to_json())).into_response()
    }
}
