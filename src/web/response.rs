//! HTTP rendering of acknowledgments
//!
//! 204 carries no body. 400 and 500 carry `{"error": kind, "message": text}`.

use crate::core::processing::Acknowledgment;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

impl IntoResponse for Acknowledgment {
    fn into_response(self) -> Response {
        match self {
            Acknowledgment::Accepted => StatusCode::NO_CONTENT.into_response(),
            Acknowledgment::Rejected(body) => (StatusCode::BAD_REQUEST, Json(body)).into_response(),
            Acknowledgment::Retry(body) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::processing::ErrorBody;

    #[test]
    fn test_status_codes_match_acknowledgment() {
        let body = ErrorBody {
            error: "validation_error",
            message: "documentId missing".to_string(),
        };

        for ack in [
            Acknowledgment::Accepted,
            Acknowledgment::Rejected(body.clone()),
            Acknowledgment::Retry(body),
        ] {
            let expected = ack.status_code();
            assert_eq!(ack.into_response().status().as_u16(), expected);
        }
    }
}
