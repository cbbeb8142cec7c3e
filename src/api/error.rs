use reqwest::StatusCode;
use thiserror::Error;

/// Cap on how much of an error response body is carried in messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - token may be expired or revoked")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited by the platform API")]
    RateLimited,

    #[error("Upstream server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl ApiError {
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let body = truncate_body(body);
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::FORBIDDEN => ApiError::Forbidden(body),
            StatusCode::NOT_FOUND => ApiError::NotFound(body),
            StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited,
            s if s.is_server_error() => ApiError::ServerError(body),
            s => ApiError::UnexpectedResponse(format!("HTTP {}: {}", s, body)),
        }
    }

    /// True when the error means the session token is no longer valid.
    /// 403 is a permissions problem, not a stale session, so it does not count.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Keep messages readable when the server sends back a whole HTML page.
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{} [truncated from {} bytes]", &body[..end], body.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "nope"),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, ""),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream"),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, ""),
            ApiError::UnexpectedResponse(_)
        ));
    }

    #[test]
    fn test_truncates_long_error_bodies() {
        let body = "x".repeat(2000);
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        let message = err.to_string();
        assert!(message.len() < 700);
        assert!(message.contains("truncated from 2000 bytes"));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // A multibyte character straddling the cut must not split
        let body = format!(
            "{}é{}",
            "x".repeat(MAX_ERROR_BODY_LENGTH - 1),
            "y".repeat(600)
        );
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn test_auth_failure_classification() {
        assert!(ApiError::Unauthorized.is_auth_failure());
        assert!(!ApiError::Forbidden("forbidden".into()).is_auth_failure());
        assert!(!ApiError::RateLimited.is_auth_failure());
    }
}
