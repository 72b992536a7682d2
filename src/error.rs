use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Reasons a replication check reports unhealthy.
///
/// Every variant renders as `500 Internal Server Error` with the display text
/// as a plain-text body. Callers only distinguish healthy from not.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Cannot connect to MySQL")]
    Connect(#[source] sqlx::Error),

    #[error("{0}")]
    Query(#[source] sqlx::Error),

    #[error("Timed out after {}s waiting for MySQL", .0.as_secs())]
    Timeout(Duration),

    #[error("Cannot get replica status.")]
    NotReplica,

    #[error("Replica IO thread is not running.")]
    IoThreadStopped,

    #[error("Replica SQL thread is not running.")]
    SqlThreadStopped,
}

impl IntoResponse for CheckError {
    fn into_response(self) -> Response {
        match &self {
            CheckError::Connect(source) => {
                tracing::error!(error = %source, "{}", self);
            }
            _ => tracing::error!("{}", self),
        }

        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::CONTENT_TYPE;

    #[test]
    fn test_check_error_display() {
        assert_eq!(
            CheckError::NotReplica.to_string(),
            "Cannot get replica status."
        );
        assert_eq!(
            CheckError::IoThreadStopped.to_string(),
            "Replica IO thread is not running."
        );
        assert_eq!(
            CheckError::SqlThreadStopped.to_string(),
            "Replica SQL thread is not running."
        );
        assert_eq!(
            CheckError::Timeout(Duration::from_secs(3)).to_string(),
            "Timed out after 3s waiting for MySQL"
        );
    }

    #[test]
    fn test_connect_error_hides_driver_detail() {
        let err = CheckError::Connect(sqlx::Error::Protocol("handshake failed".into()));
        assert_eq!(err.to_string(), "Cannot connect to MySQL");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_query_error_shows_driver_message() {
        let driver = sqlx::Error::Protocol("access denied".into());
        let expected = driver.to_string();
        let err = CheckError::Query(driver);
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn test_every_error_is_500_plain_text() {
        for err in [
            CheckError::NotReplica,
            CheckError::IoThreadStopped,
            CheckError::SqlThreadStopped,
            CheckError::Timeout(Duration::from_secs(1)),
            CheckError::Connect(sqlx::Error::PoolTimedOut),
            CheckError::Query(sqlx::Error::RowNotFound),
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let content_type = response.headers().get(CONTENT_TYPE).unwrap();
            assert!(content_type.to_str().unwrap().starts_with("text/plain"));
        }
    }
}
