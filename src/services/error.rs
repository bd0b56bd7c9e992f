use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by the Gemini and Linkd clients
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{service} request failed: {message}")]
    Network { service: &'static str, message: String },

    #[error("{service} request timed out")]
    Timeout { service: &'static str },

    #[error("{service} rejected credentials: {message}")]
    Auth { service: &'static str, message: String },

    #[error("{service} rate limit reached: {message}")]
    RateLimited { service: &'static str, message: String },

    #[error("{message}")]
    Upstream {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("{service} returned an invalid response: {message}")]
    InvalidResponse { service: &'static str, message: String },

    #[error("{service} is not configured: {message}")]
    NotConfigured { service: &'static str, message: String },
}

impl ServiceError {
    /// Classify a transport-level reqwest failure
    pub fn from_reqwest(service: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Timeout { service }
        } else if err.is_decode() {
            ServiceError::InvalidResponse {
                service,
                message: err.to_string(),
            }
        } else {
            ServiceError::Network {
                service,
                message: err.to_string(),
            }
        }
    }

    /// Classify a non-success HTTP status with an already-extracted detail message
    pub fn from_status(service: &'static str, status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ServiceError::Auth { service, message }
            }
            StatusCode::TOO_MANY_REQUESTS => ServiceError::RateLimited { service, message },
            _ => ServiceError::Upstream {
                service,
                status: status.as_u16(),
                message,
            },
        }
    }

    /// True when the remote service answered, even if with an error
    pub fn is_completed_call(&self) -> bool {
        matches!(
            self,
            ServiceError::Auth { .. }
                | ServiceError::RateLimited { .. }
                | ServiceError::Upstream { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let err = ServiceError::from_status("linkd", StatusCode::UNAUTHORIZED, "bad key".into());
        assert!(matches!(err, ServiceError::Auth { .. }));

        let err = ServiceError::from_status("linkd", StatusCode::TOO_MANY_REQUESTS, "slow".into());
        assert!(matches!(err, ServiceError::RateLimited { .. }));

        let err = ServiceError::from_status("linkd", StatusCode::BAD_GATEWAY, "down".into());
        assert!(matches!(err, ServiceError::Upstream { status: 502, .. }));
        assert_eq!(err.to_string(), "down");
    }

    #[test]
    fn test_completed_call() {
        assert!(ServiceError::Upstream { service: "gemini", status: 500, message: String::new() }
            .is_completed_call());
        assert!(!ServiceError::Timeout { service: "gemini" }.is_completed_call());
    }
}
