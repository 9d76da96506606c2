//! API error taxonomy and the rejection handler that renders it as JSON.

use serde::Serialize;
use thiserror::Error;
use tracing::{event, Level};
use warp::{
    body::BodyDeserializeError,
    http::StatusCode,
    reject::{InvalidHeader, InvalidQuery, MethodNotAllowed, Reject},
    Rejection, Reply,
};

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Bad request")]
    BadRequest,
    #[error("Requested resource can not be found")]
    NotFound,
    #[error("Method not allowed for requested url")]
    MethodNotAllowed,
    #[error("Request can not be processed")]
    Unprocessable,
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Reject for ApiError {}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: String,
}

impl From<ApiError> for ErrorBody {
    fn from(err: ApiError) -> Self {
        ErrorBody {
            success: false,
            error: err.status().as_u16(),
            message: err.to_string(),
        }
    }
}

/// Classify a rejection. Handler errors win over routing rejections, since
/// warp keeps trying sibling routes after a handler rejects.
fn classify(r: &Rejection) -> ApiError {
    if let Some(err) = r.find::<ApiError>() {
        *err
    } else if r.find::<BodyDeserializeError>().is_some()
        || r.find::<InvalidQuery>().is_some()
        || r.find::<InvalidHeader>().is_some()
    {
        ApiError::BadRequest
    } else if r.find::<MethodNotAllowed>().is_some() {
        ApiError::MethodNotAllowed
    } else if r.is_not_found() {
        ApiError::NotFound
    } else {
        ApiError::Internal
    }
}

pub async fn return_error(r: Rejection) -> Result<impl Reply, Rejection> {
    let err = classify(&r);
    if err == ApiError::Internal {
        event!(Level::ERROR, rejection = ?r, "unhandled rejection");
    } else {
        event!(Level::INFO, status = err.status().as_u16(), "request rejected");
    }
    Ok(warp::reply::with_status(
        warp::reply::json(&ErrorBody::from(err)),
        err.status(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_rejections() {
        let rejection = warp::reject::custom(ApiError::Unprocessable);
        assert_eq!(classify(&rejection), ApiError::Unprocessable);
        assert_eq!(classify(&warp::reject::not_found()), ApiError::NotFound);
    }

    #[test]
    fn error_body_shape() {
        let body = serde_json::to_value(ErrorBody::from(ApiError::Unprocessable)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "success": false,
                "error": 422,
                "message": "Request can not be processed"
            })
        );
    }
}
