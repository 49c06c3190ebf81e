use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::JsonResponse;

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    NotAuthorized(&'static str),
    #[error("Forbidden")]
    Forbidden,
    #[error("{0}")]
    RunTimeError(&'static str),
    #[error("Internal Server Error")]
    ServerError,
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct RequestErrorJsonWrapper {
    pub errors: RequestErrorJson,
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct RequestErrorJson {
    pub body: Vec<String>,
}

impl RequestErrorJsonWrapper {
    pub fn new(error: &str) -> RequestErrorJsonWrapper {
        RequestErrorJsonWrapper {
            errors: RequestErrorJson {
                body: vec![error.to_string()],
            },
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> axum::response::Response {
        self.to_json_response().into_response()
    }
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::NotFound(_) => StatusCode::NOT_FOUND,
            RequestError::NotAuthorized(_) => StatusCode::UNAUTHORIZED,
            RequestError::Forbidden => StatusCode::FORBIDDEN,
            RequestError::RunTimeError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RequestError::ServerError | RequestError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_json_response(&self) -> JsonResponse<RequestErrorJsonWrapper> {
        let json = match self {
            RequestError::DatabaseError(e) => {
                tracing::error!(error = %e, "database error");
                RequestErrorJsonWrapper::new("Internal Server Error")
            }
            other => RequestErrorJsonWrapper::new(&other.to_string()),
        };
        (self.status_code(), Json(json))
    }

    /// True when the database rejected a write on a UNIQUE constraint.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            RequestError::DatabaseError(sqlx::Error::Database(e)) => {
                e.message().contains("UNIQUE constraint failed")
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_failures_and_ownership_failures_map_to_distinct_statuses() {
        assert_eq!(
            RequestError::NotFound("Post not found").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(RequestError::Forbidden.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn database_errors_do_not_leak_details() {
        let (status, Json(body)) =
            RequestError::DatabaseError(sqlx::Error::RowNotFound).to_json_response();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.errors.body, vec!["Internal Server Error".to_string()]);
    }
}
