use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// Error kinds that cross the API boundary. Each maps to a fixed status
/// code and a stable `error` tag in the JSON body; anything unanticipated
/// collapses into `internal` with the source kept server-side only.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("invalid input: {details:?}")]
    InvalidInput { details: Vec<String> },
    #[error("nothing to update")]
    NothingToUpdate,
    #[error("not found")]
    NotFound,
    #[error("conflict")]
    Conflict,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::InvalidInput {
            details: vec![detail.into()],
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } | ApiError::NothingToUpdate => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "unauthorized",
            ApiError::Forbidden => "forbidden",
            ApiError::InvalidInput { .. } => "invalid_input",
            ApiError::NothingToUpdate => "nothing_to_update",
            ApiError::NotFound => "not_found",
            ApiError::Conflict => "conflict",
            ApiError::Internal(_) => "internal",
        }
    }
}

/// Single translation boundary for store errors. The unique constraint on
/// users.email is authoritative for duplicates, so a lost
/// check-then-insert race still surfaces as `conflict`.
impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => ApiError::Conflict,
            other => ApiError::Internal(other.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref e) = self {
            error!(error = %e, "internal error");
        }
        let body = match &self {
            ApiError::InvalidInput { details } => json!({ "error": self.tag(), "details": details }),
            _ => json!({ "error": self.tag() }),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_kinds() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::invalid("bad field").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NothingToUpdate.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict.status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn wire_tags_are_stable() {
        assert_eq!(ApiError::Unauthorized.tag(), "unauthorized");
        assert_eq!(ApiError::Forbidden.tag(), "forbidden");
        assert_eq!(ApiError::invalid("x").tag(), "invalid_input");
        assert_eq!(ApiError::NothingToUpdate.tag(), "nothing_to_update");
        assert_eq!(ApiError::NotFound.tag(), "not_found");
        assert_eq!(ApiError::Conflict.tag(), "conflict");
        assert_eq!(ApiError::Internal(anyhow::anyhow!("boom")).tag(), "internal");
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn responses_carry_the_mapped_status() {
        assert_eq!(
            ApiError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::invalid("email: must be a valid email address")
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom"))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
