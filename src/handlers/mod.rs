pub mod authors;
pub mod books;

use axum::http::StatusCode;
use tracing::{error, warn};

use crate::db::repositories::RepositoryError;

/// Handler for GET /
pub async fn hello() -> &'static str {
    "Hello, World!"
}

/// Maps a repository failure onto the `(StatusCode, String)` error the
/// handlers return. Client mistakes are 422, everything else is logged as a
/// database error and reported as 500.
pub(crate) fn repository_error(err: RepositoryError, context: &str) -> (StatusCode, String) {
    if err.is_client_error() {
        warn!(error = %err, "{}", context);
        return (StatusCode::UNPROCESSABLE_ENTITY, err.to_string());
    }
    error!(error = %err, "{}", context);
    (StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_references_map_to_unprocessable_entity() {
        let (status, body) = repository_error(RepositoryError::UnknownAuthor(12), "creating book");
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, "author 12 does not exist");
    }

    #[test]
    fn validation_failures_map_to_unprocessable_entity_with_the_message() {
        let (status, body) = repository_error(
            RepositoryError::Validation("Title must not be empty".to_string()),
            "creating book",
        );
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, "Title must not be empty");
    }

    #[test]
    fn database_failures_map_to_internal_server_error() {
        let (status, body) = repository_error(
            RepositoryError::Database(diesel::result::Error::RollbackTransaction),
            "listing books",
        );
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.starts_with("Database error: "));
    }
}
