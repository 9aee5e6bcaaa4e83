use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{debug, info};

use super::repository_error;
use crate::db::models::author::CreateAuthor;
use crate::db::repositories::author::AuthorRepository;
use crate::router::AppState;

// Handler for GET /authors
pub async fn get_authors(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    debug!("Fetching all authors");
    let repo = AuthorRepository::new(state.pool.clone());
    match repo.find_all().await {
        Ok(authors) => Ok(Json(authors)),
        Err(e) => Err(repository_error(e, "Failed to fetch authors")),
    }
}

// Handler for GET /authors/:id
pub async fn get_author(
    State(state): State<AppState>,
    Path(author_id): Path<i32>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    debug!("Fetching author {}", author_id);
    let repo = AuthorRepository::new(state.pool.clone());
    match repo.find(author_id).await {
        Ok(Some(author)) => Ok(Json(author)),
        Ok(None) => {
            let error_msg = format!("Author with ID {} not found", author_id);
            debug!("{}", error_msg);
            Err((StatusCode::NOT_FOUND, error_msg))
        }
        Err(e) => Err(repository_error(e, "Failed to fetch author")),
    }
}

// Handler for POST /authors
pub async fn create_author(
    State(state): State<AppState>,
    Json(payload): Json<CreateAuthor>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let repo = AuthorRepository::new(state.pool.clone());
    match repo.create(payload).await {
        Ok(author) => {
            info!(author_id = author.author.id, name = %author.author.name, "Author created");
            Ok(Json(author))
        }
        Err(e) => Err(repository_error(e, "Failed to create author")),
    }
}
