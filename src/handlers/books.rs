use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{debug, info};

use super::repository_error;
use crate::db::models::book::CreateBook;
use crate::db::repositories::book::BookRepository;
use crate::router::AppState;

// Handler for GET /books
pub async fn get_books(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    debug!("Fetching all books");
    let repo = BookRepository::new(state.pool.clone());
    match repo.find_all().await {
        Ok(books) => Ok(Json(books)),
        Err(e) => Err(repository_error(e, "Failed to fetch books")),
    }
}

// Handler for GET /books/:id
pub async fn get_book(
    State(state): State<AppState>,
    Path(book_id): Path<i32>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    debug!("Fetching book {}", book_id);
    let repo = BookRepository::new(state.pool.clone());
    match repo.find(book_id).await {
        Ok(Some(book)) => Ok(Json(book)),
        Ok(None) => {
            let error_msg = format!("Book with ID {} not found", book_id);
            debug!("{}", error_msg);
            Err((StatusCode::NOT_FOUND, error_msg))
        }
        Err(e) => Err(repository_error(e, "Failed to fetch book")),
    }
}

// Handler for POST /books
pub async fn create_book(
    State(state): State<AppState>,
    Json(payload): Json<CreateBook>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let repo = BookRepository::new(state.pool.clone());
    match repo.create(payload).await {
        Ok(book) => {
            info!(book_id = book.book.id, title = %book.book.title, "Book created");
            Ok(Json(book))
        }
        Err(e) => Err(repository_error(e, "Failed to create book")),
    }
}
