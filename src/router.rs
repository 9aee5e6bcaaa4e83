use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::db::repositories::DBPool; // Import DBPool from the repo mod
use crate::handlers::authors::{create_author, get_author, get_authors};
use crate::handlers::books::{create_book, get_book, get_books};
use crate::handlers::hello;

// Define the application state struct
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<DBPool>,
}

// Function to create the Axum router
pub fn create_router(pool: Arc<DBPool>) -> Router {
    let app_state = AppState { pool };

    Router::new()
        .route("/", get(hello))
        .route("/books", get(get_books).post(create_book))
        .route("/books/:id", get(get_book))
        .route("/authors", get(get_authors).post(create_author))
        .route("/authors/:id", get(get_author))
        .with_state(app_state)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
}
