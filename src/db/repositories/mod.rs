use diesel::pg::PgConnection;
use diesel::r2d2::{self, ConnectionManager, PoolError};
use std::sync::Arc;
use thiserror::Error;

// Define the common DBPool type alias, making it available to submodules
pub type DBPool = r2d2::Pool<ConnectionManager<PgConnection>>;

// Declare the repository implementation modules
pub mod author;
pub mod book;

/// Errors surfaced by the repositories.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("author {0} does not exist")]
    UnknownAuthor(i32),
    #[error("book {0} does not exist")]
    UnknownBook(i32),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
    #[error("failed to get DB connection: {0}")]
    Pool(#[from] PoolError),
    #[error("database task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl RepositoryError {
    /// True when the caller sent something the database cannot satisfy, as
    /// opposed to the database itself failing.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RepositoryError::UnknownAuthor(_)
                | RepositoryError::UnknownBook(_)
                | RepositoryError::Validation(_)
        )
    }
}

/// Runs a blocking diesel closure on a pooled connection inside
/// `spawn_blocking` and flattens the join error.
pub(crate) async fn with_conn<T, F>(pool: &Arc<DBPool>, f: F) -> Result<T, RepositoryError>
where
    T: Send + 'static,
    F: FnOnce(&mut PgConnection) -> Result<T, RepositoryError> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        f(&mut conn)
    })
    .await?
}

/// Inserts join rows, skipping pairs that already exist so repeated
/// references to the same author/book collapse into one association.
pub(crate) fn insert_links(
    conn: &mut PgConnection,
    links: &[crate::db::models::author_book::AuthorBook],
) -> diesel::QueryResult<usize> {
    use crate::db::postgres::schema::author_books;
    use diesel::prelude::*;

    if links.is_empty() {
        return Ok(0);
    }
    diesel::insert_into(author_books::table)
        .values(links)
        .on_conflict_do_nothing()
        .execute(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_distinguished_from_database_errors() {
        assert!(RepositoryError::UnknownAuthor(3).is_client_error());
        assert!(RepositoryError::UnknownBook(4).is_client_error());
        assert!(RepositoryError::Validation("x".into()).is_client_error());
        assert!(!RepositoryError::Database(diesel::result::Error::NotFound).is_client_error());
    }

    #[test]
    fn unknown_reference_messages_name_the_id() {
        assert_eq!(RepositoryError::UnknownAuthor(3).to_string(), "author 3 does not exist");
        assert_eq!(RepositoryError::UnknownBook(9).to_string(), "book 9 does not exist");
    }
}
