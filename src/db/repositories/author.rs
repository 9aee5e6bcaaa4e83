use std::sync::Arc;

use diesel::pg::PgConnection;
use diesel::prelude::*;
use tracing::debug;

use super::{insert_links, with_conn, DBPool, RepositoryError};
use crate::db::models::author::{Author, AuthorWithBooks, CreateAuthor};
use crate::db::models::author_book::AuthorBook;
use crate::db::models::book::{Book, NewBook};
use crate::db::postgres::schema::{author_books, authors, books};

/// Repository struct holding the connection pool for Author operations
#[derive(Clone)]
pub struct AuthorRepository {
    pool: Arc<DBPool>,
}

impl AuthorRepository {
    pub fn new(pool: Arc<DBPool>) -> Self {
        AuthorRepository { pool }
    }

    /// Retrieves every author that is not soft-deleted, with their books.
    pub async fn find_all(&self) -> Result<Vec<AuthorWithBooks>, RepositoryError> {
        with_conn(&self.pool, |conn| {
            let all_authors = authors::table
                .filter(authors::deleted_at.is_null())
                .order(authors::id.asc())
                .select(Author::as_select())
                .load(conn)?;
            Ok(preload_books(conn, all_authors)?)
        })
        .await
    }

    pub async fn find(&self, pk_id: i32) -> Result<Option<AuthorWithBooks>, RepositoryError> {
        with_conn(&self.pool, move |conn| {
            let author = authors::table
                .find(pk_id)
                .filter(authors::deleted_at.is_null())
                .select(Author::as_select())
                .first(conn)
                .optional()?;
            match author {
                Some(author) => Ok(preload_books(conn, vec![author])?.pop()),
                None => Ok(None),
            }
        })
        .await
    }

    /// Creates an author and their book associations in one transaction.
    pub async fn create(&self, payload: CreateAuthor) -> Result<AuthorWithBooks, RepositoryError> {
        payload.validate().map_err(RepositoryError::Validation)?;
        let created = with_conn(&self.pool, move |conn| {
            conn.transaction(|conn| insert_author(conn, &payload))
        })
        .await?;
        debug!(author_id = created.author.id, books = created.books.len(), "Created author");
        Ok(created)
    }

    pub async fn count(&self) -> Result<i64, RepositoryError> {
        with_conn(&self.pool, |conn| Ok(count_authors(conn)?)).await
    }
}

pub(crate) fn count_authors(conn: &mut PgConnection) -> QueryResult<i64> {
    authors::table
        .filter(authors::deleted_at.is_null())
        .count()
        .get_result(conn)
}

/// Loads the books of `all_authors` with a single join query, grouped per author.
pub(crate) fn preload_books(
    conn: &mut PgConnection,
    all_authors: Vec<Author>,
) -> QueryResult<Vec<AuthorWithBooks>> {
    let links: Vec<(AuthorBook, Book)> = AuthorBook::belonging_to(&all_authors)
        .inner_join(books::table)
        .filter(books::deleted_at.is_null())
        .order((author_books::author_id.asc(), books::id.asc()))
        .select((AuthorBook::as_select(), Book::as_select()))
        .load(conn)?;

    let grouped = links.grouped_by(&all_authors);
    Ok(all_authors
        .into_iter()
        .zip(grouped)
        .map(|(author, pairs)| AuthorWithBooks {
            author,
            books: pairs.into_iter().map(|(_, book)| book).collect(),
        })
        .collect())
}

pub(crate) fn insert_author(
    conn: &mut PgConnection,
    payload: &CreateAuthor,
) -> Result<AuthorWithBooks, RepositoryError> {
    let author: Author = diesel::insert_into(authors::table)
        .values(&payload.to_new_author())
        .returning(Author::as_returning())
        .get_result(conn)?;

    let mut linked: Vec<Book> = Vec::with_capacity(payload.books.len());
    for book_ref in &payload.books {
        let book: Book = match book_ref.id {
            Some(book_id) => books::table
                .find(book_id)
                .filter(books::deleted_at.is_null())
                .select(Book::as_select())
                .first(conn)
                .optional()?
                .ok_or(RepositoryError::UnknownBook(book_id))?,
            None => {
                let new_book = NewBook {
                    title: book_ref.title.as_deref().unwrap_or_default().trim().to_string(),
                    length: book_ref.length,
                    language: book_ref.language.clone(),
                };
                diesel::insert_into(books::table)
                    .values(&new_book)
                    .returning(Book::as_returning())
                    .get_result(conn)?
            }
        };
        if !linked.iter().any(|b| b.id == book.id) {
            linked.push(book);
        }
    }

    let links: Vec<AuthorBook> = linked
        .iter()
        .map(|book| AuthorBook {
            author_id: author.id,
            book_id: book.id,
        })
        .collect();
    insert_links(conn, &links)?;

    Ok(AuthorWithBooks {
        author,
        books: linked,
    })
}
