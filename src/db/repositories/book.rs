use std::sync::Arc;

use diesel::pg::PgConnection;
use diesel::prelude::*;
use tracing::debug;

use super::{insert_links, with_conn, DBPool, RepositoryError};
use crate::db::models::author::{Author, NewAuthor};
use crate::db::models::author_book::AuthorBook;
use crate::db::models::book::{Book, BookWithAuthors, CreateBook};
use crate::db::postgres::schema::{author_books, authors, books};

/// Repository struct holding the connection pool for Book operations
#[derive(Clone)]
pub struct BookRepository {
    pool: Arc<DBPool>,
}

impl BookRepository {
    /// Creates a new repository instance.
    pub fn new(pool: Arc<DBPool>) -> Self {
        BookRepository { pool }
    }

    /// Retrieves every book that is not soft-deleted, with its authors.
    pub async fn find_all(&self) -> Result<Vec<BookWithAuthors>, RepositoryError> {
        with_conn(&self.pool, |conn| {
            let all_books = books::table
                .filter(books::deleted_at.is_null())
                .order(books::id.asc())
                .select(Book::as_select())
                .load(conn)?;
            Ok(preload_authors(conn, all_books)?)
        })
        .await
    }

    /// Finds a book by its primary key (id).
    pub async fn find(&self, pk_id: i32) -> Result<Option<BookWithAuthors>, RepositoryError> {
        with_conn(&self.pool, move |conn| {
            let book = books::table
                .find(pk_id)
                .filter(books::deleted_at.is_null())
                .select(Book::as_select())
                .first(conn)
                .optional()?;
            match book {
                Some(book) => Ok(preload_authors(conn, vec![book])?.pop()),
                None => Ok(None),
            }
        })
        .await
    }

    /// Creates a book and its author associations in one transaction.
    pub async fn create(&self, payload: CreateBook) -> Result<BookWithAuthors, RepositoryError> {
        payload.validate().map_err(RepositoryError::Validation)?;
        let created = with_conn(&self.pool, move |conn| {
            conn.transaction(|conn| insert_book(conn, &payload))
        })
        .await?;
        debug!(book_id = created.book.id, authors = created.authors.len(), "Created book");
        Ok(created)
    }

    /// Number of books that are not soft-deleted.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        with_conn(&self.pool, |conn| Ok(count_books(conn)?)).await
    }
}

pub(crate) fn count_books(conn: &mut PgConnection) -> QueryResult<i64> {
    books::table
        .filter(books::deleted_at.is_null())
        .count()
        .get_result(conn)
}

/// Loads the authors of `all_books` with a single join query and groups them
/// per book, keeping the order of `all_books`.
pub(crate) fn preload_authors(
    conn: &mut PgConnection,
    all_books: Vec<Book>,
) -> QueryResult<Vec<BookWithAuthors>> {
    let links: Vec<(AuthorBook, Author)> = AuthorBook::belonging_to(&all_books)
        .inner_join(authors::table)
        .filter(authors::deleted_at.is_null())
        .order((author_books::book_id.asc(), authors::id.asc()))
        .select((AuthorBook::as_select(), Author::as_select()))
        .load(conn)?;

    let grouped = links.grouped_by(&all_books);
    Ok(all_books
        .into_iter()
        .zip(grouped)
        .map(|(book, pairs)| BookWithAuthors {
            book,
            authors: pairs.into_iter().map(|(_, author)| author).collect(),
        })
        .collect())
}

/// Inserts the book, resolves or creates each nested author and links them.
/// Must run inside a transaction so an unknown author leaves nothing behind.
pub(crate) fn insert_book(
    conn: &mut PgConnection,
    payload: &CreateBook,
) -> Result<BookWithAuthors, RepositoryError> {
    let book: Book = diesel::insert_into(books::table)
        .values(&payload.to_new_book())
        .returning(Book::as_returning())
        .get_result(conn)?;

    let mut linked: Vec<Author> = Vec::with_capacity(payload.authors.len());
    for author_ref in &payload.authors {
        let author: Author = match author_ref.id {
            Some(author_id) => authors::table
                .find(author_id)
                .filter(authors::deleted_at.is_null())
                .select(Author::as_select())
                .first(conn)
                .optional()?
                .ok_or(RepositoryError::UnknownAuthor(author_id))?,
            None => {
                let name = author_ref.name.as_deref().unwrap_or_default().trim().to_string();
                diesel::insert_into(authors::table)
                    .values(&NewAuthor { name })
                    .returning(Author::as_returning())
                    .get_result(conn)?
            }
        };
        if !linked.iter().any(|a| a.id == author.id) {
            linked.push(author);
        }
    }

    let links: Vec<AuthorBook> = linked
        .iter()
        .map(|author| AuthorBook {
            author_id: author.id,
            book_id: book.id,
        })
        .collect();
    insert_links(conn, &links)?;

    Ok(BookWithAuthors {
        book,
        authors: linked,
    })
}
