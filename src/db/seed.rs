use std::sync::Arc;

use diesel::pg::PgConnection;
use diesel::prelude::*;
use tracing::info;

use crate::db::models::author::{Author, NewAuthor};
use crate::db::models::author_book::AuthorBook;
use crate::db::models::book::{Book, NewBook};
use crate::db::postgres::schema::{authors, books};
use crate::db::repositories::author::count_authors;
use crate::db::repositories::book::count_books;
use crate::db::repositories::{insert_links, with_conn, DBPool, RepositoryError};

/// Demo catalogue: each author with the (title, length, language) of their books.
pub const DEMO_LIBRARY: &[(&str, &[(&str, i32, &str)])] = &[
    (
        "Philip K. Dick",
        &[
            ("Do Androids Dream of Electric Sheep?", 256, "English"),
            ("The Man in the High Castle", 324, "English"),
        ],
    ),
    (
        "George Orwell",
        &[("1984", 328, "English"), ("Animal Farm", 112, "English")],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded { authors: usize, books: usize },
    /// At least one of the tables already had rows.
    Skipped { authors: i64, books: i64 },
}

/// Inserts [`DEMO_LIBRARY`] when both `authors` and `books` are empty.
pub async fn seed_demo_data(pool: Arc<DBPool>) -> Result<SeedOutcome, RepositoryError> {
    let outcome = with_conn(&pool, |conn| conn.transaction(seed_if_empty)).await?;
    match outcome {
        SeedOutcome::Seeded { authors, books } => {
            info!(authors, books, "Seeded demo data.")
        }
        SeedOutcome::Skipped { authors, books } => {
            info!(authors, books, "Tables not empty, skipping demo data.")
        }
    }
    Ok(outcome)
}

fn seed_if_empty(conn: &mut PgConnection) -> Result<SeedOutcome, RepositoryError> {
    let author_count = count_authors(conn)?;
    let book_count = count_books(conn)?;
    if author_count != 0 || book_count != 0 {
        return Ok(SeedOutcome::Skipped {
            authors: author_count,
            books: book_count,
        });
    }

    let mut seeded_books = 0;
    for (name, titles) in DEMO_LIBRARY {
        let author: Author = diesel::insert_into(authors::table)
            .values(&NewAuthor {
                name: name.to_string(),
            })
            .returning(Author::as_returning())
            .get_result(conn)?;

        let new_books: Vec<NewBook> = titles
            .iter()
            .map(|(title, length, language)| NewBook {
                title: title.to_string(),
                length: *length,
                language: language.to_string(),
            })
            .collect();
        let created: Vec<Book> = diesel::insert_into(books::table)
            .values(&new_books)
            .returning(Book::as_returning())
            .get_results(conn)?;

        let links: Vec<AuthorBook> = created
            .iter()
            .map(|book| AuthorBook {
                author_id: author.id,
                book_id: book.id,
            })
            .collect();
        insert_links(conn, &links)?;
        seeded_books += created.len();
    }

    Ok(SeedOutcome::Seeded {
        authors: DEMO_LIBRARY.len(),
        books: seeded_books,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_library_has_two_authors_with_two_books_each() {
        assert_eq!(DEMO_LIBRARY.len(), 2);
        assert!(DEMO_LIBRARY.iter().all(|(_, books)| books.len() == 2));

        let titles: Vec<&str> = DEMO_LIBRARY
            .iter()
            .flat_map(|(_, books)| books.iter().map(|(title, _, _)| *title))
            .collect();
        assert_eq!(
            titles,
            vec![
                "Do Androids Dream of Electric Sheep?",
                "The Man in the High Castle",
                "1984",
                "Animal Farm",
            ]
        );
    }
}
