use diesel::prelude::*;

use crate::db::models::author::Author;
use crate::db::models::book::Book;
use crate::db::postgres::schema::author_books;

/// A row of the `author_books` join table.
#[derive(Queryable, Selectable, Identifiable, Associations, Insertable, Debug, Clone, Copy, PartialEq)]
#[diesel(table_name = author_books)]
#[diesel(primary_key(author_id, book_id))]
#[diesel(belongs_to(Author))]
#[diesel(belongs_to(Book))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AuthorBook {
    pub author_id: i32,
    pub book_id: i32,
}
