use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::models::book::Book;
use crate::db::postgres::schema::authors;

/// A row of the `authors` table.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize)]
#[diesel(table_name = authors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Author {
    #[serde(rename = "ID")]
    pub id: i32,
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "DeletedAt")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = authors)]
pub struct NewAuthor {
    pub name: String,
}

/// An author together with their books, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorWithBooks {
    #[serde(flatten)]
    pub author: Author,
    #[serde(rename = "Books")]
    pub books: Vec<Book>,
}

/// Request body of `POST /authors`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CreateAuthor {
    #[serde(rename = "Name", alias = "name", default)]
    pub name: String,
    #[serde(rename = "Books", alias = "books", default)]
    pub books: Vec<BookRef>,
}

/// A book nested in an author payload: `ID` links an existing book, anything
/// else creates a new one.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BookRef {
    #[serde(rename = "ID", alias = "id", default)]
    pub id: Option<i32>,
    #[serde(rename = "Title", alias = "title", default)]
    pub title: Option<String>,
    #[serde(rename = "Length", alias = "length", default)]
    pub length: i32,
    #[serde(rename = "Language", alias = "language", default)]
    pub language: String,
}

impl CreateAuthor {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name must not be empty".to_string());
        }
        for (i, book) in self.books.iter().enumerate() {
            if book.id.is_some() {
                continue;
            }
            if book.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
                return Err(format!("Books[{}] needs an ID or a Title", i));
            }
            if book.length < 0 {
                return Err(format!("Books[{}] has a negative Length", i));
            }
        }
        Ok(())
    }

    pub fn to_new_author(&self) -> NewAuthor {
        NewAuthor {
            name: self.name.trim().to_string(),
        }
    }
}
