use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::models::author::Author;
use crate::db::postgres::schema::books;

/// A row of the `books` table.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Book {
    #[serde(rename = "ID")]
    pub id: i32,
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "DeletedAt")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Length")]
    pub length: i32,
    #[serde(rename = "Language")]
    pub language: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = books)]
pub struct NewBook {
    pub title: String,
    pub length: i32,
    pub language: String,
}

/// A book together with its authors, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookWithAuthors {
    #[serde(flatten)]
    pub book: Book,
    #[serde(rename = "Authors")]
    pub authors: Vec<Author>,
}

/// Request body of `POST /books`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CreateBook {
    #[serde(rename = "Title", alias = "title", default)]
    pub title: String,
    #[serde(rename = "Length", alias = "length", default)]
    pub length: i32,
    #[serde(rename = "Language", alias = "language", default)]
    pub language: String,
    #[serde(rename = "Authors", alias = "authors", default)]
    pub authors: Vec<AuthorRef>,
}

/// An author nested in a book payload. With an `ID` it links an existing
/// author, otherwise a new author named `Name` is created.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AuthorRef {
    #[serde(rename = "ID", alias = "id", default)]
    pub id: Option<i32>,
    #[serde(rename = "Name", alias = "name", default)]
    pub name: Option<String>,
}

impl CreateBook {
    /// Checks the payload before it reaches the database.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title must not be empty".to_string());
        }
        if self.length < 0 {
            return Err("Length must not be negative".to_string());
        }
        for (i, author) in self.authors.iter().enumerate() {
            let named = author.name.as_deref().is_some_and(|n| !n.trim().is_empty());
            if author.id.is_none() && !named {
                return Err(format!("Authors[{}] needs an ID or a Name", i));
            }
        }
        Ok(())
    }

    pub fn to_new_book(&self) -> NewBook {
        NewBook {
            title: self.title.trim().to_string(),
            length: self.length,
            language: self.language.clone(),
        }
    }
}
