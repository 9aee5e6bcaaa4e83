// Declare model modules
pub mod author;
pub mod author_book;
pub mod book;
