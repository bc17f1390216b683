pub mod related;
pub mod summary;
pub mod title;
