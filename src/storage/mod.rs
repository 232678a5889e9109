mod categories;
pub mod db;
mod items;
pub mod models;

pub use db::{Database, DatabaseError, SCHEMA_SQL};
