//! Core types and trait seams for ReelDB
//!
//! This crate defines the movie domain model, the sentinel codec that
//! translates between domain records and the table's native representation,
//! and the `MovieStore` / `DatasetSource` traits that backends implement.
//!
//! In-memory implementations of both traits live in [`memory`] and are used
//! throughout the workspace's tests.

pub mod error;
pub mod memory;
pub mod movie;
pub mod query;
pub mod source;
pub mod store;

pub use error::{InvalidQuery, SourceError, StoreError};
pub use memory::{MemoryDatasetSource, MemoryMovieStore};
pub use movie::{DatasetMovie, MovieRecord, MovieRow, Rating, StoredMovie, RATING_UNRATED};
pub use query::MovieQuery;
pub use source::DatasetSource;
pub use store::{MovieStore, TableSchema, TableStatus};
