//! In-memory trait implementations for testing
//!
//! `MemoryMovieStore` keeps tables in a `HashMap` behind `Arc<RwLock>` so
//! clones share state across concurrent test tasks. It models the parts of
//! the managed store that matter to the orchestration layer: asynchronous
//! activation (a configurable number of `Creating` polls before `Active`),
//! key-based overwrite, sort-key ordering, and injectable write failures.

use crate::error::{SourceError, StoreError};
use crate::movie::{MovieRecord, StoredMovie};
use crate::query::MovieQuery;
use crate::source::DatasetSource;
use crate::store::{MovieStore, TableSchema, TableStatus};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

struct TableEntry {
    #[allow(dead_code)]
    schema: TableSchema,
    polls_until_active: u32,
    /// Items keyed by (partition, sort) - overwrites model last-write-wins
    movies: BTreeMap<(i32, i32), StoredMovie>,
}

#[derive(Default)]
struct Inner {
    tables: HashMap<String, TableEntry>,
    /// `Creating` polls a new table reports before turning `Active`
    activation_polls: u32,
    /// When set, tables never leave `Creating`
    never_activate: bool,
    /// Titles whose writes always fail (permanent error)
    fail_put_titles: HashSet<String>,
    /// Number of upcoming writes to reject as throttled (transient error)
    throttle_puts: u32,
    /// Number of upcoming status checks to reject as throttled
    throttle_describes: u32,
}

/// In-memory movie store for tests.
#[derive(Clone, Default)]
pub struct MemoryMovieStore {
    inner: Arc<RwLock<Inner>>,
}

impl Debug for MemoryMovieStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("MemoryMovieStore")
            .field("table_count", &inner.tables.len())
            .finish()
    }
}

impl MemoryMovieStore {
    /// Create a store whose tables are `Active` on the first poll.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose tables report `Creating` for the first `polls`
    /// status checks after creation.
    pub fn with_activation_polls(polls: u32) -> Self {
        let store = Self::default();
        store.inner.write().activation_polls = polls;
        store
    }

    /// Make every table stay in `Creating` forever.
    pub fn set_never_activate(&self, never: bool) {
        self.inner.write().never_activate = never;
    }

    /// Make every write of a movie with this (lowercased) title fail
    /// permanently.
    pub fn fail_puts_for(&self, title: impl Into<String>) {
        self.inner.write().fail_put_titles.insert(title.into());
    }

    /// Throttle the next `n` writes (transient failures).
    pub fn throttle_next_puts(&self, n: u32) {
        self.inner.write().throttle_puts = n;
    }

    /// Throttle the next `n` status checks (transient failures).
    pub fn throttle_next_describes(&self, n: u32) {
        self.inner.write().throttle_describes = n;
    }

    /// Seed an item directly, creating an already-active table if needed.
    pub fn insert_movie(&self, table: &str, movie: StoredMovie) {
        let mut inner = self.inner.write();
        let entry = inner
            .tables
            .entry(table.to_string())
            .or_insert_with(|| TableEntry {
                schema: TableSchema::new(table, 1, 5),
                polls_until_active: 0,
                movies: BTreeMap::new(),
            });
        entry.movies.insert((movie.yr, movie.rating), movie);
    }

    /// Number of items currently held by a table (0 if absent).
    pub fn movie_count(&self, table: &str) -> usize {
        self.inner
            .read()
            .tables
            .get(table)
            .map_or(0, |t| t.movies.len())
    }

    /// Whether a table exists at all.
    pub fn table_exists(&self, table: &str) -> bool {
        self.inner.read().tables.contains_key(table)
    }
}

#[async_trait]
impl MovieStore for MemoryMovieStore {
    async fn create_table(&self, schema: &TableSchema) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if inner.tables.contains_key(&schema.table_name) {
            return Err(StoreError::already_exists(&schema.table_name));
        }
        let polls = inner.activation_polls;
        inner.tables.insert(
            schema.table_name.clone(),
            TableEntry {
                schema: schema.clone(),
                polls_until_active: polls,
                movies: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn table_status(&self, table: &str) -> Result<TableStatus, StoreError> {
        let mut inner = self.inner.write();
        if inner.throttle_describes > 0 {
            inner.throttle_describes -= 1;
            return Err(StoreError::throttled("describe rate exceeded"));
        }
        if inner.never_activate {
            return match inner.tables.contains_key(table) {
                true => Ok(TableStatus::Creating),
                false => Err(StoreError::not_found(table)),
            };
        }
        let entry = inner
            .tables
            .get_mut(table)
            .ok_or_else(|| StoreError::not_found(table))?;
        if entry.polls_until_active > 0 {
            entry.polls_until_active -= 1;
            Ok(TableStatus::Creating)
        } else {
            Ok(TableStatus::Active)
        }
    }

    async fn delete_table(&self, table: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        inner
            .tables
            .remove(table)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(table))
    }

    async fn put_movie(&self, table: &str, movie: &StoredMovie) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if inner.throttle_puts > 0 {
            inner.throttle_puts -= 1;
            return Err(StoreError::throttled("write capacity exceeded"));
        }
        if inner.fail_put_titles.contains(&movie.title) {
            return Err(StoreError::io(format!("injected failure for '{}'", movie.title)));
        }
        let entry = inner
            .tables
            .get_mut(table)
            .ok_or_else(|| StoreError::not_found(table))?;
        entry.movies.insert((movie.yr, movie.rating), movie.clone());
        Ok(())
    }

    async fn query_movies(
        &self,
        table: &str,
        query: &MovieQuery,
    ) -> Result<Vec<StoredMovie>, StoreError> {
        let inner = self.inner.read();
        let entry = inner
            .tables
            .get(table)
            .ok_or_else(|| StoreError::not_found(table))?;
        let matches = entry
            .movies
            .range((query.year, query.min_rating)..=(query.year, i32::MAX))
            .map(|(_, movie)| movie)
            .filter(|movie| movie.title.contains(query.title_contains()))
            .cloned()
            .collect();
        Ok(matches)
    }
}

/// In-memory dataset source for tests.
#[derive(Clone, Default)]
pub struct MemoryDatasetSource {
    records: Vec<MovieRecord>,
    failure: Option<SourceError>,
}

impl Debug for MemoryDatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDatasetSource")
            .field("record_count", &self.records.len())
            .field("failing", &self.failure.is_some())
            .finish()
    }
}

impl MemoryDatasetSource {
    /// A source that yields the given records.
    pub fn new(records: Vec<MovieRecord>) -> Self {
        Self {
            records,
            failure: None,
        }
    }

    /// A source whose fetch always fails.
    pub fn failing(error: SourceError) -> Self {
        Self {
            records: Vec::new(),
            failure: Some(error),
        }
    }
}

#[async_trait]
impl DatasetSource for MemoryDatasetSource {
    async fn fetch(&self) -> Result<Vec<MovieRecord>, SourceError> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(self.records.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(yr: i32, rating: i32, title: &str) -> StoredMovie {
        StoredMovie {
            yr,
            rating,
            title: title.to_string(),
        }
    }

    #[tokio::test]
    async fn tables_activate_after_configured_polls() {
        let store = MemoryMovieStore::with_activation_polls(2);
        let schema = TableSchema::new("movies", 1, 5);
        store.create_table(&schema).await.unwrap();

        assert_eq!(store.table_status("movies").await.unwrap(), TableStatus::Creating);
        assert_eq!(store.table_status("movies").await.unwrap(), TableStatus::Creating);
        assert_eq!(store.table_status("movies").await.unwrap(), TableStatus::Active);
    }

    #[tokio::test]
    async fn create_twice_reports_already_exists() {
        let store = MemoryMovieStore::new();
        let schema = TableSchema::new("movies", 1, 5);
        store.create_table(&schema).await.unwrap();
        assert!(matches!(
            store.create_table(&schema).await,
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn writes_to_same_key_overwrite() {
        let store = MemoryMovieStore::new();
        store.create_table(&TableSchema::new("movies", 1, 5)).await.unwrap();
        store.put_movie("movies", &stored(1999, 7, "first")).await.unwrap();
        store.put_movie("movies", &stored(1999, 7, "second")).await.unwrap();
        assert_eq!(store.movie_count("movies"), 1);
    }

    #[tokio::test]
    async fn query_orders_by_rating_and_filters_title() {
        let store = MemoryMovieStore::new();
        store.insert_movie("movies", stored(1999, 9, "the matrix"));
        store.insert_movie("movies", stored(1999, 6, "the mummy"));
        store.insert_movie("movies", stored(1999, 7, "the matrix reloaded"));
        store.insert_movie("movies", stored(2000, 8, "the matrix sequel"));

        let query = MovieQuery::new(1999, 5, "matrix").unwrap();
        let results = store.query_movies("movies", &query).await.unwrap();
        let titles: Vec<&str> = results.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["the matrix reloaded", "the matrix"]);
    }

    #[tokio::test]
    async fn throttle_injection_is_consumed() {
        let store = MemoryMovieStore::new();
        store.create_table(&TableSchema::new("movies", 1, 5)).await.unwrap();
        store.throttle_next_puts(1);

        let err = store.put_movie("movies", &stored(1999, 7, "x")).await.unwrap_err();
        assert!(err.is_transient());
        store.put_movie("movies", &stored(1999, 7, "x")).await.unwrap();
    }
}
