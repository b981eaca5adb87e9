//! Query execution and result decoding
//!
//! The structured request is translated into the store's native condition
//! language by the store implementation; this module runs the query and
//! decodes the raw items back into display rows, preserving the store's
//! sort-key order.

use crate::error::ApiError;
use reeldb_core::{MovieQuery, MovieRow, MovieStore};

/// Execute a validated query and decode the results in store order.
pub async fn run_query<S: MovieStore>(
    store: &S,
    table: &str,
    query: &MovieQuery,
) -> Result<Vec<MovieRow>, ApiError> {
    let items = store
        .query_movies(table, query)
        .await
        .map_err(ApiError::Query)?;
    Ok(items.iter().map(|item| item.to_row()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reeldb_core::{MemoryMovieStore, Rating, StoredMovie, RATING_UNRATED};

    fn seeded_store() -> MemoryMovieStore {
        let store = MemoryMovieStore::new();
        store.insert_movie(
            "movies",
            StoredMovie {
                yr: 1999,
                rating: 7,
                title: "the matrix".to_string(),
            },
        );
        store
    }

    #[tokio::test]
    async fn rating_below_threshold_returns_empty() {
        let store = seeded_store();
        let query = MovieQuery::new(1999, 8, "matrix").unwrap();
        let rows = run_query(&store, "movies", &query).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn rating_at_or_above_threshold_matches() {
        let store = seeded_store();
        let query = MovieQuery::new(1999, 5, "matrix").unwrap();
        let rows = run_query(&store, "movies", &query).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "the matrix");
        assert_eq!(rows[0].rating, Rating::Rated(7));
    }

    #[tokio::test]
    async fn substring_mismatch_returns_empty() {
        let store = seeded_store();
        let query = MovieQuery::new(1999, 5, "bourne").unwrap();
        let rows = run_query(&store, "movies", &query).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn mixed_case_fragment_matches_lowercased_title() {
        let store = seeded_store();
        let query = MovieQuery::new(1999, 5, "Matrix").unwrap();
        let rows = run_query(&store, "movies", &query).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn sentinel_items_decode_as_unrated() {
        let store = MemoryMovieStore::new();
        store.insert_movie(
            "movies",
            StoredMovie {
                yr: 2000,
                rating: RATING_UNRATED,
                title: "movie a".to_string(),
            },
        );
        let query = MovieQuery::new(2000, 0, "movie").unwrap();
        let rows = run_query(&store, "movies", &query).await.unwrap();
        assert_eq!(rows[0].rating, Rating::Unrated);
    }

    #[tokio::test]
    async fn missing_table_is_a_query_error() {
        let store = MemoryMovieStore::new();
        let query = MovieQuery::new(2000, 0, "movie").unwrap();
        let err = run_query(&store, "movies", &query).await.unwrap_err();
        assert!(matches!(err, ApiError::Query(_)));
    }
}
