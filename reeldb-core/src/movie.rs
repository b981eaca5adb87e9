//! Movie domain model and the sentinel codec
//!
//! The movie table's key schema requires a numeric `rating` on every item,
//! but not every movie in the dataset has one. Absence is encoded as the
//! reserved value [`RATING_UNRATED`], which sits outside the valid rating
//! domain of `0..=10`. The encode/decode pair in this module is the only
//! place that knows about the sentinel: everything above it works with
//! `Option<i32>` or the display-ready [`Rating`].

use serde::{Deserialize, Serialize, Serializer};

/// Reserved rating value meaning "no rating" in storage.
///
/// Part of the table's wire format; must stay outside
/// [`RATING_MIN`]..=[`RATING_MAX`].
pub const RATING_UNRATED: i32 = 11;

/// Lowest valid rating.
pub const RATING_MIN: i32 = 0;

/// Highest valid rating.
pub const RATING_MAX: i32 = 10;

/// A movie as the domain sees it: rating is explicitly optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRecord {
    /// Release year (table partition key after encoding)
    pub year: i32,
    /// Rating in `0..=10`, absent when the movie is unrated
    pub rating: Option<i32>,
    /// Title, stored lowercased so substring queries are case-insensitive
    pub title: String,
}

impl MovieRecord {
    /// Encode into the table's native representation.
    ///
    /// Total: an absent or out-of-domain rating becomes the sentinel, the
    /// title is lowercased. No failure mode.
    pub fn to_stored(&self) -> StoredMovie {
        let rating = match self.rating {
            Some(r) if (RATING_MIN..=RATING_MAX).contains(&r) => r,
            _ => RATING_UNRATED,
        };
        StoredMovie {
            yr: self.year,
            rating,
            title: self.title.to_lowercase(),
        }
    }
}

/// A movie as held by the table: `rating` is never absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMovie {
    /// Partition key
    pub yr: i32,
    /// Sort key; [`RATING_UNRATED`] when the movie has no rating
    pub rating: i32,
    /// Lowercased title
    pub title: String,
}

impl StoredMovie {
    /// Decode back to a domain record, reversing the sentinel.
    pub fn to_record(&self) -> MovieRecord {
        MovieRecord {
            year: self.yr,
            rating: (self.rating != RATING_UNRATED).then_some(self.rating),
            title: self.title.clone(),
        }
    }

    /// Decode to a display row for query responses.
    pub fn to_row(&self) -> MovieRow {
        let rating = if self.rating == RATING_UNRATED {
            Rating::Unrated
        } else {
            Rating::Rated(self.rating)
        };
        MovieRow {
            year: self.yr,
            rating,
            title: self.title.clone(),
        }
    }
}

/// Display form of a rating: serializes as the number, or `"-"` when unrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    /// No rating on record
    Unrated,
    /// Rating in the valid domain
    Rated(i32),
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Rating::Unrated => serializer.serialize_str("-"),
            Rating::Rated(r) => serializer.serialize_i32(*r),
        }
    }
}

/// One row of a query response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieRow {
    pub year: i32,
    pub rating: Rating,
    pub title: String,
}

/// A movie as it appears in the bulk dataset document.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetMovie {
    pub year: i32,
    #[serde(default)]
    pub info: DatasetMovieInfo,
    pub title: String,
}

/// The `info` object of a dataset entry; only `rating` matters here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetMovieInfo {
    #[serde(default)]
    pub rating: Option<i32>,
}

impl From<DatasetMovie> for MovieRecord {
    fn from(movie: DatasetMovie) -> Self {
        MovieRecord {
            year: movie.year,
            rating: movie.info.rating,
            title: movie.title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rated(year: i32, rating: i32, title: &str) -> MovieRecord {
        MovieRecord {
            year,
            rating: Some(rating),
            title: title.to_string(),
        }
    }

    #[test]
    fn encode_decode_round_trips_valid_ratings() {
        for r in RATING_MIN..=RATING_MAX {
            let record = rated(1999, r, "the matrix");
            assert_eq!(record.to_stored().to_record(), record);
        }
    }

    #[test]
    fn absent_rating_encodes_as_sentinel() {
        let record = MovieRecord {
            year: 2000,
            rating: None,
            title: "memento".to_string(),
        };
        let stored = record.to_stored();
        assert_eq!(stored.rating, RATING_UNRATED);
        assert_eq!(stored.to_record().rating, None);
    }

    #[test]
    fn out_of_domain_rating_encodes_as_sentinel() {
        for r in [-1, 11, 100] {
            let stored = rated(2000, r, "x").to_stored();
            assert_eq!(stored.rating, RATING_UNRATED);
        }
    }

    #[test]
    fn encode_lowercases_title() {
        let stored = rated(1999, 7, "The Matrix").to_stored();
        assert_eq!(stored.title, "the matrix");
    }

    #[test]
    fn unrated_row_serializes_as_dash() {
        let stored = StoredMovie {
            yr: 2000,
            rating: RATING_UNRATED,
            title: "movie a".to_string(),
        };
        let json = serde_json::to_value(stored.to_row()).unwrap();
        assert_eq!(json["rating"], serde_json::json!("-"));
        assert_eq!(json["year"], serde_json::json!(2000));
    }

    #[test]
    fn rated_row_serializes_as_number() {
        let stored = StoredMovie {
            yr: 2000,
            rating: 9,
            title: "movie b".to_string(),
        };
        let json = serde_json::to_value(stored.to_row()).unwrap();
        assert_eq!(json["rating"], serde_json::json!(9));
    }

    #[test]
    fn dataset_movie_without_rating_converts_to_unrated() {
        let raw: DatasetMovie =
            serde_json::from_str(r#"{"year": 2013, "info": {}, "title": "Rush"}"#).unwrap();
        let record = MovieRecord::from(raw);
        assert_eq!(record.rating, None);
        assert_eq!(record.title, "Rush");
    }

    #[test]
    fn dataset_movie_ignores_unknown_info_fields() {
        let raw: DatasetMovie = serde_json::from_str(
            r#"{"year": 2013, "info": {"rating": 8, "directors": ["Ron Howard"]}, "title": "Rush"}"#,
        )
        .unwrap();
        assert_eq!(MovieRecord::from(raw).rating, Some(8));
    }
}
