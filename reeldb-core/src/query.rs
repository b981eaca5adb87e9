//! Structured query requests
//!
//! A [`MovieQuery`] is built once per incoming read request and validated at
//! construction, before any network call is made.

use crate::error::InvalidQuery;

/// The one access pattern the table supports: exact year, minimum rating,
/// case-insensitive substring match on the title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieQuery {
    /// Exact-match partition key condition
    pub year: i32,
    /// Inclusive lower bound on the sort key (raw stored rating, sentinel
    /// included - absence handling happens at decode, not here)
    pub min_rating: i32,
    title_contains: String,
}

impl MovieQuery {
    /// Build a query. The title fragment is lowercased to match the stored
    /// form and must be non-empty.
    pub fn new(
        year: i32,
        min_rating: i32,
        title_contains: impl Into<String>,
    ) -> Result<Self, InvalidQuery> {
        let title_contains = title_contains.into();
        if title_contains.trim().is_empty() {
            return Err(InvalidQuery("'name' must be non-empty".to_string()));
        }
        Ok(Self {
            year,
            min_rating,
            title_contains: title_contains.to_lowercase(),
        })
    }

    /// Build a query from raw request parameters, failing fast on missing
    /// or non-numeric values.
    pub fn from_params(
        year: Option<&str>,
        rating: Option<&str>,
        name: Option<&str>,
    ) -> Result<Self, InvalidQuery> {
        let year = parse_int("year", year)?;
        let min_rating = parse_int("rating", rating)?;
        let name = name.ok_or_else(|| InvalidQuery("missing parameter 'name'".to_string()))?;
        Self::new(year, min_rating, name)
    }

    /// The lowercased title fragment to filter on.
    pub fn title_contains(&self) -> &str {
        &self.title_contains
    }
}

fn parse_int(field: &str, value: Option<&str>) -> Result<i32, InvalidQuery> {
    let value = value.ok_or_else(|| InvalidQuery(format!("missing parameter '{field}'")))?;
    value
        .trim()
        .parse()
        .map_err(|_| InvalidQuery(format!("parameter '{field}' must be an integer, got '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_title_fragment() {
        let q = MovieQuery::new(1999, 5, "Matrix").unwrap();
        assert_eq!(q.title_contains(), "matrix");
    }

    #[test]
    fn rejects_empty_name() {
        assert!(MovieQuery::new(1999, 5, "  ").is_err());
    }

    #[test]
    fn from_params_parses_all_fields() {
        let q = MovieQuery::from_params(Some("1999"), Some("5"), Some("Matrix")).unwrap();
        assert_eq!(q.year, 1999);
        assert_eq!(q.min_rating, 5);
        assert_eq!(q.title_contains(), "matrix");
    }

    #[test]
    fn from_params_rejects_missing_fields() {
        assert!(MovieQuery::from_params(None, Some("5"), Some("x")).is_err());
        assert!(MovieQuery::from_params(Some("1999"), None, Some("x")).is_err());
        assert!(MovieQuery::from_params(Some("1999"), Some("5"), None).is_err());
    }

    #[test]
    fn from_params_rejects_non_numeric() {
        let err = MovieQuery::from_params(Some("ninety"), Some("5"), Some("x")).unwrap_err();
        assert!(err.to_string().contains("year"));
    }
}
