//! Movie table schema constants
//!
//! Defines the attribute names and defaults for the movie table.
//!
//! ## Table Schema
//!
//! ```text
//! Table: Movies (configurable)
//!
//! Primary Key:
//!   - yr (Number, Partition Key): release year
//!   - rating (Number, Sort Key): rating 0..=10, or 11 when unrated
//!
//! Attributes:
//!   - yr: Number (PK)
//!   - rating: Number (SK) - never absent; the codec encodes "no rating"
//!     as the reserved value outside the valid domain
//!   - title: String - lowercased title
//! ```

/// Partition key attribute - release year
pub const ATTR_YEAR: &str = "yr";

/// Sort key attribute - sentinel-encoded rating
pub const ATTR_RATING: &str = "rating";

/// Lowercased movie title
pub const ATTR_TITLE: &str = "title";

/// Default table name
pub const DEFAULT_TABLE_NAME: &str = "Movies";

/// Default provisioned read capacity units
pub const DEFAULT_READ_CAPACITY: i64 = 1;

/// Default provisioned write capacity units
pub const DEFAULT_WRITE_CAPACITY: i64 = 5;
