//! DynamoDB movie store implementation
//!
//! Provides `DynamoMovieStore`, which implements the core `MovieStore` trait
//! against a DynamoDB table keyed on (`yr` numeric HASH, `rating` numeric
//! RANGE). This module owns the translation from the structured
//! [`MovieQuery`] into DynamoDB's condition/filter expression language; the
//! sentinel rating is not special-cased here - only the codec knows it.

pub mod schema;

use crate::error::Result;
use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::delete_table::DeleteTableError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, KeySchemaElement, KeyType, ProvisionedThroughput,
    ScalarAttributeType, TableStatus as AwsTableStatus,
};
use aws_sdk_dynamodb::Client;
use aws_smithy_types::timeout::TimeoutConfig;
use reeldb_core::{MovieQuery, MovieStore, StoreError, StoredMovie, TableSchema, TableStatus};
use schema::{ATTR_RATING, ATTR_TITLE, ATTR_YEAR};
use std::collections::HashMap;
use std::time::Duration;

/// DynamoDB movie store configuration
#[derive(Debug, Clone, Default)]
pub struct DynamoConfig {
    /// AWS region override (uses SDK default if not specified)
    pub region: Option<String>,
    /// Optional endpoint override (e.g. LocalStack)
    pub endpoint: Option<String>,
    /// Operation timeout in milliseconds
    pub timeout_ms: Option<u64>,
}

/// DynamoDB-backed movie store
#[derive(Clone)]
pub struct DynamoMovieStore {
    client: Client,
}

impl std::fmt::Debug for DynamoMovieStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoMovieStore").finish()
    }
}

impl DynamoMovieStore {
    /// Create a new DynamoDB movie store.
    ///
    /// Builds the DynamoDB client by inheriting from `sdk_config` (preserves
    /// HTTP client, credentials, retry config, sleep impl) and applying the
    /// overrides in `config`.
    pub fn new(sdk_config: &aws_config::SdkConfig, config: DynamoConfig) -> Result<Self> {
        let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);

        if let Some(region) = config.region {
            builder = builder.region(aws_sdk_dynamodb::config::Region::new(region));
        }

        if let Some(endpoint) = config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        if let Some(timeout_ms) = config.timeout_ms {
            let timeout_config = TimeoutConfig::builder()
                .operation_timeout(Duration::from_millis(timeout_ms))
                .build();
            builder = builder.timeout_config(timeout_config);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
        })
    }

    /// Create from a pre-built client (for testing)
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MovieStore for DynamoMovieStore {
    async fn create_table(&self, schema: &TableSchema) -> std::result::Result<(), StoreError> {
        let key_schema = [
            (ATTR_YEAR, KeyType::Hash),
            (ATTR_RATING, KeyType::Range),
        ]
        .into_iter()
        .map(|(name, key_type)| {
            KeySchemaElement::builder()
                .attribute_name(name)
                .key_type(key_type)
                .build()
                .map_err(|e| StoreError::invalid(format!("key schema: {e}")))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

        let attribute_definitions = [ATTR_YEAR, ATTR_RATING]
            .into_iter()
            .map(|name| {
                AttributeDefinition::builder()
                    .attribute_name(name)
                    .attribute_type(ScalarAttributeType::N)
                    .build()
                    .map_err(|e| StoreError::invalid(format!("attribute definition: {e}")))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let throughput = ProvisionedThroughput::builder()
            .read_capacity_units(schema.read_capacity)
            .write_capacity_units(schema.write_capacity)
            .build()
            .map_err(|e| StoreError::invalid(format!("provisioned throughput: {e}")))?;

        let result = self
            .client
            .create_table()
            .table_name(&schema.table_name)
            .set_key_schema(Some(key_schema))
            .set_attribute_definitions(Some(attribute_definitions))
            .provisioned_throughput(throughput)
            .send()
            .await;

        match result {
            Ok(_) => {
                tracing::info!(table = %schema.table_name, "table creation started");
                Ok(())
            }
            Err(e) if is_create_resource_in_use(&e) => {
                Err(StoreError::already_exists(&schema.table_name))
            }
            Err(e) => Err(map_dynamo_error(e, "CreateTable")),
        }
    }

    async fn table_status(&self, table: &str) -> std::result::Result<TableStatus, StoreError> {
        let result = self
            .client
            .describe_table()
            .table_name(table)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) if is_describe_not_found(&e) => return Err(StoreError::not_found(table)),
            Err(e) => return Err(map_dynamo_error(e, "DescribeTable")),
        };

        let status = response
            .table()
            .and_then(|t| t.table_status())
            .ok_or_else(|| StoreError::other(format!("DescribeTable returned no status for '{table}'")))?;

        Ok(match status {
            AwsTableStatus::Active => TableStatus::Active,
            AwsTableStatus::Creating => TableStatus::Creating,
            AwsTableStatus::Deleting => TableStatus::Deleting,
            other => TableStatus::Unknown(other.as_str().to_string()),
        })
    }

    async fn delete_table(&self, table: &str) -> std::result::Result<(), StoreError> {
        let result = self.client.delete_table().table_name(table).send().await;

        match result {
            Ok(_) => {
                tracing::info!(table = %table, "table deletion started");
                Ok(())
            }
            Err(e) if is_delete_not_found(&e) => Err(StoreError::not_found(table)),
            Err(e) => Err(map_dynamo_error(e, "DeleteTable")),
        }
    }

    async fn put_movie(
        &self,
        table: &str,
        movie: &StoredMovie,
    ) -> std::result::Result<(), StoreError> {
        let result = self
            .client
            .put_item()
            .table_name(table)
            .item(ATTR_YEAR, AttributeValue::N(movie.yr.to_string()))
            .item(ATTR_RATING, AttributeValue::N(movie.rating.to_string()))
            .item(ATTR_TITLE, AttributeValue::S(movie.title.clone()))
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_put_throttled(&e) => Err(StoreError::throttled(format!(
                "PutItem throttled for '{}'",
                movie.title
            ))),
            Err(e) => Err(map_dynamo_error(e, "PutItem")),
        }
    }

    async fn query_movies(
        &self,
        table: &str,
        query: &MovieQuery,
    ) -> std::result::Result<Vec<StoredMovie>, StoreError> {
        let mut movies = Vec::new();
        let mut last_evaluated_key = None;

        loop {
            let mut request = self
                .client
                .query()
                .table_name(table)
                .key_condition_expression("yr = :y AND rating >= :r")
                .filter_expression("contains(title, :t)")
                .expression_attribute_values(":y", AttributeValue::N(query.year.to_string()))
                .expression_attribute_values(":r", AttributeValue::N(query.min_rating.to_string()))
                .expression_attribute_values(
                    ":t",
                    AttributeValue::S(query.title_contains().to_string()),
                );

            if let Some(key) = last_evaluated_key.take() {
                request = request.set_exclusive_start_key(Some(key));
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) if is_query_not_found(&e) => return Err(StoreError::not_found(table)),
                Err(e) if is_query_throttled(&e) => {
                    return Err(StoreError::throttled("Query throttled"))
                }
                Err(e) => return Err(map_dynamo_error(e, "Query")),
            };

            for item in response.items() {
                if let Some(movie) = item_to_stored(item) {
                    movies.push(movie);
                } else {
                    tracing::warn!(table = %table, "skipping item with unexpected shape");
                }
            }

            match response.last_evaluated_key() {
                Some(key) if !key.is_empty() => {
                    last_evaluated_key = Some(key.clone());
                }
                _ => break,
            }
        }

        Ok(movies)
    }
}

/// Convert a DynamoDB item to a StoredMovie
fn item_to_stored(item: &HashMap<String, AttributeValue>) -> Option<StoredMovie> {
    let yr = item.get(ATTR_YEAR)?.as_n().ok()?.parse().ok()?;
    let rating = item.get(ATTR_RATING)?.as_n().ok()?.parse().ok()?;
    let title = item.get(ATTR_TITLE)?.as_s().ok()?.clone();
    Some(StoredMovie { yr, rating, title })
}

/// Check if a CreateTable error is a resource-in-use (already exists) failure
fn is_create_resource_in_use(err: &SdkError<CreateTableError>) -> bool {
    match err {
        SdkError::ServiceError(service_err) => matches!(
            service_err.err(),
            CreateTableError::ResourceInUseException(_)
        ),
        _ => false,
    }
}

/// Check if a DescribeTable error is a resource-not-found failure
fn is_describe_not_found(err: &SdkError<DescribeTableError>) -> bool {
    match err {
        SdkError::ServiceError(service_err) => matches!(
            service_err.err(),
            DescribeTableError::ResourceNotFoundException(_)
        ),
        _ => false,
    }
}

/// Check if a DeleteTable error is a resource-not-found failure
fn is_delete_not_found(err: &SdkError<DeleteTableError>) -> bool {
    match err {
        SdkError::ServiceError(service_err) => matches!(
            service_err.err(),
            DeleteTableError::ResourceNotFoundException(_)
        ),
        _ => false,
    }
}

/// Check if a PutItem error is a throughput-exceeded (throttling) failure
fn is_put_throttled(err: &SdkError<PutItemError>) -> bool {
    match err {
        SdkError::ServiceError(service_err) => matches!(
            service_err.err(),
            PutItemError::ProvisionedThroughputExceededException(_)
        ),
        _ => false,
    }
}

/// Check if a Query error is a throughput-exceeded (throttling) failure
fn is_query_throttled(err: &SdkError<QueryError>) -> bool {
    match err {
        SdkError::ServiceError(service_err) => matches!(
            service_err.err(),
            QueryError::ProvisionedThroughputExceededException(_)
        ),
        _ => false,
    }
}

/// Check if a Query error is a resource-not-found failure
fn is_query_not_found(err: &SdkError<QueryError>) -> bool {
    match err {
        SdkError::ServiceError(service_err) => matches!(
            service_err.err(),
            QueryError::ResourceNotFoundException(_)
        ),
        _ => false,
    }
}

/// Map an SDK error to StoreError, classifying transient transport failures
fn map_dynamo_error<E: std::fmt::Debug>(err: SdkError<E>, operation: &str) -> StoreError {
    match &err {
        SdkError::TimeoutError(_) => {
            StoreError::timeout(format!("DynamoDB timeout during {operation}: {err:?}"))
        }
        SdkError::DispatchFailure(_) => {
            StoreError::io(format!("DynamoDB connection error during {operation}: {err:?}"))
        }
        _ => StoreError::other(format!("DynamoDB error during {operation}: {err:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_to_stored_reads_all_attributes() {
        let mut item = HashMap::new();
        item.insert(ATTR_YEAR.to_string(), AttributeValue::N("1999".to_string()));
        item.insert(ATTR_RATING.to_string(), AttributeValue::N("7".to_string()));
        item.insert(
            ATTR_TITLE.to_string(),
            AttributeValue::S("the matrix".to_string()),
        );

        let movie = item_to_stored(&item).unwrap();
        assert_eq!(movie.yr, 1999);
        assert_eq!(movie.rating, 7);
        assert_eq!(movie.title, "the matrix");
    }

    #[test]
    fn item_to_stored_rejects_missing_or_mistyped_attributes() {
        let mut item = HashMap::new();
        item.insert(ATTR_YEAR.to_string(), AttributeValue::N("1999".to_string()));
        assert!(item_to_stored(&item).is_none());

        item.insert(
            ATTR_RATING.to_string(),
            AttributeValue::S("seven".to_string()),
        );
        item.insert(
            ATTR_TITLE.to_string(),
            AttributeValue::S("the matrix".to_string()),
        );
        assert!(item_to_stored(&item).is_none());
    }
}
