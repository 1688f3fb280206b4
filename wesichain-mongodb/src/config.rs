use std::fmt;

use mongodb::bson::Document as BsonDocument;
use mongodb::Client;

use crate::{ensure_key_index, MongoDocumentStore, MongoStoreError};

#[derive(Clone)]
pub struct MongoStoreBuilder {
    connection_string: Option<String>,
    database: Option<String>,
    collection: Option<String>,
    create_key_index: bool,
}

impl Default for MongoStoreBuilder {
    fn default() -> Self {
        Self {
            connection_string: None,
            database: None,
            collection: None,
            create_key_index: true,
        }
    }
}

impl fmt::Debug for MongoStoreBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Connection strings routinely embed credentials.
        let connection_string = if self.connection_string.is_some() {
            "<redacted>"
        } else {
            "<none>"
        };

        f.debug_struct("MongoStoreBuilder")
            .field("connection_string", &connection_string)
            .field("database", &self.database)
            .field("collection", &self.collection)
            .field("create_key_index", &self.create_key_index)
            .finish()
    }
}

impl MongoStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_string(mut self, value: impl Into<String>) -> Self {
        self.connection_string = Some(value.into());
        self
    }

    pub fn database(mut self, value: impl Into<String>) -> Self {
        self.database = Some(value.into());
        self
    }

    pub fn collection(mut self, value: impl Into<String>) -> Self {
        self.collection = Some(value.into());
        self
    }

    /// Whether `build` creates the unique index on the key field. On by
    /// default; turn off when the index is managed elsewhere.
    pub fn create_key_index(mut self, enabled: bool) -> Self {
        self.create_key_index = enabled;
        self
    }

    pub fn connection_string_from_env(mut self, var_name: &str) -> Self {
        if let Ok(value) = std::env::var(var_name) {
            self.connection_string = Some(value);
        }
        self
    }

    pub fn database_from_env(mut self, var_name: &str) -> Self {
        if let Ok(value) = std::env::var(var_name) {
            self.database = Some(value);
        }
        self
    }

    pub fn collection_from_env(mut self, var_name: &str) -> Self {
        if let Ok(value) = std::env::var(var_name) {
            self.collection = Some(value);
        }
        self
    }

    /// Validates the settings, creates the driver client and makes sure the
    /// unique key index exists. The client is created once and shared by
    /// every operation on the returned store.
    pub async fn build(self) -> Result<MongoDocumentStore, MongoStoreError> {
        let connection_string = self
            .connection_string
            .ok_or(MongoStoreError::MissingConnectionString)?;
        if connection_string.trim().is_empty() {
            return Err(MongoStoreError::EmptyConnectionString);
        }

        let database = self.database.ok_or(MongoStoreError::MissingDatabase)?;
        if database.trim().is_empty() {
            return Err(MongoStoreError::EmptyDatabase);
        }

        let collection = self.collection.ok_or(MongoStoreError::MissingCollection)?;
        if collection.trim().is_empty() {
            return Err(MongoStoreError::EmptyCollection);
        }

        let client = Client::with_uri_str(&connection_string).await?;
        let collection = client
            .database(&database)
            .collection::<BsonDocument>(&collection);

        if self.create_key_index {
            ensure_key_index(&collection).await?;
        }

        tracing::debug!(
            database = %database,
            collection = %collection.name(),
            "mongodb document store ready"
        );

        Ok(MongoDocumentStore::new(collection))
    }
}
