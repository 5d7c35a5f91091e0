use crate::models::ATTRACTION_COLLECTION;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    options::{FindOptions, IndexOptions},
    Client as MongoClient, Database, IndexModel,
};
use service_core::error::AppError;

/// The document store the handlers talk to.
///
/// Built once at startup and shared read-only across requests as
/// `Arc<dyn AttractionStore>`.
#[async_trait]
pub trait AttractionStore: Send + Sync {
    /// Inserts `document` and returns the identifier the store assigned.
    async fn insert(&self, collection: &str, document: Document) -> Result<Bson, AppError>;

    /// Returns at most `limit` documents matching `filter`, in natural order.
    async fn find(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> Result<Vec<Document>, AppError>;

    async fn list_collection_names(&self) -> Result<Vec<String>, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "MongoDB client ready");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for attractions-service");

        let attractions = self.db.collection::<Document>(ATTRACTION_COLLECTION);

        for field in ["category", "location", "tags"] {
            let index = IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(
                    IndexOptions::builder()
                        .name(format!("{}_lookup", field))
                        .build(),
                )
                .build();

            attractions.create_index(index, None).await.map_err(|e| {
                tracing::error!(
                    "Failed to create {} index on {} collection: {}",
                    field,
                    ATTRACTION_COLLECTION,
                    e
                );
                AppError::from(e)
            })?;
            tracing::info!("Created index on {}.{}", ATTRACTION_COLLECTION, field);
        }

        Ok(())
    }

}

#[async_trait]
impl AttractionStore for MongoDb {
    async fn insert(&self, collection: &str, document: Document) -> Result<Bson, AppError> {
        let result = self
            .db
            .collection::<Document>(collection)
            .insert_one(document, None)
            .await
            .map_err(|e| {
                tracing::error!(collection = %collection, "MongoDB insert failed: {}", e);
                AppError::from(e)
            })?;
        Ok(result.inserted_id)
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> Result<Vec<Document>, AppError> {
        let options = FindOptions::builder().limit(limit).build();

        let cursor = self
            .db
            .collection::<Document>(collection)
            .find(filter, options)
            .await
            .map_err(|e| {
                tracing::error!(collection = %collection, "MongoDB find failed: {}", e);
                AppError::from(e)
            })?;

        cursor.try_collect().await.map_err(AppError::from)
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, AppError> {
        self.db
            .list_collection_names(None)
            .await
            .map_err(AppError::from)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}
